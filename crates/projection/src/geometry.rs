//! Minimal planar geometries for area computation.
//!
//! Coordinates are `(x, y)` pairs in whatever reference the geometry was
//! built in: degrees for geographic references, projection units otherwise.

/// A coordinate pair.
pub type Coord = (f64, f64);

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon {
        exterior: Vec<Coord>,
        interiors: Vec<Vec<Coord>>,
    },
    MultiPolygon(Vec<Geometry>),
}

impl Geometry {
    /// Polygon without holes.
    pub fn polygon(exterior: Vec<Coord>) -> Self {
        Geometry::Polygon {
            exterior,
            interiors: Vec::new(),
        }
    }

    /// Axis-aligned rectangle, e.g. a grid cell or bounding box.
    pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Geometry::polygon(vec![
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
            (min_x, min_y),
        ])
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Geometry::Point(_))
    }

    /// Planar area in squared coordinate units. Holes are subtracted; points
    /// and line strings have no area.
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Point(_) | Geometry::LineString(_) => 0.0,
            Geometry::Polygon {
                exterior,
                interiors,
            } => {
                let holes: f64 = interiors.iter().map(|ring| ring_area(ring)).sum();
                (ring_area(exterior) - holes).max(0.0)
            }
            Geometry::MultiPolygon(parts) => parts.iter().map(Geometry::area).sum(),
        }
    }

    /// Apply `f` to every vertex, stopping at the first error.
    pub fn try_map_coords<E, F>(&self, f: &mut F) -> Result<Geometry, E>
    where
        F: FnMut(Coord) -> Result<Coord, E>,
    {
        Ok(match self {
            Geometry::Point(c) => Geometry::Point(f(*c)?),
            Geometry::LineString(coords) => Geometry::LineString(map_ring(coords, f)?),
            Geometry::Polygon {
                exterior,
                interiors,
            } => Geometry::Polygon {
                exterior: map_ring(exterior, f)?,
                interiors: interiors
                    .iter()
                    .map(|r| map_ring(r, f))
                    .collect::<Result<Vec<_>, E>>()?,
            },
            Geometry::MultiPolygon(parts) => Geometry::MultiPolygon(
                parts
                    .iter()
                    .map(|p| p.try_map_coords(f))
                    .collect::<Result<Vec<_>, E>>()?,
            ),
        })
    }
}

fn map_ring<E, F>(coords: &[Coord], f: &mut F) -> Result<Vec<Coord>, E>
where
    F: FnMut(Coord) -> Result<Coord, E>,
{
    coords.iter().map(|&c| f(c)).collect()
}

/// Unsigned shoelace area of a ring. Closing the ring is optional.
fn ring_area(coords: &[Coord]) -> f64 {
    if coords.len() < 3 {
        return 0.0;
    }
    let twice: f64 = coords
        .iter()
        .zip(coords.iter().cycle().skip(1))
        .map(|(a, b)| a.0 * b.1 - b.0 * a.1)
        .sum();
    (twice / 2.0).abs()
}
