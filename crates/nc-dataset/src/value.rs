//! Attribute values, variable payloads and external data types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single numeric attribute value, keeping whether the source stored it
/// as an integer or a floating point number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => f.write_str(&format_float(v)),
        }
    }
}

/// Shortest round-trip rendering of a float that always reads as a float:
/// `30.0`, `0.25`, `1e+16`, `1.5e-05`.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Debug already switches to exponent form outside [1e-4, 1e16)
    let repr = format!("{:?}", v);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

/// Widen an `f32` to the `f64` with the same shortest decimal form, so that
/// `0.1f32` becomes `0.1` rather than `0.10000000149011612`.
pub fn widen_f32(v: f32) -> f64 {
    v.to_string().parse().unwrap_or(v as f64)
}

/// Content of a variable or global attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Texts(Vec<String>),
}

impl AttrValue {
    /// Number of elements (a scalar counts as one).
    pub fn len(&self) -> usize {
        match self {
            AttrValue::Text(_) | AttrValue::Int(_) | AttrValue::Float(_) => 1,
            AttrValue::Ints(v) => v.len(),
            AttrValue::Floats(v) => v.len(),
            AttrValue::Texts(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value as a single number: a numeric scalar or a one-element array.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            AttrValue::Int(v) => Some(Number::Int(*v)),
            AttrValue::Float(v) => Some(Number::Float(*v)),
            AttrValue::Ints(v) if v.len() == 1 => Some(Number::Int(v[0])),
            AttrValue::Floats(v) if v.len() == 1 => Some(Number::Float(v[0])),
            _ => None,
        }
    }

    /// Element `index` of a numeric value. A scalar only has index 0.
    pub fn number_at(&self, index: usize) -> Option<Number> {
        match self {
            AttrValue::Int(v) if index == 0 => Some(Number::Int(*v)),
            AttrValue::Float(v) if index == 0 => Some(Number::Float(*v)),
            AttrValue::Ints(v) => v.get(index).map(|x| Number::Int(*x)),
            AttrValue::Floats(v) => v.get(index).map(|x| Number::Float(*x)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Texts(v) if v.len() == 1 => Some(&v[0]),
            _ => None,
        }
    }

    /// Render in CDL syntax, as `ncdump` prints attribute values.
    pub fn to_cdl(&self) -> String {
        fn join<T>(items: &[T], f: impl Fn(&T) -> String) -> String {
            items.iter().map(f).collect::<Vec<_>>().join(", ")
        }

        match self {
            AttrValue::Text(s) => format!("{:?}", s),
            AttrValue::Int(v) => v.to_string(),
            AttrValue::Float(v) => format_float(*v),
            AttrValue::Ints(v) => join(v, |x| x.to_string()),
            AttrValue::Floats(v) => join(v, |x| format_float(*x)),
            AttrValue::Texts(v) => join(v, |s| format!("{:?}", s)),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Float(v) => f.write_str(&format_float(*v)),
            _ => write!(f, "[{}]", self.to_cdl()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v.into())
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(widen_f32(v))
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<Vec<i64>> for AttrValue {
    fn from(v: Vec<i64>) -> Self {
        AttrValue::Ints(v)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        AttrValue::Floats(v)
    }
}

impl<const N: usize> From<[f64; N]> for AttrValue {
    fn from(v: [f64; N]) -> Self {
        AttrValue::Floats(v.to_vec())
    }
}

/// NetCDF external data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Byte,
    UByte,
    Char,
    Short,
    UShort,
    Int,
    UInt,
    Int64,
    UInt64,
    Float,
    Double,
    String,
}

impl DataType {
    /// Numpy-style type code (`"f8"`, `"i4"`, `"S1"`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            DataType::Byte => "i1",
            DataType::UByte => "u1",
            DataType::Char => "S1",
            DataType::Short => "i2",
            DataType::UShort => "u2",
            DataType::Int => "i4",
            DataType::UInt => "u4",
            DataType::Int64 => "i8",
            DataType::UInt64 => "u8",
            DataType::Float => "f4",
            DataType::Double => "f8",
            DataType::String => "O",
        }
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            DataType::Byte => "byte",
            DataType::UByte => "ubyte",
            DataType::Char => "char",
            DataType::Short => "short",
            DataType::UShort => "ushort",
            DataType::Int => "int",
            DataType::UInt => "uint",
            DataType::Int64 => "int64",
            DataType::UInt64 => "uint64",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
        };
        f.write_str(keyword)
    }
}

/// Full data payload of a variable, flattened in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayData {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl Default for ArrayData {
    fn default() -> Self {
        ArrayData::Float(Vec::new())
    }
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Int(v) => v.len(),
            ArrayData::Float(v) => v.len(),
            ArrayData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric payload widened to `f64`; `None` for text.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            ArrayData::Int(v) => Some(v.iter().map(|x| *x as f64).collect()),
            ArrayData::Float(v) => Some(v.clone()),
            ArrayData::Text(_) => None,
        }
    }

    /// Smallest non-NaN value of a numeric payload.
    pub fn min(&self) -> Option<f64> {
        self.as_f64()?
            .into_iter()
            .filter(|v| !v.is_nan())
            .reduce(f64::min)
    }

    /// Largest non-NaN value of a numeric payload.
    pub fn max(&self) -> Option<f64> {
        self.as_f64()?
            .into_iter()
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_rendering_keeps_decimal_point() {
        assert_eq!(format_float(30.0), "30.0");
        assert_eq!(format_float(-97.0), "-97.0");
        assert_eq!(format_float(0.9996), "0.9996");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
    }

    #[test]
    fn test_number_display_preserves_source_type() {
        assert_eq!(Number::Int(0).to_string(), "0");
        assert_eq!(Number::Float(0.0).to_string(), "0.0");
    }

    #[test]
    fn test_widen_f32_uses_shortest_form() {
        assert_eq!(widen_f32(0.1), 0.1);
        assert_eq!(AttrValue::from(25.5f32), AttrValue::Float(25.5));
    }

    #[test]
    fn test_as_number_accepts_single_element_arrays() {
        assert_eq!(AttrValue::Floats(vec![70.0]).as_number(), Some(Number::Float(70.0)));
        assert_eq!(AttrValue::Floats(vec![30.0, 60.0]).as_number(), None);
        assert_eq!(AttrValue::Text("x".into()).as_number(), None);
    }

    #[test]
    fn test_number_at() {
        let sp = AttrValue::Floats(vec![30.0, 60.0]);
        assert_eq!(sp.number_at(1), Some(Number::Float(60.0)));
        assert_eq!(sp.number_at(2), None);
        assert_eq!(AttrValue::Int(4).number_at(0), Some(Number::Int(4)));
        assert_eq!(AttrValue::Int(4).number_at(1), None);
    }

    #[test]
    fn test_untagged_json_distinguishes_int_and_float() {
        let values: Vec<AttrValue> =
            serde_json::from_str(r#"["K", 0, 40.0, [30.0, 60.0], [1, 2]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                AttrValue::Text("K".into()),
                AttrValue::Int(0),
                AttrValue::Float(40.0),
                AttrValue::Floats(vec![30.0, 60.0]),
                AttrValue::Ints(vec![1, 2]),
            ]
        );
    }

    #[test]
    fn test_cdl_rendering() {
        assert_eq!(AttrValue::Text("degrees_north".into()).to_cdl(), "\"degrees_north\"");
        assert_eq!(AttrValue::Floats(vec![30.0, 60.0]).to_cdl(), "30.0, 60.0");
    }

    #[test]
    fn test_array_min_max_skip_nan() {
        let data = ArrayData::Float(vec![3.0, f64::NAN, -1.0, 7.5]);
        assert_eq!(data.min(), Some(-1.0));
        assert_eq!(data.max(), Some(7.5));
        assert_eq!(ArrayData::Text(vec!["a".into()]).min(), None);
    }

    #[test]
    fn test_data_type_codes() {
        assert_eq!(DataType::Double.code(), "f8");
        assert_eq!(DataType::Char.to_string(), "char");
        let parsed: DataType = serde_json::from_str("\"int64\"").unwrap();
        assert_eq!(parsed, DataType::Int64);
    }
}
