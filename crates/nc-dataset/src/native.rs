//! Native NetCDF reading using the netcdf library.
//!
//! The file is read once into a [`MemoryDataset`]: dimensions, variables,
//! attributes and payloads. Everything downstream works on that snapshot, so
//! the libnetcdf handle is closed before this function returns.

use std::path::Path;
use std::sync::Once;

use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::AttributeValue;
use tracing::debug;

use crate::dataset::{MemoryDataset, Variable};
use crate::error::{NcError, NcResult};
use crate::value::{widen_f32, ArrayData, AttrValue, DataType};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints diagnostics even when the Rust side handles the
/// error (for instance when probing an attribute that does not exist). Call
/// early, before any HDF5/NetCDF operation; repeated calls are no-ops.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are a
        // documented way to disable error output.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a NetCDF file and snapshot it into memory.
pub fn open<P: AsRef<Path>>(path: P) -> NcResult<MemoryDataset> {
    silence_hdf5_errors();

    let path = path.as_ref();
    let file = netcdf::open(path)
        .map_err(|e| NcError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let mut ds = MemoryDataset::new();

    for dim in file.dimensions() {
        ds = ds.with_dimension(&dim.name(), dim.len());
    }

    for attr in file.attributes() {
        let value = attr
            .value()
            .map_err(|e| NcError::InvalidFormat(format!("{}: {}", attr.name(), e)))?;
        ds = ds.with_global_attribute(attr.name(), convert_attribute(value));
    }

    for var in file.variables() {
        let name = var.name();
        let dtype = convert_type(&var.vartype()).ok_or_else(|| {
            NcError::InvalidFormat(format!("Unsupported type for variable {}", name))
        })?;

        let dimensions: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let mut variable = Variable::new(name.as_str(), dtype);
        variable.dimensions = dimensions;

        for attr in var.attributes() {
            let value = attr
                .value()
                .map_err(|e| NcError::InvalidFormat(format!("{}:{}: {}", name, attr.name(), e)))?;
            variable = variable.with_attribute(attr.name(), convert_attribute(value));
        }

        variable.data = read_values(&var, dtype)?;
        ds = ds.with_variable(variable);
    }

    debug!(
        path = %path.display(),
        variables = ds.variables().len(),
        dimensions = ds.dimensions().len(),
        "Loaded NetCDF dataset"
    );

    Ok(ds)
}

// =============================================================================
// Internal helpers
// =============================================================================

fn read_values(var: &netcdf::Variable, dtype: DataType) -> NcResult<ArrayData> {
    let read_err =
        |e: netcdf::Error| NcError::InvalidFormat(format!("Failed to read {}: {}", var.name(), e));

    match dtype {
        DataType::Float | DataType::Double => {
            Ok(ArrayData::Float(var.get_values::<f64, _>(..).map_err(read_err)?))
        }
        // Character and string payloads are not needed past the header.
        DataType::Char | DataType::String => Ok(ArrayData::Text(Vec::new())),
        _ => Ok(ArrayData::Int(var.get_values::<i64, _>(..).map_err(read_err)?)),
    }
}

fn convert_type(vartype: &NcVariableType) -> Option<DataType> {
    let dtype = match vartype {
        NcVariableType::Int(IntType::I8) => DataType::Byte,
        NcVariableType::Int(IntType::U8) => DataType::UByte,
        NcVariableType::Int(IntType::I16) => DataType::Short,
        NcVariableType::Int(IntType::U16) => DataType::UShort,
        NcVariableType::Int(IntType::I32) => DataType::Int,
        NcVariableType::Int(IntType::U32) => DataType::UInt,
        NcVariableType::Int(IntType::I64) => DataType::Int64,
        NcVariableType::Int(IntType::U64) => DataType::UInt64,
        NcVariableType::Float(FloatType::F32) => DataType::Float,
        NcVariableType::Float(FloatType::F64) => DataType::Double,
        NcVariableType::Char => DataType::Char,
        NcVariableType::String => DataType::String,
        _ => return None,
    };
    Some(dtype)
}

fn convert_attribute(value: AttributeValue) -> AttrValue {
    fn ints<T: Into<i64> + Copy>(values: &[T]) -> AttrValue {
        AttrValue::Ints(values.iter().map(|v| (*v).into()).collect())
    }

    match value {
        AttributeValue::Str(s) => AttrValue::Text(s),
        AttributeValue::Strs(v) => AttrValue::Texts(v),
        AttributeValue::Uchar(v) => AttrValue::Int(v.into()),
        AttributeValue::Schar(v) => AttrValue::Int(v.into()),
        AttributeValue::Ushort(v) => AttrValue::Int(v.into()),
        AttributeValue::Short(v) => AttrValue::Int(v.into()),
        AttributeValue::Uint(v) => AttrValue::Int(v.into()),
        AttributeValue::Int(v) => AttrValue::Int(v.into()),
        AttributeValue::Longlong(v) => AttrValue::Int(v),
        AttributeValue::Ulonglong(v) => AttrValue::Int(v as i64),
        AttributeValue::Float(v) => AttrValue::Float(widen_f32(v)),
        AttributeValue::Double(v) => AttrValue::Float(v),
        AttributeValue::Uchars(v) => ints(&v),
        AttributeValue::Schars(v) => ints(&v),
        AttributeValue::Ushorts(v) => ints(&v),
        AttributeValue::Shorts(v) => ints(&v),
        AttributeValue::Uints(v) => ints(&v),
        AttributeValue::Ints(v) => ints(&v),
        AttributeValue::Longlongs(v) => AttrValue::Ints(v),
        AttributeValue::Ulonglongs(v) => AttrValue::Ints(v.into_iter().map(|x| x as i64).collect()),
        AttributeValue::Floats(v) => AttrValue::Floats(v.into_iter().map(widen_f32).collect()),
        AttributeValue::Doubles(v) => AttrValue::Floats(v),
    }
}
