use std::fmt::{Display, Formatter};

pub use gdal_sys::GDALDataType;

use crate::errors::{GdalError, Result};
use crate::utils::_string;

/// Type-level constraint for limiting which primitive numeric values can be passed
/// to functions needing target data type.
pub trait GdalType: Copy + Default + PartialOrd {
    fn gdal_type() -> GDALDataType::Type;

    /// Converts a nodata sentinel, which GDAL always reports as `f64`, into
    /// this type. `None` when no value of this type equals `value`.
    fn from_f64(value: f64) -> Option<Self>;
}

// `GDT_Int8` only exists in the bindings of GDAL 3.7 and later.
const GDT_INT8: GDALDataType::Type = 14;

macro_rules! impl_gdal_int_type {
    ($($ty:ty => $gdal:expr),+ $(,)?) => {
        $(
            impl GdalType for $ty {
                fn gdal_type() -> GDALDataType::Type {
                    $gdal
                }

                fn from_f64(value: f64) -> Option<Self> {
                    // `MAX as f64` already rounds up to 2^64 or 2^63 for the 64-bit types.
                    let in_range = value >= <$ty>::MIN as f64 && value < <$ty>::MAX as f64 + 1.0;
                    (in_range && value.fract() == 0.0).then_some(value as $ty)
                }
            }
        )+
    };
}

macro_rules! impl_gdal_float_type {
    ($($ty:ty => $gdal:expr),+ $(,)?) => {
        $(
            impl GdalType for $ty {
                fn gdal_type() -> GDALDataType::Type {
                    $gdal
                }

                fn from_f64(value: f64) -> Option<Self> {
                    Some(value as $ty)
                }
            }
        )+
    };
}

impl_gdal_int_type! {
    u8 => GDALDataType::GDT_Byte,
    i8 => GDT_INT8,
    u16 => GDALDataType::GDT_UInt16,
    i16 => GDALDataType::GDT_Int16,
    u32 => GDALDataType::GDT_UInt32,
    i32 => GDALDataType::GDT_Int32,
    u64 => GDALDataType::GDT_UInt64,
    i64 => GDALDataType::GDT_Int64,
}

impl_gdal_float_type! {
    f32 => GDALDataType::GDT_Float32,
    f64 => GDALDataType::GDT_Float64,
}

/// The pixel types a COG can be built from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GdalDataType {
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Float32,
    Float64,
}

impl GdalDataType {
    pub fn gdal_ordinal(&self) -> GDALDataType::Type {
        match self {
            GdalDataType::UInt8 => GDALDataType::GDT_Byte,
            GdalDataType::Int8 => GDT_INT8,
            GdalDataType::UInt16 => GDALDataType::GDT_UInt16,
            GdalDataType::Int16 => GDALDataType::GDT_Int16,
            GdalDataType::UInt32 => GDALDataType::GDT_UInt32,
            GdalDataType::Int32 => GDALDataType::GDT_Int32,
            GdalDataType::UInt64 => GDALDataType::GDT_UInt64,
            GdalDataType::Int64 => GDALDataType::GDT_Int64,
            GdalDataType::Float32 => GDALDataType::GDT_Float32,
            GdalDataType::Float64 => GDALDataType::GDT_Float64,
        }
    }

    /// GDAL's own name for the type, e.g. `Byte` or `Float32`.
    pub fn name(&self) -> String {
        _string(unsafe { gdal_sys::GDALGetDataTypeName(self.gdal_ordinal()) })
    }
}

impl TryFrom<GDALDataType::Type> for GdalDataType {
    type Error = GdalError;

    fn try_from(value: GDALDataType::Type) -> Result<Self> {
        Ok(match value {
            GDALDataType::GDT_Byte => GdalDataType::UInt8,
            GDT_INT8 => GdalDataType::Int8,
            GDALDataType::GDT_UInt16 => GdalDataType::UInt16,
            GDALDataType::GDT_Int16 => GdalDataType::Int16,
            GDALDataType::GDT_UInt32 => GdalDataType::UInt32,
            GDALDataType::GDT_Int32 => GdalDataType::Int32,
            GDALDataType::GDT_UInt64 => GdalDataType::UInt64,
            GDALDataType::GDT_Int64 => GdalDataType::Int64,
            GDALDataType::GDT_Float32 => GdalDataType::Float32,
            GDALDataType::GDT_Float64 => GdalDataType::Float64,
            other => {
                return Err(GdalError::BadArgument(format!(
                    "unsupported GDALDataType {other}"
                )))
            }
        })
    }
}

impl Display for GdalDataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_round_trip() {
        for ty in [
            GdalDataType::UInt8,
            GdalDataType::Int8,
            GdalDataType::UInt16,
            GdalDataType::Int16,
            GdalDataType::UInt32,
            GdalDataType::Int32,
            GdalDataType::UInt64,
            GdalDataType::Int64,
            GdalDataType::Float32,
            GdalDataType::Float64,
        ] {
            assert_eq!(GdalDataType::try_from(ty.gdal_ordinal()).unwrap(), ty);
        }
    }

    #[test]
    fn complex_types_are_rejected() {
        assert!(GdalDataType::try_from(GDALDataType::GDT_CFloat32).is_err());
        assert!(GdalDataType::try_from(GDALDataType::GDT_Unknown).is_err());
    }

    #[test]
    fn type_names() {
        assert_eq!(GdalDataType::UInt8.name(), "Byte");
        assert_eq!(GdalDataType::Float32.to_string(), "Float32");
    }

    #[test]
    fn nodata_in_integer_types() {
        assert_eq!(u8::from_f64(200.0), Some(200));
        assert_eq!(i16::from_f64(-3.0), Some(-3));
        assert_eq!(u8::from_f64(-9999.0), None);
        assert_eq!(u8::from_f64(256.0), None);
        assert_eq!(i32::from_f64(0.5), None);
        assert_eq!(u16::from_f64(f64::NAN), None);
        assert_eq!(i8::from_f64(-128.0), Some(i8::MIN));
        assert_eq!(i64::from_f64(-9_007_199_254_740_992.0), Some(-9_007_199_254_740_992));
        assert_eq!(u64::from_f64(18_446_744_073_709_551_616.0), None);
    }

    #[test]
    fn nodata_in_float_types() {
        assert_eq!(f32::from_f64(0.1), Some(0.1f32));
        assert_eq!(f32::from_f64(-3.40282346638529e+38), Some(f32::MIN));
        assert!(f32::from_f64(f64::NAN).unwrap().is_nan());
        assert_eq!(f64::from_f64(0.1), Some(0.1));
    }
}
