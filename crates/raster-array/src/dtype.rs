//! Numeric data type tags for raster pixels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RasterError, Result};

/// The closed set of numeric types a raster buffer can hold.
///
/// Names follow the lowercase convention used by raster file codecs
/// ("uint8", "int16", "float32", ...), which is also how the tag appears
/// in the codec profile mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterDtype {
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl RasterDtype {
    /// Canonical codec-facing name for this dtype.
    pub fn name(&self) -> &'static str {
        match self {
            RasterDtype::UInt8 => "uint8",
            RasterDtype::Int16 => "int16",
            RasterDtype::UInt16 => "uint16",
            RasterDtype::Int32 => "int32",
            RasterDtype::UInt32 => "uint32",
            RasterDtype::Float32 => "float32",
            RasterDtype::Float64 => "float64",
        }
    }

    /// Whether this is an integer dtype.
    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Whether this is a floating-point dtype.
    pub fn is_float(&self) -> bool {
        matches!(self, RasterDtype::Float32 | RasterDtype::Float64)
    }

    /// Size of one pixel value in bytes.
    pub fn size_bytes(&self) -> usize {
        match self {
            RasterDtype::UInt8 => 1,
            RasterDtype::Int16 | RasterDtype::UInt16 => 2,
            RasterDtype::Int32 | RasterDtype::UInt32 | RasterDtype::Float32 => 4,
            RasterDtype::Float64 => 8,
        }
    }

    /// Representable value range as `(min, max)`.
    pub fn value_range(&self) -> (f64, f64) {
        match self {
            RasterDtype::UInt8 => (f64::from(u8::MIN), f64::from(u8::MAX)),
            RasterDtype::Int16 => (f64::from(i16::MIN), f64::from(i16::MAX)),
            RasterDtype::UInt16 => (f64::from(u16::MIN), f64::from(u16::MAX)),
            RasterDtype::Int32 => (f64::from(i32::MIN), f64::from(i32::MAX)),
            RasterDtype::UInt32 => (f64::from(u32::MIN), f64::from(u32::MAX)),
            RasterDtype::Float32 => (f64::from(f32::MIN), f64::from(f32::MAX)),
            RasterDtype::Float64 => (f64::MIN, f64::MAX),
        }
    }

    /// Validate that a nodata sentinel is exactly representable in this dtype.
    ///
    /// Integer dtypes require a whole number inside the representable range;
    /// NaN is only valid for floating-point dtypes.
    pub fn validate_nodata(&self, nodata: f64) -> Result<f64> {
        if nodata.is_nan() {
            if self.is_integer() {
                return Err(RasterError::validation(format!(
                    "nodata NaN is not representable in integer dtype {self}"
                )));
            }
            return Ok(nodata);
        }

        if self.is_integer() && nodata.fract() != 0.0 {
            return Err(RasterError::validation(format!(
                "nodata value {nodata} is not a whole number for integer dtype {self}"
            )));
        }

        let (min, max) = self.value_range();
        if nodata < min || nodata > max {
            return Err(RasterError::validation(format!(
                "nodata value {nodata} is not between the min and max of dtype {self}"
            )));
        }

        Ok(nodata)
    }
}

impl fmt::Display for RasterDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RasterDtype {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uint8" => Ok(RasterDtype::UInt8),
            "int16" => Ok(RasterDtype::Int16),
            "uint16" => Ok(RasterDtype::UInt16),
            "int32" => Ok(RasterDtype::Int32),
            "uint32" => Ok(RasterDtype::UInt32),
            "float32" => Ok(RasterDtype::Float32),
            "float64" => Ok(RasterDtype::Float64),
            _ => Err(RasterError::validation(format!("unknown dtype: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for dtype in [
            RasterDtype::UInt8,
            RasterDtype::Int16,
            RasterDtype::UInt16,
            RasterDtype::Int32,
            RasterDtype::UInt32,
            RasterDtype::Float32,
            RasterDtype::Float64,
        ] {
            assert_eq!(dtype.name().parse::<RasterDtype>().unwrap(), dtype);
        }
        assert!("complex64".parse::<RasterDtype>().is_err());
    }

    #[test]
    fn test_validate_nodata_whole_numbers() {
        assert_eq!(RasterDtype::Int16.validate_nodata(-99.0).unwrap(), -99.0);
        assert!(RasterDtype::Int16.validate_nodata(-99.5).is_err());
        assert_eq!(RasterDtype::Float32.validate_nodata(-99.5).unwrap(), -99.5);
    }

    #[test]
    fn test_validate_nodata_range() {
        assert!(RasterDtype::UInt8.validate_nodata(9999.0).is_err());
        assert!(RasterDtype::UInt8.validate_nodata(-1.0).is_err());
        assert_eq!(RasterDtype::UInt8.validate_nodata(255.0).unwrap(), 255.0);
    }

    #[test]
    fn test_validate_nodata_nan() {
        assert!(RasterDtype::Int32.validate_nodata(f64::NAN).is_err());
        assert!(RasterDtype::Float32.validate_nodata(f64::NAN).unwrap().is_nan());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&RasterDtype::Float32).unwrap();
        assert_eq!(json, "\"float32\"");
        let back: RasterDtype = serde_json::from_str("\"int16\"").unwrap();
        assert_eq!(back, RasterDtype::Int16);
    }
}
