//! Coordinate reference system identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RasterError, Result};

/// A canonical CRS identifier string, e.g. "EPSG:4326".
///
/// The raster core only carries the identifier; projection math and CRS
/// interpretation belong to external collaborators. The identifier is
/// handed to codecs verbatim through the profile mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Crs(String);

impl Crs {
    /// Create a CRS from a numeric EPSG code.
    pub fn from_epsg(code: u32) -> Self {
        Self(format!("EPSG:{code}"))
    }

    /// Normalize a user-supplied CRS specification.
    ///
    /// Accepts "EPSG:4326" in any case, a bare numeric code like "4326",
    /// or any other authority string, which is kept as given.
    pub fn from_user_input(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RasterError::validation(
                "invalid CRS specification: empty string",
            ));
        }

        if let Ok(code) = trimmed.parse::<u32>() {
            return Ok(Self::from_epsg(code));
        }

        if let Some(code) = trimmed
            .to_uppercase()
            .strip_prefix("EPSG:")
            .and_then(|rest| rest.parse::<u32>().ok())
        {
            return Ok(Self::from_epsg(code));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The canonical identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
