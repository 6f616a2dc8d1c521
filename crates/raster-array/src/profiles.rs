//! Codec-facing creation profiles.
//!
//! A [`Profile`] is the mapping form of raster metadata exchanged verbatim
//! with the external codec, plus the driver settings that shape the output
//! file. GeoTIFF and COG defaults mirror the block size, compression, and
//! tiling settings used for web-optimized rasters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RasterError, Result};

pub const DEFAULT_BLOCK_SIZE: u64 = 512;
pub const DEFAULT_COMPRESS_Z_LEVEL: u64 = 9;
pub const DEFAULT_COMPRESSION: &str = "deflate";
pub const DEFAULT_BIGTIFF: &str = "YES";
pub const DRIVER_COG: &str = "COG";
pub const DRIVER_GTIFF: &str = "GTiff";

/// Key/value mapping handed to the external codec.
///
/// Values are JSON values so the mapping can carry strings, numbers,
/// booleans, and the six-element transform without a fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Fetch a required string value.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| RasterError::validation(format!("profile is missing key '{key}'")))?
            .as_str()
            .ok_or_else(|| RasterError::validation(format!("profile key '{key}' must be a string")))
    }

    /// Fetch a required non-negative integer value.
    pub fn get_usize(&self, key: &str) -> Result<usize> {
        self.get(key)
            .ok_or_else(|| RasterError::validation(format!("profile is missing key '{key}'")))?
            .as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| {
                RasterError::validation(format!("profile key '{key}' must be a non-negative integer"))
            })
    }

    /// Fetch an optional numeric value; `null` and a missing key both read
    /// as `None`.
    pub fn get_f64_opt(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_f64().map(Some).ok_or_else(|| {
                RasterError::validation(format!("profile key '{key}' must be a number"))
            }),
        }
    }
}

/// GeoTIFF creation defaults: tiled output, 512-pixel blocks, deflate
/// compression at level 9.
pub fn geotiff_defaults() -> Profile {
    let mut profile = Profile::new();
    profile.insert("driver", DRIVER_GTIFF);
    profile.insert("tiled", true);
    profile.insert("blockxsize", DEFAULT_BLOCK_SIZE);
    profile.insert("blockysize", DEFAULT_BLOCK_SIZE);
    profile.insert("compress", DEFAULT_COMPRESSION);
    profile.insert("zlevel", DEFAULT_COMPRESS_Z_LEVEL);
    profile.insert("bigtiff", DEFAULT_BIGTIFF);
    profile.insert("interleave", "pixel");
    profile
}

/// COG creation defaults for the COG driver.
pub fn cog_defaults() -> Profile {
    let mut profile = Profile::new();
    profile.insert("driver", DRIVER_COG);
    profile.insert("blocksize", DEFAULT_BLOCK_SIZE);
    profile.insert("compress", DEFAULT_COMPRESSION);
    profile.insert("level", DEFAULT_COMPRESS_Z_LEVEL);
    profile.insert("bigtiff", DEFAULT_BIGTIFF);
    profile.insert("overview_resampling", "nearest");
    profile.insert("predictor", "standard");
    profile
}

/// Apply GeoTIFF defaults on top of an existing profile.
///
/// The input keys are preserved; the defaults win for the driver settings
/// they cover.
pub fn apply_geotiff_profile(mut profile: Profile) -> Profile {
    for (key, value) in geotiff_defaults().iter() {
        profile.insert(key.clone(), value.clone());
    }
    profile
}

/// Apply COG defaults on top of an existing profile.
///
/// The COG driver manages block layout itself and rejects the GeoTIFF keys
/// that control it, so those are stripped before merging.
pub fn apply_cog_profile(mut profile: Profile) -> Profile {
    for key in ["blockxsize", "blockysize", "tiled", "interleave"] {
        profile.remove(key);
    }
    for (key, value) in cog_defaults().iter() {
        profile.insert(key.clone(), value.clone());
    }
    profile
}
