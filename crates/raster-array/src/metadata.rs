//! Descriptive metadata for raster datasets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bbox::BoundingBox;
use crate::codec::{RasterCodec, RasterSource};
use crate::crs::Crs;
use crate::dtype::RasterDtype;
use crate::error::{RasterError, Result};
use crate::profiles::{apply_geotiff_profile, Profile};
use crate::transform::GeoTransform;

/// Resolution value meaning "not specified".
pub const NO_RESOLUTION_SPECIFIED: f64 = 0.0;

/// Immutable descriptive record for a raster dataset.
///
/// Fields are fixed at construction and validated up front: band count is
/// at least 1, width and height are positive, and a nodata sentinel must
/// be exactly representable in the declared dtype. The only way to obtain
/// a modified record is the [`copy`](RasterMetadata::copy) builder, which
/// re-validates everything and leaves the original untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterMetadata {
    crs: Crs,
    count: usize,
    width: usize,
    height: usize,
    dtype: RasterDtype,
    nodata: Option<f64>,
    transform: GeoTransform,
    #[serde(default)]
    resolution: f64,
}

impl RasterMetadata {
    /// Create a validated metadata record.
    ///
    /// Fails with a validation error when `count` is zero, `width` or
    /// `height` is zero, or `nodata` cannot be represented in `dtype`.
    pub fn new(
        crs: Crs,
        count: usize,
        width: usize,
        height: usize,
        dtype: RasterDtype,
        nodata: Option<f64>,
        transform: GeoTransform,
    ) -> Result<Self> {
        Self::with_resolution(
            crs,
            count,
            width,
            height,
            dtype,
            nodata,
            transform,
            NO_RESOLUTION_SPECIFIED,
        )
    }

    /// Create a validated metadata record carrying a spatial resolution.
    #[allow(clippy::too_many_arguments)]
    pub fn with_resolution(
        crs: Crs,
        count: usize,
        width: usize,
        height: usize,
        dtype: RasterDtype,
        nodata: Option<f64>,
        transform: GeoTransform,
        resolution: f64,
    ) -> Result<Self> {
        if count < 1 {
            return Err(RasterError::validation("band count must be at least 1"));
        }
        if width == 0 {
            return Err(RasterError::validation("raster width must be positive"));
        }
        if height == 0 {
            return Err(RasterError::validation("raster height must be positive"));
        }
        let nodata = match nodata {
            Some(value) => Some(dtype.validate_nodata(value)?),
            None => None,
        };

        Ok(Self {
            crs,
            count,
            width,
            height,
            dtype,
            nodata,
            transform,
            resolution,
        })
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dtype(&self) -> RasterDtype {
        self.dtype
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn transform(&self) -> GeoTransform {
        self.transform
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Buffer shape this metadata describes, as `(count, height, width)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.count, self.height, self.width)
    }

    /// World bounds of the raster under its geotransform.
    pub fn bounds(&self) -> BoundingBox {
        self.transform.array_bounds(self.width, self.height)
    }

    /// Mapping form of this record for the external codec, with GeoTIFF
    /// creation defaults applied.
    ///
    /// Carries the keys `crs`, `count`, `width`, `height`, `dtype`,
    /// `nodata`, and `transform`; resolution is bookkeeping and stays out
    /// of the mapping.
    pub fn profile(&self) -> Profile {
        let mut profile = Profile::new();
        profile.insert("crs", self.crs.as_str());
        profile.insert("count", self.count as u64);
        profile.insert("width", self.width as u64);
        profile.insert("height", self.height as u64);
        profile.insert("dtype", self.dtype.name());
        profile.insert(
            "nodata",
            self.nodata
                .map(serde_json::Value::from)
                .unwrap_or(serde_json::Value::Null),
        );
        profile.insert("transform", self.transform.to_array().to_vec());
        apply_geotiff_profile(profile)
    }

    /// Rebuild a metadata record from a codec profile mapping.
    pub fn from_profile(profile: &Profile) -> Result<Self> {
        let crs = Crs::from_user_input(profile.get_str("crs")?)?;
        let count = profile.get_usize("count")?;
        let width = profile.get_usize("width")?;
        let height = profile.get_usize("height")?;
        let dtype: RasterDtype = profile.get_str("dtype")?.parse()?;
        let nodata = profile.get_f64_opt("nodata")?;

        let transform_value = profile
            .get("transform")
            .ok_or_else(|| RasterError::validation("profile is missing key 'transform'"))?;
        let transform: [f64; 6] = serde_json::from_value(transform_value.clone())
            .map_err(|err| {
                RasterError::validation(format!("profile key 'transform' is malformed: {err}"))
            })?;

        Self::new(crs, count, width, height, dtype, nodata, transform.into())
    }

    /// Decode only the metadata from a raster source.
    pub fn from_source(
        source: &mut RasterSource<'_>,
        codec: &dyn RasterCodec,
    ) -> Result<Self> {
        codec
            .decode_metadata(source)
            .map_err(RasterError::SourceRead)
    }

    /// Start a copy with named-field overrides.
    ///
    /// The builder re-validates every invariant on
    /// [`build`](MetadataCopy::build); the original record is unaffected.
    pub fn copy(&self) -> MetadataCopy {
        MetadataCopy {
            crs: self.crs.clone(),
            count: self.count,
            width: self.width,
            height: self.height,
            dtype: self.dtype,
            nodata: self.nodata,
            transform: self.transform,
            resolution: self.resolution,
        }
    }
}

impl fmt::Display for RasterMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RasterMetadata(crs={}, count={}, width={}, height={}, dtype={}, nodata={}, resolution={})",
            self.crs,
            self.count,
            self.width,
            self.height,
            self.dtype,
            self.nodata
                .map(|n| n.to_string())
                .unwrap_or_else(|| "none".to_string()),
            self.resolution,
        )
    }
}

/// Builder for a modified copy of a [`RasterMetadata`].
#[derive(Debug, Clone)]
pub struct MetadataCopy {
    crs: Crs,
    count: usize,
    width: usize,
    height: usize,
    dtype: RasterDtype,
    nodata: Option<f64>,
    transform: GeoTransform,
    resolution: f64,
}

impl MetadataCopy {
    pub fn crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    pub fn dtype(mut self, dtype: RasterDtype) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn clear_nodata(mut self) -> Self {
        self.nodata = None;
        self
    }

    pub fn transform(mut self, transform: GeoTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Validate the overrides and produce the new record.
    pub fn build(self) -> Result<RasterMetadata> {
        RasterMetadata::with_resolution(
            self.crs,
            self.count,
            self.width,
            self.height,
            self.dtype,
            self.nodata,
            self.transform,
            self.resolution,
        )
    }
}
