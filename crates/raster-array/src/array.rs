//! Spatially aware raster arrays.
//!
//! [`RasterArray`] pairs an owned pixel buffer with validated metadata.
//! The pairing is checked once, at construction: the buffer must be rank 3
//! with the exact shape and dtype the metadata declares. After that the
//! array is a value object: the validity mask and band views are pure
//! derivations, and any transformation produces a new array with new,
//! re-validated metadata.
//!
//! The buffer is kept as a plain array rather than a masked one; when
//! nodata-aware computation is needed, [`RasterArray::mask`] and
//! [`RasterArray::masked`] derive the mask on the fly from the metadata's
//! nodata sentinel.

use std::path::Path;

use ndarray::{Array2, Array3, Axis};
use tracing::debug;

use crate::buffer::{BandView, RasterBuffer};
use crate::codec::{RasterCodec, RasterSource};
use crate::dtype::RasterDtype;
use crate::error::{RasterError, Result};
use crate::metadata::RasterMetadata;

/// A raster pixel buffer paired with validated metadata.
///
/// The array exclusively owns its buffer and never mutates it after
/// construction; reads from multiple threads are safe without locking.
/// There are deliberately no arithmetic methods here: pull the parts out
/// with [`into_parts`](RasterArray::into_parts), compute, and construct a
/// new array.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterArray {
    buffer: RasterBuffer,
    metadata: RasterMetadata,
}

/// Overrides applied while reading from a source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Convert the decoded buffer to this dtype.
    pub target_dtype: Option<RasterDtype>,
    /// Rewrite the source nodata sentinel to this value.
    pub target_nodata: Option<f64>,
}

impl RasterArray {
    /// Pair a buffer with its metadata.
    ///
    /// Fails with a shape error when the buffer shape differs from
    /// `metadata.shape()`, and with a dtype error when the element types
    /// differ. On success both are stored unchanged, with no copying and
    /// no coercion.
    pub fn new(buffer: RasterBuffer, metadata: RasterMetadata) -> Result<Self> {
        if buffer.shape() != metadata.shape() {
            return Err(RasterError::Shape {
                buffer: buffer.shape(),
                metadata: metadata.shape(),
            });
        }
        if buffer.dtype() != metadata.dtype() {
            return Err(RasterError::Dtype {
                buffer: buffer.dtype(),
                metadata: metadata.dtype(),
            });
        }

        Ok(Self { buffer, metadata })
    }

    /// Decode a raster source through the codec.
    ///
    /// Blocks on the codec's I/O; any codec or transport failure is
    /// surfaced unchanged as a source-read error.
    pub fn from_source(source: &mut RasterSource<'_>, codec: &dyn RasterCodec) -> Result<Self> {
        let (buffer, metadata) = codec.decode(source).map_err(RasterError::SourceRead)?;
        debug!(shape = ?metadata.shape(), dtype = %metadata.dtype(), "decoded raster source");
        Self::new(buffer, metadata)
    }

    /// Decode a raster source, overriding dtype and/or nodata.
    ///
    /// The decoded buffer is converted to the target dtype, cells equal to
    /// the source nodata sentinel are rewritten to the target sentinel,
    /// and the metadata is copied and re-validated to match.
    pub fn from_source_with(
        source: &mut RasterSource<'_>,
        codec: &dyn RasterCodec,
        options: ReadOptions,
    ) -> Result<Self> {
        let (buffer, metadata) = codec.decode(source).map_err(RasterError::SourceRead)?;

        let out_dtype = options.target_dtype.unwrap_or_else(|| metadata.dtype());
        let out_nodata = match options.target_nodata.or(metadata.nodata()) {
            Some(value) => Some(out_dtype.validate_nodata(value)?),
            None => None,
        };

        let mut buffer = if out_dtype != metadata.dtype() {
            buffer.cast(out_dtype)
        } else {
            buffer
        };
        if let (Some(src), Some(out)) = (metadata.nodata(), out_nodata) {
            buffer.replace_sentinel(src, out);
        }

        let mut copy = metadata.copy().dtype(out_dtype);
        copy = match out_nodata {
            Some(value) => copy.nodata(value),
            None => copy.clear_nodata(),
        };

        Self::new(buffer, copy.build()?)
    }

    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    pub fn metadata(&self) -> &RasterMetadata {
        &self.metadata
    }

    /// Decompose into the owned buffer and metadata.
    pub fn into_parts(self) -> (RasterBuffer, RasterMetadata) {
        (self.buffer, self.metadata)
    }

    /// Validity mask with the same shape as the buffer.
    ///
    /// An element is `true` iff a nodata sentinel is set and the pixel
    /// equals it exactly (NaN sentinels match NaN pixels). Recomputed on
    /// every call; with an immutable buffer there is no cache to
    /// invalidate.
    pub fn mask(&self) -> Array3<bool> {
        self.buffer.mask_with(self.metadata.nodata())
    }

    /// Data/mask/fill-value triple for nodata-aware computation.
    pub fn masked(&self) -> MaskedBuffer<'_> {
        MaskedBuffer {
            data: &self.buffer,
            mask: self.mask(),
            fill_value: self.metadata.nodata(),
        }
    }

    /// Read-only view over one band.
    ///
    /// Band indices are 1-based with valid range `[1, count]`, matching
    /// raster file conventions. The view aliases the buffer's storage
    /// instead of copying it; the borrow it holds keeps the parent buffer
    /// immutable for the view's lifetime.
    pub fn band(&self, band_index: usize) -> Result<BandView<'_>> {
        self.check_band_index(band_index)?;
        Ok(self.buffer.band_view(band_index - 1))
    }

    /// One band paired with its slice of the validity mask.
    ///
    /// Same indexing and range behavior as [`band`](RasterArray::band).
    pub fn band_masked(&self, band_index: usize) -> Result<MaskedBand<'_>> {
        self.check_band_index(band_index)?;
        let mask = self.mask().index_axis_move(Axis(0), band_index - 1);
        Ok(MaskedBand {
            data: self.buffer.band_view(band_index - 1),
            mask,
            fill_value: self.metadata.nodata(),
        })
    }

    /// Encode this raster through the codec.
    ///
    /// Hands the codec the metadata's profile mapping and the raw buffer.
    /// The alpha interpretation is pinned to "UNSPECIFIED" so codecs do
    /// not auto-assign an alpha band to 4-band integer rasters.
    pub fn write(&self, dest: &Path, codec: &dyn RasterCodec) -> Result<()> {
        let mut profile = self.metadata.profile();
        profile.insert("alpha", "UNSPECIFIED");

        codec
            .encode(&profile, &self.buffer, dest)
            .map_err(RasterError::Write)?;
        debug!(dest = %dest.display(), shape = ?self.metadata.shape(), "encoded raster");
        Ok(())
    }

    fn check_band_index(&self, band_index: usize) -> Result<()> {
        let count = self.metadata.count();
        if band_index < 1 || band_index > count {
            return Err(RasterError::BandIndex {
                index: band_index,
                count,
            });
        }
        Ok(())
    }
}

/// Data, validity mask, and fill value, bundled for masked arithmetic.
///
/// Borrows the buffer; nothing here mutates the raster it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedBuffer<'a> {
    pub data: &'a RasterBuffer,
    pub mask: Array3<bool>,
    pub fill_value: Option<f64>,
}

/// One band of data with the matching slice of the validity mask.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedBand<'a> {
    pub data: BandView<'a>,
    pub mask: Array2<bool>,
    pub fill_value: Option<f64>,
}
