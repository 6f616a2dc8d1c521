//! Raster pixel buffers with validated descriptive metadata.
//!
//! The core pairing is [`RasterArray`]: an owned rank-3 pixel buffer
//! (band, row, column) checked at construction against a [`RasterMetadata`]
//! record for shape and dtype agreement. Validity masks are derived on
//! demand from the metadata's nodata sentinel, and bands are exposed as
//! read-only aliasing views.
//!
//! File decode/encode is delegated to an external codec behind the
//! [`RasterCodec`] trait; the core exchanges only profile mappings and raw
//! buffers with it.

pub mod array;
pub mod band_tags;
pub mod bbox;
pub mod buffer;
pub mod codec;
pub mod crs;
pub mod dtype;
pub mod error;
pub mod metadata;
pub mod profiles;
pub mod transform;

pub use array::{MaskedBand, MaskedBuffer, RasterArray, ReadOptions};
pub use band_tags::BandTags;
pub use bbox::BoundingBox;
pub use buffer::{BandView, RasterBuffer, RasterElement};
pub use codec::{RasterCodec, RasterSource, ReadSeek};
pub use crs::Crs;
pub use dtype::RasterDtype;
pub use error::{CodecError, RasterError, Result};
pub use metadata::{MetadataCopy, RasterMetadata, NO_RESOLUTION_SPECIFIED};
pub use profiles::Profile;
pub use transform::GeoTransform;
