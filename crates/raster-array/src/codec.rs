//! The decode/encode seam to external raster codecs.

use std::fmt;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::band_tags::BandTags;
use crate::buffer::RasterBuffer;
use crate::error::CodecError;
use crate::metadata::RasterMetadata;
use crate::profiles::Profile;

/// Readable, seekable handle to already-open raster bytes.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// A raster input: a file path or an already-open handle.
pub enum RasterSource<'a> {
    /// Path to a raster file.
    Path(PathBuf),
    /// An open, seekable stream of raster bytes.
    Handle(&'a mut dyn ReadSeek),
}

impl<'a> RasterSource<'a> {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn handle(handle: &'a mut dyn ReadSeek) -> Self {
        Self::Handle(handle)
    }
}

impl fmt::Debug for RasterSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            RasterSource::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

/// External raster codec collaborator.
///
/// The core exchanges with the codec only through the profile mapping and
/// raw buffers. Codec failures surface unchanged as
/// [`RasterError::SourceRead`](crate::RasterError::SourceRead); the core
/// never retries or interprets them.
pub trait RasterCodec: Send + Sync {
    /// Decode a raster source into a pixel buffer and its metadata.
    fn decode(
        &self,
        source: &mut RasterSource<'_>,
    ) -> std::result::Result<(RasterBuffer, RasterMetadata), CodecError>;

    /// Decode only the descriptive metadata.
    fn decode_metadata(
        &self,
        source: &mut RasterSource<'_>,
    ) -> std::result::Result<RasterMetadata, CodecError>;

    /// Encode a buffer under the given creation profile.
    fn encode(
        &self,
        profile: &Profile,
        buffer: &RasterBuffer,
        dest: &Path,
    ) -> std::result::Result<(), CodecError>;

    /// Read per-band tags from a raster source.
    fn read_band_tags(
        &self,
        source: &mut RasterSource<'_>,
    ) -> std::result::Result<BandTags, CodecError>;

    /// Write per-band tags to an existing raster.
    fn write_band_tags(&self, tags: &BandTags, dest: &Path)
        -> std::result::Result<(), CodecError>;
}
