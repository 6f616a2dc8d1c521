//! An in-memory codec standing in for a real raster file codec.

use std::path::PathBuf;
use std::sync::Mutex;

use raster_array::{
    BandTags, CodecError, Profile, RasterBuffer, RasterCodec, RasterMetadata, RasterSource,
};

/// In-memory [`RasterCodec`] for tests.
///
/// Holds one dataset; `decode` returns clones of it, `encode` and
/// `write_band_tags` record what they were handed so tests can assert on
/// it. Construct with [`MemoryCodec::failing`] to simulate a decode or
/// transport failure.
#[derive(Default)]
pub struct MemoryCodec {
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    dataset: Option<(RasterBuffer, RasterMetadata)>,
    band_tags: BandTags,
    written: Vec<(Profile, RasterBuffer, PathBuf)>,
    written_tags: Vec<(BandTags, PathBuf)>,
    fail_with: Option<String>,
}

impl MemoryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec whose dataset is the given buffer/metadata pair.
    pub fn with_dataset(buffer: RasterBuffer, metadata: RasterMetadata) -> Self {
        let codec = Self::new();
        codec.inner.lock().unwrap().dataset = Some((buffer, metadata));
        codec
    }

    /// Attach band tags to the stored dataset.
    pub fn with_band_tags(self, band_tags: BandTags) -> Self {
        self.inner.lock().unwrap().band_tags = band_tags;
        self
    }

    /// A codec whose every operation fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        let codec = Self::new();
        codec.inner.lock().unwrap().fail_with = Some(message.into());
        codec
    }

    /// Everything passed to `encode`, in call order.
    pub fn written(&self) -> Vec<(Profile, RasterBuffer, PathBuf)> {
        self.inner.lock().unwrap().written.clone()
    }

    /// Everything passed to `write_band_tags`, in call order.
    pub fn written_tags(&self) -> Vec<(BandTags, PathBuf)> {
        self.inner.lock().unwrap().written_tags.clone()
    }

    fn check_failure(store: &Store) -> Result<(), CodecError> {
        match &store.fail_with {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

impl RasterCodec for MemoryCodec {
    fn decode(
        &self,
        _source: &mut RasterSource<'_>,
    ) -> Result<(RasterBuffer, RasterMetadata), CodecError> {
        let store = self.inner.lock().unwrap();
        Self::check_failure(&store)?;
        store
            .dataset
            .clone()
            .ok_or_else(|| "no dataset stored".into())
    }

    fn decode_metadata(
        &self,
        _source: &mut RasterSource<'_>,
    ) -> Result<RasterMetadata, CodecError> {
        let store = self.inner.lock().unwrap();
        Self::check_failure(&store)?;
        store
            .dataset
            .as_ref()
            .map(|(_, metadata)| metadata.clone())
            .ok_or_else(|| "no dataset stored".into())
    }

    fn encode(
        &self,
        profile: &Profile,
        buffer: &RasterBuffer,
        dest: &std::path::Path,
    ) -> Result<(), CodecError> {
        let mut store = self.inner.lock().unwrap();
        Self::check_failure(&store)?;
        store
            .written
            .push((profile.clone(), buffer.clone(), dest.to_path_buf()));
        Ok(())
    }

    fn read_band_tags(&self, _source: &mut RasterSource<'_>) -> Result<BandTags, CodecError> {
        let store = self.inner.lock().unwrap();
        Self::check_failure(&store)?;
        Ok(store.band_tags.clone())
    }

    fn write_band_tags(
        &self,
        tags: &BandTags,
        dest: &std::path::Path,
    ) -> Result<(), CodecError> {
        let mut store = self.inner.lock().unwrap();
        Self::check_failure(&store)?;
        store.written_tags.push((tags.clone(), dest.to_path_buf()));
        Ok(())
    }
}
