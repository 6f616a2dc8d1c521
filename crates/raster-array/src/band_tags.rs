//! Per-band metadata tags.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

use crate::codec::{RasterCodec, RasterSource};
use crate::error::{RasterError, Result};

/// Immutable key/value tags attached to individual raster bands.
///
/// Band indices are 1-based, matching the band selectors on
/// [`RasterArray`](crate::RasterArray). Every modifying operation returns
/// a new instance and leaves the original untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandTags {
    tags: BTreeMap<usize, BTreeMap<String, String>>,
}

impl BandTags {
    /// Create band tags from a band-index keyed map.
    ///
    /// Fails with a validation error when any band index is zero.
    pub fn new(tags: BTreeMap<usize, BTreeMap<String, String>>) -> Result<Self> {
        for band_index in tags.keys() {
            validate_band_index(*band_index)?;
        }
        Ok(Self { tags })
    }

    /// Band tags with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The set of band indices that have tags.
    pub fn band_indices(&self) -> BTreeSet<usize> {
        self.tags.keys().copied().collect()
    }

    /// The highest band index with tags, or 0 when nothing is tagged.
    ///
    /// May exceed the number of tagged bands when indices are sparse.
    pub fn count(&self) -> usize {
        self.tags.keys().next_back().copied().unwrap_or(0)
    }

    /// All tag names used across all bands.
    pub fn tag_names(&self) -> BTreeSet<String> {
        self.tags
            .values()
            .flat_map(|tags| tags.keys().cloned())
            .collect()
    }

    /// Reverse mapping: tag name to tag value to the band carrying it.
    pub fn tags_by_band(&self) -> BTreeMap<String, BTreeMap<String, usize>> {
        let mut by_name: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for (band_index, tags) in &self.tags {
            for (name, value) in tags {
                by_name
                    .entry(name.clone())
                    .or_default()
                    .insert(value.clone(), *band_index);
            }
        }
        by_name
    }

    /// Tags for one band; empty when the band is untagged.
    pub fn get_band_tags(&self, band_index: usize) -> BTreeMap<String, String> {
        self.tags.get(&band_index).cloned().unwrap_or_default()
    }

    /// A new instance with `tags` merged into the given band.
    ///
    /// Existing keys for the band are kept; new values win on collision.
    pub fn put_band_tags(
        &self,
        band_index: usize,
        tags: BTreeMap<String, String>,
    ) -> Result<BandTags> {
        validate_band_index(band_index)?;

        let mut merged = self.tags.clone();
        merged.entry(band_index).or_default().extend(tags);
        Ok(Self { tags: merged })
    }

    /// Read band tags from a raster source through the codec.
    pub fn from_source(source: &mut RasterSource<'_>, codec: &dyn RasterCodec) -> Result<Self> {
        let tags = codec
            .read_band_tags(source)
            .map_err(RasterError::SourceRead)?;
        debug!(bands = tags.band_indices().len(), "read band tags");
        Ok(tags)
    }

    /// Write these band tags to an existing raster through the codec.
    pub fn write(&self, dest: &Path, codec: &dyn RasterCodec) -> Result<()> {
        codec
            .write_band_tags(self, dest)
            .map_err(RasterError::Write)?;
        debug!(dest = %dest.display(), bands = self.tags.len(), "wrote band tags");
        Ok(())
    }
}

fn validate_band_index(band_index: usize) -> Result<()> {
    if band_index < 1 {
        return Err(RasterError::validation(format!(
            "band index must be a positive integer, got {band_index}"
        )));
    }
    Ok(())
}
