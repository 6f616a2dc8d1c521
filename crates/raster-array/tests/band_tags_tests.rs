//! Integration tests for band tags flowing through the codec seam.

use std::collections::BTreeMap;
use std::path::Path;

use raster_array::{BandTags, RasterError, RasterSource};
use test_utils::MemoryCodec;

fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn tags_round_trip_through_the_codec() {
    let band_tags = BandTags::empty()
        .put_band_tags(1, tags(&[("classification", "red")]))
        .unwrap()
        .put_band_tags(2, tags(&[("classification", "green"), ("tree", "maple")]))
        .unwrap();

    let codec = MemoryCodec::new().with_band_tags(band_tags.clone());
    let read =
        BandTags::from_source(&mut RasterSource::path("memory.tif"), &codec).unwrap();
    assert_eq!(read, band_tags);

    read.write(Path::new("memory.tif"), &codec).unwrap();
    let written = codec.written_tags();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].0, band_tags);
}

#[test]
fn read_failure_is_wrapped() {
    let codec = MemoryCodec::failing("no such key");
    let err = BandTags::from_source(&mut RasterSource::path("missing.tif"), &codec)
        .unwrap_err();
    assert!(matches!(err, RasterError::SourceRead(_)));
}

#[test]
fn untagged_source_reads_as_empty() {
    let codec = MemoryCodec::new();
    let read =
        BandTags::from_source(&mut RasterSource::path("memory.tif"), &codec).unwrap();
    assert!(read.is_empty());
    assert_eq!(read.count(), 0);
}
