//! Integration tests for RasterMetadata derivation and the copy builder.

use raster_array::{Crs, GeoTransform, RasterDtype, RasterMetadata, RasterSource};
use test_utils::{assert_approx_eq, basic_metadata, filled_buffer, MemoryCodec};

#[test]
fn copy_overrides_are_independent_of_the_original() {
    let original = basic_metadata((1, 10, 10), RasterDtype::Int16, Some(-99.0));
    let copied = original
        .copy()
        .count(4)
        .width(5)
        .height(5)
        .build()
        .unwrap();

    assert_eq!(copied.shape(), (4, 5, 5));
    assert_eq!(original.shape(), (1, 10, 10));

    // Derived values on the copy do not feed back into the original.
    assert_eq!(copied.profile().get_usize("count").unwrap(), 4);
    assert_eq!(original.profile().get_usize("count").unwrap(), 1);
}

#[test]
fn copy_revalidates_overrides() {
    let original = basic_metadata((1, 10, 10), RasterDtype::Int16, Some(-99.0));

    // Changing dtype alone must re-check the carried nodata.
    assert!(original.copy().dtype(RasterDtype::UInt8).build().is_err());
    assert!(original
        .copy()
        .dtype(RasterDtype::UInt8)
        .nodata(255.0)
        .build()
        .is_ok());
}

#[test]
fn bounds_follow_the_transform() {
    let metadata = RasterMetadata::new(
        Crs::from_epsg(4326),
        1,
        360,
        180,
        RasterDtype::Float32,
        None,
        GeoTransform::from_bounds(-180.0, -90.0, 180.0, 90.0, 360, 180),
    )
    .unwrap();

    let bounds = metadata.bounds();
    assert_approx_eq!(bounds.min_x, -180.0, 1e-9);
    assert_approx_eq!(bounds.min_y, -90.0, 1e-9);
    assert_approx_eq!(bounds.max_x, 180.0, 1e-9);
    assert_approx_eq!(bounds.max_y, 90.0, 1e-9);
}

#[test]
fn profile_round_trips_through_the_mapping() {
    let metadata = basic_metadata((3, 256, 512), RasterDtype::Float64, Some(-9999.0));
    let profile = metadata.profile();

    assert_eq!(profile.get_usize("width").unwrap(), 512);
    assert_eq!(profile.get_usize("height").unwrap(), 256);
    assert_eq!(profile.get_str("dtype").unwrap(), "float64");
    assert_eq!(profile.get_f64_opt("nodata").unwrap(), Some(-9999.0));

    let rebuilt = RasterMetadata::from_profile(&profile).unwrap();
    assert_eq!(rebuilt, metadata);
}

#[test]
fn from_source_decodes_metadata_only() {
    let metadata = basic_metadata((2, 8, 8), RasterDtype::UInt16, None);
    let codec = MemoryCodec::with_dataset(
        filled_buffer((2, 8, 8), 0u16),
        metadata.clone(),
    );

    let decoded =
        RasterMetadata::from_source(&mut RasterSource::path("memory.tif"), &codec).unwrap();
    assert_eq!(decoded, metadata);
}

#[test]
fn display_names_all_fields() {
    let metadata = basic_metadata((1, 10, 10), RasterDtype::Int16, Some(-99.0));
    let text = metadata.to_string();
    assert!(text.contains("crs=EPSG:4326"));
    assert!(text.contains("dtype=int16"));
    assert!(text.contains("nodata=-99"));
}
