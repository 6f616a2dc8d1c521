//! Integration tests for RasterArray construction, masking, and band access.

use raster_array::{
    RasterArray, RasterBuffer, RasterDtype, RasterError, RasterSource, ReadOptions,
};
use test_utils::{basic_metadata, filled_buffer, sequential_buffer, sequential_raster, MemoryCodec};

#[test]
fn construction_keeps_the_exact_buffer() {
    let buffer = sequential_buffer::<i32>((2, 4, 4));
    let ptr = buffer.as_array::<i32>().unwrap().as_ptr();
    let metadata = basic_metadata((2, 4, 4), RasterDtype::Int32, Some(-9999.0));

    let raster = RasterArray::new(buffer, metadata).unwrap();

    assert_eq!(raster.buffer().as_array::<i32>().unwrap().as_ptr(), ptr);
    assert_eq!(raster.metadata().shape(), (2, 4, 4));
}

#[test]
fn shape_mismatch_reports_both_shapes() {
    let buffer = filled_buffer((1, 5, 5), 0i16);
    let metadata = basic_metadata((1, 10, 10), RasterDtype::Int16, None);

    let err = RasterArray::new(buffer, metadata).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("(1, 5, 5)"), "message was: {message}");
    assert!(message.contains("(1, 10, 10)"), "message was: {message}");
}

#[test]
fn mask_counts_nodata_block() {
    // 10x10 single-band int16 raster, nodata -99, top-left 5x5 block masked.
    let mut data = vec![7i16; 100];
    for row in 0..5 {
        for col in 0..5 {
            data[row * 10 + col] = -99;
        }
    }
    let buffer = RasterBuffer::from_shape_vec((1, 10, 10), data).unwrap();
    let metadata = basic_metadata((1, 10, 10), RasterDtype::Int16, Some(-99.0));
    let raster = RasterArray::new(buffer, metadata).unwrap();

    let mask = raster.mask();
    assert_eq!(mask.iter().filter(|&&m| m).count(), 25);
    for row in 0..10 {
        for col in 0..10 {
            assert_eq!(mask[[0, row, col]], row < 5 && col < 5);
        }
    }
}

#[test]
fn mask_is_all_false_without_nodata() {
    let raster = sequential_raster::<f32>((2, 3, 3), None);
    assert!(raster.mask().iter().all(|&m| !m));
}

#[test]
fn reshaped_buffer_pairs_with_copied_metadata() {
    // 100 elements reshaped to (4, 5, 5), metadata copied to match.
    let buffer = RasterBuffer::from_shape_vec((4, 5, 5), (0..100i32).collect()).unwrap();
    let metadata = basic_metadata((1, 10, 10), RasterDtype::Int32, None)
        .copy()
        .count(4)
        .width(5)
        .height(5)
        .build()
        .unwrap();

    let raster = RasterArray::new(buffer, metadata).unwrap();

    let band = raster.band(3).unwrap();
    let typed = band.as_view::<i32>().unwrap();
    assert_eq!(band.shape(), (5, 5));
    for row in 0..5 {
        for col in 0..5 {
            assert_eq!(typed[[row, col]], (2 * 25 + row * 5 + col) as i32);
        }
    }
}

#[test]
fn band_matches_buffer_slice_and_checks_range() {
    let raster = sequential_raster::<i16>((3, 4, 4), None);

    for band_index in 1..=3 {
        let band = raster.band(band_index).unwrap();
        assert_eq!(band.dtype(), RasterDtype::Int16);
        let typed = band.as_view::<i16>().unwrap();
        let expected = raster.buffer().as_array::<i16>().unwrap();
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(typed[[row, col]], expected[[band_index - 1, row, col]]);
            }
        }
    }

    for bad in [0, 4, 100] {
        assert!(matches!(
            raster.band(bad),
            Err(RasterError::BandIndex { index, count: 3 }) if index == bad
        ));
    }
}

#[test]
fn band_masked_pairs_band_with_mask_slice() {
    let mut data = vec![1.0f32; 18];
    data[0] = -9999.0; // band 1, first cell
    data[17] = -9999.0; // band 2, last cell
    let buffer = RasterBuffer::from_shape_vec((2, 3, 3), data).unwrap();
    let raster = RasterArray::new(
        buffer,
        basic_metadata((2, 3, 3), RasterDtype::Float32, Some(-9999.0)),
    )
    .unwrap();

    let first = raster.band_masked(1).unwrap();
    assert!(first.mask[[0, 0]]);
    assert_eq!(first.mask.iter().filter(|&&m| m).count(), 1);

    let second = raster.band_masked(2).unwrap();
    assert!(second.mask[[2, 2]]);
    assert_eq!(second.fill_value, Some(-9999.0));

    assert!(raster.band_masked(3).is_err());
}

#[test]
fn masked_triple_borrows_buffer() {
    let raster = RasterArray::new(
        filled_buffer((1, 2, 2), -99i16),
        basic_metadata((1, 2, 2), RasterDtype::Int16, Some(-99.0)),
    )
    .unwrap();

    let masked = raster.masked();
    assert!(masked.mask.iter().all(|&m| m));
    assert_eq!(masked.fill_value, Some(-99.0));
    assert_eq!(masked.data.shape(), raster.buffer().shape());
}

#[test]
fn from_source_decodes_and_validates() {
    let buffer = sequential_buffer::<u8>((1, 4, 4));
    let metadata = basic_metadata((1, 4, 4), RasterDtype::UInt8, None);
    let codec = MemoryCodec::with_dataset(buffer.clone(), metadata.clone());

    let raster =
        RasterArray::from_source(&mut RasterSource::path("memory.tif"), &codec).unwrap();
    assert_eq!(raster.buffer(), &buffer);
    assert_eq!(raster.metadata(), &metadata);
}

#[test]
fn from_source_wraps_codec_failure() {
    let codec = MemoryCodec::failing("connection reset");

    let err =
        RasterArray::from_source(&mut RasterSource::path("s3://bucket/key.tif"), &codec)
            .unwrap_err();
    assert!(matches!(err, RasterError::SourceRead(_)));
    assert!(err.to_string().contains("failed to read raster source"));
}

#[test]
fn from_source_with_rewrites_sentinel_and_dtype() {
    // int16 source with nodata -99 read as float32 with nodata NaN.
    let buffer = RasterBuffer::from_shape_vec((1, 1, 4), vec![-99i16, 3, -99, 8]).unwrap();
    let metadata = basic_metadata((1, 1, 4), RasterDtype::Int16, Some(-99.0));
    let codec = MemoryCodec::with_dataset(buffer, metadata);

    let raster = RasterArray::from_source_with(
        &mut RasterSource::path("memory.tif"),
        &codec,
        ReadOptions {
            target_dtype: Some(RasterDtype::Float32),
            target_nodata: Some(f64::NAN),
        },
    )
    .unwrap();

    assert_eq!(raster.metadata().dtype(), RasterDtype::Float32);
    assert!(raster.metadata().nodata().unwrap().is_nan());

    let array = raster.buffer().as_array::<f32>().unwrap();
    assert!(array[[0, 0, 0]].is_nan());
    assert_eq!(array[[0, 0, 1]], 3.0);
    assert!(array[[0, 0, 2]].is_nan());
    assert_eq!(raster.mask().iter().filter(|&&m| m).count(), 2);
}

#[test]
fn from_source_with_rejects_bad_target_nodata() {
    let buffer = filled_buffer((1, 2, 2), 0u8);
    let metadata = basic_metadata((1, 2, 2), RasterDtype::UInt8, None);
    let codec = MemoryCodec::with_dataset(buffer, metadata);

    let err = RasterArray::from_source_with(
        &mut RasterSource::path("memory.tif"),
        &codec,
        ReadOptions {
            target_dtype: None,
            target_nodata: Some(9999.0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, RasterError::Validation(_)));
}

#[test]
fn write_hands_profile_and_buffer_to_codec() {
    let raster = RasterArray::new(
        sequential_buffer::<i16>((2, 3, 3)),
        basic_metadata((2, 3, 3), RasterDtype::Int16, Some(-99.0)),
    )
    .unwrap();

    let codec = MemoryCodec::new();
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.tif");
    raster.write(&dest, &codec).unwrap();

    let written = codec.written();
    assert_eq!(written.len(), 1);
    let (profile, buffer, path) = &written[0];
    assert_eq!(path, &dest);
    assert_eq!(buffer, raster.buffer());
    assert_eq!(profile.get_str("driver").unwrap(), "GTiff");
    assert_eq!(profile.get_str("alpha").unwrap(), "UNSPECIFIED");
    assert_eq!(profile.get_usize("count").unwrap(), 2);
}

#[test]
fn write_wraps_codec_failure() {
    let raster = RasterArray::new(
        filled_buffer((1, 1, 1), 0u8),
        basic_metadata((1, 1, 1), RasterDtype::UInt8, None),
    )
    .unwrap();

    let codec = MemoryCodec::failing("disk full");
    let err = raster.write(std::path::Path::new("out.tif"), &codec).unwrap_err();
    assert!(err.to_string().contains("failed to write raster"));
}
