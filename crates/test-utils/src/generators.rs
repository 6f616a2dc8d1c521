//! Test data generators for raster buffers and metadata.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite.

use raster_array::{
    Crs, GeoTransform, RasterArray, RasterBuffer, RasterDtype, RasterElement, RasterMetadata,
};

/// Creates a buffer where cell `(band, row, col)` holds the running
/// element index, cast to the element type.
///
/// This makes it easy to verify that bands and slices line up: band `b`
/// of a `(count, height, width)` buffer starts at `b * height * width`.
///
/// # Example
///
/// ```
/// use test_utils::sequential_buffer;
///
/// let buffer = sequential_buffer::<i32>((2, 4, 4));
/// assert_eq!(buffer.len(), 32);
/// let array = buffer.as_array::<i32>().unwrap();
/// assert_eq!(array[[1, 0, 0]], 16);
/// ```
pub fn sequential_buffer<T: RasterElement>(shape: (usize, usize, usize)) -> RasterBuffer {
    let (count, height, width) = shape;
    let data: Vec<T> = (0..count * height * width)
        .map(|i| num_traits::NumCast::from(i % 10_000).unwrap())
        .collect();
    RasterBuffer::from_shape_vec(shape, data).expect("shape matches data length")
}

/// Creates a buffer filled with one value.
pub fn filled_buffer<T: RasterElement>(shape: (usize, usize, usize), value: T) -> RasterBuffer {
    let (count, height, width) = shape;
    RasterBuffer::from_shape_vec(shape, vec![value; count * height * width])
        .expect("shape matches data length")
}

/// Metadata for a `(count, height, width)` raster in EPSG:4326 with a
/// unit-degree transform anchored at the origin.
pub fn basic_metadata(
    shape: (usize, usize, usize),
    dtype: RasterDtype,
    nodata: Option<f64>,
) -> RasterMetadata {
    let (count, height, width) = shape;
    RasterMetadata::new(
        Crs::from_epsg(4326),
        count,
        width,
        height,
        dtype,
        nodata,
        GeoTransform::from_bounds(0.0, 0.0, width as f64, height as f64, width, height),
    )
    .expect("valid test metadata")
}

/// A sequential raster paired with metadata matching its element type.
pub fn sequential_raster<T: RasterElement>(
    shape: (usize, usize, usize),
    nodata: Option<f64>,
) -> RasterArray {
    RasterArray::new(sequential_buffer::<T>(shape), basic_metadata(shape, T::DTYPE, nodata))
        .expect("buffer and metadata agree")
}
