//! Owned rank-3 pixel buffers and band views.

use ndarray::{Array3, ArrayD, ArrayView2, Axis, Ix3};
use num_traits::{Bounded, NumCast, ToPrimitive, Zero};

use crate::dtype::RasterDtype;
use crate::error::{RasterError, Result};

mod sealed {
    pub trait Sealed {}
}

/// Element types a [`RasterBuffer`] can hold.
///
/// Sealed: the implementations correspond one-to-one with the
/// [`RasterDtype`] tags.
pub trait RasterElement:
    sealed::Sealed + Copy + PartialEq + NumCast + Bounded + Zero + Send + Sync + 'static
{
    /// Dtype tag for this element type.
    const DTYPE: RasterDtype;

    /// Exact conversion from a canonical f64 sentinel value.
    ///
    /// Returns `None` when the value is not exactly representable.
    fn from_sentinel(value: f64) -> Option<Self>;

    /// Whether this element equals the sentinel (NaN-aware for floats).
    fn matches(self, sentinel: Self) -> bool;

    /// Wrap an owned array in the matching buffer variant.
    fn into_buffer(array: Array3<Self>) -> RasterBuffer;

    /// Borrow the typed array out of a buffer, if the dtype matches.
    fn from_buffer(buffer: &RasterBuffer) -> Option<&Array3<Self>>;

    /// Extract the typed view out of a band view, if the dtype matches.
    fn from_band_view<'a>(view: &BandView<'a>) -> Option<ArrayView2<'a, Self>>;
}

macro_rules! element_common {
    ($t:ty, $variant:ident) => {
        fn into_buffer(array: Array3<$t>) -> RasterBuffer {
            RasterBuffer::$variant(array)
        }

        fn from_buffer(buffer: &RasterBuffer) -> Option<&Array3<$t>> {
            match buffer {
                RasterBuffer::$variant(array) => Some(array),
                _ => None,
            }
        }

        fn from_band_view<'a>(view: &BandView<'a>) -> Option<ArrayView2<'a, $t>> {
            match view {
                BandView::$variant(view) => Some(view.clone()),
                _ => None,
            }
        }
    };
}

macro_rules! integer_element {
    ($t:ty, $variant:ident) => {
        impl sealed::Sealed for $t {}

        impl RasterElement for $t {
            const DTYPE: RasterDtype = RasterDtype::$variant;

            fn from_sentinel(value: f64) -> Option<Self> {
                if value.fract() != 0.0 {
                    return None;
                }
                NumCast::from(value)
            }

            fn matches(self, sentinel: Self) -> bool {
                self == sentinel
            }

            element_common!($t, $variant);
        }

        impl From<Array3<$t>> for RasterBuffer {
            fn from(array: Array3<$t>) -> Self {
                RasterBuffer::$variant(array)
            }
        }
    };
}

macro_rules! float_element {
    ($t:ty, $variant:ident) => {
        impl sealed::Sealed for $t {}

        impl RasterElement for $t {
            const DTYPE: RasterDtype = RasterDtype::$variant;

            fn from_sentinel(value: f64) -> Option<Self> {
                NumCast::from(value)
            }

            fn matches(self, sentinel: Self) -> bool {
                if sentinel.is_nan() {
                    self.is_nan()
                } else {
                    self == sentinel
                }
            }

            element_common!($t, $variant);
        }

        impl From<Array3<$t>> for RasterBuffer {
            fn from(array: Array3<$t>) -> Self {
                RasterBuffer::$variant(array)
            }
        }
    };
}

integer_element!(u8, UInt8);
integer_element!(i16, Int16);
integer_element!(u16, UInt16);
integer_element!(i32, Int32);
integer_element!(u32, UInt32);
float_element!(f32, Float32);
float_element!(f64, Float64);

/// An owned three-dimensional pixel buffer in `(band, row, column)` order.
///
/// The rank-3 guarantee is carried by the type: every variant wraps an
/// `Array3`, so only the dynamic-rank entry point [`RasterBuffer::from_dyn`]
/// can observe a rank violation.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterBuffer {
    UInt8(Array3<u8>),
    Int16(Array3<i16>),
    UInt16(Array3<u16>),
    Int32(Array3<i32>),
    UInt32(Array3<u32>),
    Float32(Array3<f32>),
    Float64(Array3<f64>),
}

macro_rules! for_each_buffer {
    ($buffer:expr, $array:ident => $body:expr) => {
        match $buffer {
            RasterBuffer::UInt8($array) => $body,
            RasterBuffer::Int16($array) => $body,
            RasterBuffer::UInt16($array) => $body,
            RasterBuffer::Int32($array) => $body,
            RasterBuffer::UInt32($array) => $body,
            RasterBuffer::Float32($array) => $body,
            RasterBuffer::Float64($array) => $body,
        }
    };
}

impl RasterBuffer {
    /// Build a buffer from a flat vec in `(band, row, column)` row-major
    /// order.
    pub fn from_shape_vec<T: RasterElement>(
        shape: (usize, usize, usize),
        data: Vec<T>,
    ) -> Result<Self> {
        let array = Array3::from_shape_vec(shape, data).map_err(|err| {
            RasterError::validation(format!("buffer data does not fit shape {shape:?}: {err}"))
        })?;
        Ok(T::into_buffer(array))
    }

    /// Build a buffer from a dynamic-rank array.
    ///
    /// Fails unless the array has exactly three dimensions.
    pub fn from_dyn<T: RasterElement>(array: ArrayD<T>) -> Result<Self> {
        let ndim = array.ndim();
        let array = array
            .into_dimensionality::<Ix3>()
            .map_err(|_| RasterError::Rank { ndim })?;
        Ok(T::into_buffer(array))
    }

    /// Dtype tag of the stored elements.
    pub fn dtype(&self) -> RasterDtype {
        match self {
            RasterBuffer::UInt8(_) => RasterDtype::UInt8,
            RasterBuffer::Int16(_) => RasterDtype::Int16,
            RasterBuffer::UInt16(_) => RasterDtype::UInt16,
            RasterBuffer::Int32(_) => RasterDtype::Int32,
            RasterBuffer::UInt32(_) => RasterDtype::UInt32,
            RasterBuffer::Float32(_) => RasterDtype::Float32,
            RasterBuffer::Float64(_) => RasterDtype::Float64,
        }
    }

    /// Shape as `(bands, rows, columns)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        for_each_buffer!(self, array => array.dim())
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        for_each_buffer!(self, array => array.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the typed array, if `T` matches the stored dtype.
    pub fn as_array<T: RasterElement>(&self) -> Option<&Array3<T>> {
        T::from_buffer(self)
    }

    /// Elementwise conversion to another dtype.
    ///
    /// Values outside the target range saturate at its bounds; NaN
    /// converts to zero for integer targets.
    pub fn cast(&self, dtype: RasterDtype) -> RasterBuffer {
        match dtype {
            RasterDtype::UInt8 => u8::into_buffer(self.cast_to::<u8>()),
            RasterDtype::Int16 => i16::into_buffer(self.cast_to::<i16>()),
            RasterDtype::UInt16 => u16::into_buffer(self.cast_to::<u16>()),
            RasterDtype::Int32 => i32::into_buffer(self.cast_to::<i32>()),
            RasterDtype::UInt32 => u32::into_buffer(self.cast_to::<u32>()),
            RasterDtype::Float32 => f32::into_buffer(self.cast_to::<f32>()),
            RasterDtype::Float64 => f64::into_buffer(self.cast_to::<f64>()),
        }
    }

    fn cast_to<T: RasterElement>(&self) -> Array3<T> {
        for_each_buffer!(self, array => array.mapv(cast_value))
    }

    /// Validity mask: `true` where an element equals the nodata sentinel.
    ///
    /// With no sentinel every element is valid. One elementwise pass over
    /// the data, nothing else materialized.
    pub(crate) fn mask_with(&self, nodata: Option<f64>) -> Array3<bool> {
        let Some(nodata) = nodata else {
            return for_each_buffer!(self, array => Array3::from_elem(array.raw_dim(), false));
        };
        for_each_buffer!(self, array => mask_of(array, nodata))
    }

    /// Rewrite every element matching `from` to `to`.
    ///
    /// A sentinel that is not representable in the stored dtype matches
    /// nothing, leaving the buffer unchanged.
    pub(crate) fn replace_sentinel(&mut self, from: f64, to: f64) {
        for_each_buffer!(self, array => replace_in(array, from, to))
    }

    /// Read-only view over the band at `index0` (zero-based).
    ///
    /// Callers go through the range-checked band selectors on
    /// [`RasterArray`](crate::RasterArray).
    pub(crate) fn band_view(&self, index0: usize) -> BandView<'_> {
        match self {
            RasterBuffer::UInt8(array) => BandView::UInt8(array.index_axis(Axis(0), index0)),
            RasterBuffer::Int16(array) => BandView::Int16(array.index_axis(Axis(0), index0)),
            RasterBuffer::UInt16(array) => BandView::UInt16(array.index_axis(Axis(0), index0)),
            RasterBuffer::Int32(array) => BandView::Int32(array.index_axis(Axis(0), index0)),
            RasterBuffer::UInt32(array) => BandView::UInt32(array.index_axis(Axis(0), index0)),
            RasterBuffer::Float32(array) => BandView::Float32(array.index_axis(Axis(0), index0)),
            RasterBuffer::Float64(array) => BandView::Float64(array.index_axis(Axis(0), index0)),
        }
    }
}

fn mask_of<T: RasterElement>(array: &Array3<T>, nodata: f64) -> Array3<bool> {
    match T::from_sentinel(nodata) {
        Some(sentinel) => array.mapv(|value| value.matches(sentinel)),
        None => Array3::from_elem(array.raw_dim(), false),
    }
}

fn replace_in<T: RasterElement>(array: &mut Array3<T>, from: f64, to: f64) {
    let (Some(from), Some(to)) = (T::from_sentinel(from), T::from_sentinel(to)) else {
        return;
    };
    array.mapv_inplace(|value| if value.matches(from) { to } else { value });
}

fn cast_value<S: RasterElement, T: RasterElement>(value: S) -> T {
    if let Some(out) = NumCast::from(value) {
        return out;
    }
    let v = value.to_f64().unwrap_or(0.0);
    if v.is_nan() {
        T::zero()
    } else if v > 0.0 {
        T::max_value()
    } else {
        T::min_value()
    }
}

/// A read-only two-dimensional view over a single band.
///
/// Views alias the parent buffer's storage rather than copying it, so a
/// view lives no longer than the raster it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum BandView<'a> {
    UInt8(ArrayView2<'a, u8>),
    Int16(ArrayView2<'a, i16>),
    UInt16(ArrayView2<'a, u16>),
    Int32(ArrayView2<'a, i32>),
    UInt32(ArrayView2<'a, u32>),
    Float32(ArrayView2<'a, f32>),
    Float64(ArrayView2<'a, f64>),
}

macro_rules! for_each_band {
    ($view:expr, $band:ident => $body:expr) => {
        match $view {
            BandView::UInt8($band) => $body,
            BandView::Int16($band) => $body,
            BandView::UInt16($band) => $body,
            BandView::Int32($band) => $body,
            BandView::UInt32($band) => $body,
            BandView::Float32($band) => $body,
            BandView::Float64($band) => $body,
        }
    };
}

impl<'a> BandView<'a> {
    /// Dtype tag of the viewed elements.
    pub fn dtype(&self) -> RasterDtype {
        match self {
            BandView::UInt8(_) => RasterDtype::UInt8,
            BandView::Int16(_) => RasterDtype::Int16,
            BandView::UInt16(_) => RasterDtype::UInt16,
            BandView::Int32(_) => RasterDtype::Int32,
            BandView::UInt32(_) => RasterDtype::UInt32,
            BandView::Float32(_) => RasterDtype::Float32,
            BandView::Float64(_) => RasterDtype::Float64,
        }
    }

    /// Shape as `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        for_each_band!(self, band => band.dim())
    }

    /// Extract the typed view, if `T` matches the dtype.
    pub fn as_view<T: RasterElement>(&self) -> Option<ArrayView2<'a, T>> {
        T::from_band_view(self)
    }
}
