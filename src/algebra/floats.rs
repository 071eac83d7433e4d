use num_traits::{Float, FromPrimitive, NumAssign};

/// Trait for the floating point types used by the factorization engine.
///
/// All numeric work is represented internally on values implementing
/// `FloatT`, with implementations provided for the native `f32` and `f64`
/// types.  Any other type satisfying the constituent bounds, most of
/// which come from [num_traits](num_traits), should also work.

pub trait FloatT:
    'static + Send + Float + NumAssign + Default + FromPrimitive + std::fmt::Display + std::fmt::Debug
{
}
impl FloatT for f32 {}
impl FloatT for f64 {}

/// Conversion of primitive literals to [`FloatT`] values.
///
/// Allows constant defaults to be written as `(1e-7).as_T()` rather than
/// the more awkward `T::from_f64(1e-7).unwrap()`.

#[allow(non_snake_case)]
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_T {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_T!(f64, from_f64);
