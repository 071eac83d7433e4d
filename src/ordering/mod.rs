//! Fill-reducing ordering.
//!
//! The ordering computation itself is delegated to the external `amd`
//! crate; this module only adapts its interface.

use crate::algebra::{CscMatrix, FloatT};

/// Computes an approximate minimum degree ordering of `A`, returning the
/// permutation and its inverse.
///
/// `dense_scale` scales AMD's dense row/column threshold.  Values above
/// 1.0 keep more nearly-dense rows in the sparse elimination phase,
/// which seems to work better for interior point KKT systems.
pub(crate) fn amd_ordering<T: FloatT>(
    A: &CscMatrix<T>,
    dense_scale: f64,
) -> (Vec<usize>, Vec<usize>) {
    let mut control = amd::Control::default();
    control.dense *= dense_scale;
    let (perm, iperm, _info) = amd::order(A.nrows(), &A.colptr, &A.rowval, &control).unwrap();
    (perm, iperm)
}
