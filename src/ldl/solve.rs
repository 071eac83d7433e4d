#![allow(non_snake_case)]

use crate::algebra::{CscMatrix, FloatT};
use std::iter::zip;

// Solves (L+I)x = b, with x replacing b (with standard bounds checks)
#[cfg_attr(not(test), allow(dead_code))]
pub(super) fn lsolve<T: FloatT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    for i in 0..x.len() {
        let xi = x[i];
        let (first, last) = (Lp[i], Lp[i + 1]);
        for (&Lij, &Lxj) in zip(&Li[first..last], &Lx[first..last]) {
            x[Lij] -= Lxj * xi;
        }
    }
}

// Solves (L+I)'x = b, with x replacing b (with standard bounds checks)
#[cfg_attr(not(test), allow(dead_code))]
pub(super) fn ltsolve<T: FloatT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    for i in (0..x.len()).rev() {
        let mut s = T::zero();
        let (first, last) = (Lp[i], Lp[i + 1]);
        for (&Lij, &Lxj) in zip(&Li[first..last], &Lx[first..last]) {
            s += Lxj * x[Lij];
        }
        x[i] -= s;
    }
}

// -------------------------------------
// Versions of L\x and Lᵀ\x that use unchecked indexing.
//
// Safety : the column pointers in Lp must be bounded by the lengths of
// Lx and Li, and the row indices in Li by the length of x.  Both hold
// for factors produced by this crate with x of matching dimension.
// -------------------------------------

fn lsolve_unchecked<T: FloatT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    unsafe {
        for i in 0..x.len() {
            let xi = *x.get_unchecked(i);
            let first = *Lp.get_unchecked(i);
            let last = *Lp.get_unchecked(i + 1);
            for j in first..last {
                let Lxj = *Lx.get_unchecked(j);
                let Lij = *Li.get_unchecked(j);
                *x.get_unchecked_mut(Lij) -= Lxj * xi;
            }
        }
    }
}

fn ltsolve_unchecked<T: FloatT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    unsafe {
        for i in (0..x.len()).rev() {
            let mut s = T::zero();
            let first = *Lp.get_unchecked(i);
            let last = *Lp.get_unchecked(i + 1);
            for j in first..last {
                let Lxj = *Lx.get_unchecked(j);
                let Lij = *Li.get_unchecked(j);
                s += Lxj * (*x.get_unchecked(Lij));
            }
            *x.get_unchecked_mut(i) -= s;
        }
    }
}

// Solves Ax = b from the given LDL factors, with x replacing b.
// Forward substitution, then diagonal scaling, then backward
// substitution.  The unchecked substitution kernels are used here; the
// checked versions above remain available for debugging.
pub(super) fn ldl_solve<T: FloatT>(L: &CscMatrix<T>, Dinv: &[T], b: &mut [T]) {
    lsolve_unchecked(&L.colptr, &L.rowval, &L.nzval, b);
    zip(b.iter_mut(), Dinv).for_each(|(b, d)| *b *= *d);
    ltsolve_unchecked(&L.colptr, &L.rowval, &L.nzval, b);
}
