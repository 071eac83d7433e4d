#![allow(non_snake_case)]

use super::LdlError;
use crate::algebra::{CscMatrix, FloatT};
use std::cmp::{max, min};
use std::iter::zip;

/// Construct the inverse of a permutation, verifying that `p` really is
/// a permutation of `0..p.len()`.
pub(super) fn invperm(p: &[usize]) -> Result<Vec<usize>, LdlError> {
    let mut b = vec![usize::MAX; p.len()];

    for (i, &j) in p.iter().enumerate() {
        if j < p.len() && b[j] == usize::MAX {
            b[j] = i;
        } else {
            return Err(LdlError::InvalidPermutation);
        }
    }
    Ok(b)
}

// permutation and inverse permutation applications,
// requiring no memory allocations

/// `x[i] = b[p[i]]`
pub(super) fn permute<S: Copy>(x: &mut [S], b: &[S], p: &[usize]) {
    zip(p, x).for_each(|(&p, x)| *x = b[p]);
}

/// `x[p[i]] = b[i]`
pub(super) fn ipermute<S: Copy>(x: &mut [S], b: &[S], p: &[usize]) {
    zip(p, b).for_each(|(&p, &b)| x[p] = b);
}

/// Symmetric permutation of an upper triangular matrix.
///
/// Given a sparse symmetric matrix `A` (upper triangular entries only)
/// and the inverse permutation vector `iperm`, returns the upper
/// triangle of `P·A·Pᵀ` together with a map taking each stored entry of
/// `A` to its position in the permuted matrix.  Row indices within each
/// column of the result are unordered, except that every diagonal entry
/// of `A` is placed as the *last* entry of its destination column.
///
/// Follows the two-pass scheme of Davis, "Direct Methods for Sparse
/// Linear Systems".
pub(super) fn permute_symmetric<T: FloatT>(
    A: &CscMatrix<T>,
    iperm: &[usize],
) -> (CscMatrix<T>, Vec<usize>) {
    let n = A.ncols();
    let mut P = CscMatrix::<T>::spalloc(n, n, A.nnz());
    let mut AtoPAPt = vec![0; A.nnz()];

    // 1. count the entries landing in each column of P, keeping in
    // mind the row permutation
    let mut counts = vec![0; n];
    for colA in 0..n {
        for &rowA in &A.rowval[A.colptr[colA]..A.colptr[colA + 1]] {
            counts[max(iperm[rowA], iperm[colA])] += 1;
        }
    }

    // 2. prefix-sum the counts into the column pointers of P
    P.colptr[0] = 0;
    for (i, &count) in counts.iter().enumerate() {
        P.colptr[i + 1] = P.colptr[i] + count;
    }

    // 3. place the off-diagonal entries, reusing the count array as a
    // cursor for the next free slot in each destination column.  This
    // leaves the columns of P with unordered row indices.
    counts.copy_from_slice(&P.colptr[0..n]);
    let next_slot = &mut counts;

    for colA in 0..n {
        let colP = iperm[colA];
        for idx in A.colptr[colA]..A.colptr[colA + 1] {
            let rowA = A.rowval[idx];
            if rowA == colA {
                continue;
            }
            let rowP = iperm[rowA];
            let c = max(rowP, colP);
            let k = next_slot[c];
            next_slot[c] += 1;

            P.rowval[k] = min(rowP, colP);
            P.nzval[k] = A.nzval[idx];
            AtoPAPt[idx] = k;
        }
    }

    // 4. diagonal entries go into the final slot of their destination
    // column.  Each column of P receives exactly one diagonal when every
    // column of A stores one, so the off-diagonal cursor never reaches
    // the reserved slot and the diagonal-last layout survives the
    // permutation.
    for colA in 0..n {
        for idx in A.colptr[colA]..A.colptr[colA + 1] {
            if A.rowval[idx] == colA {
                let c = iperm[colA];
                let k = P.colptr[c + 1] - 1;

                P.rowval[k] = c;
                P.nzval[k] = A.nzval[idx];
                AtoPAPt[idx] = k;
            }
        }
    }

    (P, AtoPAPt)
}
