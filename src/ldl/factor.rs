#![allow(non_snake_case)]

use super::etree::{etree, UNKNOWN};
use super::LdlError;
use crate::algebra::{CscMatrix, FloatT};

/// Scratch buffers and factorization state.
///
/// Everything is sized once at construction; `factor` and the solves
/// perform no further allocation.
#[derive(Debug)]
pub(super) struct Workspace<T> {
    // elimination tree and column counts of L
    etree: Vec<usize>,
    Lnz: Vec<usize>,
    pub sumLnz: usize,

    // scratch for the row-wise kernel
    yIdx: Vec<usize>,
    elimBuffer: Vec<usize>,
    LNextSpaceInCol: Vec<usize>,
    yMarkers: Vec<bool>,
    yVals: Vec<T>,

    // scratch for the permuted right hand side in solves
    pub fwork: Vec<T>,

    // The upper triangular factorization target.  This is the
    // permutation PAPt of the original data
    pub triuA: CscMatrix<T>,

    // mapping from entries in the triu form of the original input to
    // the permuted triu form used for the factorization.  This can be
    // used when modifying entries of the data matrix for refactoring
    pub AtoPAPt: Vec<usize>,

    // regularization signs and parameters
    Dsigns: Vec<i8>,
    regularize_enable: bool,
    regularize_eps: T,
    regularize_delta: T,

    // number of positive values in D
    pub positive_inertia: usize,
    // number of regularized entries in D
    pub regularize_count: usize,
}

impl<T> Workspace<T>
where
    T: FloatT,
{
    pub fn new(
        triuA: CscMatrix<T>,
        AtoPAPt: Vec<usize>,
        Dsigns: Vec<i8>,
        regularize_enable: bool,
        regularize_eps: T,
        regularize_delta: T,
    ) -> Result<Self, LdlError> {
        let n = triuA.ncols();

        // compute the elimination tree and the column counts of L
        let mut tree = vec![0; n];
        let mut Lnz = vec![0; n];
        let mut work = vec![0; n];
        let sumLnz = etree(n, &triuA.colptr, &triuA.rowval, &mut work, &mut Lnz, &mut tree)?;

        Ok(Self {
            etree: tree,
            Lnz,
            sumLnz,
            yIdx: vec![0; n],
            elimBuffer: vec![0; n],
            LNextSpaceInCol: vec![0; n],
            yMarkers: vec![false; n],
            yVals: vec![T::zero(); n],
            fwork: vec![T::zero(); n],
            triuA,
            AtoPAPt,
            Dsigns,
            regularize_enable,
            regularize_eps,
            regularize_delta,
            positive_inertia: 0,
            regularize_count: 0,
        })
    }
}

/// Row-wise LDLᵀ factorization of the workspace's target matrix into the
/// preallocated factors `(L, D, Dinv)`.
///
/// For each `k`, the strictly upper column `k` of the target is solved
/// against the leading `k x k` factor to produce row `k` of `L` and the
/// pivot `D[k]`, with the row's sparsity pattern discovered by walking
/// the elimination tree.  When a sign prescription is active, pivots on
/// the wrong side of `regularize_eps` are replaced by
/// `regularize_delta` with the prescribed sign and counted.
///
/// In logical mode only the pattern of `L` is produced; the numeric
/// arrays are filled with ones.
pub(super) fn factor<T: FloatT>(
    L: &mut CscMatrix<T>,
    D: &mut [T],
    Dinv: &mut [T],
    ws: &mut Workspace<T>,
    logical: bool,
) -> Result<(), LdlError> {
    let Workspace {
        etree,
        Lnz,
        yIdx,
        elimBuffer,
        LNextSpaceInCol,
        yMarkers,
        yVals,
        triuA: A,
        Dsigns,
        regularize_enable,
        regularize_eps,
        regularize_delta,
        positive_inertia,
        regularize_count,
        ..
    } = ws;

    let n = A.ncols();
    let eps = *regularize_eps;
    let delta = *regularize_delta;

    // set Lp to the cumulative sum of the symbolic column counts; the
    // next free slot in each column then starts at the column pointer
    L.colptr[0] = 0;
    for (i, &nz) in Lnz.iter().enumerate() {
        L.colptr[i + 1] = L.colptr[i] + nz;
    }
    LNextSpaceInCol.copy_from_slice(&L.colptr[0..n]);

    yMarkers.fill(false);
    yVals.fill(T::zero());
    D.fill(T::zero());

    *positive_inertia = 0;
    *regularize_count = 0;

    for k in 0..n {
        // NB : for each k we compute a solution to y = L(0:k-1, 0:k-1)\b,
        // where b is the strictly upper part of the kth column of A.
        // The solution y is then the kth row of L, with an implied 1 at
        // the diagonal entry.

        // number of nonzeros in this row of L
        let mut nnzY = 0;

        // This loop determines where nonzeros will go in the kth row of
        // L, but doesn't compute the actual values
        for idx in A.colptr[k]..A.colptr[k + 1] {
            let bidx = A.rowval[idx];

            // the diagonal entry of this column seeds the pivot and
            // plays no part in the elimination step
            if bidx == k {
                if !logical {
                    D[k] = A.nzval[idx];
                }
                continue;
            }

            if !logical {
                yVals[bidx] = A.nzval[idx]; // initialise y(bidx) = b(bidx)
            }

            if yMarkers[bidx] {
                continue; // already on the pattern of this row
            }
            yMarkers[bidx] = true;
            elimBuffer[0] = bidx;
            let mut nnzE = 1;

            // walk up the elimination tree to find the elements that
            // must be eliminated after this one, stopping at the first
            // node already visited for this row
            let mut next = etree[bidx];
            while next != UNKNOWN && next < k {
                if yMarkers[next] {
                    break;
                }
                yMarkers[next] = true;
                elimBuffer[nnzE] = next;
                nnzE += 1;
                next = etree[next];
            }

            // spill the walked path in reverse, so that reading yIdx
            // from the back later visits each elimination path in
            // increasing column order
            while nnzE != 0 {
                nnzE -= 1;
                yIdx[nnzY] = elimBuffer[nnzE];
                nnzY += 1;
            }
        }

        // place values in the kth row, updating y against each reached
        // column of L in dependency order
        for &cidx in yIdx[0..nnzY].iter().rev() {
            let nextSlot = LNextSpaceInCol[cidx];

            // don't compute any values for a logical factorization
            if !logical {
                let yc = yVals[cidx];

                let (first, last) = (L.colptr[cidx], nextSlot);
                unsafe {
                    // Safety: the row indices stored in L are row
                    // numbers k < n written by this same loop, so they
                    // index yVals within bounds.
                    for j in first..last {
                        let Lxj = *L.nzval.get_unchecked(j);
                        let Lij = *L.rowval.get_unchecked(j);
                        *yVals.get_unchecked_mut(Lij) -= Lxj * yc;
                    }
                }

                // y(cidx) is now the cidx'th element of L\b, so the
                // corresponding element of this row of L follows
                L.nzval[nextSlot] = yc * Dinv[cidx];
                D[k] -= yc * L.nzval[nextSlot];
            }

            // record which row it went into
            L.rowval[nextSlot] = k;
            LNextSpaceInCol[cidx] = nextSlot + 1;

            // reset scratch for this column before moving on
            yVals[cidx] = T::zero();
            yMarkers[cidx] = false;
        }

        if logical {
            continue;
        }

        // apply dynamic regularization to enforce the prescribed sign
        if *regularize_enable {
            let sign = T::from_i8(Dsigns[k]).unwrap();
            if D[k] * sign < eps {
                D[k] = delta * sign;
                *regularize_count += 1;
            }
        }

        // a zero pivot means the matrix cannot be factored
        if D[k] == T::zero() {
            return Err(LdlError::ZeroPivot);
        }
        if D[k] > T::zero() {
            *positive_inertia += 1;
        }

        Dinv[k] = T::recip(D[k]);
    }

    if logical {
        // unit placeholders so that the numeric arrays are well defined;
        // every unit pivot is trivially positive
        L.nzval.fill(T::one());
        D.fill(T::one());
        Dinv.fill(T::one());
        *positive_inertia = n;
    }

    Ok(())
}
