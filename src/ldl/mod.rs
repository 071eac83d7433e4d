#![allow(non_snake_case)]

//! LDLᵀ factorization of sparse symmetric quasidefinite matrices.
//!
//! The entry point is [`LdlFactorization::new`], which takes the matrix
//! (upper triangle, or full symmetric data to be triangulated) together
//! with optional [`LdlSettings`], and produces an object holding the
//! permutation, the factors `L` and `D`, and the workspace needed to
//! re-factor and solve without further allocation.

mod etree;
mod factor;
mod permute;
mod solve;

use crate::algebra::{AsFloatT, CscMatrix, FloatT};
use crate::ordering::amd_ordering;
use derive_builder::Builder;
use factor::Workspace;
use permute::{invperm, ipermute, permute, permute_symmetric};
use std::iter::zip;
use thiserror::Error;

/// Error codes returnable from [`LdlFactorization`] operations

#[derive(Error, Debug)]
pub enum LdlError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Invalid permutation vector")]
    InvalidPermutation,
    #[error("Matrix is not upper triangular")]
    NotUpperTriangular,
    #[error("Matrix column does not store its diagonal entry last")]
    MissingDiagonal,
    #[error("Matrix has a zero column")]
    EmptyColumn,
    #[error("Matrix factorization produced a zero pivot")]
    ZeroPivot,
    #[error("Operation requires a numeric factorization, but only a logical one was computed")]
    LogicalFactor,
}

/// Fill-reducing ordering applied before factorization

#[derive(Debug, Clone, Default)]
pub enum Ordering {
    /// Approximate minimum degree ordering of the input pattern (the default)
    #[default]
    Amd,
    /// Natural ordering.  No reordering is applied.
    Natural,
    /// User supplied permutation vector
    Custom(Vec<usize>),
}

/// Required settings for [`LdlFactorization`]

#[derive(Builder, Debug, Clone)]
pub struct LdlSettings<T: FloatT> {
    /// fill-reducing ordering of the matrix before factorization
    #[builder(default)]
    ordering: Ordering,
    /// scaling of the AMD dense row/column threshold
    #[builder(default = "1.0")]
    amd_dense_scale: f64,
    /// compute the nonzero pattern of `L` only
    #[builder(default = "false")]
    logical: bool,
    /// prescribed signs for the entries of `D`
    #[builder(default = "None", setter(strip_option))]
    Dsigns: Option<Vec<i8>>,
    /// enable dynamic regularization of pivots
    #[builder(default = "true")]
    regularize_enable: bool,
    /// pivot acceptance threshold for dynamic regularization
    #[builder(default = "(1e-12).as_T()")]
    regularize_eps: T,
    /// replacement magnitude for regularized pivots
    #[builder(default = "(1e-7).as_T()")]
    regularize_delta: T,
}

impl<T> Default for LdlSettings<T>
where
    T: FloatT,
{
    fn default() -> LdlSettings<T> {
        LdlSettingsBuilder::<T>::default().build().unwrap()
    }
}

/// Performs $LDL^T$ factorization of a symmetric quasidefinite matrix

#[derive(Debug)]
pub struct LdlFactorization<T = f64> {
    /// permutation vector
    pub perm: Vec<usize>,
    // inverse permutation, used to reach permuted columns during updates
    iperm: Vec<usize>,
    /// lower triangular factor (unit diagonal implicit)
    pub L: CscMatrix<T>,
    /// diagonal of `D` in `A = LDL^T`
    pub D: Vec<T>,
    /// elementwise inverse of `D`
    pub Dinv: Vec<T>,
    // workspace data
    workspace: Workspace<T>,
    // is it a logical factorization only?
    is_logical: bool,
}

impl<T> LdlFactorization<T>
where
    T: FloatT,
{
    /// Factor the symmetric matrix whose upper triangle is given by `A`.
    ///
    /// `A` must be square.  If it is not upper triangular its upper
    /// triangle is taken internally; the caller's matrix is never
    /// modified.  Every column of the (triangulated) input must store
    /// its diagonal entry as its last element, which is automatic for
    /// data with sorted row indices and a structurally nonzero diagonal.
    pub fn new(A: &CscMatrix<T>, settings: Option<LdlSettings<T>>) -> Result<Self, LdlError> {
        let settings = settings.unwrap_or_default();

        if !A.is_square() {
            return Err(LdlError::IncompatibleDimension);
        }

        // work on the upper triangle only
        let triu;
        let A = if A.is_triu() {
            A
        } else {
            triu = A.to_triu();
            &triu
        };

        check_diagonals(A)?;

        let n = A.ncols();
        let (perm, iperm) = match settings.ordering {
            Ordering::Amd => amd_ordering(A, settings.amd_dense_scale),
            Ordering::Natural => {
                let p: Vec<usize> = (0..n).collect();
                (p.clone(), p)
            }
            Ordering::Custom(p) => {
                if p.len() != n {
                    return Err(LdlError::InvalidPermutation);
                }
                let ip = invperm(&p)?;
                (p, ip)
            }
        };

        // permute to (another) upper triangular matrix, recording the
        // map from the input's entries to the permuted entries.  The
        // permutation machinery runs even for the natural ordering so
        // that the entry map always exists and update indexing is
        // uniform across configurations.
        let (triuA, AtoPAPt) = permute_symmetric(A, &iperm);

        // the sign prescription follows the permutation
        let mut Dsigns = vec![1_i8; n];
        if let Some(signs) = settings.Dsigns {
            if signs.len() != n {
                return Err(LdlError::IncompatibleDimension);
            }
            permute(&mut Dsigns, &signs, &perm);
        }

        let mut workspace = Workspace::new(
            triuA,
            AtoPAPt,
            Dsigns,
            settings.regularize_enable,
            settings.regularize_eps,
            settings.regularize_delta,
        )?;

        // allocate the factors and compute them
        let mut L = CscMatrix::spalloc(n, n, workspace.sumLnz);
        let mut D = vec![T::zero(); n];
        let mut Dinv = vec![T::zero(); n];

        factor::factor(&mut L, &mut D, &mut Dinv, &mut workspace, settings.logical)?;

        Ok(LdlFactorization {
            perm,
            iperm,
            L,
            D,
            Dinv,
            workspace,
            is_logical: settings.logical,
        })
    }

    /// Number of positive pivots in the most recent numeric factorization.
    pub fn positive_inertia(&self) -> usize {
        self.workspace.positive_inertia
    }

    /// Number of pivots replaced by dynamic regularization in the most
    /// recent numeric factorization.
    pub fn regularized_entries(&self) -> usize {
        self.workspace.regularize_count
    }

    /// Solves `A x = b`, returning the solution and leaving `b` untouched.
    pub fn solve(&mut self, b: &[T]) -> Result<Vec<T>, LdlError> {
        let mut x = b.to_vec();
        self.solve_in_place(&mut x)?;
        Ok(x)
    }

    /// Solves `A x = b` in place, overwriting `b` with the solution.
    pub fn solve_in_place(&mut self, b: &mut [T]) -> Result<(), LdlError> {
        if self.is_logical {
            return Err(LdlError::LogicalFactor);
        }
        if b.len() != self.D.len() {
            return Err(LdlError::IncompatibleDimension);
        }

        // permute b, solve in place on the permuted right hand side,
        // then invert the permutation into the output
        let work = &mut self.workspace.fwork;
        permute(work, b, &self.perm);
        solve::ldl_solve(&self.L, &self.Dinv, work);
        ipermute(b, work, &self.perm);

        Ok(())
    }

    /// Recompute the numeric factors from the current matrix values,
    /// reusing the symbolic pattern.  A factorization that was logical
    /// only becomes numeric after this call.
    pub fn refactor(&mut self) -> Result<(), LdlError> {
        self.is_logical = false;
        factor::factor(
            &mut self.L,
            &mut self.D,
            &mut self.Dinv,
            &mut self.workspace,
            self.is_logical,
        )
    }

    /// Overwrite stored entries of the matrix.  `indices` refer to
    /// entries of the original (triangulated) input matrix and are
    /// translated through the internal entry map.
    pub fn update_values(&mut self, indices: &[usize], values: &[T]) -> Result<(), LdlError> {
        if indices.len() != values.len() {
            return Err(LdlError::IncompatibleDimension);
        }
        let AtoPAPt = &self.workspace.AtoPAPt;
        if indices.iter().any(|&idx| idx >= AtoPAPt.len()) {
            return Err(LdlError::IncompatibleDimension);
        }

        let nzval = &mut self.workspace.triuA.nzval;
        for (&idx, &value) in zip(indices, values) {
            nzval[AtoPAPt[idx]] = value;
        }
        Ok(())
    }

    /// Scale stored entries of the matrix in place.
    pub fn scale_values(&mut self, indices: &[usize], scale: T) -> Result<(), LdlError> {
        let AtoPAPt = &self.workspace.AtoPAPt;
        if indices.iter().any(|&idx| idx >= AtoPAPt.len()) {
            return Err(LdlError::IncompatibleDimension);
        }

        let nzval = &mut self.workspace.triuA.nzval;
        for &idx in indices {
            nzval[AtoPAPt[idx]] *= scale;
        }
        Ok(())
    }

    /// Add `offset * sign` to stored entries of the matrix in place.
    /// Signs must be `±1`.
    pub fn offset_values(
        &mut self,
        indices: &[usize],
        offset: T,
        signs: &[i8],
    ) -> Result<(), LdlError> {
        if indices.len() != signs.len() {
            return Err(LdlError::IncompatibleDimension);
        }
        let AtoPAPt = &self.workspace.AtoPAPt;
        if indices.iter().any(|&idx| idx >= AtoPAPt.len()) {
            return Err(LdlError::IncompatibleDimension);
        }

        let nzval = &mut self.workspace.triuA.nzval;
        for (&idx, &sign) in zip(indices, signs) {
            let sign: T = T::from_i8(sign).unwrap();
            nzval[AtoPAPt[idx]] += offset * sign;
        }
        Ok(())
    }

    /// Overwrite diagonal entries of the matrix.  `indices` are column
    /// numbers of the original input matrix.
    pub fn update_diagonal(&mut self, indices: &[usize], values: &[T]) -> Result<(), LdlError> {
        if indices.len() != values.len() {
            return Err(LdlError::IncompatibleDimension);
        }

        let triuA = &self.workspace.triuA;
        let n = triuA.ncols();

        // validate before writing anything so that a failed call leaves
        // the matrix unchanged
        for &index in indices {
            if index >= n {
                return Err(LdlError::IncompatibleDimension);
            }
            if !triuA.last_entry_is_diag(self.iperm[index]) {
                return Err(LdlError::MissingDiagonal);
            }
        }

        let triuA = &mut self.workspace.triuA;
        for (&index, &value) in zip(indices, values) {
            let col = self.iperm[index];
            let last = triuA.colptr[col + 1] - 1;
            triuA.nzval[last] = value;
        }
        Ok(())
    }
}

// Every column must be nonempty and store its diagonal entry last.
// The permutation preserves this, and the update path depends on it.
fn check_diagonals<T: FloatT>(A: &CscMatrix<T>) -> Result<(), LdlError> {
    for col in 0..A.ncols() {
        if A.colptr[col] == A.colptr[col + 1] {
            return Err(LdlError::EmptyColumn);
        }
        if !A.last_entry_is_diag(col) {
            return Err(LdlError::MissingDiagonal);
        }
    }
    Ok(())
}

//configure tests of internals
#[path = "test.rs"]
#[cfg(test)]
mod test;
