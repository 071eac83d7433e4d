#![allow(non_snake_case)]

//! Sparse LDLᵀ factorization for symmetric quasidefinite matrices.
//!
//! Given the upper triangle of a symmetric quasidefinite matrix `A` in
//! compressed sparse column format, this crate computes a permuted
//! factorization `P A Pᵀ = L D Lᵀ` with `L` unit lower triangular and `D`
//! diagonal, and solves `A x = b` from the stored factors.  Quasidefinite
//! matrices admit such a factorization with no pivoting for any symmetric
//! permutation, so a fill-reducing ordering can be chosen freely.
//!
//! Matrix values can be updated in place and the factorization recomputed
//! on the same symbolic pattern, which makes the crate suitable as the
//! linear system core of an interior point method.  Pivots that violate a
//! prescribed sign can be replaced by a small regularization term, with
//! the number of such events reported after each factorization.
//!
//! __Example usage__:
//! ```
//! use quasildl::algebra::CscMatrix;
//! use quasildl::LdlFactorization;
//!
//! // upper triangle of A = [4. 1.]
//! //                       [1. 3.]
//! let A = CscMatrix::new(2, 2, vec![0, 1, 3], vec![0, 0, 1], vec![4.0f64, 1., 3.]);
//!
//! let mut factors = LdlFactorization::new(&A, None).unwrap();
//! let x = factors.solve(&[1., 2.]).unwrap();
//!
//! assert!((x[0] - 1. / 11.).abs() < 1e-12);
//! assert!((x[1] - 7. / 11.).abs() < 1e-12);
//! ```

pub mod algebra;
pub mod ldl;
mod ordering;

pub use ldl::{LdlError, LdlFactorization, LdlSettings, LdlSettingsBuilder, Ordering};
