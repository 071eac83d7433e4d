//! Sparse matrix storage and scalar traits.
//!
//! All numeric work in the crate is generic over the [`FloatT`] scalar
//! trait, and all matrix data is held in standard compressed sparse
//! column format via [`CscMatrix`].

mod csc;
mod error_types;
mod floats;
pub use csc::*;
pub use error_types::*;
pub use floats::*;
