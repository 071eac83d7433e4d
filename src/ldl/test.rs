use super::*;
use crate::algebra::{CscMatrix, FloatT};
use crate::ordering::amd_ordering;

fn test_matrix_4x4() -> CscMatrix<f64> {
    // A =
    //[ 8.0  -3.0   2.0    ⋅ ]
    //[  ⋅    8.0  -1.0    ⋅ ]
    //[  ⋅     ⋅    8.0  -1.0]
    //[  ⋅     ⋅     ⋅    1.0]
    let Ap = vec![0, 1, 3, 6, 8];
    let Ai = vec![0, 0, 1, 0, 1, 2, 2, 3];
    let Ax = vec![8., -3., 8., 2., -1., 8., -1., 1.];
    CscMatrix::new(4, 4, Ap, Ai, Ax)
}

fn inf_norm_diff<T: FloatT>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (x, y)| T::max(acc, T::abs(*x - *y)))
}

// tests of private internals.  Configured as a submodule from mod.rs
// to keep them visible.

#[test]
fn test_invperm() {
    let perm = vec![3, 0, 2, 1];
    let iperm = invperm(&perm).unwrap();
    assert_eq!(iperm, vec![1, 3, 2, 0]);
}

#[test]
fn test_invperm_repeated_index() {
    let perm = vec![3, 0, 2, 0]; //repeated index
    assert!(matches!(invperm(&perm), Err(LdlError::InvalidPermutation)));
}

#[test]
fn test_invperm_index_out_of_range() {
    let perm = vec![4, 0, 2, 1]; //index too big
    assert!(matches!(invperm(&perm), Err(LdlError::InvalidPermutation)));
}

#[test]
fn test_invperm_zero_position_repeated() {
    // both entries map to position 0
    let perm = vec![0, 0];
    assert!(matches!(invperm(&perm), Err(LdlError::InvalidPermutation)));
}

#[test]
fn test_permute_ipermute() {
    let perm = vec![3, 0, 2, 1];
    let b = vec![1., 2., 3., 4.];
    let mut x = vec![0.; 4];
    let mut y = vec![0.; 4];

    permute(&mut x, &b, &perm);
    assert_eq!(x, vec![4., 1., 3., 2.]);

    ipermute(&mut y, &x, &perm);
    assert_eq!(y, b);
}

#[test]
fn test_solve_from_factors() {
    //L =
    //[ ⋅    ⋅     ⋅    ⋅ ]
    //[1.0   ⋅     ⋅    ⋅ ]
    //[2.0  1.0    ⋅    ⋅ ]
    //[ ⋅   7.0  -3.0   ⋅ ]

    let Lp = vec![0, 2, 4, 5, 5];
    let Li = vec![1, 2, 2, 3, 3];
    let Lx = vec![1., 2., 1., 7., -3.];
    let dinv = [0.25, -1.0, -0.5, 1.0];
    let x = vec![-3., 2., 1., 4.];

    //(I+L)x = b.  Back solve on b in place.
    let mut b = vec![-3., -1., -3., 15.];
    solve::lsolve(&Lp, &Li, &Lx, &mut b);
    assert_eq!(b, x);

    //(I+L')x = b.  Back solve on b in place.
    let mut b = vec![1., 31., -11., 4.];
    solve::ltsolve(&Lp, &Li, &Lx, &mut b);
    assert_eq!(b, x);

    //(I+L)*D*(I+L)'x = b.  Back solve on b in place.
    let L = CscMatrix::new(4, 4, Lp, Li, Lx);
    let mut b = vec![4., -27., -1., -279.];
    solve::ldl_solve(&L, &dinv, &mut b);
    assert_eq!(b, x);
}

#[test]
fn test_etree() {
    let n = 4;
    let A = test_matrix_4x4();
    let mut work = vec![0; n];
    let mut Lnz = vec![0; n];
    let mut tree = vec![0; n];

    let total = etree::etree(n, &A.colptr, &A.rowval, &mut work, &mut Lnz, &mut tree).unwrap();

    assert_eq!(tree, vec![1, 2, 3, etree::UNKNOWN]);
    assert_eq!(Lnz, vec![2, 1, 1, 0]);
    assert_eq!(total, 4);
}

#[test]
fn test_etree_empty_column() {
    // column 1 has no entries
    let Ap = vec![0, 1, 1, 2];
    let Ai = vec![0, 2];
    let mut work = vec![0; 3];
    let mut Lnz = vec![0; 3];
    let mut tree = vec![0; 3];

    let out = etree::etree(3, &Ap, &Ai, &mut work, &mut Lnz, &mut tree);
    assert!(matches!(out, Err(LdlError::EmptyColumn)));
}

#[test]
fn test_etree_lower_triangle() {
    // column 0 stores an entry below the diagonal
    let Ap = vec![0, 2, 3];
    let Ai = vec![0, 1, 1];
    let mut work = vec![0; 2];
    let mut Lnz = vec![0; 2];
    let mut tree = vec![0; 2];

    let out = etree::etree(2, &Ap, &Ai, &mut work, &mut Lnz, &mut tree);
    assert!(matches!(out, Err(LdlError::NotUpperTriangular)));
}

#[test]
fn test_amd_ordering() {
    let A = test_matrix_4x4();
    let (perm, iperm) = amd_ordering(&A, 1.0);
    assert_eq!(perm, [3, 0, 1, 2]);
    assert_eq!(iperm, [1, 2, 3, 0]);
}

#[test]
fn test_permute_symmetric_identity() {
    let A = test_matrix_4x4();
    let iperm: Vec<usize> = vec![0, 1, 2, 3];
    let (P, AtoPAPt) = permute_symmetric(&A, &iperm);

    // diagonals are stored last in every column of the fixture, so the
    // identity permutation reproduces it exactly
    assert_eq!(&A.colptr, &P.colptr);
    assert_eq!(&A.rowval, &P.rowval);
    assert_eq!(&A.nzval, &P.nzval);
    let linearidx: Vec<usize> = (0..AtoPAPt.len()).collect();
    assert_eq!(&linearidx, &AtoPAPt);
}

#[test]
fn test_permute_symmetric() {
    // NB: entries within each column of the result are not ordered by
    // increasing row number, so caution is required when comparing
    // against other tools (Matlab/Julia/Python etc).  Diagonal entries
    // land in the final slot of their destination columns.

    let mut A = test_matrix_4x4();

    //set the problem data to increasing values columnwise
    for i in 0..A.nzval.len() {
        A.nzval[i] = i as f64 + 1.;
    }

    let perm: Vec<usize> = vec![2, 3, 0, 1];
    let iperm = invperm(&perm).unwrap();
    let (P, AtoPAPt) = permute_symmetric(&A, &iperm);

    assert_eq!(&P.colptr, &vec![0, 1, 3, 5, 8]);
    assert_eq!(&P.rowval, &vec![0, 0, 1, 0, 2, 2, 0, 3]);
    assert_eq!(&P.nzval, &vec![6.0, 7.0, 8.0, 4.0, 1.0, 2.0, 5.0, 3.0]);
    assert_eq!(&AtoPAPt, &vec![4, 5, 7, 3, 6, 0, 1, 2]);

    // every column of the permuted matrix keeps its diagonal last
    for col in 0..P.ncols() {
        assert!(P.last_entry_is_diag(col));
    }

    // the entry map is a bijection onto 0..nnz
    let mut sorted = AtoPAPt.clone();
    sorted.sort_unstable();
    let linearidx: Vec<usize> = (0..A.nnz()).collect();
    assert_eq!(sorted, linearidx);
}

#[test]
fn test_settings_builder() {
    //NB: the default regularize_eps is 1e-12.  Use this
    //as a reference point throughout
    let expected_regularize_eps = 1e-12;

    //check that defaults appear when not using the builder
    let opts = LdlSettings::<f64>::default();
    assert_eq!(opts.regularize_eps, expected_regularize_eps);

    //same thing through the builder
    let opts = LdlSettingsBuilder::<f64>::default().build().unwrap();
    assert_eq!(opts.regularize_eps, expected_regularize_eps);

    //and now a custom builder
    let opts = LdlSettingsBuilder::default()
        .ordering(Ordering::Custom(vec![0, 1, 2, 3]))
        .logical(false)
        .regularize_enable(true)
        .regularize_eps(1e-3)
        .regularize_delta(1e-3)
        .build()
        .unwrap();

    assert_eq!(opts.regularize_eps, 1e-3);
    assert_eq!(opts.regularize_delta, 1e-3);
}

#[test]
fn test_solve_basic() {
    let A = test_matrix_4x4();
    let x = [1., -2., 3., -4.];
    let b = [20.0, -22.0, 32.0, -7.0];

    //default settings but no reordering
    let opts = LdlSettingsBuilder::default()
        .ordering(Ordering::Natural)
        .build()
        .unwrap();

    let mut factors = LdlFactorization::new(&A, Some(opts)).unwrap();
    let mut b1 = b;
    factors.solve_in_place(&mut b1).unwrap();
    assert!(inf_norm_diff(&x, &b1) <= 1e-8);
    assert_eq!(factors.positive_inertia(), 4);

    //now with all defaults, including amd
    let mut factors = LdlFactorization::new(&A, None).unwrap();
    let mut b2 = b;
    factors.solve_in_place(&mut b2).unwrap();
    assert!(inf_norm_diff(&x, &b2) <= 1e-8);

    //user specified permutation
    let opts = LdlSettingsBuilder::<f64>::default()
        .ordering(Ordering::Custom(vec![3, 0, 2, 1]))
        .build()
        .unwrap();
    let mut factors = LdlFactorization::new(&A, Some(opts)).unwrap();
    let mut b3 = b;
    factors.solve_in_place(&mut b3).unwrap();
    assert!(inf_norm_diff(&x, &b3) <= 1e-8);
}

#[test]
fn test_solve_logical_errors() {
    let A = test_matrix_4x4();
    let opts = LdlSettingsBuilder::default().logical(true).build().unwrap();

    let mut factors = LdlFactorization::new(&A, Some(opts)).unwrap();
    let mut b = [20.0, -22.0, 32.0, -7.0];
    let out = factors.solve_in_place(&mut b);
    assert!(matches!(out, Err(LdlError::LogicalFactor)));
}

#[test]
fn test_solve_logical_refactor() {
    let A = test_matrix_4x4();
    //logical first, then refactor and solve
    let opts = LdlSettingsBuilder::default().logical(true).build().unwrap();

    let mut factors = LdlFactorization::new(&A, Some(opts)).unwrap();
    let x = [1., -2., 3., -4.];
    let mut b = [20.0, -22.0, 32.0, -7.0];
    factors.refactor().unwrap();
    factors.solve_in_place(&mut b).unwrap();
    assert!(inf_norm_diff(&x, &b) <= 1e-8);
}

#[test]
fn test_logical_pattern_matches_numeric() {
    let A = test_matrix_4x4();

    let opts = LdlSettingsBuilder::default()
        .ordering(Ordering::Natural)
        .logical(true)
        .build()
        .unwrap();
    let logical = LdlFactorization::new(&A, Some(opts)).unwrap();

    let opts = LdlSettingsBuilder::default()
        .ordering(Ordering::Natural)
        .build()
        .unwrap();
    let numeric = LdlFactorization::new(&A, Some(opts)).unwrap();

    assert_eq!(logical.L.colptr, numeric.L.colptr);
    assert_eq!(logical.L.rowval, numeric.L.rowval);

    // logical factors carry unit placeholder values
    assert!(logical.L.nzval.iter().all(|&v| v == 1.0));
    assert!(logical.D.iter().all(|&v| v == 1.0));
    assert!(logical.Dinv.iter().all(|&v| v == 1.0));
    assert_eq!(logical.regularized_entries(), 0);
}

#[test]
fn test_arrowhead_fill_pattern() {
    // dense last row/column, diagonal of 2s.  All fill appears in the
    // final row of L, i.e. every leading column of L holds one entry
    // with row index 4.
    let Ap = vec![0, 1, 2, 3, 4, 9];
    let Ai = vec![0, 1, 2, 3, 0, 1, 2, 3, 4];
    let Ax = vec![2., 2., 2., 2., 1., 1., 1., 1., 2.];
    let A = CscMatrix::new(5, 5, Ap, Ai, Ax);

    let opts = LdlSettingsBuilder::default()
        .ordering(Ordering::Natural)
        .logical(true)
        .build()
        .unwrap();
    let factors = LdlFactorization::new(&A, Some(opts)).unwrap();

    assert_eq!(factors.L.colptr, vec![0, 1, 2, 3, 4, 4]);
    assert_eq!(factors.L.rowval, vec![4, 4, 4, 4]);

    // the numeric pivot of the last column vanishes for this data, so
    // a numeric factorization leans on the default regularization
    let opts = LdlSettingsBuilder::default()
        .ordering(Ordering::Natural)
        .build()
        .unwrap();
    let factors = LdlFactorization::new(&A, Some(opts)).unwrap();
    assert_eq!(factors.regularized_entries(), 1);
    assert_eq!(factors.D[4], 1e-7);
}

#[test]
fn test_update_values_through_entry_map() {
    let mut A = test_matrix_4x4();
    for i in 0..A.nzval.len() {
        A.nzval[i] = i as f64 + 1.;
    }

    let opts = LdlSettingsBuilder::default()
        .ordering(Ordering::Custom(vec![2, 3, 0, 1]))
        .build()
        .unwrap();
    let mut factors = LdlFactorization::new(&A, Some(opts)).unwrap();

    factors.update_values(&[0, 3], &[-10., -40.]).unwrap();

    // entries 0 and 3 of the input live at permuted positions 4 and 3
    assert_eq!(factors.workspace.triuA.nzval[4], -10.);
    assert_eq!(factors.workspace.triuA.nzval[3], -40.);
}
