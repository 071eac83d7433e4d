#![allow(non_snake_case)]

use super::LdlError;

/// Sentinel parent index marking a root of the elimination tree.
pub(super) const UNKNOWN: usize = usize::MAX;

/// Compute the elimination tree of an upper triangular matrix given by
/// `(n, Ap, Ai)` in compressed sparse column form, together with the
/// column counts of its factor.
///
/// Does not allocate; `work`, `Lnz` and `etree` must each hold `n`
/// elements.  On return `etree[i]` is the parent of column `i`, or
/// [`UNKNOWN`] for a root, and `Lnz[i]` counts the strictly subdiagonal
/// nonzeros of column `i` of `L`.  The return value is `sum(Lnz)`, the
/// total subdiagonal nonzero count of `L`.
///
/// Each stored row index of column `j` is walked up the partially built
/// tree, charging every not-yet-visited ancestor below `j` exactly once
/// per column; the `work` array carries the visit marks.
pub(super) fn etree(
    n: usize,
    Ap: &[usize],
    Ai: &[usize],
    work: &mut [usize],
    Lnz: &mut [usize],
    etree: &mut [usize],
) -> Result<usize, LdlError> {
    work.fill(0);
    Lnz.fill(0);
    etree.fill(UNKNOWN);

    // a column with no entries cannot carry a diagonal
    for j in 0..n {
        if Ap[j] == Ap[j + 1] {
            return Err(LdlError::EmptyColumn);
        }
    }

    for j in 0..n {
        work[j] = j;
        for &row in &Ai[Ap[j]..Ap[j + 1]] {
            if row > j {
                return Err(LdlError::NotUpperTriangular);
            }

            let mut i = row;
            while work[i] != j {
                if etree[i] == UNKNOWN {
                    etree[i] = j;
                }
                Lnz[i] += 1; // nonzeros in this column
                work[i] = j;
                i = etree[i];
            }
        }
    }

    Ok(Lnz.iter().sum())
}
