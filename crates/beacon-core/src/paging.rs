//! Paging consistency decision logic.
//!
//! A beacon pages correctly when the first two half-size pages are an exact,
//! order-preserving slicing of one full page:
//!
//! ```text
//! full  = q(1, 2n + r)        n = floor(len(full) / 2)
//! half1 = q(1, n)   ==  full[0..n]
//! half2 = q(2, n)   ==  full[n..2n]
//! ```
//!
//! Only identifiers are compared, index by index. Set comparison would miss
//! a service that returns the right records in an unstable order.

use serde::{Deserialize, Serialize};

use crate::outcome::Violation;
use crate::types::IdentifiedEntity;

/// Half-page size for a full page of `full_len` records.
///
/// `None` when there are too few records to split (0 or 1).
pub fn slice_size(full_len: usize) -> Option<usize> {
    match full_len / 2 {
        0 => None,
        n => Some(n),
    }
}

/// What a successful comparison covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingSummary {
    pub full_len: usize,
    pub slice_size: usize,
}

impl PagingSummary {
    pub fn describe(&self) -> String {
        format!(
            "{} records; pages of {} matched the full page index by index",
            self.full_len, self.slice_size
        )
    }
}

/// Compare two half pages against the full page.
///
/// The first mismatch wins and is returned with its page, index and both
/// identifiers. A half page that ends before `n` records is reported as
/// [`Violation::PagingRecordMissing`] rather than read out of bounds.
/// Count conservation (`len(half1) + len(half2) == 2n`) is checked last.
///
/// Callers are expected to have obtained `n` from [`slice_size`] on `full`.
pub fn compare_slices<T: IdentifiedEntity>(
    full: &[T],
    half1: &[T],
    half2: &[T],
) -> Result<PagingSummary, Violation> {
    let n = full.len() / 2;

    compare_page(1, &full[..n], half1)?;
    compare_page(2, &full[n..2 * n], half2)?;

    let actual = half1.len() + half2.len();
    if actual != 2 * n {
        return Err(Violation::PagingCountMismatch {
            expected: 2 * n,
            actual,
        });
    }

    Ok(PagingSummary {
        full_len: full.len(),
        slice_size: n,
    })
}

fn compare_page<T: IdentifiedEntity>(page: u32, expected: &[T], actual: &[T]) -> Result<(), Violation> {
    for (index, want) in expected.iter().enumerate() {
        match actual.get(index) {
            Some(got) if got.id() == want.id() => {}
            Some(got) => {
                return Err(Violation::PagingSliceMismatch {
                    page,
                    index,
                    expected: want.id().to_string(),
                    actual: got.id().to_string(),
                });
            }
            None => {
                return Err(Violation::PagingRecordMissing {
                    page,
                    index,
                    expected: want.id().to_string(),
                });
            }
        }
    }
    Ok(())
}
