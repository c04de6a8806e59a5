//! Paging consistency check.
//!
//! Fetches one full page, then the same window as two half pages, and hands
//! the three to [`compare_slices`]. Works for any query whose records carry
//! an id; the caller supplies the query as a `(page, page_size)` closure.

use futures::future::BoxFuture;

use beacon_core::{
    compare_slices, slice_size, CheckKind, CheckResult, GatewayError, IdentifiedEntity,
};

/// Checks that paging is a stable slicing of one ordering.
#[derive(Debug, Clone, Copy)]
pub struct PagingValidator {
    page_size: u32,
}

impl PagingValidator {
    /// `page_size` is the full window fetched first.
    pub fn new(page_size: u32) -> Self {
        Self { page_size }
    }

    /// Run the paging check for `check` against `query`.
    ///
    /// Transport failures end the check as errored; too little data ends it
    /// as skipped. Neither is a paging violation.
    pub async fn check<'a, T, F>(&self, check: CheckKind, query: F) -> CheckResult
    where
        T: IdentifiedEntity,
        F: Fn(u32, u32) -> BoxFuture<'a, Result<Vec<T>, GatewayError>>,
    {
        tracing::info!(check = %check, page_size = self.page_size, "Testing paging");

        let full = match query(1, self.page_size).await {
            Ok(records) => records,
            Err(e) => return errored(check, e),
        };

        if full.is_empty() {
            tracing::info!(check = %check, "No data, skipping paging check");
            return CheckResult::skipped(check, "no data returned for the full page");
        }

        let Some(n) = slice_size(full.len()) else {
            return CheckResult::skipped(
                check,
                format!(
                    "{} record(s) returned, too few to test slicing",
                    full.len()
                ),
            );
        };

        let Ok(half_size) = u32::try_from(n) else {
            return CheckResult::skipped(
                check,
                format!("half page of {} records exceeds the page size range", n),
            );
        };

        let half1 = match query(1, half_size).await {
            Ok(records) => records,
            Err(e) => return errored(check, e),
        };
        let half2 = match query(2, half_size).await {
            Ok(records) => records,
            Err(e) => return errored(check, e),
        };

        match compare_slices(&full, &half1, &half2) {
            Ok(summary) => {
                tracing::info!(check = %check, slice_size = summary.slice_size, "Paging consistent");
                CheckResult::passed(check, summary.describe())
            }
            Err(violation) => {
                tracing::error!(check = %check, violation = %violation, "Paging inconsistent");
                CheckResult::failed(check, vec![violation])
            }
        }
    }
}

fn errored(check: CheckKind, error: GatewayError) -> CheckResult {
    tracing::warn!(check = %check, query = %error.query, error = %error.kind, "Paging query failed");
    CheckResult::errored(check, vec![error])
}
