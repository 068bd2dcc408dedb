//! Clipper statistics aggregator.
//!
//! Aggregates are fully recomputed from submission counts rather than
//! incrementally patched, trading a count query for immunity to drift. The
//! recompute runs on the caller's connection so it shares a database
//! transaction with the status write that triggered it.

use clipcommerce_common::{round_to_cents, AppResult};
use clipcommerce_db::repositories::{ClipperProfileRepository, SubmissionRepository};
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;

/// Recomputed aggregate counters for a clipper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipperStats {
    /// All submissions ever made by the clipper.
    pub total_submissions: u64,
    /// Submissions approved, including states only reachable after
    /// approval (paid, payment failed).
    pub total_approved: u64,
    /// `total_approved / total_submissions * 100`, zero when no
    /// submissions exist. Always in [0, 100].
    pub approval_rate: Decimal,
}

/// Clipper statistics aggregation service.
#[derive(Clone)]
pub struct StatsService {
    submission_repo: SubmissionRepository,
    clipper_repo: ClipperProfileRepository,
}

impl StatsService {
    /// Create a new stats service.
    #[must_use]
    pub const fn new(
        submission_repo: SubmissionRepository,
        clipper_repo: ClipperProfileRepository,
    ) -> Self {
        Self {
            submission_repo,
            clipper_repo,
        }
    }

    /// Recompute and persist a clipper's aggregate statistics.
    ///
    /// Idempotent: recomputing twice without an intervening submission
    /// change writes the same values.
    pub async fn recompute<C: ConnectionTrait>(
        &self,
        db: &C,
        clipper_id: &str,
    ) -> AppResult<ClipperStats> {
        let total = self.submission_repo.count_for_clipper(db, clipper_id).await?;
        let approved = self
            .submission_repo
            .count_approved_for_clipper(db, clipper_id)
            .await?;

        let stats = ClipperStats {
            total_submissions: total,
            total_approved: approved,
            approval_rate: Self::approval_rate(approved, total),
        };

        self.clipper_repo
            .write_stats(
                db,
                clipper_id,
                i32::try_from(stats.total_submissions).unwrap_or(i32::MAX),
                i32::try_from(stats.total_approved).unwrap_or(i32::MAX),
                stats.approval_rate,
            )
            .await?;

        Ok(stats)
    }

    fn approval_rate(approved: u64, total: u64) -> Decimal {
        if total == 0 {
            return Decimal::ZERO;
        }
        round_to_cents(Decimal::from(approved) / Decimal::from(total) * Decimal::ONE_HUNDRED)
    }
}
