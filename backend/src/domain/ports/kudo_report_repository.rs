//! Read-side port for dashboard aggregations.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ActivityFeedEntry, LeaderboardEntry, MonthlyKudoCount};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reporting adapters.
    pub enum KudoReportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "kudo report connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "kudo report query failed: {message}",
    }
}

/// Aggregation queries over kudos.
///
/// Leaderboards order by count descending then user id ascending and resolve
/// department names with outer-join semantics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KudoReportRepository: Send + Sync {
    /// Kudos created at or after `since`, bucketed by UTC month, oldest first.
    async fn monthly_counts(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MonthlyKudoCount>, KudoReportRepositoryError>;

    /// Users who received the most kudos since `since`.
    async fn top_receivers(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, KudoReportRepositoryError>;

    /// Users who sent the most kudos since `since`.
    async fn top_creators(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, KudoReportRepositoryError>;

    /// The newest `limit` kudos, newest first.
    async fn recent_activity(
        &self,
        limit: u32,
    ) -> Result<Vec<ActivityFeedEntry>, KudoReportRepositoryError>;
}
