//! Dashboard projections over kudos.
//!
//! A dashboard is four read-only views computed for one lookback window:
//! kudos per calendar month, the top receivers, the top creators, and the
//! most recent kudos. Leaderboards count every user regardless of account
//! status, and users without a department appear with no department name.

use chrono::{DateTime, Duration, Utc};

use super::{KudoId, UserId};

/// Default lookback window in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 120;
/// Default leaderboard length.
pub const DEFAULT_TOP_N: u32 = 5;
/// Default number of recent kudos.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

const MAX_WINDOW_DAYS: u32 = 3650;
const MAX_LIST_LEN: u32 = 100;

/// Validation errors for dashboard parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardQueryError {
    #[error("window_days must be between 1 and {max}")]
    WindowOutOfRange { max: u32 },
    #[error("top_n must be between 1 and {max}")]
    TopNOutOfRange { max: u32 },
    #[error("recent_limit must be between 1 and {max}")]
    RecentLimitOutOfRange { max: u32 },
}

impl DashboardQueryError {
    /// Name of the offending request field.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::WindowOutOfRange { .. } => "window_days",
            Self::TopNOutOfRange { .. } => "top_n",
            Self::RecentLimitOutOfRange { .. } => "recent_limit",
        }
    }
}

/// Dashboard parameters.
///
/// # Examples
/// ```
/// use kudotrio::domain::DashboardQuery;
///
/// let query = DashboardQuery::default();
/// assert_eq!(query.window_days(), 120);
/// assert_eq!(query.top_n(), 5);
/// assert_eq!(query.recent_limit(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardQuery {
    window_days: u32,
    top_n: u32,
    recent_limit: u32,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            top_n: DEFAULT_TOP_N,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl DashboardQuery {
    /// Build a query, substituting defaults for absent values.
    pub fn try_new(
        window_days: Option<u32>,
        top_n: Option<u32>,
        recent_limit: Option<u32>,
    ) -> Result<Self, DashboardQueryError> {
        let window_days = window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
        if !(1..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(DashboardQueryError::WindowOutOfRange {
                max: MAX_WINDOW_DAYS,
            });
        }
        let top_n = top_n.unwrap_or(DEFAULT_TOP_N);
        if !(1..=MAX_LIST_LEN).contains(&top_n) {
            return Err(DashboardQueryError::TopNOutOfRange { max: MAX_LIST_LEN });
        }
        let recent_limit = recent_limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        if !(1..=MAX_LIST_LEN).contains(&recent_limit) {
            return Err(DashboardQueryError::RecentLimitOutOfRange { max: MAX_LIST_LEN });
        }
        Ok(Self {
            window_days,
            top_n,
            recent_limit,
        })
    }

    pub const fn window_days(&self) -> u32 {
        self.window_days
    }

    pub const fn top_n(&self) -> u32 {
        self.top_n
    }

    pub const fn recent_limit(&self) -> u32 {
        self.recent_limit
    }

    /// Earliest creation timestamp included when evaluated at `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.window_days))
    }
}

/// Number of kudos created in one calendar month (UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyKudoCount {
    /// Month label formatted `YYYY-MM`.
    pub month: String,
    pub count: u64,
}

/// A leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub display_name: String,
    pub department_name: Option<String>,
    pub kudo_count: u64,
}

/// Name and department of one party to a kudo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedParty {
    pub user_id: UserId,
    pub display_name: String,
    pub department_name: Option<String>,
}

/// A kudo in the recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityFeedEntry {
    pub kudo_id: KudoId,
    pub created_at: DateTime<Utc>,
    pub message: String,
    pub sender: FeedParty,
    pub receiver: FeedParty,
    pub meme_image_url: Option<String>,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KudosDashboard {
    pub window_days: u32,
    pub since: DateTime<Utc>,
    pub monthly_counts: Vec<MonthlyKudoCount>,
    pub top_receivers: Vec<LeaderboardEntry>,
    pub top_creators: Vec<LeaderboardEntry>,
    pub recent_activity: Vec<ActivityFeedEntry>,
}

/// Format the `YYYY-MM` bucket for `at`.
pub fn month_label(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}
