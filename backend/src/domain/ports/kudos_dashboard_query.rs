//! Driving port for the kudos dashboard.
use async_trait::async_trait;

use crate::domain::{DashboardQuery, Error, KudosDashboard};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KudosDashboardQuery: Send + Sync {
    async fn dashboard(&self, query: DashboardQuery) -> Result<KudosDashboard, Error>;
}
