//! Kudos dashboard query service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{KudoReportRepository, KudosDashboardQuery};
use crate::domain::service_support::map_report_error;
use crate::domain::{DashboardQuery, Error, KudosDashboard};

/// Builds the dashboard from reporting queries evaluated at one instant.
#[derive(Clone)]
pub struct DashboardService<R> {
    reports: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> DashboardService<R> {
    pub fn new(reports: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { reports, clock }
    }
}

#[async_trait]
impl<R> KudosDashboardQuery for DashboardService<R>
where
    R: KudoReportRepository,
{
    async fn dashboard(&self, query: DashboardQuery) -> Result<KudosDashboard, Error> {
        let since = query.cutoff(self.clock.utc());

        let monthly_counts = self
            .reports
            .monthly_counts(since)
            .await
            .map_err(map_report_error)?;
        let top_receivers = self
            .reports
            .top_receivers(since, query.top_n())
            .await
            .map_err(map_report_error)?;
        let top_creators = self
            .reports
            .top_creators(since, query.top_n())
            .await
            .map_err(map_report_error)?;
        let recent_activity = self
            .reports
            .recent_activity(query.recent_limit())
            .await
            .map_err(map_report_error)?;

        debug!(
            window_days = query.window_days(),
            months = monthly_counts.len(),
            recent = recent_activity.len(),
            "dashboard assembled"
        );
        Ok(KudosDashboard {
            window_days: query.window_days(),
            since,
            monthly_counts,
            top_receivers,
            top_creators,
            recent_activity,
        })
    }
}
