//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DepartmentAdministration, KudosCommand, KudosDashboardQuery, UserAccounts, UserImportCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccounts>,
    pub dashboard: Arc<dyn KudosDashboardQuery>,
    pub kudos: Arc<dyn KudosCommand>,
    pub departments: Arc<dyn DepartmentAdministration>,
    pub imports: Arc<dyn UserImportCommand>,
}
