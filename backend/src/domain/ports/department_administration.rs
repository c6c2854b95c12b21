//! Driving port for department management. Every operation is admin only.
use async_trait::async_trait;

use crate::domain::{
    Actor, Department, DepartmentDetails, DepartmentId, DepartmentSummary, Error,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentAdministration: Send + Sync {
    /// Create a department; names are unique ignoring case.
    async fn add_department(&self, actor: &Actor, name: &str) -> Result<Department, Error>;

    /// Rename a department. Keeping its current name is not a conflict.
    async fn edit_department(
        &self,
        actor: &Actor,
        id: &DepartmentId,
        name: &str,
    ) -> Result<Department, Error>;

    async fn list_departments(&self, actor: &Actor) -> Result<Vec<DepartmentSummary>, Error>;

    async fn department_details(
        &self,
        actor: &Actor,
        id: &DepartmentId,
    ) -> Result<DepartmentDetails, Error>;
}
