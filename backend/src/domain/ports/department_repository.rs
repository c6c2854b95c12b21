//! Port abstraction for department persistence.
use async_trait::async_trait;

use crate::domain::{Department, DepartmentId, DepartmentSummary, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by department repository adapters.
    pub enum DepartmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "department repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "department repository query failed: {message}",
        /// The case-insensitive unique name index rejected a write.
        DuplicateName { name: String } => "department name already exists: {name}",
        /// An update targeted a department that does not exist.
        NotFound { id: String } => "department not found: {id}",
    }
}

/// Storage for departments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// All departments ordered by name.
    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError>;

    async fn find_by_id(
        &self,
        id: &DepartmentId,
    ) -> Result<Option<Department>, DepartmentRepositoryError>;

    /// Find a department whose stored name equals `name` exactly.
    async fn find_by_exact_name(
        &self,
        name: &str,
    ) -> Result<Option<Department>, DepartmentRepositoryError>;

    async fn insert(&self, department: &Department) -> Result<(), DepartmentRepositoryError>;

    /// Persist the name and audit fields of an existing department.
    async fn update(&self, department: &Department) -> Result<(), DepartmentRepositoryError>;

    /// Departments ordered by name with the number of assigned users.
    async fn list_with_user_counts(
        &self,
    ) -> Result<Vec<DepartmentSummary>, DepartmentRepositoryError>;

    /// Users assigned to a department, ordered by last name.
    async fn members(
        &self,
        id: &DepartmentId,
    ) -> Result<Vec<UserProfile>, DepartmentRepositoryError>;
}
