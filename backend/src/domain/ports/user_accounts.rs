//! Driving port for account registration, administration and login.
use async_trait::async_trait;

use crate::domain::{
    Actor, DepartmentId, Error, LoginCredentials, UserId, UserListing, UserProfile,
};

/// Self-registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub department_id: Option<DepartmentId>,
}

/// Administrator-created account payload. A temporary password is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub department_id: Option<DepartmentId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Register an active `user` account.
    async fn register(&self, request: RegisterRequest) -> Result<UserProfile, Error>;

    /// Create an account on behalf of an administrator and mail its
    /// temporary password.
    async fn add_user(&self, actor: &Actor, request: AddUserRequest) -> Result<UserProfile, Error>;

    /// Check credentials; any failure is reported as `unauthorized`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<UserProfile, Error>;

    /// Resolve the caller behind a session; unknown or inactive users are
    /// `unauthorized`.
    async fn actor_for(&self, user_id: &UserId) -> Result<Actor, Error>;

    async fn profile(&self, user_id: &UserId) -> Result<UserProfile, Error>;

    /// All users with department names; admin only.
    async fn list_users(&self, actor: &Actor) -> Result<Vec<UserListing>, Error>;
}
