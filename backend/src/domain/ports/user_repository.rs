//! Port abstraction for user account persistence.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId, UserListing, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique email index rejected an insert.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for user accounts.
///
/// Listings order users by last name, then first name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Insert one account.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Insert every account or none of them.
    async fn insert_batch(&self, users: &[User]) -> Result<(), UserRepositoryError>;

    /// All users with their department names.
    async fn list_with_departments(&self) -> Result<Vec<UserListing>, UserRepositoryError>;

    /// Active users other than `excluded`, as kudo recipient choices.
    async fn list_active_except(
        &self,
        excluded: &UserId,
    ) -> Result<Vec<UserProfile>, UserRepositoryError>;
}
