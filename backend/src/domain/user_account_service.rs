//! Account registration, administration and login.
//!
//! Login failures are deliberately indistinguishable to the caller: unknown
//! email, wrong password and inactive accounts all produce the same
//! `unauthorized` error. The reason is only recorded in debug logs.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    AddUserRequest, DepartmentRepository, Notifier, PasswordHasher, RegisterRequest,
    UserAccounts, UserRepository,
};
use crate::domain::service_support::{
    duplicate_email_error, map_department_repository_error, map_hasher_error,
    map_user_repository_error, new_user_notification, notify_best_effort, validation_error,
};
use crate::domain::{
    Actor, AuditStamp, DepartmentId, EmailAddress, Error, LoginCredentials, PersonName,
    PlainPassword, User, UserId, UserListing, UserProfile, UserRole, UserStatus,
    generate_temporary_password, require_admin,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";
const LOGIN_REQUIRED: &str = "login required";

/// Names and email shared by both account creation paths.
struct NewAccount {
    email: EmailAddress,
    first_name: PersonName,
    last_name: PersonName,
    department_id: Option<DepartmentId>,
}

#[derive(Clone)]
pub struct UserAccountService<U, D, H, N> {
    users: Arc<U>,
    departments: Arc<D>,
    hasher: Arc<H>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<U, D, H, N> UserAccountService<U, D, H, N> {
    pub fn new(
        users: Arc<U>,
        departments: Arc<D>,
        hasher: Arc<H>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            departments,
            hasher,
            notifier,
            clock,
        }
    }
}

impl<U, D, H, N> UserAccountService<U, D, H, N>
where
    U: UserRepository,
    D: DepartmentRepository,
    H: PasswordHasher,
    N: Notifier,
{
    async fn validate_account(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        department_id: Option<DepartmentId>,
    ) -> Result<NewAccount, Error> {
        let email = EmailAddress::new(email)
            .map_err(|err| validation_error("email", "invalid_email", err.to_string()))?;
        let first_name = PersonName::new(first_name, "first_name")
            .map_err(|err| validation_error("first_name", "invalid_name", err.to_string()))?;
        let last_name = PersonName::new(last_name, "last_name")
            .map_err(|err| validation_error("last_name", "invalid_name", err.to_string()))?;

        if let Some(id) = department_id.as_ref() {
            let known = self
                .departments
                .find_by_id(id)
                .await
                .map_err(map_department_repository_error)?;
            if known.is_none() {
                return Err(validation_error(
                    "department_id",
                    "unknown_department",
                    format!("department {id} does not exist"),
                ));
            }
        }

        let existing = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)?;
        if existing.is_some() {
            return Err(duplicate_email_error(email.as_str()));
        }

        Ok(NewAccount {
            email,
            first_name,
            last_name,
            department_id,
        })
    }

    async fn create(
        &self,
        account: NewAccount,
        password: &str,
        role: UserRole,
        created_by: Option<UserId>,
    ) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(password)
            .await
            .map_err(map_hasher_error)?;
        let user = User {
            id: UserId::random(),
            department_id: account.department_id,
            email: account.email,
            password_hash,
            first_name: account.first_name,
            last_name: account.last_name,
            role,
            status: UserStatus::Active,
            audit: AuditStamp::created(self.clock.utc(), created_by),
        };
        self.users
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id, role = %user.role, "user account created");
        Ok(user)
    }

    async fn find(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)
    }
}

#[async_trait]
impl<U, D, H, N> UserAccounts for UserAccountService<U, D, H, N>
where
    U: UserRepository,
    D: DepartmentRepository,
    H: PasswordHasher,
    N: Notifier,
{
    async fn register(&self, request: RegisterRequest) -> Result<UserProfile, Error> {
        let password = PlainPassword::new(&request.password)
            .map_err(|err| validation_error("password", "invalid_password", err.to_string()))?;
        let account = self
            .validate_account(
                &request.email,
                &request.first_name,
                &request.last_name,
                request.department_id,
            )
            .await?;
        let user = self
            .create(account, password.expose(), UserRole::User, None)
            .await?;
        Ok(user.profile())
    }

    async fn add_user(&self, actor: &Actor, request: AddUserRequest) -> Result<UserProfile, Error> {
        require_admin(actor)?;
        let role = request
            .role
            .parse::<UserRole>()
            .map_err(|err| validation_error("role", "invalid_role", err.to_string()))?;
        let account = self
            .validate_account(
                &request.email,
                &request.first_name,
                &request.last_name,
                request.department_id,
            )
            .await?;

        let temporary = generate_temporary_password(&mut rand::thread_rng());
        let user = self
            .create(account, temporary.as_str(), role, Some(actor.user_id))
            .await?;
        notify_best_effort(
            self.notifier.as_ref(),
            new_user_notification(&user, temporary.as_str()),
        )
        .await;
        Ok(user.profile())
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<UserProfile, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            debug!("login rejected: malformed email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)?
        else {
            debug!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !user.is_active() {
            debug!(user_id = %user.id, "login rejected: inactive account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %user.id, "user logged in");
        Ok(user.profile())
    }

    async fn actor_for(&self, user_id: &UserId) -> Result<Actor, Error> {
        match self.find(user_id).await? {
            Some(user) if user.is_active() => Ok(Actor::from(&user.profile())),
            _ => Err(Error::unauthorized(LOGIN_REQUIRED)),
        }
    }

    async fn profile(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        self.find(user_id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn list_users(&self, actor: &Actor) -> Result<Vec<UserListing>, Error> {
        require_admin(actor)?;
        self.users
            .list_with_departments()
            .await
            .map_err(map_user_repository_error)
    }
}

#[cfg(test)]
#[path = "user_account_service_tests.rs"]
mod tests;
