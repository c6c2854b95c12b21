//! Authentication and authorisation primitives.
//!
//! Credentials are validated here before a handler talks to a service. The
//! [`Actor`] is the authenticated caller; protected operations start with
//! [`require_admin`].

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, Error, UserId, UserProfile, UserRole};

/// Minimum length of a self-chosen password.
pub const PASSWORD_MIN: usize = 8;
/// Maximum length of a self-chosen password.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is trimmed and lower-cased; it is not syntax-checked so that a
///   malformed address fails authentication like any unknown one.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use kudotrio::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Validation errors for self-chosen passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
    #[error("password must be at most {max} characters")]
    TooLong { max: usize },
}

/// Plain-text password chosen at registration, wiped on drop.
#[derive(Clone)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    pub fn new(raw: &str) -> Result<Self, PasswordValidationError> {
        let length = raw.chars().count();
        if length < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(PasswordValidationError::TooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(..)")
    }
}

/// The authenticated caller of a domain operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub role: UserRole,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&UserProfile> for Actor {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.id,
            email: profile.email.clone(),
            role: profile.role,
        }
    }
}

/// The caller lacks the role required for an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("administrator role required")]
pub struct Unauthorized;

/// Check that `actor` may perform administrative operations.
///
/// # Examples
/// ```
/// use kudotrio::domain::{require_admin, Actor, EmailAddress, UserId, UserRole};
///
/// let actor = Actor {
///     user_id: UserId::random(),
///     email: EmailAddress::new("ada@example.com").unwrap(),
///     role: UserRole::User,
/// };
/// assert!(require_admin(&actor).is_err());
/// ```
pub fn require_admin(actor: &Actor) -> Result<(), Unauthorized> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Unauthorized)
    }
}

impl From<Unauthorized> for Error {
    fn from(value: Unauthorized) -> Self {
        Error::forbidden(value.to_string())
    }
}
