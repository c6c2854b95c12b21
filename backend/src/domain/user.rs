//! User accounts: identity, contact details, role and lifecycle status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DepartmentId, UserId};

/// Maximum length accepted for an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length accepted for a first or last name.
pub const PERSON_NAME_MAX: usize = 80;

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("email must look like name@example.com")]
    MalformedEmail,
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    NameTooLong { field: &'static str, max: usize },
    #[error("role must be one of: admin, user")]
    UnknownRole,
    #[error("status must be one of: active, inactive")]
    UnknownStatus,
}

/// Email address normalised to trimmed lower case.
///
/// Uniqueness checks compare normalised values, so `Ada@Example.com` and
/// `ada@example.com` identify the same account.
///
/// # Examples
/// ```
/// use kudotrio::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ada@Example.com ").unwrap();
/// assert_eq!(email.as_str(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !is_plausible_email(&normalised) {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// A first or last name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name; `field` labels the value in error messages.
    pub fn new(raw: impl AsRef<str>, field: &'static str) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName { field });
        }
        if trimmed.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account lifecycle status. Inactive accounts cannot log in or receive kudos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for UserStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(UserValidationError::UnknownStatus),
        }
    }
}

/// Opaque password hash produced by a [`crate::domain::ports::PasswordHasher`].
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Creation and last-update bookkeeping shared by every table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<UserId>,
    pub updated_by: Option<UserId>,
}

impl AuditStamp {
    /// Stamp for a row created at `at` by `actor`.
    pub fn created(at: DateTime<Utc>, actor: Option<UserId>) -> Self {
        Self {
            created_at: at,
            updated_at: at,
            created_by: actor,
            updated_by: actor,
        }
    }

    /// Record a subsequent update.
    #[must_use]
    pub fn touched(&self, at: DateTime<Utc>, actor: Option<UserId>) -> Self {
        Self {
            created_at: self.created_at,
            updated_at: at,
            created_by: self.created_by,
            updated_by: actor,
        }
    }
}

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub department_id: Option<DepartmentId>,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub role: UserRole,
    pub status: UserStatus,
    pub audit: AuditStamp,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Public view of the account without credentials.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            department_id: self.department_id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            status: self.status,
        }
    }
}

/// User account as exposed to other users and administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub department_id: Option<DepartmentId>,
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub role: UserRole,
    pub status: UserStatus,
}

impl UserProfile {
    /// "First Last" as shown in lists and notifications.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A user profile joined with its department's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListing {
    pub profile: UserProfile,
    pub department_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", "ada@example.com")]
    #[case("  Ada.Lovelace@Example.COM ", "ada.lovelace@example.com")]
    fn normalises_email(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("ada", UserValidationError::MalformedEmail)]
    #[case("ada@", UserValidationError::MalformedEmail)]
    #[case("@example.com", UserValidationError::MalformedEmail)]
    #[case("ada@example", UserValidationError::MalformedEmail)]
    #[case("ada@@example.com", UserValidationError::MalformedEmail)]
    #[case("a da@example.com", UserValidationError::MalformedEmail)]
    fn rejects_invalid_email(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_blank_names() {
        assert_eq!(
            PersonName::new("  ", "first_name"),
            Err(UserValidationError::EmptyName {
                field: "first_name"
            })
        );
    }

    #[rstest]
    #[case("admin", UserRole::Admin)]
    #[case(" Admin ", UserRole::Admin)]
    #[case("USER", UserRole::User)]
    fn parses_roles(#[case] raw: &str, #[case] expected: UserRole) {
        assert_eq!(raw.parse::<UserRole>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_role() {
        assert_eq!(
            "super user".parse::<UserRole>(),
            Err(UserValidationError::UnknownRole)
        );
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$2b$04$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
