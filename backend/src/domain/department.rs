//! Departments and their case-insensitive naming rule.

use std::fmt;

use super::{AuditStamp, DepartmentId, UserProfile};

/// Maximum length of a department name.
pub const DEPARTMENT_NAME_MAX: usize = 120;

/// Validation errors for department names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepartmentValidationError {
    #[error("department name must not be empty")]
    EmptyName,
    #[error("department name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Trimmed department name.
///
/// Two names denote the same department when their [`normalized`] forms
/// match, regardless of how the store collates text.
///
/// [`normalized`]: DepartmentName::normalized
///
/// # Examples
/// ```
/// use kudotrio::domain::DepartmentName;
///
/// let a = DepartmentName::new("Engineering").unwrap();
/// let b = DepartmentName::new(" ENGINEERING ").unwrap();
/// assert!(a.same_name_as(&b));
/// assert_eq!(b.as_str(), "ENGINEERING");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentName(String);

impl DepartmentName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DepartmentValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DepartmentValidationError::EmptyName);
        }
        if trimmed.chars().count() > DEPARTMENT_NAME_MAX {
            return Err(DepartmentValidationError::NameTooLong {
                max: DEPARTMENT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case-folded form used for uniqueness comparisons.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn same_name_as(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for DepartmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: DepartmentId,
    pub name: DepartmentName,
    pub audit: AuditStamp,
}

/// Department listed with the number of users assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentSummary {
    pub department: Department,
    pub user_count: u64,
}

/// Department with its member list, ordered by last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentDetails {
    pub department: Department,
    pub user_count: u64,
    pub members: Vec<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Sales", "sales")]
    #[case("SALES", "sales")]
    #[case("  Research & Development ", "research & development")]
    fn normalises_for_comparison(#[case] raw: &str, #[case] expected: &str) {
        let name = DepartmentName::new(raw).expect("valid name");
        assert_eq!(name.normalized(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank(#[case] raw: &str) {
        assert_eq!(
            DepartmentName::new(raw),
            Err(DepartmentValidationError::EmptyName)
        );
    }

    #[rstest]
    fn rejects_overlong() {
        let raw = "x".repeat(DEPARTMENT_NAME_MAX + 1);
        assert!(matches!(
            DepartmentName::new(raw),
            Err(DepartmentValidationError::NameTooLong { .. })
        ));
    }
}
