//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types
//! re-validate every field and report failures as plain messages that each
//! repository wraps in its own query error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text, Timestamptz, Uuid as SqlUuid};
use uuid::Uuid;

use crate::domain::{
    AuditStamp, Department, DepartmentId, DepartmentName, EmailAddress, PasswordHash, PersonName,
    User, UserId, UserProfile, UserRole, UserStatus,
};

use super::schema::{departments, kudos, memes, users};

fn audit_from_columns(
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_by: Option<Uuid>,
) -> AuditStamp {
    AuditStamp {
        created_at,
        updated_at,
        created_by: created_by.map(UserId::from_uuid),
        updated_by: updated_by.map(UserId::from_uuid),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub department_id: Option<Uuid>,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        let email = EmailAddress::new(&self.email).map_err(|err| err.to_string())?;
        let first_name =
            PersonName::new(&self.first_name, "first_name").map_err(|err| err.to_string())?;
        let last_name =
            PersonName::new(&self.last_name, "last_name").map_err(|err| err.to_string())?;
        let role = self
            .role
            .parse::<UserRole>()
            .map_err(|err| err.to_string())?;
        let status = self
            .status
            .parse::<UserStatus>()
            .map_err(|err| err.to_string())?;
        Ok(User {
            id: UserId::from_uuid(self.id),
            department_id: self.department_id.map(DepartmentId::from_uuid),
            email,
            password_hash: PasswordHash::new(self.password_hash),
            first_name,
            last_name,
            role,
            status,
            audit: audit_from_columns(
                self.created_at,
                self.updated_at,
                self.created_by,
                self.updated_by,
            ),
        })
    }

    pub(crate) fn into_profile(self) -> Result<UserProfile, String> {
        self.into_user().map(|user| user.profile())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub department_id: Option<Uuid>,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            department_id: user.department_id.map(Uuid::from),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
            first_name: user.first_name.as_str(),
            last_name: user.last_name.as_str(),
            role: user.role.as_str(),
            status: user.status.as_str(),
            created_at: user.audit.created_at,
            updated_at: user.audit.updated_at,
            created_by: user.audit.created_by.map(Uuid::from),
            updated_by: user.audit.updated_by.map(Uuid::from),
        }
    }
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepartmentRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

impl DepartmentRow {
    pub(crate) fn into_department(self) -> Result<Department, String> {
        let name = DepartmentName::new(&self.name).map_err(|err| err.to_string())?;
        Ok(Department {
            id: DepartmentId::from_uuid(self.id),
            name,
            audit: audit_from_columns(
                self.created_at,
                self.updated_at,
                self.created_by,
                self.updated_by,
            ),
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = departments)]
pub(crate) struct NewDepartmentRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

impl<'a> From<&'a Department> for NewDepartmentRow<'a> {
    fn from(department: &'a Department) -> Self {
        Self {
            id: *department.id.as_uuid(),
            name: department.name.as_str(),
            created_at: department.audit.created_at,
            updated_at: department.audit.updated_at,
            created_by: department.audit.created_by.map(Uuid::from),
            updated_by: department.audit.updated_by.map(Uuid::from),
        }
    }
}

/// Changeset applied when a department is renamed.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = departments)]
pub(crate) struct DepartmentUpdate<'a> {
    pub name: &'a str,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Kudos and memes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = kudos)]
pub(crate) struct NewKudoRow<'a> {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub message: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = memes)]
pub(crate) struct NewMemeRow<'a> {
    pub id: Uuid,
    pub kudo_id: Uuid,
    pub template_id: &'a str,
    pub top_text: &'a str,
    pub bottom_text: &'a str,
    pub image_url: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Reporting rows (raw SQL)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct MonthlyCountRow {
    #[diesel(sql_type = Text)]
    pub month: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct LeaderboardRow {
    #[diesel(sql_type = SqlUuid)]
    pub user_id: Uuid,
    #[diesel(sql_type = Text)]
    pub first_name: String,
    #[diesel(sql_type = Text)]
    pub last_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub department_name: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub kudo_count: i64,
}

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ActivityRow {
    #[diesel(sql_type = SqlUuid)]
    pub kudo_id: Uuid,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Text)]
    pub message: String,
    #[diesel(sql_type = SqlUuid)]
    pub sender_id: Uuid,
    #[diesel(sql_type = Text)]
    pub sender_first_name: String,
    #[diesel(sql_type = Text)]
    pub sender_last_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub sender_department: Option<String>,
    #[diesel(sql_type = SqlUuid)]
    pub receiver_id: Uuid,
    #[diesel(sql_type = Text)]
    pub receiver_first_name: String,
    #[diesel(sql_type = Text)]
    pub receiver_last_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub receiver_department: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub meme_image_url: Option<String>,
}
