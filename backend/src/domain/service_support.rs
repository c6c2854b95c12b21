//! Error translation and notification helpers shared by domain services.

use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    DepartmentRepositoryError, ImportStagingError, KudoReportRepositoryError, KudoRepositoryError,
    Notification, Notifier, PasswordHasherError, UserRepositoryError,
};
use crate::domain::{Error, User};

/// Subject line of the account-created notification.
pub const NEW_USER_SUBJECT: &str = "KudoTrio - New User";

/// Input validation failure tied to one request field.
pub(crate) fn validation_error(
    field: &'static str,
    code: &'static str,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn duplicate_name_error(name: &str) -> Error {
    Error::conflict(format!("a department named {name} already exists")).with_details(json!({
        "field": "name",
        "code": "duplicate_name",
    }))
}

pub(crate) fn duplicate_email_error(email: &str) -> Error {
    Error::conflict(format!("an account for {email} already exists")).with_details(json!({
        "field": "email",
        "code": "duplicate_email",
    }))
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => duplicate_email_error(&email),
    }
}

pub(crate) fn map_department_repository_error(error: DepartmentRepositoryError) -> Error {
    match error {
        DepartmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("department repository unavailable: {message}"))
        }
        DepartmentRepositoryError::Query { message } => {
            Error::internal(format!("department repository error: {message}"))
        }
        DepartmentRepositoryError::DuplicateName { name } => duplicate_name_error(&name),
        DepartmentRepositoryError::NotFound { id } => {
            Error::not_found(format!("department {id} not found"))
        }
    }
}

pub(crate) fn map_kudo_repository_error(error: KudoRepositoryError) -> Error {
    match error {
        KudoRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("kudo repository unavailable: {message}"))
        }
        KudoRepositoryError::Query { message } => {
            Error::internal(format!("kudo repository error: {message}"))
        }
    }
}

pub(crate) fn map_report_error(error: KudoReportRepositoryError) -> Error {
    match error {
        KudoReportRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reporting unavailable: {message}"))
        }
        KudoReportRepositoryError::Query { message } => {
            Error::internal(format!("reporting query failed: {message}"))
        }
    }
}

pub(crate) fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn map_staging_error(error: ImportStagingError) -> Error {
    match error {
        ImportStagingError::Io { message } => {
            Error::internal(format!("import staging failed: {message}"))
        }
        ImportStagingError::TooLarge { limit } => {
            Error::invalid_request(format!("upload exceeds {limit} bytes")).with_details(json!({
                "field": "file",
                "code": "file_too_large",
                "limit": limit,
            }))
        }
    }
}

/// Tell a freshly created user their temporary password.
pub(crate) fn new_user_notification(user: &User, temporary_password: &str) -> Notification {
    Notification {
        recipient: user.email.clone(),
        subject: NEW_USER_SUBJECT.to_owned(),
        body: format!(
            "Hi {},\n\nAn account has been created for you.\n\n\
             Email: {}\nTemporary password: {}\n\n\
             Please change it after your first login.\n",
            user.first_name, user.email, temporary_password,
        ),
    }
}

/// Send a notification, logging instead of failing when delivery breaks.
pub(crate) async fn notify_best_effort<N>(notifier: &N, notification: Notification)
where
    N: Notifier + ?Sized,
{
    if let Err(error) = notifier.send(&notification).await {
        warn!(
            %error,
            recipient = %notification.recipient,
            subject = %notification.subject,
            "notification not delivered"
        );
    }
}
