//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that implement the driving ports.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User, Department, Kudo — persisted aggregates.
//! - KudosDashboard — reporting projections.
//! - *Service — port implementations wired up by the server.

pub mod auth;
pub mod dashboard_service;
pub mod department;
pub mod department_service;
pub mod error;
pub mod ids;
pub mod kudo;
pub mod kudo_service;
pub mod ports;
pub mod reporting;
mod service_support;
pub mod temporary_password;
pub mod trace_id;
pub mod user;
pub mod user_account_service;
pub mod user_import;
pub mod user_import_service;

pub use self::auth::{
    Actor, LoginCredentials, LoginValidationError, PASSWORD_MAX, PASSWORD_MIN,
    PasswordValidationError, PlainPassword, Unauthorized, require_admin,
};
pub use self::dashboard_service::DashboardService;
pub use self::department::{
    DEPARTMENT_NAME_MAX, Department, DepartmentDetails, DepartmentName, DepartmentSummary,
    DepartmentValidationError,
};
pub use self::department_service::DepartmentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{DepartmentId, InvalidIdentifier, KudoId, MemeId, UploadId, UserId};
pub use self::kudo::{
    CreateKudoRequest, KUDO_MESSAGE_MAX, Kudo, KudoComposeOptions, KudoMessage,
    KudoValidationError, Meme, MemeRequest, MemeSpec, MemeTemplate, RecipientChoice,
};
pub use self::kudo_service::{KudoService, NEW_KUDO_SUBJECT};
pub use self::reporting::{
    ActivityFeedEntry, DEFAULT_RECENT_LIMIT, DEFAULT_TOP_N, DEFAULT_WINDOW_DAYS, DashboardQuery,
    DashboardQueryError, FeedParty, KudosDashboard, LeaderboardEntry, MonthlyKudoCount,
    month_label,
};
pub use self::service_support::NEW_USER_SUBJECT;
pub use self::temporary_password::{TEMPORARY_PASSWORD_LENGTH, generate_temporary_password};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AuditStamp, EmailAddress, PasswordHash, PersonName, User, UserListing, UserProfile, UserRole,
    UserStatus, UserValidationError,
};
pub use self::user_account_service::UserAccountService;
pub use self::user_import::{
    IMPORT_FIELD_COUNT, IMPORT_FILE_EXTENSION, ImportBatchError, ImportRow, ImportSummary,
    has_import_extension, parse_user_import,
};
pub use self::user_import_service::UserImportService;
