//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, notifier, meme service, hashing, staging) are
//! implemented under `outbound`. Driving ports are implemented by the domain
//! services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod department_administration;
mod department_repository;
mod import_staging;
mod kudo_report_repository;
mod kudo_repository;
mod kudos_command;
mod kudos_dashboard_query;
mod meme_template_source;
mod notifier;
mod password_hasher;
mod user_accounts;
mod user_import_command;
mod user_repository;

#[cfg(test)]
pub use department_administration::MockDepartmentAdministration;
pub use department_administration::DepartmentAdministration;
#[cfg(test)]
pub use department_repository::MockDepartmentRepository;
pub use department_repository::{DepartmentRepository, DepartmentRepositoryError};
#[cfg(test)]
pub use import_staging::MockImportStaging;
pub use import_staging::{ImportStaging, ImportStagingError};
#[cfg(test)]
pub use kudo_report_repository::MockKudoReportRepository;
pub use kudo_report_repository::{KudoReportRepository, KudoReportRepositoryError};
#[cfg(test)]
pub use kudo_repository::MockKudoRepository;
pub use kudo_repository::{KudoRepository, KudoRepositoryError};
#[cfg(test)]
pub use kudos_command::MockKudosCommand;
pub use kudos_command::KudosCommand;
#[cfg(test)]
pub use kudos_dashboard_query::MockKudosDashboardQuery;
pub use kudos_dashboard_query::KudosDashboardQuery;
#[cfg(test)]
pub use meme_template_source::MockMemeTemplateSource;
pub use meme_template_source::{MemeTemplateSource, MemeTemplateSourceError};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Notification, Notifier, NotifierError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{AddUserRequest, RegisterRequest, UserAccounts};
#[cfg(test)]
pub use user_import_command::MockUserImportCommand;
pub use user_import_command::UserImportCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
