//! Two-phase bulk user import.
//!
//! `upload` stages raw bytes and returns a handle; nothing is parsed. On
//! `confirm` the staged file is taken (and so discarded), validated as a
//! whole, and every new account is written in a single batch. A row whose
//! email already exists, or repeats an earlier row, is skipped rather than
//! rejected so the same file can be re-imported safely.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    DepartmentRepository, ImportStaging, Notifier, PasswordHasher, UserImportCommand,
    UserRepository,
};
use crate::domain::service_support::{
    map_department_repository_error, map_hasher_error, map_staging_error,
    map_user_repository_error, new_user_notification, notify_best_effort, validation_error,
};
use crate::domain::{
    Actor, AuditStamp, DepartmentId, EmailAddress, Error, IMPORT_FILE_EXTENSION, ImportBatchError,
    ImportRow, ImportSummary, UploadId, User, UserId, UserStatus, generate_temporary_password,
    has_import_extension, parse_user_import, require_admin,
};

#[derive(Clone)]
pub struct UserImportService<S, U, D, H, N> {
    staging: Arc<S>,
    users: Arc<U>,
    departments: Arc<D>,
    hasher: Arc<H>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<S, U, D, H, N> UserImportService<S, U, D, H, N> {
    pub fn new(
        staging: Arc<S>,
        users: Arc<U>,
        departments: Arc<D>,
        hasher: Arc<H>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            staging,
            users,
            departments,
            hasher,
            notifier,
            clock,
        }
    }
}

/// An account ready to be written, with the password its owner will receive.
struct QueuedAccount {
    user: User,
    temporary_password: zeroize::Zeroizing<String>,
}

impl<S, U, D, H, N> UserImportService<S, U, D, H, N>
where
    S: ImportStaging,
    U: UserRepository,
    D: DepartmentRepository,
    H: PasswordHasher,
    N: Notifier,
{
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, Error> {
        self.users
            .find_by_email(email)
            .await
            .map(|found| found.is_some())
            .map_err(map_user_repository_error)
    }

    async fn resolve_department(
        &self,
        cache: &mut HashMap<String, DepartmentId>,
        row: &ImportRow,
    ) -> Result<DepartmentId, Error> {
        if let Some(id) = cache.get(&row.department_name) {
            return Ok(*id);
        }
        let department = self
            .departments
            .find_by_exact_name(&row.department_name)
            .await
            .map_err(map_department_repository_error)?
            .ok_or_else(|| ImportBatchError::UnknownDepartment {
                line: row.line,
                name: row.department_name.clone(),
            })?;
        cache.insert(row.department_name.clone(), department.id);
        Ok(department.id)
    }

    async fn queue(
        &self,
        row: ImportRow,
        department_id: DepartmentId,
        actor: &Actor,
    ) -> Result<QueuedAccount, Error> {
        let temporary_password = generate_temporary_password(&mut rand::thread_rng());
        let password_hash = self
            .hasher
            .hash(temporary_password.as_str())
            .await
            .map_err(map_hasher_error)?;
        let user = User {
            id: UserId::random(),
            department_id: Some(department_id),
            email: row.email,
            password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role,
            status: UserStatus::Active,
            audit: AuditStamp::created(self.clock.utc(), Some(actor.user_id)),
        };
        Ok(QueuedAccount {
            user,
            temporary_password,
        })
    }
}

#[async_trait]
impl<S, U, D, H, N> UserImportCommand for UserImportService<S, U, D, H, N>
where
    S: ImportStaging,
    U: UserRepository,
    D: DepartmentRepository,
    H: PasswordHasher,
    N: Notifier,
{
    async fn upload(
        &self,
        actor: &Actor,
        filename: &str,
        contents: Vec<u8>,
    ) -> Result<UploadId, Error> {
        require_admin(actor)?;
        if !has_import_extension(filename) {
            return Err(validation_error(
                "filename",
                "invalid_extension",
                format!("only .{IMPORT_FILE_EXTENSION} files can be imported"),
            ));
        }
        let size = contents.len();
        let upload_id = self
            .staging
            .stage(contents)
            .await
            .map_err(map_staging_error)?;
        info!(%upload_id, size, "user import staged");
        Ok(upload_id)
    }

    async fn confirm(&self, actor: &Actor, upload_id: &UploadId) -> Result<ImportSummary, Error> {
        require_admin(actor)?;
        let contents = self
            .staging
            .take(upload_id)
            .await
            .map_err(map_staging_error)?
            .ok_or_else(|| Error::not_found(format!("upload {upload_id} not found")))?;
        let rows = parse_user_import(&contents)?;

        let mut summary = ImportSummary::default();
        let mut seen = HashSet::new();
        let mut departments = HashMap::new();
        let mut queued = Vec::new();
        for row in rows {
            if !seen.insert(row.email.clone()) || self.email_exists(&row.email).await? {
                summary.skipped.push(row.email);
                continue;
            }
            let department_id = self.resolve_department(&mut departments, &row).await?;
            queued.push(self.queue(row, department_id, actor).await?);
        }

        let users: Vec<User> = queued.iter().map(|account| account.user.clone()).collect();
        if !users.is_empty() {
            self.users
                .insert_batch(&users)
                .await
                .map_err(map_user_repository_error)?;
        }
        info!(
            %upload_id,
            created = users.len(),
            skipped = summary.skipped.len(),
            "user import committed"
        );

        for account in queued {
            notify_best_effort(
                self.notifier.as_ref(),
                new_user_notification(&account.user, account.temporary_password.as_str()),
            )
            .await;
            summary.created.push(account.user.email);
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "user_import_service_tests.rs"]
mod tests;
