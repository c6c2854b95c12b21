//! Driving port for the two-phase bulk user import.
use async_trait::async_trait;

use crate::domain::{Actor, Error, ImportSummary, UploadId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserImportCommand: Send + Sync {
    /// Stage a CSV upload without parsing it.
    async fn upload(
        &self,
        actor: &Actor,
        filename: &str,
        contents: Vec<u8>,
    ) -> Result<UploadId, Error>;

    /// Parse, validate and commit a staged upload as one batch.
    ///
    /// The staged file is discarded whether or not the batch succeeds.
    async fn confirm(&self, actor: &Actor, upload_id: &UploadId) -> Result<ImportSummary, Error>;
}
