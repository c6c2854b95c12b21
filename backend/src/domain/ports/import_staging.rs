//! Temporary storage for uploaded import files between upload and confirm.
use async_trait::async_trait;

use crate::domain::UploadId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by staging adapters.
    pub enum ImportStagingError {
        /// The staging area could not be read or written.
        Io { message: String } => "import staging failed: {message}",
        /// The upload exceeds the configured size limit.
        TooLarge { limit: usize } => "upload exceeds {limit} bytes",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImportStaging: Send + Sync {
    /// Store an upload and return its identifier.
    async fn stage(&self, contents: Vec<u8>) -> Result<UploadId, ImportStagingError>;

    /// Remove a staged upload and return its contents, if it exists.
    async fn take(&self, id: &UploadId) -> Result<Option<Vec<u8>>, ImportStagingError>;
}
