//! Directory-backed import staging.
//!
//! Each upload is stored as `<upload id>.csv` inside one capability-scoped
//! directory. `take` removes the file before returning its contents, so an
//! upload can be confirmed at most once.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};

use crate::domain::UploadId;
use crate::domain::ports::{ImportStaging, ImportStagingError};

pub struct DirectoryImportStaging {
    dir: Arc<Dir>,
    max_bytes: usize,
}

impl DirectoryImportStaging {
    /// Open (creating if needed) the staging directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportStagingError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Path, max_bytes: usize) -> Result<Self, ImportStagingError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(path, ambient_authority()))
            .map(|dir| Self {
                dir: Arc::new(dir),
                max_bytes,
            })
            .map_err(|error| ImportStagingError::io(format!("{}: {error}", path.display())))
    }
}

fn file_name(id: &UploadId) -> String {
    format!("{id}.csv")
}

fn io_error(error: impl ToString) -> ImportStagingError {
    ImportStagingError::io(error.to_string())
}

#[async_trait]
impl ImportStaging for DirectoryImportStaging {
    async fn stage(&self, contents: Vec<u8>) -> Result<UploadId, ImportStagingError> {
        if contents.len() > self.max_bytes {
            return Err(ImportStagingError::too_large(self.max_bytes));
        }
        let id = UploadId::random();
        let name = file_name(&id);
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || dir.write(name, contents))
            .await
            .map_err(io_error)?
            .map_err(io_error)?;
        Ok(id)
    }

    async fn take(&self, id: &UploadId) -> Result<Option<Vec<u8>>, ImportStagingError> {
        let name = file_name(id);
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || match dir.read(&name) {
            Ok(contents) => dir.remove_file(&name).map(|()| Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        })
        .await
        .map_err(io_error)?
        .map_err(io_error)
    }
}
