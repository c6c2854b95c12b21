//! Import staging adapters.
//!
//! Uploaded CSV files wait here between the upload and confirm phases.

mod directory;

pub use directory::DirectoryImportStaging;
