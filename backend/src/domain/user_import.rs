//! Bulk user import file format.
//!
//! An import file is CSV with a header record followed by one record per
//! account. Every record, header included, has exactly five fields:
//! first name, last name, email, department name, role.

use serde_json::json;

use super::{EmailAddress, Error, PersonName, UserRole};

/// Number of fields every import record must carry.
pub const IMPORT_FIELD_COUNT: usize = 5;

/// File extension accepted at upload time.
pub const IMPORT_FILE_EXTENSION: &str = "csv";

/// Reasons an import batch is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportBatchError {
    #[error("the import file is empty")]
    MissingHeader,
    #[error("line {line} could not be read: {message}")]
    Unreadable { line: u64, message: String },
    #[error("line {line} has {found} fields; expected {expected}")]
    WrongFieldCount {
        line: u64,
        found: usize,
        expected: usize,
    },
    #[error("line {line} is invalid: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[error("department not found: {name}")]
    UnknownDepartment { line: u64, name: String },
}

impl From<ImportBatchError> for Error {
    fn from(value: ImportBatchError) -> Self {
        let details = match &value {
            ImportBatchError::MissingHeader => json!({ "code": "malformed_batch" }),
            ImportBatchError::Unreadable { line, .. }
            | ImportBatchError::WrongFieldCount { line, .. }
            | ImportBatchError::InvalidRow { line, .. } => {
                json!({ "code": "malformed_batch", "line": line })
            }
            ImportBatchError::UnknownDepartment { line, name } => {
                json!({ "code": "malformed_batch", "line": line, "department": name })
            }
        };
        Error::invalid_request(value.to_string()).with_details(details)
    }
}

/// A validated data record from an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    /// Department name as written; resolved by exact match.
    pub department_name: String,
    pub role: UserRole,
}

/// Outcome of a committed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: Vec<EmailAddress>,
    pub skipped: Vec<EmailAddress>,
}

/// Check that an uploaded file name carries the CSV extension.
///
/// # Examples
/// ```
/// use kudotrio::domain::has_import_extension;
///
/// assert!(has_import_extension("people.CSV"));
/// assert!(!has_import_extension("people.xlsx"));
/// assert!(!has_import_extension("csv"));
/// ```
pub fn has_import_extension(filename: &str) -> bool {
    std::path::Path::new(filename.trim())
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(IMPORT_FILE_EXTENSION))
}

/// Parse and validate an import file.
///
/// Fails on the first structural or field error; no partial result is
/// returned.
pub fn parse_user_import(bytes: &[u8]) -> Result<Vec<ImportRow>, ImportBatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    let mut seen_header = false;
    for (index, result) in reader.records().enumerate() {
        let fallback_line = u64::try_from(index).unwrap_or(u64::MAX).saturating_add(1);
        let record = result.map_err(|err| ImportBatchError::Unreadable {
            line: err
                .position()
                .map_or(fallback_line, csv::Position::line),
            message: err.to_string(),
        })?;
        let line = record.position().map_or(fallback_line, csv::Position::line);
        if record.len() != IMPORT_FIELD_COUNT {
            return Err(ImportBatchError::WrongFieldCount {
                line,
                found: record.len(),
                expected: IMPORT_FIELD_COUNT,
            });
        }
        if !seen_header {
            seen_header = true;
            continue;
        }
        rows.push(parse_row(line, &record)?);
    }

    if !seen_header {
        return Err(ImportBatchError::MissingHeader);
    }
    Ok(rows)
}

fn parse_row(line: u64, record: &csv::StringRecord) -> Result<ImportRow, ImportBatchError> {
    let field = |position: usize| record.get(position).unwrap_or_default();
    let invalid = |reason: String| ImportBatchError::InvalidRow { line, reason };

    let first_name =
        PersonName::new(field(0), "first_name").map_err(|err| invalid(err.to_string()))?;
    let last_name =
        PersonName::new(field(1), "last_name").map_err(|err| invalid(err.to_string()))?;
    let email = EmailAddress::new(field(2)).map_err(|err| invalid(err.to_string()))?;
    let department_name = field(3).to_owned();
    if department_name.is_empty() {
        return Err(invalid("department name must not be empty".to_owned()));
    }
    let role = field(4)
        .parse::<UserRole>()
        .map_err(|err| invalid(err.to_string()))?;

    Ok(ImportRow {
        line,
        first_name,
        last_name,
        email,
        department_name,
        role,
    })
}
