use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DbfError {
    #[error("Format error: {0}")]
    FormatError(String),
    #[error("Cannot decode field '{field}' from {raw:?}: {reason}")]
    FieldDecodeError {
        field: String,
        raw: Vec<u8>,
        reason: String,
    },
    #[error("Cannot encode field '{field}': {reason}")]
    FieldEncodeError { field: String, reason: String },
    #[error("Wrong number of values: expected {expected}, got {got}")]
    ArityError { expected: usize, got: usize },
    #[error("Record index {index} out of range (table has {count} records)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Unsupported comparison: {0}")]
    UnsupportedComparison(String),
    #[error("File already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid schema: {0}")]
    SchemaError(String),
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl DbfError {
    pub(crate) fn encode(field: &str, reason: impl Into<String>) -> Self {
        DbfError::FieldEncodeError {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(field: &str, raw: &[u8], reason: impl Into<String>) -> Self {
        DbfError::FieldDecodeError {
            field: field.to_string(),
            raw: raw.to_vec(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for DbfError {
    fn from(err: std::io::Error) -> Self {
        DbfError::IoError(err.to_string())
    }
}

impl From<tempfile::PersistError> for DbfError {
    fn from(err: tempfile::PersistError) -> Self {
        DbfError::IoError(err.error.to_string())
    }
}
