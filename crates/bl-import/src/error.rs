use thiserror::Error;

/// Why a batch was rejected.  Row numbers are 1-based lines of the input,
/// header included.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("row {row}: invalid {field}: {message}")]
    Field {
        row:     u64,
        field:   &'static str,
        message: String,
    },

    #[error("row {row}: missing data, expected {expected} columns but found {found}")]
    MissingColumns { row: u64, expected: usize, found: usize },

    #[error("row {row}: duplicate id {id}")]
    DuplicateId { row: u64, id: u32 },

    #[error("file is empty")]
    Empty,

    #[error("no {0} records found")]
    NoRecords(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ImportResult<T> = Result<T, ImportError>;
