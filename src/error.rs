use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Line {line}: invalid {field} {value:?}: {reason}")]
    Parse {
        line: u64,
        field: String,
        value: String,
        reason: String,
    },

    #[error("No transactions found in either source")]
    EmptyInput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
