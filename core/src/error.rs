use thiserror::Error;

#[derive(Error, Debug)]
pub enum BonusError {
    #[error("Missing required column '{column}' in {table} table")]
    MissingColumn { table: String, column: String },

    #[error("Workbook '{source_name}' contains no worksheet")]
    EmptyWorkbook { source_name: String },

    #[error("Employee '{name}' appears more than once in the roster")]
    DuplicateEmployee { name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BonusError {
    /// Stable category name, reported next to the message at the top level.
    pub fn category(&self) -> &'static str {
        match self {
            BonusError::MissingColumn { .. }     => "missing_column",
            BonusError::EmptyWorkbook { .. }     => "empty_workbook",
            BonusError::DuplicateEmployee { .. } => "duplicate_employee",
            BonusError::InvalidConfig(_)         => "invalid_config",
            BonusError::Spreadsheet(_)           => "spreadsheet",
            BonusError::Csv(_)                   => "csv",
            BonusError::Io(_)                    => "io",
            BonusError::Serialization(_)         => "serialization",
            BonusError::Other(_)                 => "internal",
        }
    }
}

pub type BonusResult<T> = Result<T, BonusError>;
