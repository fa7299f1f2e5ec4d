use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse config file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid date '{0}': expected MM/DD/YYYY")]
    InvalidDate(String),

    #[error("Date range is inverted: {from} is after {to}")]
    InvertedRange { from: String, to: String },

    #[error("Invalid division '{0}': expected 'JUDGE LABEL=Courtroom N'")]
    InvalidDivision(String),

    #[error("No divisions configured. Pass --division or list them in the config file.")]
    NoDivisions,

    #[error("Unrecognized party field label: '{0}'")]
    UnrecognizedField(String),

    #[error("Charge row has {cells} cells but the grid only declares {headers} headers")]
    ColumnMismatch { cells: usize, headers: usize },

    #[error("Case number is empty")]
    EmptyCaseNumber,

    #[error("{0}")]
    MissingCredentials(String),
}

pub type Result<T> = std::result::Result<T, Error>;
