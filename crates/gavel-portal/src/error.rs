use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Browser(#[from] gavel_browser::Error),

    #[error(transparent)]
    Data(#[from] gavel_core::Error),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Malformed party field '{label}': no value line under the label")]
    PartyFieldValue { label: String },

    #[error("Case row {row} on results page {page} has no case number")]
    MissingCaseNumber { page: u32, row: usize },

    #[error("Results pager has a malformed page number: '{0}'")]
    Pager(String),
}

pub type Result<T> = std::result::Result<T, Error>;
