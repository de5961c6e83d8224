use std::io;

use eventplanner_services::DaoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Dao(#[from] DaoError),
    #[error("Console I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Output encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Input ended; the session is over rather than failed.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, CliError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

pub type CliResult<T> = Result<T, CliError>;
