use smrfdesign::core::catalog::CatalogError;
use smrfdesign::engine::error::DesignError;
use smrfdesign::model::frame::FrameError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Design(#[from] DesignError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Configuration error in '{path}': {message}", path = path.display())]
    Config { path: PathBuf, message: String },

    #[error("Failed to write report '{path}': {source}", path = path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
