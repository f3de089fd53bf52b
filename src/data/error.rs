// Fri Jan 16 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Reference file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed reference data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Reference file {0} has no rows")]
    Empty(PathBuf),
}

pub type LoadResult<T> = Result<T, LoadError>;
