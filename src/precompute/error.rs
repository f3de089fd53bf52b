// Sat Jan 17 2026 - Alex

use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Postal code {0} has no centroid in the reference table")]
    UnknownPostalCode(String),
    #[error("Failed to store result: {0}")]
    Store(#[from] StoreError),
    #[error("Job panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum PrecomputeError {
    #[error("Result store error: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type PrecomputeResult<T> = Result<T, PrecomputeError>;
