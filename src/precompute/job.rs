// Sat Jan 17 2026 - Alex

use crate::data::{normalize_postal_code, ReferenceData};
use crate::geo::DistanceEstimator;
use crate::precompute::error::JobError;
use crate::store::{ResultRow, ResultStore};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Written { code: String, rows: usize },
    Skipped { code: String, reason: String },
    Failed { code: String, error: String },
}

impl JobOutcome {
    pub fn code(&self) -> &str {
        match self {
            JobOutcome::Written { code, .. }
            | JobOutcome::Skipped { code, .. }
            | JobOutcome::Failed { code, .. } => code,
        }
    }
}

/// Computes and stores the schools near one postal code. Shares nothing mutable with
/// other jobs except the estimator it is handed, which belongs to the calling worker.
/// The estimator's tolerance is the job's tolerance.
pub struct PostalCodeJob<'a> {
    data: &'a ReferenceData,
    store: &'a dyn ResultStore,
}

impl<'a> PostalCodeJob<'a> {
    pub fn new(data: &'a ReferenceData, store: &'a dyn ResultStore) -> Self {
        Self { data, store }
    }

    pub fn nearby_schools(&self, code: &str, estimator: &mut DistanceEstimator) -> Result<Vec<ResultRow>, JobError> {
        let centroid = self
            .data
            .postal_codes
            .centroid(code)
            .ok_or_else(|| JobError::UnknownPostalCode(normalize_postal_code(code)))?;
        let tolerance = estimator.tolerance();

        let rows = self
            .data
            .schools
            .iter()
            .filter(|school| {
                estimator
                    .distance_miles(
                        school.latitude,
                        school.longitude,
                        Some(centroid.latitude),
                        Some(centroid.longitude),
                    )
                    .within(tolerance)
            })
            .map(ResultRow::from)
            .collect();

        Ok(rows)
    }

    fn run(&self, code: &str, estimator: &mut DistanceEstimator) -> Result<usize, JobError> {
        let rows = self.nearby_schools(code, estimator)?;
        self.store.write(code, &rows)?;
        Ok(rows.len())
    }

    /// Never fails: errors and panics are logged with the postal code and folded into the outcome.
    pub fn process(&self, code: &str, estimator: &mut DistanceEstimator) -> JobOutcome {
        let code = normalize_postal_code(code);
        let tolerance = estimator.tolerance();

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run(&code, estimator)))
            .unwrap_or_else(|payload| Err(JobError::Panicked(panic_message(payload.as_ref()))));

        match result {
            Ok(rows) => {
                log::debug!("zipcode {}: {} schools within {} miles", code, rows, tolerance);
                JobOutcome::Written { code, rows }
            }
            Err(JobError::UnknownPostalCode(_)) => {
                log::warn!("zipcode {} cannot be processed: no centroid", code);
                JobOutcome::Skipped {
                    code,
                    reason: "no centroid".to_string(),
                }
            }
            Err(e) => {
                log::warn!("zipcode {} cannot be processed: {}", code, e);
                JobOutcome::Failed {
                    code,
                    error: e.to_string(),
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
