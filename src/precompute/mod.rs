// Sat Jan 17 2026 - Alex

pub mod error;
pub mod job;
pub mod report;
pub mod scheduler;

pub use error::{JobError, PrecomputeError, PrecomputeResult};
pub use job::{JobOutcome, PostalCodeJob};
pub use report::RunReport;
pub use scheduler::{PrecomputeScheduler, ProgressCounter, RegenerateMode, WorkPlan};
