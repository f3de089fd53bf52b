// Tue Jan 15 2026 - Alex

pub mod config;
pub mod data;
pub mod geo;
pub mod lookup;
pub mod precompute;
pub mod store;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use data::ReferenceData;
pub use geo::DistanceEstimator;
pub use lookup::SchoolLookup;
pub use precompute::{PrecomputeScheduler, RegenerateMode, RunReport};
pub use store::{CsvResultStore, ResultStore};
