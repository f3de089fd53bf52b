// Fri Jan 16 2026 - Alex

pub mod error;
pub mod loader;
pub mod postal;
pub mod school;

pub use error::{LoadError, LoadResult};
pub use loader::{ReferenceData, ReferencePaths};
pub use postal::{normalize_postal_code, PostalCode, PostalCodeTable};
pub use school::{normalize_identifier, School, SchoolDataset};
