// Sat Jan 17 2026 - Alex

pub mod csv_store;
pub mod error;

pub use csv_store::CsvResultStore;
pub use error::{StoreError, StoreResult};

use crate::data::School;
use serde::{Deserialize, Serialize};

/// One line of a per-postal-code result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub identifier: String,
    #[serde(rename = "School")]
    pub school: String,
    pub url: String,
    pub overall_rating: Option<f64>,
    #[serde(rename = "Zipcode")]
    pub zipcode: String,
}

impl From<&School> for ResultRow {
    fn from(school: &School) -> Self {
        Self {
            identifier: school.id.clone(),
            school: school.name.clone(),
            url: school.url.clone(),
            overall_rating: school.rating,
            zipcode: school.postal_code.clone(),
        }
    }
}

/// Completed postal codes. A code counts as computed once `exists` reports it.
pub trait ResultStore: Send + Sync {
    fn exists(&self, code: &str) -> bool;

    fn write(&self, code: &str, rows: &[ResultRow]) -> StoreResult<()>;

    fn read(&self, code: &str) -> StoreResult<Vec<ResultRow>>;

    /// Whether the store has been set up at all. An uninitialized store forces a full run.
    fn is_initialized(&self) -> bool;

    /// Throws away every stored result and leaves an empty, initialized store.
    fn reset(&self) -> StoreResult<()>;
}
