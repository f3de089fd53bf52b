// Fri Jan 16 2026 - Alex

pub mod cache;
pub mod distance;

pub use cache::{CacheStats, DistanceCache};
pub use distance::{haversine_miles, BoundingBox, Distance, DistanceEstimator};

pub const DEFAULT_TOLERANCE_MILES: f64 = 30.0;
