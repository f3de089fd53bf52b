// Fri Jan 16 2026 - Alex

use crate::geo::cache::{CacheStats, DistanceCache, PairKey};

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Lower bound on miles per degree of latitude. The true figure is about 69.
const MILES_PER_DEGREE_LAT: f64 = 65.0;

/// Lower bound on miles per degree of longitude, valid up to roughly 39.7 degrees of latitude.
const MILES_PER_DEGREE_LON: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    Miles(f64),
    /// Rejected by the bounding box; further than the tolerance.
    OutOfRange,
    /// At least one coordinate is missing.
    Unknown,
}

impl Distance {
    pub fn miles(&self) -> Option<f64> {
        match self {
            Distance::Miles(m) => Some(*m),
            _ => None,
        }
    }

    pub fn within(&self, tolerance: f64) -> bool {
        matches!(self, Distance::Miles(m) if *m <= tolerance)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    tolerance: f64,
    lat_window: f64,
    lon_window: f64,
}

impl BoundingBox {
    pub fn for_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            lat_window: tolerance / MILES_PER_DEGREE_LAT,
            lon_window: tolerance / MILES_PER_DEGREE_LON,
        }
    }

    pub fn lat_window(&self) -> f64 {
        self.lat_window
    }

    /// Longitude window for a pair whose furthest-from-equator endpoint sits at `max_abs_lat`.
    /// A degree of longitude shrinks with cos(lat), so the fixed window widens once it
    /// would start cutting into the tolerance.
    pub fn lon_window(&self, max_abs_lat: f64) -> f64 {
        let cos = max_abs_lat.min(90.0).to_radians().cos();
        if cos <= f64::EPSILON {
            return f64::INFINITY;
        }

        let scaled = self.tolerance / (MILES_PER_DEGREE_LAT * cos);
        if scaled >= 90.0 {
            return f64::INFINITY;
        }

        self.lon_window.max(scaled)
    }

    pub fn rejects(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> bool {
        if (lat1 - lat2).abs() >= self.lat_window {
            return true;
        }

        let mut dlon = (lon1 - lon2).abs() % 360.0;
        if dlon > 180.0 {
            dlon = 360.0 - dlon;
        }

        dlon >= self.lon_window(lat1.abs().max(lat2.abs()))
    }
}

pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = ((dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Great-circle distances with a bounding-box pre-filter and a memo of computed pairs.
/// One estimator belongs to one worker for the length of a run.
pub struct DistanceEstimator {
    bounds: BoundingBox,
    cache: DistanceCache,
}

impl DistanceEstimator {
    pub fn new(tolerance: f64) -> Self {
        Self {
            bounds: BoundingBox::for_tolerance(tolerance),
            cache: DistanceCache::new(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.bounds.tolerance
    }

    pub fn distance_miles(
        &mut self,
        lat1: Option<f64>,
        lon1: Option<f64>,
        lat2: Option<f64>,
        lon2: Option<f64>,
    ) -> Distance {
        let (lat1, lon1, lat2, lon2) = match (lat1, lon1, lat2, lon2) {
            (Some(a), Some(b), Some(c), Some(d))
                if a.is_finite() && b.is_finite() && c.is_finite() && d.is_finite() =>
            {
                (a, b, c, d)
            }
            _ => return Distance::Unknown,
        };

        if self.bounds.rejects(lat1, lon1, lat2, lon2) {
            return Distance::OutOfRange;
        }

        let key = PairKey::new(lat1, lon1, lat2, lon2);
        if let Some(miles) = self.cache.get(&key) {
            return Distance::Miles(miles);
        }

        let miles = haversine_miles(lat1, lon1, lat2, lon2);
        self.cache.insert(key, miles);
        Distance::Miles(miles)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn release(&mut self) -> usize {
        self.cache.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MILES_PER_DEGREE: f64 = EARTH_RADIUS_MILES * std::f64::consts::PI / 180.0;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let miles = haversine_miles(40.0, -73.0, 41.0, -73.0);
        assert!(approx_eq(miles, MILES_PER_DEGREE, 1e-6));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let mut estimator = DistanceEstimator::new(30.0);
        let points = [
            (40.8, -73.0, 40.9, -73.2),
            (34.05, -118.24, 34.10, -118.01),
            (61.2, -149.9, 61.4, -149.3),
            (25.76, -80.19, 25.77, -80.19),
        ];

        for (lat1, lon1, lat2, lon2) in points {
            let forward = DistanceEstimator::new(30.0)
                .distance_miles(Some(lat1), Some(lon1), Some(lat2), Some(lon2));
            let backward = estimator.distance_miles(Some(lat2), Some(lon2), Some(lat1), Some(lon1));
            match (forward, backward) {
                (Distance::Miles(a), Distance::Miles(b)) => assert!(approx_eq(a, b, 1e-9)),
                (a, b) => assert_eq!(a, b),
            }

            // served from the cache under the swapped ordering
            let cached = estimator.distance_miles(Some(lat1), Some(lon1), Some(lat2), Some(lon2));
            assert_eq!(backward, cached);
        }
    }

    #[test]
    fn test_missing_coordinate_is_unknown() {
        let mut estimator = DistanceEstimator::new(30.0);

        assert_eq!(estimator.distance_miles(None, Some(-73.0), Some(40.8), Some(-73.0)), Distance::Unknown);
        assert_eq!(estimator.distance_miles(Some(40.8), Some(-73.0), Some(40.8), None), Distance::Unknown);
        assert_eq!(
            estimator.distance_miles(Some(f64::NAN), Some(-73.0), Some(40.8), Some(-73.0)),
            Distance::Unknown
        );
        assert!(!Distance::Unknown.within(30.0));
        assert_eq!(estimator.cache_stats().entries, 0);
    }

    #[test]
    fn test_far_pairs_are_rejected_without_caching() {
        let mut estimator = DistanceEstimator::new(30.0);

        let north = estimator.distance_miles(Some(40.8), Some(-73.0), Some(41.8), Some(-73.0));
        let west = estimator.distance_miles(Some(30.0), Some(-90.0), Some(30.0), Some(-91.0));

        assert_eq!(north, Distance::OutOfRange);
        assert_eq!(west, Distance::OutOfRange);
        assert!(!north.within(30.0));
        assert_eq!(estimator.cache_stats().entries, 0);
    }

    #[test]
    fn test_bounding_box_never_rejects_in_tolerance_pairs() {
        let tolerance = 30.0;
        let bounds = BoundingBox::for_tolerance(tolerance);

        for base_lat in [0.0, 25.0, 33.0, 40.8, 47.5, 61.2, 64.8, 71.3, -45.0] {
            for bearing in 0..72 {
                let theta = (bearing as f64 * 5.0).to_radians();
                // walk just inside the tolerance along a bearing
                let reach = 29.9 / MILES_PER_DEGREE;
                let lat2 = base_lat + reach * theta.cos();
                let lon2 = -150.0 + reach * theta.sin() / base_lat.to_radians().cos();

                let miles = haversine_miles(base_lat, -150.0, lat2, lon2);
                if miles <= tolerance {
                    assert!(
                        !bounds.rejects(base_lat, -150.0, lat2, lon2),
                        "rejected {:.3} mi pair at lat {} bearing {}",
                        miles,
                        base_lat,
                        bearing * 5
                    );
                }
            }
        }
    }

    #[test]
    fn test_bounding_box_matches_fixed_divisors_in_the_south() {
        let bounds = BoundingBox::for_tolerance(30.0);
        assert!(approx_eq(bounds.lat_window(), 30.0 / 65.0, 1e-12));
        assert!(approx_eq(bounds.lon_window(33.0), 30.0 / 50.0, 1e-12));
        assert!(bounds.lon_window(61.0) > 30.0 / 50.0);
        assert_eq!(bounds.lon_window(90.0), f64::INFINITY);
    }

    #[test]
    fn test_bounding_box_wraps_antimeridian() {
        let bounds = BoundingBox::for_tolerance(30.0);
        assert!(!bounds.rejects(52.0, 179.9, 52.0, -179.9));
        assert!(haversine_miles(52.0, 179.9, 52.0, -179.9) < 30.0);
    }

    #[test]
    fn test_release_empties_cache() {
        let mut estimator = DistanceEstimator::new(30.0);
        estimator.distance_miles(Some(40.8), Some(-73.0), Some(40.85), Some(-73.0));
        estimator.distance_miles(Some(40.8), Some(-73.0), Some(40.9), Some(-73.1));

        assert_eq!(estimator.release(), 2);
        assert_eq!(estimator.cache_stats().entries, 0);
    }
}
