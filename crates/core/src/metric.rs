/// Mean Earth radius in meters, matching the value common OSM tooling uses.
const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// Straight-line distance between two coordinate pairs, in meters.
///
/// Injected into the search so the engine never assumes a coordinate
/// system: graphs with projected planar coordinates use [`Planar`], graphs
/// with raw lon/lat degrees use [`GreatCircle`].
pub trait DistanceMetric: Send + Sync {
    fn distance_m(&self, a: (f64, f64), b: (f64, f64)) -> f64;
}

/// Euclidean distance over projected coordinates already in meters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planar;

impl DistanceMetric for Planar {
    fn distance_m(&self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let dx = a.0 - b.0;
        let dy = a.1 - b.1;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Haversine great-circle distance over `(lon, lat)` pairs in degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl DistanceMetric for GreatCircle {
    fn distance_m(&self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let (lon1, lat1) = a;
        let (lon2, lat2) = b;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let dlat = (lat2 - lat1).to_radians();
        let dlon = (lon2 - lon1).to_radians();

        let h = (dlat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * h.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}
