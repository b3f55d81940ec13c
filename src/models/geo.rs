use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mean earth radius used by the haversine kernel, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Smallest span (in degrees) a bounding box is allowed to have on either axis.
pub const MIN_SPAN_DEG: f64 = 1e-9;

/// Approximate meters per degree of latitude.
pub(crate) const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance(self, other)
    }
}

/// Haversine distance between two points on a sphere of radius [`EARTH_RADIUS_M`], in meters.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1.0 for antipodal points
    2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Distance from `point` to the closest of `others`, or `None` when `others` is empty.
pub(crate) fn nearest_distance(point: &GeoPoint, others: &[GeoPoint]) -> Option<f64> {
    others
        .iter()
        .map(|other| distance(point, other))
        .min_by(|a, b| a.total_cmp(b))
}

/// Arithmetic mean of the coordinates, or `None` for an empty slice.
pub(crate) fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (lat, lon) = points.iter().fold((0.0, 0.0), |(lat, lon), p| {
        (lat + p.latitude, lon + p.longitude)
    });

    Some(GeoPoint::new(lat / n, lon / n))
}

/// Anything that can be reduced to a [`GeoPoint`].
///
/// Caller-side camera records are converted once, at the boundary of the crate;
/// everything past that point only handles `GeoPoint`.
pub trait Located {
    fn location(&self) -> GeoPoint;
}

impl Located for GeoPoint {
    fn location(&self) -> GeoPoint {
        *self
    }
}

impl Located for (f64, f64) {
    fn location(&self) -> GeoPoint {
        GeoPoint::new(self.0, self.1)
    }
}

impl Located for [f64; 2] {
    fn location(&self) -> GeoPoint {
        GeoPoint::new(self[0], self[1])
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn location(&self) -> GeoPoint {
        (**self).location()
    }
}

/// A stored camera as the surrounding service describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    #[serde(alias = "latitud")]
    pub latitude: f64,
    #[serde(alias = "longitud")]
    pub longitude: f64,
}

impl Located for CameraRecord {
    fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Converts caller records into canonical points.
pub fn normalize<L: Located>(records: &[L]) -> Vec<GeoPoint> {
    records.iter().map(Located::location).collect()
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Tight box around `points`, or `None` when there are no points.
    #[instrument(level = "debug", skip(points), fields(points = points.len()))]
    pub fn around(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };

        Some(points.iter().skip(1).fold(init, |b, p| Self {
            min_lat: b.min_lat.min(p.latitude),
            max_lat: b.max_lat.max(p.latitude),
            min_lon: b.min_lon.min(p.longitude),
            max_lon: b.max_lon.max(p.longitude),
        }))
    }

    /// Latitude span, floored at [`MIN_SPAN_DEG`].
    pub fn lat_span(&self) -> f64 {
        (self.max_lat - self.min_lat).max(MIN_SPAN_DEG)
    }

    /// Longitude span, floored at [`MIN_SPAN_DEG`].
    pub fn lon_span(&self) -> f64 {
        (self.max_lon - self.min_lon).max(MIN_SPAN_DEG)
    }

    pub fn mid_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }

    /// Grows every edge outwards by `fraction` of the (floored) span on that axis.
    pub fn expand(&self, fraction: f64) -> Self {
        let lat_margin = self.lat_span() * fraction;
        let lon_margin = self.lon_span() * fraction;

        Self {
            min_lat: self.min_lat - lat_margin,
            max_lat: self.max_lat + lat_margin,
            min_lon: self.min_lon - lon_margin,
            max_lon: self.max_lon + lon_margin,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lon..=self.max_lon).contains(&point.longitude)
    }

    /// True when `point` lies within `fraction` of the span from any edge.
    pub fn near_edge(&self, point: &GeoPoint, fraction: f64) -> bool {
        let lat_band = self.lat_span() * fraction;
        let lon_band = self.lon_span() * fraction;

        point.latitude < self.min_lat + lat_band
            || point.latitude > self.max_lat - lat_band
            || point.longitude < self.min_lon + lon_band
            || point.longitude > self.max_lon - lon_band
    }

    pub fn clamp(&self, point: GeoPoint) -> GeoPoint {
        GeoPoint::new(
            point.latitude.clamp(self.min_lat, self.max_lat),
            point.longitude.clamp(self.min_lon, self.max_lon),
        )
    }

    /// Uniformly random point inside the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> GeoPoint {
        GeoPoint::new(
            rng.random_range(self.min_lat..=self.max_lat),
            rng.random_range(self.min_lon..=self.max_lon),
        )
    }
}
