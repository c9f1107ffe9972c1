//! Geographic positions and region extents.

use crate::error::GeoError;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub long: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub const fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    /// Check that the point can be handed to an engine.
    ///
    /// Fails with [`GeoError::NonFinite`] if either coordinate is NaN or
    /// infinite.
    pub fn validate(&self) -> Result<(), GeoError> {
        finite("lat", self.lat)?;
        finite("long", self.long)
    }

    /// This point shifted by `d_lat` and `d_long` degrees.
    pub fn offset(self, d_lat: f64, d_long: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            long: self.long + d_long,
        }
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    ///
    /// ```
    /// use townplan_core::GeoPoint;
    ///
    /// let a = GeoPoint::new(0.0, 0.0);
    /// let b = GeoPoint::new(0.0, 1.0);
    /// let d = a.distance_km(b);
    /// assert!((d - 111.19).abs() < 0.01);
    /// ```
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_long = (other.long - self.long).to_radians();
        let h = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_long / 2.0).sin().powi(2);
        // clamp keeps NaN, unlike min.
        2.0 * EARTH_RADIUS_KM * h.sqrt().clamp(0.0, 1.0).asin()
    }
}

/// Width and length of a rectangular region, in the same units as
/// [`GeoPoint`] offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Extent along longitude.
    pub width: f64,
    /// Extent along latitude.
    pub length: f64,
}

impl Extent {
    /// Create an extent.
    pub const fn new(width: f64, length: f64) -> Self {
        Self { width, length }
    }

    /// Both sides finite and non-negative.
    pub fn validate(&self) -> Result<(), GeoError> {
        for (what, value) in [("width", self.width), ("length", self.length)] {
            finite(what, value)?;
            if value < 0.0 {
                return Err(GeoError::NegativeExtent { what, value });
            }
        }
        Ok(())
    }
}

/// Position and extent of a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Anchor position of the region.
    pub position: GeoPoint,
    /// Size of the region.
    pub extent: Extent,
}

impl Bounds {
    /// Create bounds from an anchor and an extent.
    pub const fn new(position: GeoPoint, extent: Extent) -> Self {
        Self { position, extent }
    }

    /// Validate the position and the extent.
    pub fn validate(&self) -> Result<(), GeoError> {
        self.position.validate()?;
        self.extent.validate()
    }
}

fn finite(what: &'static str, value: f64) -> Result<(), GeoError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GeoError::NonFinite { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(39.29, -76.61);
        assert_eq!(p.distance_km(p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(39.29, -76.61);
        let b = GeoPoint::new(38.98, -76.49);
        assert!((a.distance_km(b) - b.distance_km(a)).abs() < 1e-9);
    }

    #[test]
    fn antipodal_distance_is_half_circumference() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((a.distance_km(b) - half).abs() < 1e-6);
    }

    #[test]
    fn nan_distance_is_not_masked() {
        let a = GeoPoint::new(f64::NAN, 0.0);
        assert!(a.distance_km(GeoPoint::new(0.0, 0.0)).is_nan());
    }

    #[test]
    fn bounds_validation() {
        let ok = Bounds::new(GeoPoint::new(1.0, 2.0), Extent::new(0.0, 3.0));
        assert_eq!(ok.validate(), Ok(()));
        assert_eq!(Bounds::default().validate(), Ok(()));

        let nan = Bounds::new(GeoPoint::new(f64::NAN, 0.0), Extent::new(1.0, 1.0));
        assert!(matches!(
            nan.validate(),
            Err(GeoError::NonFinite { what: "lat", .. })
        ));

        let inf = Bounds::new(GeoPoint::default(), Extent::new(f64::INFINITY, 1.0));
        assert!(matches!(
            inf.validate(),
            Err(GeoError::NonFinite { what: "width", .. })
        ));

        let negative = Bounds::new(GeoPoint::default(), Extent::new(1.0, -5.0));
        assert_eq!(
            negative.validate(),
            Err(GeoError::NegativeExtent {
                what: "length",
                value: -5.0,
            })
        );
    }

    #[test]
    fn offset_adds_degrees() {
        let p = GeoPoint::new(1.0, 2.0).offset(0.5, -1.0);
        assert_eq!(p, GeoPoint::new(1.5, 1.0));
    }
}
