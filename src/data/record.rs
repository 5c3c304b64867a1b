//! Typed accident rows.

/// Longitudes above this value encode "missing".
pub const LONGITUDE_SENTINEL: f64 = 900.0;
/// Latitudes above this value encode "missing".
pub const LATITUDE_SENTINEL: f64 = 90.0;

/// The fields of one accident row that this crate inspects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccidentRecord {
    pub state: u8,
    pub month: u8,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl AccidentRecord {
    /// Copy of the record with sentinel coordinates replaced by `None`.
    pub fn sanitized(&self) -> Self {
        Self {
            longitude: self
                .longitude
                .filter(|v| v.is_finite() && *v <= LONGITUDE_SENTINEL),
            latitude: self
                .latitude
                .filter(|v| v.is_finite() && *v <= LATITUDE_SENTINEL),
            ..*self
        }
    }

    /// `(longitude, latitude)` when both survive sanitization.
    pub fn location(&self) -> Option<GeoPoint> {
        let clean = self.sanitized();
        Some(GeoPoint {
            longitude: clean.longitude?,
            latitude: clean.latitude?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// A row of the year-tagged projection used for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthYear {
    pub month: u8,
    pub year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(longitude: f64, latitude: f64) -> AccidentRecord {
        AccidentRecord {
            state: 1,
            month: 1,
            longitude: Some(longitude),
            latitude: Some(latitude),
        }
    }

    #[test]
    fn sentinels_become_missing() {
        let r = record(999.9999, 99.9999).sanitized();
        assert_eq!(r.longitude, None);
        assert_eq!(r.latitude, None);
        assert_eq!(record(999.9999, 33.5).location(), None);
        assert_eq!(record(-86.6, 99.9999).location(), None);
    }

    #[test]
    fn valid_coordinates_survive() {
        let p = record(-86.6, 33.5).location().expect("valid point");
        assert_eq!(p.longitude, -86.6);
        assert_eq!(p.latitude, 33.5);
        // boundary values are not sentinels
        assert!(record(900.0, 90.0).location().is_some());
    }
}
