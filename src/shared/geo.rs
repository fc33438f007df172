use std::fmt::Display;

const EARTH_RADIUS: f64 = 6_371_000.0;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Point {
            latitude: value.0,
            longitude: value.1,
        }
    }
}

impl Point {
    /// Great-circle distance to `other` in metres.
    pub fn distance(&self, other: &Self) -> f64 {
        let dist_lat = (other.latitude - self.latitude).to_radians();
        let dist_lon = (other.longitude - self.longitude).to_radians();
        let a = (dist_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (dist_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS * c
    }
}

#[test]
fn distance_test() {
    let paris = Point {
        latitude: 48.858_01,
        longitude: 2.351_435,
    };
    let london = Point {
        latitude: 51.505_238,
        longitude: -0.124_954,
    };
    let d = paris.distance(&london);
    assert!((d / 1000.0 - 343.0).abs() < 2.0);
}

#[test]
fn distance_zero_test() {
    let point = Point {
        latitude: 55.611_087,
        longitude: 37.208_29,
    };
    assert_eq!(point.distance(&point), 0.0);
}

#[test]
fn distance_symmetry_test() {
    let a = Point {
        latitude: 55.611_087,
        longitude: 37.208_29,
    };
    let b = Point {
        latitude: 55.595_884,
        longitude: 37.209_755,
    };
    assert!((a.distance(&b) - b.distance(&a)).abs() < 1e-9);
}
