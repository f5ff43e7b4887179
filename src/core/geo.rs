use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator projection constants
const EARTH_RADIUS: f64 = 6378137.0;
const MAX_LATITUDE: f64 = 85.0511287798;

/// Number of decimal places in the canonical coordinate string
pub const COORDINATE_PRECISION: usize = 6;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Clamps latitude to the range the Mercator projection can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to Web Mercator projection (EPSG:3857)
    pub fn to_mercator(&self) -> Point {
        let x = self.lng.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + Self::clamp_lat(self.lat).to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;
        Point::new(x, y)
    }

    /// Creates LatLng from Web Mercator coordinates
    pub fn from_mercator(point: Point) -> Self {
        let lng = (point.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lat, lng)
    }

    /// Canonical fixed-precision form of this coordinate
    pub fn format(&self) -> FormattedCoordinate {
        format_coordinate(self.lat, self.lng)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A coordinate in its canonical external representation.
///
/// Both halves carry exactly [`COORDINATE_PRECISION`] decimal places. Values are
/// never range-checked here; consumers that care re-validate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormattedCoordinate {
    pub lat: String,
    pub lng: String,
}

impl std::fmt::Display for FormattedCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// Formats a raw latitude/longitude pair with six decimal places
pub fn format_coordinate(lat: f64, lng: f64) -> FormattedCoordinate {
    FormattedCoordinate {
        lat: format_fixed(lat),
        lng: format_fixed(lng),
    }
}

/// Fixed-precision rendering of a single value, as the browser's
/// `toFixed(6)` renders it.
///
/// Non-finite input keeps the spelling form fields receive from the browser
/// (`NaN`, `Infinity`, `-Infinity`) instead of Rust's `inf`. An exact tie at
/// the last place rounds away from zero where `{:.6}` would round to even.
pub fn format_fixed(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    } else if value == f64::INFINITY {
        return "Infinity".to_string();
    } else if value == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }

    let magnitude = value.abs();
    let mut digits = format!("{:.*}", COORDINATE_PRECISION, magnitude);

    // A tie needs an exact decimal expansion one place longer, which only
    // values with at most seven fractional bits have.
    if (magnitude * 128.0).fract() == 0.0 {
        let extended = format!("{:.*}", COORDINATE_PRECISION + 1, magnitude);
        if let Some(kept) = extended.strip_suffix('5') {
            digits = round_last_digit_up(kept);
        }
    }

    // -0.0 is not negative here
    if value < 0.0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Adds one unit in the last place of an unsigned decimal string
fn round_last_digit_up(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for byte in bytes.iter_mut().rev() {
        match *byte {
            b'.' => continue,
            b'9' => *byte = b'0',
            _ => {
                *byte += 1;
                return String::from_utf8_lossy(&bytes).into_owned();
            }
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}
