use crate::{
    core::{
        config::ZeroPolicy,
        constants::COORDS_SELECTED,
        geo::{FormattedCoordinate, LatLng},
    },
    Result,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One half of a coordinate as it travels over the wire: a JSON number or a
/// string holding a decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordValue {
    Number(f64),
    Text(String),
}

impl CoordValue {
    /// Whether the host page would treat this value as present.
    ///
    /// Empty strings and `NaN` are always missing. Numeric zero is missing
    /// under [`ZeroPolicy::LegacyFalsy`]. A string `"0"` is present.
    pub fn is_truthy(&self, policy: ZeroPolicy) -> bool {
        match self {
            CoordValue::Text(text) => !text.is_empty(),
            CoordValue::Number(n) if n.is_nan() => false,
            CoordValue::Number(n) => *n != 0.0 || policy == ZeroPolicy::AcceptZero,
        }
    }

    /// Numeric value, following the page's string-to-number rules: surrounding
    /// whitespace is ignored and an empty string is zero. Decimals too large
    /// for `f64` become infinite, `0x`/`0o`/`0b` integers are read in their
    /// radix, and anything else is `NaN`.
    pub fn to_f64(&self) -> f64 {
        match self {
            CoordValue::Number(n) => *n,
            CoordValue::Text(text) => parse_decimal(text),
        }
    }
}

impl From<f64> for CoordValue {
    fn from(value: f64) -> Self {
        CoordValue::Number(value)
    }
}

impl From<&str> for CoordValue {
    fn from(value: &str) -> Self {
        CoordValue::Text(value.to_string())
    }
}

impl From<String> for CoordValue {
    fn from(value: String) -> Self {
        CoordValue::Text(value)
    }
}

fn parse_decimal(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let prefix = trimmed.get(..2).map(str::to_ascii_lowercase);
    let radix = match prefix.as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_integer(&trimmed[2..], radix);
    }

    // Rust also accepts "inf" and "nan" spellings
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !c.eq_ignore_ascii_case(&'e'))
    {
        return f64::NAN;
    }

    // Out-of-range exponents saturate to infinity
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Unsigned integer literal after a `0x`/`0o`/`0b` prefix
fn parse_integer(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().try_fold(0.0, |total: f64, c| {
        c.to_digit(radix).map(|digit| total * f64::from(radix) + f64::from(digit))
    })
    .unwrap_or(f64::NAN)
}

/// "The user picked this point."
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateSelectionEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<CoordValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<CoordValue>,
}

/// Messages understood on the cross-context channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PickerMessage {
    #[serde(rename = "coords_selected")]
    CoordsSelected(CoordinateSelectionEvent),
}

impl CoordinateSelectionEvent {
    pub fn new(lat: impl Into<CoordValue>, lng: impl Into<CoordValue>) -> Self {
        Self {
            lat: Some(lat.into()),
            lng: Some(lng.into()),
        }
    }

    /// Event carrying the canonical strings of a picked point
    pub fn from_formatted(coordinate: &FormattedCoordinate) -> Self {
        Self::new(coordinate.lat.as_str(), coordinate.lng.as_str())
    }

    pub fn from_lat_lng(lat_lng: LatLng) -> Self {
        Self::from_formatted(&lat_lng.format())
    }

    /// Wire form: `{"type": "coords_selected", "lat": .., "lng": ..}`
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(PickerMessage::CoordsSelected(self.clone()))?)
    }

    /// Interprets an untrusted payload.
    ///
    /// Anything that is not an object tagged `coords_selected` is foreign
    /// traffic and yields `Ok(None)`. A tagged object whose coordinates have
    /// the wrong shape is an error.
    pub fn decode(data: &Value) -> Result<Option<Self>> {
        let tagged = data
            .as_object()
            .and_then(|object| object.get("type"))
            .and_then(Value::as_str)
            == Some(COORDS_SELECTED);
        if !tagged {
            return Ok(None);
        }

        match serde_json::from_value::<PickerMessage>(data.clone())? {
            PickerMessage::CoordsSelected(event) => Ok(Some(event)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_string_coordinates() {
        let event = CoordinateSelectionEvent::decode(&json!({
            "type": "coords_selected",
            "lat": "41.0",
            "lng": "70.0"
        }))
        .unwrap()
        .unwrap();

        assert_eq!(event.lat, Some(CoordValue::Text("41.0".into())));
        assert_eq!(event.lng.as_ref().map(CoordValue::to_f64), Some(70.0));
    }

    #[test]
    fn test_decode_tolerates_unknown_keys() {
        let event = CoordinateSelectionEvent::decode(&json!({
            "type": "coords_selected",
            "lat": 40.5,
            "lng": 69.25,
            "zoom": 13,
            "source": "map-picker"
        }))
        .unwrap()
        .unwrap();

        assert_eq!(event.lat, Some(CoordValue::Number(40.5)));
        assert_eq!(event.lng, Some(CoordValue::Number(69.25)));
    }

    #[test]
    fn test_foreign_traffic_is_ignored() {
        for payload in [
            json!(null),
            json!("coords_selected"),
            json!([1, 2]),
            json!({ "lat": 1.0, "lng": 2.0 }),
            json!({ "type": "resize", "lat": 1.0, "lng": 2.0 }),
            json!({ "type": 7 }),
        ] {
            assert_eq!(CoordinateSelectionEvent::decode(&payload).unwrap(), None);
        }
    }

    #[test]
    fn test_malformed_coordinates_are_errors() {
        let result = CoordinateSelectionEvent::decode(&json!({
            "type": "coords_selected",
            "lat": { "deg": 40 },
            "lng": 70.0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_halves_decode_as_none() {
        let event = CoordinateSelectionEvent::decode(&json!({ "type": "coords_selected", "lat": null }))
            .unwrap()
            .unwrap();
        assert_eq!(event, CoordinateSelectionEvent::default());
    }

    #[test]
    fn test_wire_form() {
        let event = CoordinateSelectionEvent::from_lat_lng(LatLng::new(40.123456789, 69.987654321));
        assert_eq!(
            event.to_value().unwrap(),
            json!({ "type": "coords_selected", "lat": "40.123457", "lng": "69.987654" })
        );
    }

    #[test]
    fn test_truthiness() {
        let legacy = ZeroPolicy::LegacyFalsy;
        assert!(!CoordValue::Number(0.0).is_truthy(legacy));
        assert!(CoordValue::Number(0.0).is_truthy(ZeroPolicy::AcceptZero));
        assert!(!CoordValue::Number(f64::NAN).is_truthy(ZeroPolicy::AcceptZero));
        assert!(CoordValue::Text("0".into()).is_truthy(legacy));
        assert!(!CoordValue::Text(String::new()).is_truthy(ZeroPolicy::AcceptZero));
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(CoordValue::from(" 41.5 ").to_f64(), 41.5);
        assert_eq!(CoordValue::from("").to_f64(), 0.0);
        assert_eq!(CoordValue::from("-Infinity").to_f64(), f64::NEG_INFINITY);
        assert!(CoordValue::from("north").to_f64().is_nan());
        assert!(CoordValue::from("inf").to_f64().is_nan());
    }

    #[test]
    fn test_overflow_and_radix_literals() {
        assert_eq!(CoordValue::from("1e400").to_f64(), f64::INFINITY);
        assert_eq!(CoordValue::from("-1e400").to_f64(), f64::NEG_INFINITY);
        assert_eq!(CoordValue::from("2.5E1").to_f64(), 25.0);
        assert_eq!(CoordValue::from("0x10").to_f64(), 16.0);
        assert_eq!(CoordValue::from(" 0XfF ").to_f64(), 255.0);
        assert_eq!(CoordValue::from("0o17").to_f64(), 15.0);
        assert_eq!(CoordValue::from("0b101").to_f64(), 5.0);

        for text in ["0x", "0xg1", "-0x10", "0x1.5", "nan", "Infinityx", "1e5f"] {
            assert!(CoordValue::from(text).to_f64().is_nan(), "{:?}", text);
        }
    }
}
