use crate::{
    channel::message::CoordValue,
    core::{
        config::{FieldIds, ZeroPolicy},
        constants,
        geo::{format_fixed, FormattedCoordinate, LatLng},
    },
    dom::DomHost,
};
use serde::{Deserialize, Serialize};

/// The two form fields a coordinate is written into.
///
/// Only the keys are stored; the elements are looked up on every write so a
/// re-rendered form is picked up without rebinding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldBinding {
    pub lat_key: String,
    pub lng_key: String,
}

impl FieldBinding {
    pub fn new(lat_key: impl Into<String>, lng_key: impl Into<String>) -> Self {
        Self {
            lat_key: lat_key.into(),
            lng_key: lng_key.into(),
        }
    }

    /// Current values of both fields, `None` for an absent field
    pub fn read(&self, host: &dyn DomHost) -> (Option<String>, Option<String>) {
        (host.value(&self.lat_key), host.value(&self.lng_key))
    }
}

impl Default for FieldBinding {
    fn default() -> Self {
        Self::new(constants::DEFAULT_LAT_FIELD, constants::DEFAULT_LNG_FIELD)
    }
}

impl From<&FieldIds> for FieldBinding {
    fn from(ids: &FieldIds) -> Self {
        Self::new(ids.lat.as_str(), ids.lng.as_str())
    }
}

/// What a single `apply_coordinate` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyOutcome {
    /// Both values were present and a write was attempted
    pub applied: bool,
    pub lat_written: bool,
    pub lng_written: bool,
    /// Change notifications were dispatched
    pub notified: bool,
}

impl ApplyOutcome {
    fn skipped() -> Self {
        Self::default()
    }
}

/// Writes coordinates into a pair of form fields and tells listeners about it.
///
/// Stateless: applying the same coordinate twice leaves the same values behind
/// and simply notifies twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSynchronizer {
    zero_policy: ZeroPolicy,
}

impl FieldSynchronizer {
    pub fn new(zero_policy: ZeroPolicy) -> Self {
        Self { zero_policy }
    }

    pub fn zero_policy(&self) -> ZeroPolicy {
        self.zero_policy
    }

    /// Applies a raw coordinate pair to the bound fields.
    ///
    /// Nothing is written unless both halves are present. An absent field only
    /// skips its own half.
    pub fn apply_coordinate(
        &self,
        host: &mut dyn DomHost,
        binding: &FieldBinding,
        lat: Option<&CoordValue>,
        lng: Option<&CoordValue>,
    ) -> ApplyOutcome {
        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng))
                if lat.is_truthy(self.zero_policy) && lng.is_truthy(self.zero_policy) =>
            {
                (lat, lng)
            }
            _ => {
                log::debug!("skipping coordinate write, missing value: {:?} / {:?}", lat, lng);
                return ApplyOutcome::skipped();
            }
        };

        let formatted = FormattedCoordinate {
            lat: format_fixed(lat.to_f64()),
            lng: format_fixed(lng.to_f64()),
        };
        self.write(host, binding, &formatted)
    }

    /// Applies an already formatted coordinate (the picker's own output)
    pub fn apply_formatted(
        &self,
        host: &mut dyn DomHost,
        binding: &FieldBinding,
        coordinate: &FormattedCoordinate,
    ) -> ApplyOutcome {
        let lat = CoordValue::from(coordinate.lat.as_str());
        let lng = CoordValue::from(coordinate.lng.as_str());
        self.apply_coordinate(host, binding, Some(&lat), Some(&lng))
    }

    pub fn apply_lat_lng(
        &self,
        host: &mut dyn DomHost,
        binding: &FieldBinding,
        lat_lng: LatLng,
    ) -> ApplyOutcome {
        let lat = CoordValue::Number(lat_lng.lat);
        let lng = CoordValue::Number(lat_lng.lng);
        self.apply_coordinate(host, binding, Some(&lat), Some(&lng))
    }

    fn write(
        &self,
        host: &mut dyn DomHost,
        binding: &FieldBinding,
        formatted: &FormattedCoordinate,
    ) -> ApplyOutcome {
        let lat_written = host.set_value(&binding.lat_key, &formatted.lat);
        if !lat_written {
            log::debug!("latitude field '{}' not found", binding.lat_key);
        }
        let lng_written = host.set_value(&binding.lng_key, &formatted.lng);
        if !lng_written {
            log::debug!("longitude field '{}' not found", binding.lng_key);
        }

        let notified = match host.notifier() {
            Some(notifier) => {
                notifier.notify_change(&binding.lat_key);
                notifier.notify_change(&binding.lng_key);
                true
            }
            None => {
                log::debug!("no change notifier available, fields updated silently");
                false
            }
        };

        log::info!("applied coordinate {}", formatted);
        ApplyOutcome {
            applied: true,
            lat_written,
            lng_written,
            notified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, RecordingNotifier};

    fn text(value: &str) -> CoordValue {
        CoordValue::from(value)
    }

    #[test]
    fn test_apply_formats_both_fields() {
        let notifier = RecordingNotifier::new();
        let mut document = Document::with_fields("id_lat", "id_lng").with_notifier(notifier.clone());
        let binding = FieldBinding::default();

        let outcome = FieldSynchronizer::default().apply_coordinate(
            &mut document,
            &binding,
            Some(&text("41.0")),
            Some(&CoordValue::Number(70.0)),
        );

        assert!(outcome.applied && outcome.lat_written && outcome.lng_written && outcome.notified);
        assert_eq!(
            binding.read(&document),
            (Some("41.000000".to_string()), Some("70.000000".to_string()))
        );
        assert_eq!(notifier.notifications(), vec!["id_lat", "id_lng"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let notifier = RecordingNotifier::new();
        let mut document = Document::with_fields("id_lat", "id_lng").with_notifier(notifier.clone());
        let binding = FieldBinding::default();
        let sync = FieldSynchronizer::default();
        let coordinate = LatLng::new(40.2833, 69.6167);

        let first = sync.apply_lat_lng(&mut document, &binding, coordinate);
        let once = binding.read(&document);
        let second = sync.apply_lat_lng(&mut document, &binding, coordinate);

        assert_eq!(first, second);
        assert_eq!(binding.read(&document), once);
        assert_eq!(notifier.count(), 4);
    }

    #[test]
    fn test_missing_longitude_field_still_writes_latitude() {
        let mut document = Document::with_fields("id_lat", "id_lng");
        document.remove("id_lng");
        let binding = FieldBinding::default();

        let outcome = FieldSynchronizer::default().apply_lat_lng(
            &mut document,
            &binding,
            LatLng::new(12.5, 7.25),
        );

        assert!(outcome.applied);
        assert!(outcome.lat_written);
        assert!(!outcome.lng_written);
        assert_eq!(binding.read(&document), (Some("12.500000".to_string()), None));
    }

    #[test]
    fn test_missing_value_skips_entire_write() {
        let mut document = Document::with_fields("id_lat", "id_lng");
        let binding = FieldBinding::default();
        let sync = FieldSynchronizer::default();

        let outcome = sync.apply_coordinate(&mut document, &binding, Some(&text("41.0")), None);
        assert_eq!(outcome, ApplyOutcome::default());

        let outcome =
            sync.apply_coordinate(&mut document, &binding, Some(&text("")), Some(&text("70")));
        assert!(!outcome.applied);
        assert_eq!(binding.read(&document), (Some(String::new()), Some(String::new())));
    }

    #[test]
    fn test_zero_policy() {
        let binding = FieldBinding::default();
        let equator = LatLng::new(0.0, 32.5);

        let mut document = Document::with_fields("id_lat", "id_lng");
        let legacy = FieldSynchronizer::new(ZeroPolicy::LegacyFalsy);
        assert!(!legacy.apply_lat_lng(&mut document, &binding, equator).applied);

        let accepting = FieldSynchronizer::new(ZeroPolicy::AcceptZero);
        assert!(accepting.apply_lat_lng(&mut document, &binding, equator).applied);
        assert_eq!(document.value("id_lat").as_deref(), Some("0.000000"));

        // The picker's own strings are never falsy
        let mut document = Document::with_fields("id_lat", "id_lng");
        assert!(legacy.apply_formatted(&mut document, &binding, &equator.format()).applied);
    }

    #[test]
    fn test_no_notifier_is_not_fatal() {
        let mut document = Document::with_fields("id_lat", "id_lng");
        let outcome = FieldSynchronizer::default().apply_coordinate(
            &mut document,
            &FieldBinding::default(),
            Some(&text("1.5")),
            Some(&text("2.5")),
        );
        assert!(outcome.lat_written && outcome.lng_written);
        assert!(!outcome.notified);
    }

    #[test]
    fn test_unparsable_text_propagates_nan() {
        let mut document = Document::with_fields("id_lat", "id_lng");
        FieldSynchronizer::default().apply_coordinate(
            &mut document,
            &FieldBinding::default(),
            Some(&text("north")),
            Some(&text("70")),
        );
        assert_eq!(document.value("id_lat").as_deref(), Some("NaN"));
        assert_eq!(document.value("id_lng").as_deref(), Some("70.000000"));
    }

    #[test]
    fn test_binding_from_config() {
        let ids = FieldIds {
            lat: "id_latitude".into(),
            lng: "id_longitude".into(),
        };
        assert_eq!(FieldBinding::from(&ids), FieldBinding::new("id_latitude", "id_longitude"));
    }
}
