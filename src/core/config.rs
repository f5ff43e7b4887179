//! Configuration system for the picker surfaces
//!
//! Picker behaviour is described by [`PickerOptions`]. The two surfaces the
//! admin site ships are available as [`PickerProfile`] presets, and custom
//! options can be loaded from JSON where every missing key falls back to the
//! admin modal defaults.

use crate::{
    core::{constants, geo::LatLng},
    PickerError, Result,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PickerProfile {
    /// Modal opened from the admin change form
    #[default]
    AdminModal,
    /// Standalone picker page with its own overlay
    StandalonePicker,
    Custom(PickerOptions),
}

impl PickerProfile {
    pub fn resolve(&self) -> PickerOptions {
        match self {
            Self::AdminModal => PickerOptions {
                overlay_id: constants::ADMIN_MODAL_OVERLAY.to_string(),
                settle_delay_ms: constants::ADMIN_SETTLE_DELAY_MS,
                ..PickerOptions::base()
            },
            Self::StandalonePicker => PickerOptions {
                overlay_id: constants::PICKER_MODAL_OVERLAY.to_string(),
                settle_delay_ms: constants::PICKER_SETTLE_DELAY_MS,
                ..PickerOptions::base()
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

/// How a numeric zero in a raw coordinate is treated.
///
/// The host page historically skipped writes whenever either value was falsy,
/// which also drops coordinates on the equator or the prime meridian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// `0`, `-0` and `NaN` count as missing values
    #[default]
    LegacyFalsy,
    /// Numeric zero is a real coordinate; only empty strings and `NaN` are missing
    AcceptZero,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIds {
    pub lat: String,
    pub lng: String,
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            lat: constants::DEFAULT_LAT_FIELD.to_string(),
            lng: constants::DEFAULT_LNG_FIELD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryKeys {
    pub lat: String,
    pub lng: String,
}

impl Default for QueryKeys {
    fn default() -> Self {
        Self {
            lat: constants::DEFAULT_LAT_QUERY_KEY.to_string(),
            lng: constants::DEFAULT_LNG_QUERY_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialView {
    pub center: LatLng,
    pub zoom: f64,
}

impl Default for InitialView {
    fn default() -> Self {
        let (lat, lng) = constants::DEFAULT_CENTER;
        Self {
            center: LatLng::new(lat, lng),
            zoom: constants::DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSource {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileSource {
    fn default() -> Self {
        Self {
            url_template: constants::ESRI_WORLD_IMAGERY_URL.to_string(),
            attribution: constants::ESRI_ATTRIBUTION.to_string(),
            max_zoom: constants::ESRI_MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerOptions {
    pub fields: FieldIds,
    pub query_keys: QueryKeys,
    pub overlay_id: String,
    pub container_id: String,
    pub settle_delay_ms: u64,
    pub initial_view: InitialView,
    pub tiles: TileSource,
    /// Focus the latitude field after a message-driven update
    pub focus_on_apply: bool,
    pub zero_policy: ZeroPolicy,
    /// Origin stamped on outgoing messages
    pub origin: String,
}

impl PickerOptions {
    fn base() -> Self {
        Self {
            fields: FieldIds::default(),
            query_keys: QueryKeys::default(),
            overlay_id: constants::ADMIN_MODAL_OVERLAY.to_string(),
            container_id: constants::MAP_CONTAINER.to_string(),
            settle_delay_ms: constants::ADMIN_SETTLE_DELAY_MS,
            initial_view: InitialView::default(),
            tiles: TileSource::default(),
            focus_on_apply: true,
            zero_policy: ZeroPolicy::default(),
            origin: constants::DEFAULT_ORIGIN.to_string(),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Parses options from JSON and validates them
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: PickerOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let ids = [
            ("fields.lat", &self.fields.lat),
            ("fields.lng", &self.fields.lng),
            ("query_keys.lat", &self.query_keys.lat),
            ("query_keys.lng", &self.query_keys.lng),
            ("overlay_id", &self.overlay_id),
            ("container_id", &self.container_id),
        ];
        for (name, value) in ids {
            if value.trim().is_empty() {
                return Err(PickerError::Config(format!("{} must not be empty", name)));
            }
        }

        if !self.initial_view.center.is_valid() {
            return Err(PickerError::Config(format!(
                "initial center out of range: {:?}",
                self.initial_view.center
            )));
        }

        let zoom = self.initial_view.zoom;
        if !(0.0..=f64::from(self.tiles.max_zoom)).contains(&zoom) {
            return Err(PickerError::Config(format!(
                "initial zoom {} outside 0..={}",
                zoom, self.tiles.max_zoom
            )));
        }

        // Opaque origin or a serialized URL origin
        if self.origin != constants::DEFAULT_ORIGIN {
            url::Url::parse(&self.origin)?;
        }

        Ok(())
    }
}

impl Default for PickerOptions {
    fn default() -> Self {
        PickerProfile::default().resolve()
    }
}
