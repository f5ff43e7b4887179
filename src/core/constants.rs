//! Picker-wide defaults taken from the admin form the picker was built for.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Stable identifier of the latitude form field.
pub const DEFAULT_LAT_FIELD: &str = "id_lat";

/// Stable identifier of the longitude form field.
pub const DEFAULT_LNG_FIELD: &str = "id_lng";

/// Query-string key carrying a pre-supplied latitude.
pub const DEFAULT_LAT_QUERY_KEY: &str = "lat";

/// Query-string key carrying a pre-supplied longitude.
pub const DEFAULT_LNG_QUERY_KEY: &str = "lng";

/// Discriminant of a coordinate-selection message.
pub const COORDS_SELECTED: &str = "coords_selected";

/// Overlay shown by the admin change form.
pub const ADMIN_MODAL_OVERLAY: &str = "modal-bg";

/// Overlay of the standalone picker page.
pub const PICKER_MODAL_OVERLAY: &str = "map-modal";

/// Element the map widget is mounted into.
pub const MAP_CONTAINER: &str = "map-picker";

/// Settle delay before building the map inside the admin modal.
pub const ADMIN_SETTLE_DELAY_MS: u64 = 100;

/// Settle delay before building the map on the standalone picker page.
pub const PICKER_SETTLE_DELAY_MS: u64 = 300;

/// Initial map center (Khujand).
pub const DEFAULT_CENTER: (f64, f64) = (40.2833, 69.6167);

/// Initial map zoom.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Esri World Imagery tiles used as the picker background.
pub const ESRI_WORLD_IMAGERY_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";

/// Attribution shown with the imagery layer.
pub const ESRI_ATTRIBUTION: &str = "Tiles © Esri";

/// Deepest zoom the imagery layer serves.
pub const ESRI_MAX_ZOOM: u8 = 19;

/// Origin the in-process channel stamps on envelopes when none is configured.
pub const DEFAULT_ORIGIN: &str = "null";
