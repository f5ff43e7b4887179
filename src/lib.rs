//! # latlng-picker
//!
//! Map-based latitude/longitude picker for admin forms.
//!
//! A picker surface hosts a map widget; clicking the map selects a point,
//! which is formatted to six decimals and written into a pair of coordinate
//! fields. The picker may share the fields' document or live in an isolated
//! context (an iframe) and post the selection back over a message channel.
//! The host page can also take a coordinate from its query string on load.

pub mod channel;
pub mod core;
pub mod dom;
pub mod input;
pub mod layers;
pub mod page;
pub mod picker;
pub mod prelude;
pub mod runtime;
pub mod sync;
pub mod ui;
#[cfg(feature = "wasm")]
pub mod web;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{PickerOptions, PickerProfile, ZeroPolicy},
    geo::{format_coordinate, FormattedCoordinate, LatLng, Point},
    viewport::Viewport,
};

pub use channel::{
    ChannelSender, CoordValue, CoordinateSelectionEvent, Envelope, MessageChannel,
    MessageListener,
};

pub use dom::{ChangeNotifier, Display, Document, DomHost};

pub use sync::{ApplyOutcome, FieldBinding, FieldSynchronizer, InitGate, UrlBootstrap, WidgetInitState};

pub use picker::{MapWidget, MapWidgetFactory, PickerController, PickerMap, PickerMapFactory};

pub use ui::{ModalController, ModalState};

pub use page::{HostPage, PickerWindow};

pub use runtime::EventLoop;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, PickerError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Map widget error: {0}")]
    Widget(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Map widget already initialized")]
    AlreadyInitialized,

    #[error("Map widget not initialized")]
    NotInitialized,

    #[error("Message channel closed")]
    ChannelClosed,
}

/// Error type alias for convenience
pub type Error = PickerError;

/// Routes `log` output to stderr, honouring `RUST_LOG`
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}
