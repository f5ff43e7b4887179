//! Prelude module for common picker types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use latlng_picker::prelude::*;`

pub use crate::core::{
    config::{FieldIds, InitialView, PickerOptions, PickerProfile, QueryKeys, TileSource, ZeroPolicy},
    geo::{format_coordinate, FormattedCoordinate, LatLng, Point},
    viewport::Viewport,
};

pub use crate::channel::{
    ChannelSender, CoordValue, CoordinateSelectionEvent, Envelope, MessageChannel,
    MessageListener,
};

pub use crate::dom::{ChangeNotifier, Display, Document, DomHost, Element, RecordingNotifier};

pub use crate::sync::{
    parse_query, ApplyOutcome, FieldBinding, FieldSynchronizer, InitGate, UrlBootstrap,
    WidgetInitState,
};

pub use crate::picker::{
    MapWidget, MapWidgetFactory, PickerController, PickerMap, PickerMapFactory, PickerState,
    SelectionTarget,
};

pub use crate::input::{InputEvent, MapEvent, MouseButton};

pub use crate::layers::{LayerManager, LayerTrait, Marker, TileLayer};

pub use crate::ui::{ModalController, ModalState};

pub use crate::page::{HostPage, PickerWindow};

pub use crate::runtime::{EventLoop, TaskId};

pub use crate::{Error as PickerError, Result};

pub use std::{rc::Rc, time::Duration};

pub use fxhash::FxHashMap as HashMap;
