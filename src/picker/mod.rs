//! The map picker: a widget in a container plus the controller that turns a
//! click into a coordinate selection.

pub mod controller;
pub mod map;

pub use controller::{PickerController, PickerState, SelectionTarget};
pub use map::{MapWidget, MapWidgetFactory, PickerMap, PickerMapFactory};
