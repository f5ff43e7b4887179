use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Raw input delivered to a map widget, in container pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Single click/tap
    Click {
        position: Point,
        button: MouseButton,
    },
    /// Container resize
    Resize { size: Point },
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Events emitted by a map widget
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Primary click on the map
    Click { lat_lng: LatLng, pixel: Point },
}

impl InputEvent {
    /// Left click at a container pixel
    pub fn click(x: f64, y: f64) -> Self {
        InputEvent::Click {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }
}
