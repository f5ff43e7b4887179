//! Document abstraction shared by the host page and the picker sub-window
//!
//! The picker only needs a handful of things from a document: read and write
//! an element's value, toggle an element's `display` style, move focus, and
//! tell third-party widgets bound to a field that its value changed. Those are
//! captured by [`DomHost`]. [`Document`] is the in-memory implementation used by
//! headless hosts and tests; the `wasm` feature adds a browser-backed one.

pub mod document;

pub use document::{Document, Element, RecordingNotifier};

use serde::{Deserialize, Serialize};

/// Value of an element's `display` style property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Display {
    #[default]
    None,
    Block,
}

impl Display {
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
        }
    }
}

/// Receives change notifications for form fields.
///
/// Stands in for whatever widget library listens on the fields (a jQuery
/// `change` trigger on the admin page).
pub trait ChangeNotifier {
    fn notify_change(&mut self, element_id: &str);
}

/// The operations the picker performs against a document.
///
/// Every method resolves the element by id at call time; a `false` / `None`
/// return means the element is absent from the current document.
pub trait DomHost {
    /// Current value of an input element
    fn value(&self, element_id: &str) -> Option<String>;

    /// Writes an input element's value
    fn set_value(&mut self, element_id: &str, value: &str) -> bool;

    /// Sets the element's `display` style
    fn set_display(&mut self, element_id: &str, display: Display) -> bool;

    fn display(&self, element_id: &str) -> Option<Display>;

    /// Moves input focus to the element
    fn focus(&mut self, element_id: &str) -> bool;

    /// The change-notification mechanism, if the environment provides one
    fn notifier(&mut self) -> Option<&mut dyn ChangeNotifier>;

    fn contains(&self, element_id: &str) -> bool {
        self.value(element_id).is_some() || self.display(element_id).is_some()
    }
}
