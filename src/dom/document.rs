use crate::{
    dom::{ChangeNotifier, Display, DomHost},
    prelude::HashMap,
};
use std::{cell::RefCell, rc::Rc};

/// A single element of the in-memory document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub value: String,
    pub display: Display,
}

impl Element {
    pub fn input(value: &str) -> Self {
        Self {
            value: value.to_string(),
            display: Display::Block,
        }
    }

    pub fn overlay() -> Self {
        Self::default()
    }
}

/// Notifier that records every change notification it receives.
///
/// Clones share the same log, so a test can keep one handle while the
/// document owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    log: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element ids notified so far, in dispatch order
    pub fn notifications(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.log.borrow().len()
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn notify_change(&mut self, element_id: &str) {
        self.log.borrow_mut().push(element_id.to_string());
    }
}

/// In-memory document keyed by element id
#[derive(Default)]
pub struct Document {
    elements: HashMap<String, Element>,
    focused: Option<String>,
    notifier: Option<Box<dyn ChangeNotifier>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document holding the two coordinate inputs, empty
    pub fn with_fields(lat_id: &str, lng_id: &str) -> Self {
        let mut document = Self::new();
        document.insert(lat_id, Element::input(""));
        document.insert(lng_id, Element::input(""));
        document
    }

    pub fn with_notifier(mut self, notifier: impl ChangeNotifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn set_notifier(&mut self, notifier: Option<Box<dyn ChangeNotifier>>) {
        self.notifier = notifier;
    }

    pub fn insert(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    /// Removes an element, as a re-render of the host form might
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        self.elements.remove(id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.elements)
            .field("focused", &self.focused)
            .field("has_notifier", &self.notifier.is_some())
            .finish()
    }
}

impl DomHost for Document {
    fn value(&self, element_id: &str) -> Option<String> {
        self.elements.get(element_id).map(|e| e.value.clone())
    }

    fn set_value(&mut self, element_id: &str, value: &str) -> bool {
        match self.elements.get_mut(element_id) {
            Some(element) => {
                element.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn set_display(&mut self, element_id: &str, display: Display) -> bool {
        match self.elements.get_mut(element_id) {
            Some(element) => {
                element.display = display;
                true
            }
            None => false,
        }
    }

    fn display(&self, element_id: &str) -> Option<Display> {
        self.elements.get(element_id).map(|e| e.display)
    }

    fn focus(&mut self, element_id: &str) -> bool {
        if self.elements.contains_key(element_id) {
            self.focused = Some(element_id.to_string());
            true
        } else {
            false
        }
    }

    fn notifier(&mut self) -> Option<&mut dyn ChangeNotifier> {
        match self.notifier.as_mut() {
            Some(notifier) => Some(notifier.as_mut()),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_element_writes_are_rejected() {
        let mut document = Document::with_fields("id_lat", "id_lng");
        assert!(document.set_value("id_lat", "1.5"));
        assert!(!document.set_value("id_alt", "3"));
        assert_eq!(document.value("id_lat").as_deref(), Some("1.5"));
        assert_eq!(document.value("id_alt"), None);
    }

    #[test]
    fn test_focus_tracks_removal() {
        let mut document = Document::with_fields("id_lat", "id_lng");
        assert!(document.focus("id_lat"));
        assert_eq!(document.focused(), Some("id_lat"));
        document.remove("id_lat");
        assert_eq!(document.focused(), None);
        assert!(!document.focus("id_lat"));
    }

    #[test]
    fn test_recording_notifier_is_shared() {
        let notifier = RecordingNotifier::new();
        let mut document = Document::new().with_notifier(notifier.clone());
        if let Some(n) = document.notifier() {
            n.notify_change("id_lng");
        }
        assert_eq!(notifier.notifications(), vec!["id_lng".to_string()]);
    }

    #[test]
    fn test_overlay_display() {
        let mut document = Document::new();
        document.insert("modal-bg", Element::overlay());
        assert_eq!(document.display("modal-bg"), Some(Display::None));
        assert!(document.set_display("modal-bg", Display::Block));
        assert_eq!(document.display("modal-bg"), Some(Display::Block));
        assert!(document.contains("modal-bg"));
        assert!(!document.contains("map-modal"));
    }
}
