use crate::{
    dom::{Display, DomHost},
    sync::gate::InitGate,
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Hidden,
    Visible,
}

/// Shows and hides the picker overlay and triggers the map build on first show
pub struct ModalController {
    host: Rc<RefCell<dyn DomHost>>,
    overlay_id: String,
    gate: InitGate,
    state: Cell<ModalState>,
    opens: Cell<u64>,
}

impl ModalController {
    pub fn new(host: Rc<RefCell<dyn DomHost>>, overlay_id: impl Into<String>, gate: InitGate) -> Self {
        Self {
            host,
            overlay_id: overlay_id.into(),
            gate,
            state: Cell::new(ModalState::Hidden),
            opens: Cell::new(0),
        }
    }

    /// Shows the overlay and hands `build` to the init gate.
    ///
    /// Returns `true` when this call scheduled the map build. Reopening never
    /// schedules a second build.
    pub fn open<F>(&self, build: F) -> bool
    where
        F: FnOnce() + 'static,
    {
        self.show(Display::Block);
        self.state.set(ModalState::Visible);
        self.opens.set(self.opens.get() + 1);
        self.gate.ensure_initialized(build)
    }

    pub fn close(&self) {
        self.show(Display::None);
        self.state.set(ModalState::Hidden);
    }

    fn show(&self, display: Display) {
        match self.host.try_borrow_mut() {
            Ok(mut host) => {
                if !host.set_display(&self.overlay_id, display) {
                    log::warn!("overlay '{}' not found", self.overlay_id);
                }
            }
            Err(e) => log::warn!("cannot update overlay '{}': {}", self.overlay_id, e),
        }
    }

    pub fn state(&self) -> ModalState {
        self.state.get()
    }

    pub fn is_visible(&self) -> bool {
        self.state.get() == ModalState::Visible
    }

    pub fn open_count(&self) -> u64 {
        self.opens.get()
    }

    pub fn overlay_id(&self) -> &str {
        &self.overlay_id
    }

    pub fn gate(&self) -> &InitGate {
        &self.gate
    }

    /// Document the overlay lives in
    pub fn host(&self) -> &Rc<RefCell<dyn DomHost>> {
        &self.host
    }
}

impl std::fmt::Debug for ModalController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalController")
            .field("overlay_id", &self.overlay_id)
            .field("state", &self.state.get())
            .field("gate", &self.gate)
            .finish()
    }
}
