use crate::runtime::{EventLoop, TaskId};
use std::{cell::Cell, rc::Rc, time::Duration};

/// Page-lifetime record of whether the map widget has been constructed.
///
/// Starts unset and is set exactly once. There is no way to reset it.
#[derive(Debug, Default)]
pub struct WidgetInitState {
    initialized: Cell<bool>,
}

impl WidgetInitState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Check-and-set. Returns `true` for the single caller that flips the flag.
    fn claim(&self) -> bool {
        !self.initialized.replace(true)
    }
}

/// Builds the map widget at most once, a settle delay after it is first asked to
pub struct InitGate {
    state: Rc<WidgetInitState>,
    event_loop: Rc<EventLoop>,
    settle_delay: Duration,
    scheduled: Cell<Option<TaskId>>,
}

impl InitGate {
    pub fn new(state: Rc<WidgetInitState>, event_loop: Rc<EventLoop>, settle_delay: Duration) -> Self {
        Self {
            state,
            event_loop,
            settle_delay,
            scheduled: Cell::new(None),
        }
    }

    /// Schedules `build` unless a build was already scheduled for this page.
    ///
    /// The flag is set before scheduling, so calls arriving during the settle
    /// delay find it set and return `false`.
    pub fn ensure_initialized<F>(&self, build: F) -> bool
    where
        F: FnOnce() + 'static,
    {
        if !self.state.claim() {
            log::trace!("map widget already initialized, ignoring");
            return false;
        }

        log::debug!("scheduling map widget construction in {:?}", self.settle_delay);
        let id = self.event_loop.schedule(self.settle_delay, "map-widget-build", build);
        self.scheduled.set(Some(id));
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Task that will build (or built) the widget
    pub fn scheduled_task(&self) -> Option<TaskId> {
        self.scheduled.get()
    }

    pub fn state(&self) -> &Rc<WidgetInitState> {
        &self.state
    }
}

impl std::fmt::Debug for InitGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitGate")
            .field("initialized", &self.state.is_initialized())
            .field("settle_delay", &self.settle_delay)
            .field("scheduled", &self.scheduled.get())
            .finish()
    }
}
