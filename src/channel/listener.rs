use crate::{
    channel::{
        message::CoordinateSelectionEvent,
        transport::{Envelope, MessageChannel},
    },
    dom::DomHost,
    sync::fields::{ApplyOutcome, FieldBinding, FieldSynchronizer},
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

/// Host-side endpoint turning coordinate-selection messages into field writes.
///
/// Registered once when the host page is ready and never removed.
pub struct MessageListener {
    host: Rc<RefCell<dyn DomHost>>,
    binding: FieldBinding,
    synchronizer: FieldSynchronizer,
    focus_on_apply: bool,
    applied: Cell<u64>,
    rejected: Cell<u64>,
}

impl MessageListener {
    pub fn new(
        host: Rc<RefCell<dyn DomHost>>,
        binding: FieldBinding,
        synchronizer: FieldSynchronizer,
    ) -> Self {
        Self {
            host,
            binding,
            synchronizer,
            focus_on_apply: true,
            applied: Cell::new(0),
            rejected: Cell::new(0),
        }
    }

    pub fn with_focus_on_apply(mut self, focus: bool) -> Self {
        self.focus_on_apply = focus;
        self
    }

    /// Subscribes to `channel` for as long as the channel lives
    pub fn register(self: &Rc<Self>, channel: &MessageChannel) {
        let listener = Rc::clone(self);
        channel.on_receive(move |envelope| {
            listener.handle(envelope);
        });
    }

    /// Handles one inbound message. Never panics and never returns an error:
    /// foreign traffic is ignored and malformed selections are logged.
    pub fn handle(&self, envelope: &Envelope) -> Option<ApplyOutcome> {
        let event = match CoordinateSelectionEvent::decode(&envelope.data) {
            Ok(Some(event)) => event,
            Ok(None) => {
                log::trace!("ignoring foreign message from {}", envelope.origin);
                return None;
            }
            Err(e) => {
                log::error!("malformed coordinate message from {}: {}", envelope.origin, e);
                self.rejected.set(self.rejected.get() + 1);
                return None;
            }
        };

        let mut host = match self.host.try_borrow_mut() {
            Ok(host) => host,
            Err(e) => {
                log::error!("document busy, dropping coordinate message: {}", e);
                self.rejected.set(self.rejected.get() + 1);
                return None;
            }
        };

        let outcome = self.synchronizer.apply_coordinate(
            &mut *host,
            &self.binding,
            event.lat.as_ref(),
            event.lng.as_ref(),
        );

        if outcome.applied {
            self.applied.set(self.applied.get() + 1);
            if self.focus_on_apply && !host.focus(&self.binding.lat_key) {
                log::debug!("cannot focus '{}', not in document", self.binding.lat_key);
            }
        }

        Some(outcome)
    }

    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    /// Messages that led to a field write
    pub fn applied_count(&self) -> u64 {
        self.applied.get()
    }

    /// Selection messages dropped as malformed
    pub fn rejected_count(&self) -> u64 {
        self.rejected.get()
    }
}
