use crate::{channel::message::CoordinateSelectionEvent, PickerError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde_json::Value;
use std::{cell::RefCell, rc::Rc};

/// A message as it arrives at the receiving context
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Origin of the sending context. Carried, never checked.
    pub origin: String,
    pub data: Value,
}

type Handler = Rc<dyn Fn(&Envelope)>;

/// Sending end held by the sub-window. Cheap to clone and `Send`, so the
/// sub-window may run on another thread.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: Sender<Envelope>,
    origin: String,
}

impl ChannelSender {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Posts a coordinate selection
    pub fn send(&self, event: &CoordinateSelectionEvent) -> Result<()> {
        self.post(event.to_value()?)
    }

    /// Posts an arbitrary payload, as any script sharing the channel may
    pub fn post(&self, data: Value) -> Result<()> {
        self.tx
            .send(Envelope {
                origin: self.origin.clone(),
                data,
            })
            .map_err(|_| PickerError::ChannelClosed)
    }
}

/// Receiving end owned by the host page.
///
/// Messages queue up until [`MessageChannel::pump`] runs, which hands each one
/// to every registered handler in arrival order.
pub struct MessageChannel {
    rx: Receiver<Envelope>,
    handlers: RefCell<Vec<Handler>>,
}

impl MessageChannel {
    /// Creates a connected sender/receiver pair
    pub fn channel(origin: impl Into<String>) -> (ChannelSender, MessageChannel) {
        let (tx, rx) = unbounded();
        let sender = ChannelSender {
            tx,
            origin: origin.into(),
        };
        let channel = MessageChannel {
            rx,
            handlers: RefCell::new(Vec::new()),
        };
        (sender, channel)
    }

    /// Registers a handler for the lifetime of the channel
    pub fn on_receive<F>(&self, handler: F)
    where
        F: Fn(&Envelope) + 'static,
    {
        self.handlers.borrow_mut().push(Rc::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Delivers every queued message, returning how many were delivered
    pub fn pump(&self) -> usize {
        let mut delivered = 0;
        while let Ok(envelope) = self.rx.try_recv() {
            self.dispatch(&envelope);
            delivered += 1;
        }
        delivered
    }

    fn dispatch(&self, envelope: &Envelope) {
        // Snapshot so a handler may register further handlers
        let handlers: Vec<Handler> = self.handlers.borrow().clone();
        if handlers.is_empty() {
            log::trace!("message from {} dropped, no handlers", envelope.origin);
        }
        for handler in handlers {
            handler(envelope);
        }
    }
}

impl std::fmt::Debug for MessageChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageChannel")
            .field("pending", &self.rx.len())
            .field("handlers", &self.handler_count())
            .finish()
    }
}
