//! Cross-context coordinate messages
//!
//! The picker sub-window and the host page share nothing but this channel.
//! [`message`] defines what travels over it and how untrusted payloads are
//! decoded, [`transport`] moves envelopes between contexts, and [`listener`]
//! is the host-side endpoint that turns selections into field writes.

pub mod listener;
pub mod message;
pub mod transport;

pub use listener::MessageListener;
pub use message::{CoordValue, CoordinateSelectionEvent, PickerMessage};
pub use transport::{ChannelSender, Envelope, MessageChannel};
