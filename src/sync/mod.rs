pub mod bootstrap;
pub mod fields;
pub mod gate;

pub use bootstrap::{parse_query, UrlBootstrap};
pub use fields::{ApplyOutcome, FieldBinding, FieldSynchronizer};
pub use gate::{InitGate, WidgetInitState};
