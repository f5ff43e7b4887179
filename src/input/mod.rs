pub mod events;

pub use events::{InputEvent, MapEvent, MouseButton};
