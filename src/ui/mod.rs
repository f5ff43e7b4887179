pub mod modal;

pub use modal::{ModalController, ModalState};
