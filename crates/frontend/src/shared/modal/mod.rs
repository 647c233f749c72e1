pub mod confirm;

pub use confirm::{ConfirmModal, ModalVariant};
