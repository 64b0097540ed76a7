pub mod confirm;

pub use confirm::{ConfirmHandler, CANCEL_PERIOD_PARAMETER, CONFIRM_TAG};
