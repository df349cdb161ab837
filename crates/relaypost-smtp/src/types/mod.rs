//! Core SMTP types.

mod address;
mod envelope;
mod reply;
mod stage;

pub use address::Address;
pub use envelope::{Envelope, EnvelopeBuilder};
pub use reply::{Reply, ReplyCode};
pub use stage::Stage;
