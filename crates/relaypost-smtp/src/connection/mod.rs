//! Connection management: stream, configuration, and the session state
//! machine.

mod config;
mod session;
mod stream;

pub use config::Config;
pub use session::Session;
pub use stream::{SmtpStream, connect};
