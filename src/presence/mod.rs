mod payload;
mod session;
mod traits;

#[cfg(test)]
pub(crate) mod stub;

pub use payload::{build_payload, Overrides, Payload};
pub use session::PresenceSession;
pub use traits::{Connection, Connector};
