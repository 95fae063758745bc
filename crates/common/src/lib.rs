//! Wire types and errors shared between the `crypto-service` core and its transports.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
pub use protocol::Payload;
