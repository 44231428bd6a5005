//! Broker connection collaborator.
//!
//! The strategy never speaks the broker protocol itself. It hands a
//! [`ConnectConfig`] to a [`Connector`], and a resolved [`Connection`] means
//! the broker accepted the credentials. Timeouts and retries, if any, belong
//! to the connector implementation.

mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use traits::{ConnectConfig, Connection, Connector};
