//! Connector trait definitions.
//!
//! These traits define the interface to the broker client library, enabling
//! dependency injection and testability through mocking.

use std::fmt;

use async_trait::async_trait;

use crate::error::BrokerError;

/// Parameters for a single broker connection attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub passwd: String,
    pub use_ssl: bool,
}

impl ConnectConfig {
    /// `host:port` of the broker, for logging.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ConnectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("passwd", &"<redacted>")
            .field("use_ssl", &self.use_ssl)
            .finish()
    }
}

/// An open, authenticated broker connection.
#[async_trait]
pub trait Connection: Send {
    /// Close the connection.
    async fn disconnect(&mut self) -> Result<(), BrokerError>;
}

/// Opens broker connections.
///
/// Implementations must be thread-safe (`Send + Sync`) since one strategy
/// serves concurrent requests.
///
/// # Returns
///
/// * `Ok(connection)` - The broker accepted the credentials
/// * `Err(BrokerError::Rejected)` - The broker refused the credentials
/// * `Err(other)` - The broker could not be reached
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Connection;

    async fn connect(&self, config: &ConnectConfig) -> Result<Self::Connection, BrokerError>;
}
