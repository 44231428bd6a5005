//! Error types for the Akera strategy.
//!
//! Errors fall into three groups:
//!
//! 1. **Configuration errors** ([`ConfigError`]): raised while building a
//!    strategy or reading options from the environment. A strategy that
//!    fails to build never authenticates anything.
//!
//! 2. **Broker errors** ([`BrokerError`]): raised by the connector while
//!    opening or closing the broker connection. The strategy turns every
//!    broker error into a 401 `fail` outcome.
//!
//! 3. **Authentication errors** ([`AuthError`]): the payload of the `error`
//!    outcome, produced when a custom verifier reports an error.

use std::time::Duration;

use thiserror::Error;

/// Error returned by a custom verifier.
pub type VerifyError = Box<dyn std::error::Error + Send + Sync>;

/// Invalid strategy configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Akera authentication strategy requires server options")]
    MissingServer,

    #[error("Akera server host must not be empty")]
    EmptyHost,

    #[error("Akera server port must not be zero")]
    InvalidPort,

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Failure reported by a broker connector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// The broker refused the supplied credentials.
    #[error("{0}")]
    Rejected(String),

    /// The broker could not be reached.
    #[error("{0}")]
    Connect(String),

    /// The connector gave up waiting for the broker.
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// Closing an established connection failed.
    #[error("{0}")]
    Disconnect(String),
}

/// Payload of the `error` outcome.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Verification failed: {0}")]
    Verify(#[source] VerifyError),
}
