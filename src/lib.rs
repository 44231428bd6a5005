#![deny(warnings)]
#![deny(clippy::unwrap_used)]

//! Passport-style authentication strategy backed by an Akera broker.
//!
//! Credentials are read from the request body or query string and checked by
//! opening (and immediately closing) a connection to the configured broker.
//!
//! - `auth`: the [`Strategy`] trait, [`AkeraStrategy`] and verifier hooks
//! - `broker`: the connector collaborator and its decorators
//! - `config`: strategy options and env var resolution
//! - `error`: error types
//! - `types`: serializable principal and info records
//! - `web`: poem middleware

pub mod auth;
pub mod broker;
pub mod config;
pub mod error;
pub mod types;
pub mod web;

pub use auth::{
    AkeraStrategy, AuthOutcome, AuthRequest, AuthenticateOptions, PassThrough, Strategy, Verdict,
    Verifier, verify_fn, verify_with_request_fn,
};
pub use broker::{ConnectConfig, Connection, Connector};
pub use config::{ServerOptions, StrategyOptions};
pub use error::{AuthError, BrokerError, ConfigError, VerifyError};
pub use types::{Info, Principal};
pub use web::{AkeraAuth, Authenticated, DEFAULT_MAX_BODY_SIZE};
