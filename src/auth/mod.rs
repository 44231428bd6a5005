//! Authentication strategies.
//!
//! This module follows the Passport strategy model: a [`Strategy`] inspects a
//! request and settles on exactly one [`AuthOutcome`] (success, fail or
//! error).
//!
//! # Available Strategies
//!
//! - [`AkeraStrategy`]: checks credentials by connecting to an Akera broker
//!
//! # Example
//!
//! ```ignore
//! use akera_auth::{AkeraStrategy, ServerOptions, StrategyOptions, verify_fn, Verdict};
//!
//! let strategy = AkeraStrategy::new(
//!     StrategyOptions::new(ServerOptions::new("localhost", 8383)),
//!     broker_client,
//! )?
//! .with_verifier(verify_fn(|principal| async move {
//!     Ok(Verdict::accept(principal))
//! }));
//!
//! let outcome = strategy.authenticate(&request, &AuthenticateOptions::default()).await;
//! ```

pub(crate) mod request;
mod strategy;
mod traits;
mod verify;

pub use request::AuthRequest;
pub use strategy::AkeraStrategy;
pub use traits::{AuthOutcome, AuthenticateOptions, Strategy};
pub use verify::{
    FnVerifier, PassThrough, RequestFnVerifier, Verdict, Verifier, verify_fn,
    verify_with_request_fn,
};
