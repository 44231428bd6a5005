//! Strategy trait definition.

use async_trait::async_trait;
use poem::http::StatusCode;

use super::request::AuthRequest;
use crate::error::AuthError;
use crate::types::Info;

/// The single result of an authentication attempt.
#[derive(Debug)]
pub enum AuthOutcome<U> {
    /// The request is authenticated as `user`.
    Success { user: U, info: Option<Info> },
    /// The request is not authenticated. `status` is `None` when the strategy
    /// leaves the choice to the caller.
    Fail {
        info: Option<Info>,
        status: Option<StatusCode>,
    },
    /// Authentication could not be carried out.
    Error(AuthError),
}

impl<U> AuthOutcome<U> {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }
}

/// Per-call options, taking precedence over the strategy's own messages.
#[derive(Debug, Clone, Default)]
pub struct AuthenticateOptions {
    pub invalid_credentials: Option<String>,
    pub bad_request_message: Option<String>,
}

/// Trait for authentication strategies.
///
/// Implementations must be thread-safe (`Send + Sync`) since a single
/// strategy serves concurrent requests.
#[async_trait]
pub trait Strategy: Send + Sync {
    type User: Send;

    /// Name the strategy is registered under.
    fn name(&self) -> &'static str;

    /// Authenticate a request.
    async fn authenticate(
        &self,
        req: &AuthRequest,
        options: &AuthenticateOptions,
    ) -> AuthOutcome<Self::User>;
}
