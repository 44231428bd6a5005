//! Poem integration.
//!
//! [`AkeraAuth`] runs a [`Strategy`] in front of an endpoint, the way a
//! Passport `authenticate` middleware sits in front of a route handler:
//!
//! | Outcome | Response |
//! |---------|----------|
//! | `Success` | inner endpoint, with [`Authenticated`] in the request extensions |
//! | `Fail` | the fail status (401 if none) with the info as JSON |
//! | `Error` | 500 |
//! | body over `max_body_size` | 413, the strategy is not run |
//!
//! Credentials are read from the query string and from JSON or
//! urlencoded form bodies. The body is put back for the inner endpoint.
//! Bodies are read up to [`DEFAULT_MAX_BODY_SIZE`] bytes unless
//! [`AkeraAuth::max_body_size`] says otherwise.
//!
//! ```ignore
//! let app = Route::new()
//!     .at("/login", post(login))
//!     .with(AkeraAuth::new(strategy));
//! ```

use std::sync::Arc;

use poem::http::{StatusCode, header};
use poem::web::Json;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, warn};

use crate::auth::request::{form_to_json, parse_urlencoded};
use crate::auth::{AuthOutcome, AuthRequest, AuthenticateOptions, Strategy};
use crate::types::Info;

/// Largest JSON or form body read for credentials, in bytes.
pub const DEFAULT_MAX_BODY_SIZE: usize = 100 * 1024;

/// Request extension set after a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated<U> {
    pub user: U,
    pub info: Option<Info>,
}

/// Middleware that authenticates requests with a strategy.
pub struct AkeraAuth<S> {
    strategy: Arc<S>,
    options: AuthenticateOptions,
    max_body_size: usize,
}

impl<S: Strategy> AkeraAuth<S> {
    pub fn new(strategy: S) -> Self {
        Self::from_arc(Arc::new(strategy))
    }

    /// Share one strategy between several routes.
    pub fn from_arc(strategy: Arc<S>) -> Self {
        Self {
            strategy,
            options: AuthenticateOptions::default(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Per-call options passed to every `authenticate`.
    pub fn options(mut self, options: AuthenticateOptions) -> Self {
        self.options = options;
        self
    }

    /// Bodies larger than `bytes` are answered with 413.
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }
}

impl<E, S> Middleware<E> for AkeraAuth<S>
where
    E: Endpoint,
    S: Strategy + 'static,
    S::User: Clone + Send + Sync + 'static,
{
    type Output = AkeraAuthEndpoint<E, S>;

    fn transform(&self, ep: E) -> Self::Output {
        AkeraAuthEndpoint {
            inner: ep,
            strategy: self.strategy.clone(),
            options: self.options.clone(),
            max_body_size: self.max_body_size,
        }
    }
}

/// Endpoint produced by [`AkeraAuth`].
pub struct AkeraAuthEndpoint<E, S> {
    inner: E,
    strategy: Arc<S>,
    options: AuthenticateOptions,
    max_body_size: usize,
}

impl<E, S> Endpoint for AkeraAuthEndpoint<E, S>
where
    E: Endpoint,
    S: Strategy + 'static,
    S::User: Clone + Send + Sync + 'static,
{
    type Output = Response;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        let auth_req = read_auth_request(&mut req, self.max_body_size).await?;

        match self.strategy.authenticate(&auth_req, &self.options).await {
            AuthOutcome::Success { user, info } => {
                req.extensions_mut().insert(Authenticated { user, info });
                self.inner.call(req).await.map(IntoResponse::into_response)
            }
            AuthOutcome::Fail { info, status } => Ok(fail_response(info, status)),
            AuthOutcome::Error(e) => {
                error!(
                    "{} strategy error on {}: {}",
                    self.strategy.name(),
                    req.uri().path(),
                    e
                );
                Err(poem::Error::from_string(
                    e.to_string(),
                    StatusCode::INTERNAL_SERVER_ERROR,
                ))
            }
        }
    }
}

fn fail_response(info: Option<Info>, status: Option<StatusCode>) -> Response {
    let status = status.unwrap_or(StatusCode::UNAUTHORIZED);
    match info {
        Some(info) => Json(info).with_status(status).into_response(),
        None => status.into_response(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
}

fn body_kind(content_type: Option<&str>) -> Option<BodyKind> {
    let mime = content_type?.split(';').next()?.trim().to_ascii_lowercase();
    if mime == "application/json" || mime.ends_with("+json") {
        Some(BodyKind::Json)
    } else if mime == "application/x-www-form-urlencoded" {
        Some(BodyKind::Form)
    } else {
        None
    }
}

/// Extract the query string and a JSON or form body from a poem request.
///
/// The body bytes are put back on `req`. A JSON body that does not parse is
/// treated as absent. A body over `limit` bytes, by `Content-Length` or by
/// what was actually read, is a 413 error.
pub(crate) async fn read_auth_request(req: &mut Request, limit: usize) -> Result<AuthRequest> {
    let query = req
        .uri()
        .query()
        .map(|q| parse_urlencoded(q.as_bytes()))
        .unwrap_or_default();

    let body = match body_kind(req.content_type()) {
        None => None,
        Some(kind) => {
            let bytes = read_bounded(req, limit).await?;
            let parsed = match kind {
                BodyKind::Json => match serde_json::from_slice::<Value>(&bytes) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        debug!("Ignoring malformed JSON body: {}", e);
                        None
                    }
                },
                BodyKind::Form => Some(form_to_json(&bytes)),
            };
            req.set_body(bytes);
            parsed
        }
    };

    Ok(AuthRequest { body, query })
}

async fn read_bounded(req: &mut Request, limit: usize) -> Result<Vec<u8>> {
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    if let Some(len) = declared
        && len > limit as u64
    {
        warn!("Rejecting {} byte body, limit is {}", len, limit);
        return Err(poem::Error::from_status(StatusCode::PAYLOAD_TOO_LARGE));
    }

    // One extra byte tells an over-limit body apart from one exactly at it.
    let mut bytes = Vec::new();
    req.take_body()
        .into_async_read()
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| poem::Error::from_string(e.to_string(), StatusCode::BAD_REQUEST))?;

    if bytes.len() > limit {
        warn!("Rejecting body over {} bytes", limit);
        return Err(poem::Error::from_status(StatusCode::PAYLOAD_TOO_LARGE));
    }
    Ok(bytes)
}
