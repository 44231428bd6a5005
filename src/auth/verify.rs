//! Custom verification hooks.
//!
//! After the broker accepts the credentials, the strategy hands the
//! [`Principal`] to a [`Verifier`], which decides the final user:
//!
//! | Verifier result | Strategy outcome |
//! |-----------------|------------------|
//! | `Err(err)` | `Error(err)` |
//! | `Ok(Verdict::Reject { info })` | `Fail { info, status: None }` |
//! | `Ok(Verdict::Accept { user, info })` | `Success { user, info }` |

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

use super::request::AuthRequest;
use crate::error::VerifyError;
use crate::types::{Info, Principal};

/// Decision reached by a verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<U> {
    Accept { user: U, info: Option<Info> },
    Reject { info: Option<Info> },
}

impl<U> Verdict<U> {
    pub fn accept(user: U) -> Self {
        Verdict::Accept { user, info: None }
    }

    pub fn reject(info: Option<Info>) -> Self {
        Verdict::Reject { info }
    }
}

/// Trait for custom verification hooks.
#[async_trait]
pub trait Verifier: Send + Sync {
    type User: Send;

    /// Decide on a principal the broker accepted.
    ///
    /// `req` is only set when the strategy was built with
    /// `pass_req_to_callback`.
    async fn verify(
        &self,
        principal: Principal,
        req: Option<&AuthRequest>,
    ) -> Result<Verdict<Self::User>, VerifyError>;
}

/// Verifier used when none is configured: accepts the principal as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

#[async_trait]
impl Verifier for PassThrough {
    type User = Principal;

    async fn verify(
        &self,
        principal: Principal,
        _req: Option<&AuthRequest>,
    ) -> Result<Verdict<Principal>, VerifyError> {
        Ok(Verdict::accept(principal))
    }
}

/// Verifier backed by an async closure over the principal.
pub struct FnVerifier<F, U> {
    f: F,
    _user: PhantomData<fn() -> U>,
}

/// Wrap an async closure taking the principal.
pub fn verify_fn<F, Fut, U>(f: F) -> FnVerifier<F, U>
where
    F: Fn(Principal) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Verdict<U>, VerifyError>> + Send,
    U: Send,
{
    FnVerifier {
        f,
        _user: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, U> Verifier for FnVerifier<F, U>
where
    F: Fn(Principal) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Verdict<U>, VerifyError>> + Send,
    U: Send,
{
    type User = U;

    async fn verify(
        &self,
        principal: Principal,
        _req: Option<&AuthRequest>,
    ) -> Result<Verdict<U>, VerifyError> {
        (self.f)(principal).await
    }
}

/// Verifier backed by an async closure over the request and the principal.
pub struct RequestFnVerifier<F, U> {
    f: F,
    _user: PhantomData<fn() -> U>,
}

/// Wrap an async closure taking the request and the principal.
///
/// The request is `None` unless the strategy passes requests to its
/// verifier.
pub fn verify_with_request_fn<F, Fut, U>(f: F) -> RequestFnVerifier<F, U>
where
    F: Fn(Option<AuthRequest>, Principal) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Verdict<U>, VerifyError>> + Send,
    U: Send,
{
    RequestFnVerifier {
        f,
        _user: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, U> Verifier for RequestFnVerifier<F, U>
where
    F: Fn(Option<AuthRequest>, Principal) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Verdict<U>, VerifyError>> + Send,
    U: Send,
{
    type User = U;

    async fn verify(
        &self,
        principal: Principal,
        req: Option<&AuthRequest>,
    ) -> Result<Verdict<U>, VerifyError> {
        (self.f)(req.cloned(), principal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pass_through_accepts_principal() {
        let verdict = PassThrough.verify(Principal::new("u1"), None).await.unwrap();
        assert_eq!(verdict, Verdict::accept(Principal::new("u1")));
    }

    #[tokio::test]
    async fn test_fn_verifier_maps_user() {
        let verifier = verify_fn(|principal: Principal| async move {
            Ok::<_, VerifyError>(Verdict::Accept {
                user: principal.name.to_uppercase(),
                info: Some(Info::new("welcome")),
            })
        });

        let verdict = verifier.verify(Principal::new("u1"), None).await.unwrap();
        assert_eq!(
            verdict,
            Verdict::Accept {
                user: "U1".to_string(),
                info: Some(Info::new("welcome"))
            }
        );
    }

    #[tokio::test]
    async fn test_request_fn_verifier_sees_request() {
        let verifier = verify_with_request_fn(|req: Option<AuthRequest>, principal: Principal| {
            async move {
                let tenant = req.and_then(|r| r.query.get("tenant").cloned());
                Ok::<_, VerifyError>(Verdict::accept((principal.name, tenant)))
            }
        });

        let req = AuthRequest::new().with_query_param("tenant", "acme");
        let verdict = verifier
            .verify(Principal::new("u1"), Some(&req))
            .await
            .unwrap();
        assert_eq!(
            verdict,
            Verdict::accept(("u1".to_string(), Some("acme".to_string())))
        );
    }

    #[tokio::test]
    async fn test_verifier_error_propagates() {
        let verifier = verify_fn(|_principal: Principal| async move {
            Err::<Verdict<Principal>, VerifyError>("directory unavailable".into())
        });

        let err = verifier.verify(Principal::new("u1"), None).await.unwrap_err();
        assert_eq!(err.to_string(), "directory unavailable");
    }
}
