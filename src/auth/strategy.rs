//! Strategy that checks credentials against an Akera broker.
//!
//! ## Authentication Flow
//!
//! 1. **Credential extraction**: read the username and password fields from
//!    the body, then the query string. Missing credentials fail with 400
//!    without contacting the broker.
//!
//! 2. **Broker check**: connect to the configured server with the
//!    credentials and disconnect right away. Any connector error fails with
//!    401.
//!
//! 3. **Verification**: hand the resulting [`Principal`] to the verifier and
//!    map its verdict onto the outcome.

use async_trait::async_trait;
use poem::http::StatusCode;
use tracing::{debug, info, warn};

use super::request::AuthRequest;
use super::traits::{AuthOutcome, AuthenticateOptions, Strategy};
use super::verify::{PassThrough, Verdict, Verifier};
use crate::broker::{ConnectConfig, Connection, Connector};
use crate::config::{DEFAULT_BAD_REQUEST_MESSAGE, ServerOptions, Settings, StrategyOptions};
use crate::error::{AuthError, BrokerError, ConfigError};
use crate::types::{Info, Principal};

const STRATEGY_NAME: &str = "akera";

/// Akera broker authentication strategy.
///
/// `C` opens broker connections; `V` decides on the final user once the
/// broker accepted the credentials.
pub struct AkeraStrategy<C, V = PassThrough> {
    settings: Settings,
    connector: C,
    verifier: V,
}

impl<C: Connector> AkeraStrategy<C> {
    /// Build a strategy without a custom verifier.
    ///
    /// Fails when `options` has no server entry, or its host is empty or its
    /// port is zero.
    pub fn new(options: StrategyOptions, connector: C) -> Result<Self, ConfigError> {
        let settings = options.validate()?;
        debug!(
            "Akera strategy configured for {}:{} (ssl: {})",
            settings.server.host, settings.server.port, settings.server.use_ssl
        );

        Ok(Self {
            settings,
            connector,
            verifier: PassThrough,
        })
    }
}

impl<C, V> AkeraStrategy<C, V> {
    /// Replace the verifier, and with it the user type.
    pub fn with_verifier<W: Verifier>(self, verifier: W) -> AkeraStrategy<C, W> {
        AkeraStrategy {
            settings: self.settings,
            connector: self.connector,
            verifier,
        }
    }

    pub fn server(&self) -> &ServerOptions {
        &self.settings.server
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn connect_config(&self, user: String, passwd: String) -> ConnectConfig {
        let server = &self.settings.server;
        ConnectConfig {
            host: server.host.clone(),
            port: server.port,
            user,
            passwd,
            use_ssl: server.use_ssl,
        }
    }

    fn bad_request<U>(&self, options: &AuthenticateOptions) -> AuthOutcome<U> {
        let message = options
            .bad_request_message
            .as_deref()
            .or(self.settings.bad_request_message.as_deref())
            .unwrap_or(DEFAULT_BAD_REQUEST_MESSAGE);

        AuthOutcome::Fail {
            info: Some(Info::new(message)),
            status: Some(StatusCode::BAD_REQUEST),
        }
    }

    fn invalid_credentials<U>(
        &self,
        options: &AuthenticateOptions,
        err: &BrokerError,
    ) -> AuthOutcome<U> {
        let message = options
            .invalid_credentials
            .clone()
            .or_else(|| self.settings.invalid_credentials.clone())
            .unwrap_or_else(|| err.to_string());

        AuthOutcome::Fail {
            info: Some(Info::new(message)),
            status: Some(StatusCode::UNAUTHORIZED),
        }
    }
}

impl<C: Connector, V> AkeraStrategy<C, V> {
    /// Open a connection with the credentials and close it again.
    async fn check_credentials(&self, config: &ConnectConfig) -> Result<(), BrokerError> {
        let mut connection = self.connector.connect(config).await?;
        connection.disconnect().await
    }
}

#[async_trait]
impl<C: Connector, V: Verifier> Strategy for AkeraStrategy<C, V> {
    type User = V::User;

    fn name(&self) -> &'static str {
        STRATEGY_NAME
    }

    async fn authenticate(
        &self,
        req: &AuthRequest,
        options: &AuthenticateOptions,
    ) -> AuthOutcome<V::User> {
        let username = req.credential(&self.settings.username_field);
        let password = req.credential(&self.settings.password_field);

        let (Some(username), Some(password)) = (username, password) else {
            debug!(
                "Missing credentials: expected fields '{}' and '{}'",
                self.settings.username_field, self.settings.password_field
            );
            return self.bad_request(options);
        };

        let config = self.connect_config(username, password);
        debug!(
            "Checking credentials of {} against {}",
            config.user,
            config.address()
        );

        if let Err(e) = self.check_credentials(&config).await {
            warn!("Broker at {} rejected {}: {}", config.address(), config.user, e);
            return self.invalid_credentials(options, &e);
        }

        let principal = Principal::new(config.user.clone());
        let forwarded = self.settings.pass_req_to_callback.then_some(req);

        match self.verifier.verify(principal, forwarded).await {
            Ok(Verdict::Accept { user, info }) => {
                info!("Authenticated {} against {}", config.user, config.address());
                AuthOutcome::Success { user, info }
            }
            Ok(Verdict::Reject { info }) => {
                debug!("Verifier rejected a principal accepted by the broker");
                AuthOutcome::Fail { info, status: None }
            }
            Err(e) => {
                warn!("Verifier failed: {}", e);
                AuthOutcome::Error(AuthError::Verify(e))
            }
        }
    }
}
