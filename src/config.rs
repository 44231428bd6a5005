//! Configuration for the Akera strategy.
//!
//! [`StrategyOptions`] mirrors the Passport option object and deserializes
//! from the same camelCase keys (`usernameField`, `passReqToCallback`, ...).
//! Validation happens once, when the strategy is built.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AKERA_HOST` | - | Broker host for [`ServerOptions::from_env`] |
//! | `AKERA_PORT` | - | Broker port for [`ServerOptions::from_env`] |
//! | `AKERA_USE_SSL` | false | Connect over TLS |

use std::env;

use serde::Deserialize;

use crate::error::ConfigError;

pub(crate) const DEFAULT_USERNAME_FIELD: &str = "username";

pub(crate) const DEFAULT_PASSWORD_FIELD: &str = "password";

pub(crate) const DEFAULT_BAD_REQUEST_MESSAGE: &str = "Missing credentials";

pub(crate) const HOST_ENV_VAR: &str = "AKERA_HOST";

pub(crate) const PORT_ENV_VAR: &str = "AKERA_PORT";

pub(crate) const USE_SSL_ENV_VAR: &str = "AKERA_USE_SSL";

/// Address of the broker credentials are checked against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default, alias = "useSSL")]
    pub use_ssl: bool,
}

impl ServerOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            use_ssl: false,
        }
    }

    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    /// Read server options from `AKERA_HOST`, `AKERA_PORT` and `AKERA_USE_SSL`.
    ///
    /// Unset host or port are left empty and rejected later by
    /// [`StrategyOptions::validate`]; a port that does not parse is an error
    /// right away.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var(HOST_ENV_VAR).unwrap_or_default();

        let port = match env::var(PORT_ENV_VAR) {
            Ok(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidEnv {
                name: PORT_ENV_VAR,
                value,
            })?,
            Err(_) => 0,
        };

        let use_ssl = env::var(USE_SSL_ENV_VAR)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            use_ssl,
        })
    }
}

/// Options accepted when building an [`AkeraStrategy`](crate::AkeraStrategy).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOptions {
    pub username_field: Option<String>,
    pub password_field: Option<String>,
    pub server: Option<ServerOptions>,
    #[serde(default)]
    pub pass_req_to_callback: bool,
    pub invalid_credentials: Option<String>,
    pub bad_request_message: Option<String>,
}

impl StrategyOptions {
    pub fn new(server: ServerOptions) -> Self {
        Self {
            server: Some(server),
            ..Default::default()
        }
    }

    pub fn username_field(mut self, field: impl Into<String>) -> Self {
        self.username_field = Some(field.into());
        self
    }

    pub fn password_field(mut self, field: impl Into<String>) -> Self {
        self.password_field = Some(field.into());
        self
    }

    pub fn pass_req_to_callback(mut self, enabled: bool) -> Self {
        self.pass_req_to_callback = enabled;
        self
    }

    pub fn invalid_credentials(mut self, message: impl Into<String>) -> Self {
        self.invalid_credentials = Some(message.into());
        self
    }

    pub fn bad_request_message(mut self, message: impl Into<String>) -> Self {
        self.bad_request_message = Some(message.into());
        self
    }

    /// Check the server entry and fill in default field names.
    pub(crate) fn validate(self) -> Result<Settings, ConfigError> {
        let server = self.server.ok_or(ConfigError::MissingServer)?;
        if server.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        Ok(Settings {
            username_field: non_empty_or(self.username_field, DEFAULT_USERNAME_FIELD),
            password_field: non_empty_or(self.password_field, DEFAULT_PASSWORD_FIELD),
            server,
            pass_req_to_callback: self.pass_req_to_callback,
            invalid_credentials: self.invalid_credentials,
            bad_request_message: self.bad_request_message,
        })
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Validated options with defaults applied.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub username_field: String,
    pub password_field: String,
    pub server: ServerOptions,
    pub pass_req_to_callback: bool,
    pub invalid_credentials: Option<String>,
    pub bad_request_message: Option<String>,
}
