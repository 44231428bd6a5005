//! In-memory connector for tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use super::traits::{ConnectConfig, Connection, Connector};
use crate::error::BrokerError;

enum Behavior {
    Accept,
    Credentials { user: String, passwd: String },
    Fail(BrokerError),
}

/// Connector that records every attempt and answers from a fixed script.
pub(crate) struct MockConnector {
    behavior: Behavior,
    disconnect_error: Option<BrokerError>,
    calls: Mutex<Vec<ConnectConfig>>,
    attempts: AtomicU32,
    disconnects: Arc<AtomicU32>,
}

impl MockConnector {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            disconnect_error: None,
            calls: Mutex::new(Vec::new()),
            attempts: AtomicU32::new(0),
            disconnects: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn accepting() -> Self {
        Self::with_behavior(Behavior::Accept)
    }

    /// Accept exactly one username/password pair.
    pub fn with_credentials(user: &str, passwd: &str) -> Self {
        Self::with_behavior(Behavior::Credentials {
            user: user.into(),
            passwd: passwd.into(),
        })
    }

    pub fn failing(err: BrokerError) -> Self {
        Self::with_behavior(Behavior::Fail(err))
    }

    pub fn disconnect_error(mut self, err: BrokerError) -> Self {
        self.disconnect_error = Some(err);
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> u32 {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<ConnectConfig> {
        self.calls.lock().unwrap().clone()
    }

    fn connection(&self) -> MockConnection {
        MockConnection {
            error: self.disconnect_error.clone(),
            disconnects: self.disconnects.clone(),
        }
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Connection = MockConnection;

    async fn connect(&self, config: &ConnectConfig) -> Result<MockConnection, BrokerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(config.clone());

        match &self.behavior {
            Behavior::Accept => Ok(self.connection()),
            Behavior::Credentials { user, passwd } => {
                if &config.user == user && &config.passwd == passwd {
                    Ok(self.connection())
                } else {
                    Err(BrokerError::Rejected("Invalid user or password".into()))
                }
            }
            Behavior::Fail(err) => Err(err.clone()),
        }
    }
}

pub(crate) struct MockConnection {
    error: Option<BrokerError>,
    disconnects: Arc<AtomicU32>,
}

#[async_trait]
impl Connection for MockConnection {
    async fn disconnect(&mut self) -> Result<(), BrokerError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        match self.error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
