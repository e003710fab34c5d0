// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Run Configuration
//!
//! Plain values describing one cleanup run: which queues to delete and how to
//! reach the broker. The CLI shell fills them in and passes them explicitly to
//! the clients and the runner, nothing is read from process-wide state.

use crate::queue::TargetSpec;
use lapin::uri::{AMQPAuthority, AMQPUri, AMQPUserInfo};
use std::fmt;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_AMQP_PORT: u16 = 5672;
pub const DEFAULT_MANAGEMENT_PORT: u16 = 15672;
pub const DEFAULT_USER: &str = "guest";
pub const DEFAULT_PASSWORD: &str = "guest";

/// Broker credentials, shared by the AMQP and the management clients.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials::new(DEFAULT_USER, DEFAULT_PASSWORD)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Where the broker lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    pub host: String,
    pub amqp_port: u16,
    pub management_port: u16,
    pub credentials: Credentials,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        BrokerSettings {
            host: DEFAULT_HOST.to_owned(),
            amqp_port: DEFAULT_AMQP_PORT,
            management_port: DEFAULT_MANAGEMENT_PORT,
            credentials: Credentials::default(),
        }
    }
}

impl BrokerSettings {
    /// Builds the AMQP URI for the default vhost.
    ///
    /// The URI is assembled field by field, so credentials containing `@`, `:`
    /// or `/` reach the broker untouched.
    pub fn amqp_uri(&self) -> AMQPUri {
        AMQPUri {
            authority: AMQPAuthority {
                userinfo: AMQPUserInfo {
                    username: self.credentials.user.clone(),
                    password: self.credentials.password.clone(),
                },
                host: self.host.clone(),
                port: self.amqp_port,
            },
            ..AMQPUri::default()
        }
    }

    /// Endpoint that lists every queue. Credentials travel as basic auth.
    pub fn queues_endpoint(&self) -> String {
        format!("http://{}:{}/api/queues", self.host, self.management_port)
    }

    /// AMQP address safe to print: the password is left out.
    pub fn display_amqp_address(&self) -> String {
        format!(
            "amqp://{}@{}:{}/",
            self.credentials.user, self.host, self.amqp_port
        )
    }
}

/// Everything a single run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub target: TargetSpec,
    pub broker: BrokerSettings,
}
