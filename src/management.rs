// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Queue Discovery through the Management API
//!
//! The broker's HTTP management API is the source of truth for which queues
//! exist. This module lists them with a single `GET /api/queues` call and
//! decodes the answer into queue names.

use crate::{config::BrokerSettings, errors::QcleanError, queue::QueueName};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

/// Lists the queues currently known to the broker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueDiscovery {
    /// Returns every queue name, in the order the broker reported them.
    async fn list_queues(&self) -> Result<Vec<QueueName>, QcleanError>;
}

/// Subset of a queue object returned by the management API.
#[derive(Debug, Deserialize)]
struct QueueInfo {
    name: String,
}

/// Decodes a management API response body into queue names.
///
/// The body must be a JSON array of objects, each with a non-empty `name`
/// string. Any other field is ignored.
///
/// # Parameters
/// * `body` - The raw response body
///
/// # Returns
/// The queue names in response order, or `DiscoveryError` on malformed input
pub fn decode_queues(body: &str) -> Result<Vec<QueueName>, QcleanError> {
    let infos: Vec<QueueInfo> = serde_json::from_str(body).map_err(|err| {
        error!(error = err.to_string(), "failure to decode queue list");
        QcleanError::DiscoveryError(format!("invalid response body: {}", err))
    })?;

    infos
        .into_iter()
        .map(|info| {
            QueueName::new(info.name).map_err(|_| {
                QcleanError::DiscoveryError("queue with an empty name in response".to_owned())
            })
        })
        .collect()
}

/// `QueueDiscovery` backed by the RabbitMQ management plugin.
pub struct ManagementClient {
    http: reqwest::Client,
    endpoint: String,
    user: String,
    password: String,
}

impl ManagementClient {
    /// Creates a client for the broker described by `settings`.
    ///
    /// No request is made until `list_queues` is called.
    pub fn new(settings: &BrokerSettings) -> ManagementClient {
        ManagementClient {
            http: reqwest::Client::new(),
            endpoint: settings.queues_endpoint(),
            user: settings.credentials.user.clone(),
            password: settings.credentials.password.clone(),
        }
    }
}

#[async_trait]
impl QueueDiscovery for ManagementClient {
    async fn list_queues(&self) -> Result<Vec<QueueName>, QcleanError> {
        debug!(endpoint = %self.endpoint, "listing queues...");

        let response = match self
            .http
            .get(&self.endpoint)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await
        {
            Ok(r) => Ok(r),
            Err(err) => {
                error!(error = err.to_string(), "failure to reach the management api");
                Err(QcleanError::DiscoveryError(err.to_string()))
            }
        }?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "management api refused the request");
            return Err(QcleanError::DiscoveryError(format!(
                "unexpected status {}",
                status
            )));
        }

        let body = response.text().await.map_err(|err| {
            error!(error = err.to_string(), "failure to read the response body");
            QcleanError::DiscoveryError(err.to_string())
        })?;

        let queues = decode_queues(&body)?;
        debug!(count = queues.len(), "queues listed");

        Ok(queues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    #[test]
    fn should_decode_names_in_response_order() {
        let body = r#"[
            {"name": "orders", "vhost": "/", "messages": 12, "durable": true},
            {"name": "logs", "vhost": "/", "consumers": 0}
        ]"#;

        let queues = decode_queues(body).unwrap();

        assert_eq!(
            queues,
            vec![
                QueueName::new("orders").unwrap(),
                QueueName::new("logs").unwrap()
            ]
        );
    }

    #[test]
    fn should_decode_empty_list() {
        assert!(decode_queues("[]").unwrap().is_empty());
    }

    #[test]
    fn should_fail_when_name_is_missing() {
        let result = decode_queues(r#"[{"vhost": "/"}]"#);

        assert!(matches!(result, Err(QcleanError::DiscoveryError(_))));
    }

    #[test]
    fn should_fail_when_body_is_not_a_list() {
        let result = decode_queues(r#"{"error": "not_authorised", "reason": "Login failed"}"#);

        assert!(matches!(result, Err(QcleanError::DiscoveryError(_))));
    }

    #[test]
    fn should_fail_on_empty_queue_name() {
        let result = decode_queues(r#"[{"name": ""}]"#);

        assert!(matches!(result, Err(QcleanError::DiscoveryError(_))));
    }

    #[tokio::test]
    async fn should_fail_when_broker_is_unreachable() {
        let settings = BrokerSettings {
            host: "127.0.0.1".to_owned(),
            management_port: 1,
            ..BrokerSettings::default()
        };

        let result = ManagementClient::new(&settings).list_queues().await;

        assert!(matches!(result, Err(QcleanError::DiscoveryError(_))));
    }

    #[tokio::test]
    async fn should_fail_with_status_when_request_is_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            stream
                .write_all(
                    b"HTTP/1.1 401 Unauthorized\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n[]",
                )
                .unwrap();
        });
        let settings = BrokerSettings {
            host: "127.0.0.1".to_owned(),
            management_port: port,
            ..BrokerSettings::default()
        };

        let result = ManagementClient::new(&settings).list_queues().await;
        server.join().unwrap();

        match result {
            Err(QcleanError::DiscoveryError(msg)) => assert!(msg.contains("401")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
