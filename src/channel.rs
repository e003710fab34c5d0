// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # AMQP Connection, Channel and Queue Deletion
//!
//! This module handles the AMQP side of a cleanup run: it establishes the
//! connection to the RabbitMQ server, opens the single control channel used
//! for the whole run, issues the queue deletions and releases both resources
//! when the run is over.

use crate::{config::BrokerSettings, errors::QcleanError, queue::QueueName};
use async_trait::async_trait;
use lapin::{
    options::QueueDeleteOptions, types::LongString, Channel, Connection, ConnectionProperties,
};
use tracing::{debug, error, warn};

/// Name advertised to the broker for our connection.
pub const CONNECTION_NAME: &str = "qclean";

const REPLY_SUCCESS: u16 = 200;

/// Deletes a queue on the broker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueDeleter {
    /// Deletes `queue` regardless of its consumers or pending messages.
    async fn delete(&self, queue: &QueueName) -> Result<(), QcleanError>;
}

/// Establishes an AMQP connection to the broker described by `settings`.
///
/// # Parameters
/// * `settings` - Host, port and credentials of the broker
///
/// # Returns
/// The connection, or `ConnectionError` if the broker is unreachable,
/// rejects the credentials or the protocol negotiation fails
pub async fn connect(settings: &BrokerSettings) -> Result<Connection, QcleanError> {
    debug!("creating amqp connection...");
    let options = ConnectionProperties::default()
        .with_connection_name(LongString::from(CONNECTION_NAME.to_owned()));

    match Connection::connect_uri(settings.amqp_uri(), options).await {
        Ok(c) => {
            debug!("amqp connected");
            Ok(c)
        }
        Err(err) => {
            error!(error = err.to_string(), "failure to connect");
            Err(QcleanError::ConnectionError(err.to_string()))
        }
    }
}

/// Opens a channel on an established connection.
///
/// # Returns
/// The channel, or `ChannelError` if the connection is already closed or the
/// broker refuses to allocate a channel
pub async fn open_channel(conn: &Connection) -> Result<Channel, QcleanError> {
    debug!("creating amqp channel...");
    match conn.create_channel().await {
        Ok(c) => {
            debug!("channel created");
            Ok(c)
        }
        Err(err) => {
            error!(error = err.to_string(), "error to create the channel");
            Err(QcleanError::ChannelError(err.to_string()))
        }
    }
}

/// Connection and control channel owned by a single cleanup run.
pub struct AmqpBroker {
    conn: Connection,
    channel: Channel,
}

impl AmqpBroker {
    /// Connects to the broker and opens the control channel.
    ///
    /// If the channel cannot be opened the fresh connection is closed before
    /// the error is returned.
    pub async fn connect(settings: &BrokerSettings) -> Result<AmqpBroker, QcleanError> {
        let conn = connect(settings).await?;

        match open_channel(&conn).await {
            Ok(channel) => Ok(AmqpBroker { conn, channel }),
            Err(err) => {
                close_connection(&conn).await;
                Err(err)
            }
        }
    }

    /// Closes the channel, then the connection.
    ///
    /// Failures are logged and swallowed: by the time we close, the outcome of
    /// the run is already decided.
    pub async fn close(self) {
        debug!("closing amqp channel...");
        if let Err(err) = self.channel.close(REPLY_SUCCESS, "OK").await {
            warn!(error = err.to_string(), "failure to close the channel");
        }

        close_connection(&self.conn).await;
    }
}

async fn close_connection(conn: &Connection) {
    debug!("closing amqp connection...");
    if let Err(err) = conn.close(REPLY_SUCCESS, "OK").await {
        warn!(error = err.to_string(), "failure to close the connection");
    }
}

#[async_trait]
impl QueueDeleter for AmqpBroker {
    async fn delete(&self, queue: &QueueName) -> Result<(), QcleanError> {
        debug!("deleting queue: {}", queue);

        match self
            .channel
            .queue_delete(
                queue.as_str(),
                QueueDeleteOptions {
                    if_unused: false,
                    if_empty: false,
                    nowait: false,
                },
            )
            .await
        {
            Ok(purged) => {
                debug!(
                    queue = queue.as_str(),
                    messages = purged,
                    "queue was deleted"
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    error = err.to_string(),
                    queue = queue.as_str(),
                    "error to delete the queue"
                );
                Err(QcleanError::DeleteError(
                    queue.as_str().to_owned(),
                    err.to_string(),
                ))
            }
        }
    }
}
