// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Error Types for Queue Cleanup
//!
//! Every failure a cleanup run can hit is expressed as a `QcleanError`. None of
//! them are recovered locally: the run stops at the first one and the binary
//! prints it before exiting with a non-zero status.

use thiserror::Error;

/// Represents errors that can occur while discovering or deleting queues.
///
/// Each variant carries enough context to render a single line for the operator.
/// Transport errors are flattened into strings at the client boundary so the
/// enum stays comparable in tests.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QcleanError {
    /// Invalid or missing user input, detected before any network activity
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Error establishing a connection to the RabbitMQ server
    #[error("failed to connect to RabbitMQ: {0}")]
    ConnectionError(String),

    /// Error creating a channel from an established connection
    #[error("failed to open a channel: {0}")]
    ChannelError(String),

    /// Error listing queues through the management API
    #[error("failed to list queues from the management API: {0}")]
    DiscoveryError(String),

    /// The broker rejected the deletion of the given queue
    #[error("failed to delete the queue `{0}`: {1}")]
    DeleteError(String, String),

    /// The run report could not be written
    #[error("failed to write the report: {0}")]
    OutputError(String),
}
