// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! Deletes RabbitMQ queues by name, or all of them.
//!
//! Queues are discovered through the management API and deleted over AMQP.

pub mod channel;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod management;
pub mod queue;
pub mod runner;
