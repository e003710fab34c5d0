// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Queue Names and Deletion Targets
//!
//! This module provides the two values a cleanup run is built around: the name
//! of a queue as advertised by the broker, and the user's selection of which
//! queues should go.

use crate::errors::QcleanError;
use std::fmt;

/// Selector value that targets every queue on the broker.
pub const ALL_QUEUES: &str = "all";

/// Name of a queue on the broker. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueName(String);

impl QueueName {
    /// Creates a queue name, rejecting the empty string.
    ///
    /// # Parameters
    /// * `name` - The queue name
    ///
    /// # Returns
    /// The queue name, or `ConfigError` when `name` is empty
    pub fn new(name: impl Into<String>) -> Result<QueueName, QcleanError> {
        let name = name.into();
        if name.is_empty() {
            return Err(QcleanError::ConfigError(
                "queue name must not be empty".to_owned(),
            ));
        }

        Ok(QueueName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which queues a run should delete.
///
/// Built once from user input and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// Delete the single queue with exactly this name
    Literal(QueueName),
    /// Delete every queue the broker advertises
    All,
}

impl TargetSpec {
    /// Parses the queue selector given on the command line.
    ///
    /// The literal `all` (case-sensitive) selects every queue, anything else is
    /// taken as a queue name.
    ///
    /// # Parameters
    /// * `input` - The raw selector
    ///
    /// # Returns
    /// The target, or `ConfigError` when no selector was given
    pub fn parse(input: &str) -> Result<TargetSpec, QcleanError> {
        if input.is_empty() {
            return Err(QcleanError::ConfigError(
                "no queue name provided".to_owned(),
            ));
        }

        if input == ALL_QUEUES {
            return Ok(TargetSpec::All);
        }

        Ok(TargetSpec::Literal(QueueName::new(input)?))
    }

    /// Whether the given discovered queue is selected by this target.
    pub fn matches(&self, queue: &QueueName) -> bool {
        match self {
            TargetSpec::All => true,
            TargetSpec::Literal(name) => name == queue,
        }
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSpec::All => f.write_str(ALL_QUEUES),
            TargetSpec::Literal(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_empty_queue_name() {
        assert!(matches!(
            QueueName::new(""),
            Err(QcleanError::ConfigError(_))
        ));
    }

    #[test]
    fn should_parse_all_selector() {
        assert_eq!(TargetSpec::parse("all"), Ok(TargetSpec::All));
    }

    #[test]
    fn should_treat_other_casing_of_all_as_a_name() {
        let target = TargetSpec::parse("ALL").unwrap();
        assert_eq!(
            target,
            TargetSpec::Literal(QueueName::new("ALL").unwrap())
        );
    }

    #[test]
    fn should_reject_missing_selector() {
        assert!(matches!(
            TargetSpec::parse(""),
            Err(QcleanError::ConfigError(_))
        ));
    }

    #[test]
    fn literal_matches_only_its_own_name() {
        let target = TargetSpec::parse("logs").unwrap();

        assert!(target.matches(&QueueName::new("logs").unwrap()));
        assert!(!target.matches(&QueueName::new("orders").unwrap()));
        assert!(!target.matches(&QueueName::new("logs-dlq").unwrap()));
    }

    #[test]
    fn all_matches_everything() {
        let target = TargetSpec::All;

        assert!(target.matches(&QueueName::new("orders").unwrap()));
        assert!(target.matches(&QueueName::new("all").unwrap()));
    }
}
