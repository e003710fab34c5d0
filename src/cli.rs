// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Command Line Interface
//!
//! Flag definitions for the `qclean` binary and their translation into a
//! `RunConfig`.
//!
//! The tool historically accepts Go-style flags: every long name may be given
//! with a single dash (`-queue`), and two flags only exist in a multi-character
//! single-dash form (`-ps`, `-url`). clap cannot express those, so the raw
//! arguments go through `normalize_args` first.

use crate::{
    config::{
        BrokerSettings, Credentials, RunConfig, DEFAULT_AMQP_PORT, DEFAULT_HOST,
        DEFAULT_MANAGEMENT_PORT, DEFAULT_PASSWORD, DEFAULT_USER,
    },
    errors::QcleanError,
    queue::TargetSpec,
};
use clap::{ArgAction, Parser};

pub const MISSING_QUEUE_MESSAGE: &str =
    "No queue name provided. Please provide a queue name using the -q or --queue flag.";

/// Single-dash spellings rewritten to their double-dash long form.
const SINGLE_DASH_FLAGS: &[(&str, &str)] = &[
    ("ps", "password"),
    ("url", "url"),
    ("queue", "queue"),
    ("port", "port"),
    ("user", "user"),
    ("password", "password"),
    ("management-port", "management-port"),
    ("help", "help"),
    ("version", "version"),
];

#[derive(Parser, Debug)]
#[command(
    name = "qclean",
    version,
    about = "Delete local rabbitmq queues",
    disable_version_flag = true,
    after_help = "Example:\n  qclean -q queue_name\n  qclean -q all -url rabbit.internal -u admin -ps secret"
)]
pub struct Cli {
    /// Queue name, or `all` to delete every queue
    #[arg(short = 'q', long = "queue", env = "QCLEAN_QUEUE")]
    pub queue: Option<String>,

    /// Broker AMQP port
    #[arg(short = 'p', long = "port", env = "RABBITMQ_PORT", default_value_t = DEFAULT_AMQP_PORT)]
    pub port: u16,

    /// Broker user name
    #[arg(short = 'u', long = "user", env = "RABBITMQ_USER", default_value = DEFAULT_USER)]
    pub user: String,

    /// Broker password (also `-ps`)
    #[arg(long = "password", env = "RABBITMQ_PASSWORD", default_value = DEFAULT_PASSWORD, hide_env_values = true)]
    pub password: String,

    /// Broker host (also `-url`)
    #[arg(long = "url", env = "RABBITMQ_HOST", default_value = DEFAULT_HOST)]
    pub url: String,

    /// Port of the HTTP management API
    #[arg(long = "management-port", env = "RABBITMQ_MANAGEMENT_PORT", default_value_t = DEFAULT_MANAGEMENT_PORT)]
    pub management_port: u16,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Cli {
    /// Builds the run configuration.
    ///
    /// # Returns
    /// The configuration, or `ConfigError` when no queue selector was given
    pub fn into_config(self) -> Result<RunConfig, QcleanError> {
        let target = match self.queue {
            Some(queue) => TargetSpec::parse(&queue)?,
            None => {
                return Err(QcleanError::ConfigError(
                    "no queue name provided".to_owned(),
                ))
            }
        };

        Ok(RunConfig {
            target,
            broker: BrokerSettings {
                host: self.url,
                amqp_port: self.port,
                management_port: self.management_port,
                credentials: Credentials::new(self.user, self.password),
            },
        })
    }
}

/// Rewrites Go-style single-dash long flags into the form clap understands.
///
/// `-ps secret` becomes `--password secret` and `-queue=logs` becomes
/// `--queue=logs`. Short flags (`-q`), values and the program name are left
/// alone.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = vec![];
    let mut args = args.into_iter();

    if let Some(program) = args.next() {
        out.push(program);
    }

    let mut expecting_value = false;
    while let Some(arg) = args.next() {
        if expecting_value {
            out.push(arg);
            expecting_value = false;
            continue;
        }

        if arg == "--" {
            out.push(arg);
            out.extend(args.by_ref());
            break;
        }

        let rewritten = rewrite_flag(&arg);
        expecting_value = takes_value(rewritten.as_deref().unwrap_or(&arg));
        out.push(rewritten.unwrap_or(arg));
    }

    out
}

fn rewrite_flag(arg: &str) -> Option<String> {
    let body = arg.strip_prefix('-')?;
    if body.starts_with('-') {
        return None;
    }

    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };

    let (_, long) = SINGLE_DASH_FLAGS.iter().find(|(alias, _)| *alias == name)?;

    Some(match value {
        Some(value) => format!("--{}={}", long, value),
        None => format!("--{}", long),
    })
}

/// Whether `flag` consumes the next argument as its value.
fn takes_value(flag: &str) -> bool {
    matches!(
        flag,
        "-q" | "-p"
            | "-u"
            | "--queue"
            | "--port"
            | "--user"
            | "--password"
            | "--url"
            | "--management-port"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueName;
    use clap::CommandFactory;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn parse(list: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args(list))).unwrap()
    }

    #[test]
    fn should_rewrite_multi_char_single_dash_flags() {
        let normalized = normalize_args(args(&[
            "qclean", "-q", "logs", "-ps", "secret", "-url", "rabbit", "-queue=orders",
        ]));

        assert_eq!(
            normalized,
            args(&[
                "qclean",
                "-q",
                "logs",
                "--password",
                "secret",
                "--url",
                "rabbit",
                "--queue=orders"
            ])
        );
    }

    #[test]
    fn should_not_rewrite_values_that_look_like_flags() {
        let normalized = normalize_args(args(&["qclean", "-ps", "-url", "-q", "-ps"]));

        assert_eq!(
            normalized,
            args(&["qclean", "--password", "-url", "-q", "-ps"])
        );
    }

    #[test]
    fn should_apply_defaults() {
        let config = parse(&["qclean", "-q", "logs"]).into_config().unwrap();

        assert_eq!(
            config.target,
            TargetSpec::Literal(QueueName::new("logs").unwrap())
        );
        assert_eq!(config.broker, BrokerSettings::default());
    }

    #[test]
    fn should_read_every_flag() {
        let config = parse(&[
            "qclean", "-q", "all", "-p", "5673", "-u", "admin", "-ps", "secret", "-url",
            "rabbit.internal",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.target, TargetSpec::All);
        assert_eq!(config.broker.host, "rabbit.internal");
        assert_eq!(config.broker.amqp_port, 5673);
        assert_eq!(
            config.broker.credentials,
            Credentials::new("admin", "secret")
        );
    }

    #[test]
    fn should_read_long_flags() {
        let config = parse(&[
            "qclean",
            "--queue",
            "orders",
            "--port=5674",
            "--user",
            "ops",
            "--password",
            "pw",
            "--url",
            "mq",
            "--management-port",
            "15673",
        ])
        .into_config()
        .unwrap();

        assert_eq!(
            config.target,
            TargetSpec::Literal(QueueName::new("orders").unwrap())
        );
        assert_eq!(config.broker.amqp_port, 5674);
        assert_eq!(config.broker.management_port, 15673);
        assert_eq!(config.broker.host, "mq");
    }

    #[test]
    fn should_fail_without_queue_selector() {
        let result = parse(&["qclean", "-u", "admin"]).into_config();

        assert!(matches!(result, Err(QcleanError::ConfigError(_))));
    }

    #[test]
    fn should_fail_with_empty_queue_selector() {
        let result = parse(&["qclean", "-q", ""]).into_config();

        assert!(matches!(result, Err(QcleanError::ConfigError(_))));
    }

    #[test]
    fn should_not_show_a_default_queue_in_help() {
        let help = Cli::command().render_help().to_string();

        assert!(help.contains("--queue"));
        assert!(!help.contains("[default: ]"));
        assert!(!help.contains("[default: \"\"]"));
    }

    #[test]
    fn should_print_version_with_short_flag() {
        let err = Cli::try_parse_from(normalize_args(args(&["qclean", "-v"]))).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn should_print_help_with_short_flag() {
        let err = Cli::try_parse_from(normalize_args(args(&["qclean", "-h"]))).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn should_reject_non_numeric_port() {
        let result = Cli::try_parse_from(normalize_args(args(&["qclean", "-q", "a", "-p", "x"])));

        assert!(result.is_err());
    }
}
