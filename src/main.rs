// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

use clap::Parser;
use qclean::{
    channel::AmqpBroker,
    cli::{normalize_args, Cli, MISSING_QUEUE_MESSAGE},
    config::RunConfig,
    errors::QcleanError,
    logging,
    management::ManagementClient,
    runner,
};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse_from(normalize_args(std::env::args()));

    let config = match cli.into_config() {
        Ok(c) => c,
        Err(_) => {
            println!("{}", MISSING_QUEUE_MESSAGE);
            return ExitCode::FAILURE;
        }
    };

    match execute(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn execute(config: &RunConfig) -> Result<(), QcleanError> {
    println!(
        "--> Connecting to RabbitMQ at {}",
        config.broker.display_amqp_address()
    );
    let broker = AmqpBroker::connect(&config.broker).await?;
    let discovery = ManagementClient::new(&config.broker);

    let result =
        runner::clean_and_report(&config.target, &discovery, &broker, &mut std::io::stdout())
            .await;

    broker.close().await;
    debug!("broker connection released");

    result
}
