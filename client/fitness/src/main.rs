//! fitness-cli: inspect and drive a fitness data store deployment.

mod cli;
mod command;

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

#[tokio::main]
async fn main() -> ExitCode {
	init_logging();

	match command::run().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			tracing::error!("{err}");
			ExitCode::FAILURE
		},
	}
}
