use crate::cli::{Cli, Subcommand};
use clap::Parser;
use fitness_client::{
	networks::NetworkEntry,
	transport::{format_address, parse_address},
	ClientError, ContractTransport, Dashboard, FitnessReader, HttpTransport, NetworkRegistry,
	WorkoutForm, EXPECTED_PROTOCOL_ID,
};
use serde_json::json;
use std::{sync::Arc, time::Duration};

const LOG_TARGET: &str = "fitness-client";

fn registry(cli: &Cli) -> Result<NetworkRegistry, ClientError> {
	let mut registry = match &cli.networks {
		Some(path) => NetworkRegistry::load(path)?,
		None => NetworkRegistry::builtin()?,
	};
	if let Some(url) = &cli.rpc_url {
		registry.set_rpc_url(cli.chain_id, url.clone())?;
	}
	Ok(registry)
}

/// Opens the selected network's RPC endpoint and makes sure it serves that chain.
async fn connect(cli: &Cli, registry: &NetworkRegistry) -> Result<Arc<HttpTransport>, ClientError> {
	let deployment = registry.resolve(cli.chain_id)?;
	let transport = HttpTransport::new(&deployment.network.rpc_url)?;
	let actual = transport.chain_id().await?;
	if actual != cli.chain_id {
		return Err(ClientError::ChainMismatch { expected: cli.chain_id, actual });
	}
	log::debug!(target: LOG_TARGET, "connected to {} (chainId {actual})", transport.url());
	Ok(Arc::new(transport))
}

pub async fn run() -> Result<(), ClientError> {
	let cli = Cli::parse();
	let registry = registry(&cli)?;

	match &cli.subcommand {
		Subcommand::Address => {
			let deployment = registry.resolve(cli.chain_id)?;
			println!("{}", serde_json::to_string_pretty(&NetworkEntry::from(&deployment.network))?);
		},
		Subcommand::Check { account } => {
			let account = parse_address(account)?;
			let transport = connect(&cli, &registry).await?;
			let reader = FitnessReader::new(transport, registry.resolve(cli.chain_id)?);

			let protocol_id = reader.verify_interface(EXPECTED_PROTOCOL_ID).await?;
			let (has_data, total_workouts) =
				futures::try_join!(reader.has_fitness_data(account), reader.total_workouts(account))?;

			tracing::info!(
				contract = %format_address(&reader.deployment().contract()),
				protocol_id,
				"contract connection ok"
			);
			println!(
				"{}",
				serde_json::to_string_pretty(&json!({
					"contract": format_address(&reader.deployment().contract()),
					"protocolId": protocol_id,
					"hasFitnessData": has_data,
					"totalWorkouts": total_workouts,
				}))?
			);
		},
		Subcommand::Show { account, reveal } => {
			let account = parse_address(account)?;
			let transport = connect(&cli, &registry).await?;
			let mut dashboard = Dashboard::connect(transport, &registry, Some(account)).await?;

			if !dashboard.refresh().await {
				return Err(ClientError::Rpc(dashboard.profile.message.clone().unwrap_or_default()));
			}
			if *reveal && dashboard.profile.has_data() {
				dashboard.reveal().await?;
			}

			println!(
				"{}",
				serde_json::to_string_pretty(&json!({
					"account": format_address(&account),
					"revealed": dashboard.profile.is_revealed(),
					"record": dashboard.profile.record(),
				}))?
			);
		},
		Subcommand::AddWorkout { from, steps, distance, calories, duration, heartrate, name } => {
			let from = parse_address(from)?;
			let form = WorkoutForm {
				name: name.clone(),
				steps: steps.clone(),
				running_distance: distance.clone(),
				calories_burned: calories.clone(),
				workout_duration: duration.clone(),
				heart_rate_avg: heartrate.clone(),
			};

			let transport = connect(&cli, &registry).await?;
			let mut dashboard = Dashboard::connect(transport, &registry, Some(from))
				.await?
				.with_poll_interval(Duration::from_millis(cli.poll_interval_ms));

			match dashboard.submit_workout(&form).await {
				Ok(outcome) => {
					tracing::info!(
						tx = ?outcome.transaction_hash,
						block = outcome.block_number,
						"{}",
						dashboard.submit.message.as_deref().unwrap_or_default()
					);
					println!("{}", serde_json::to_string_pretty(&json!({ "record": dashboard.profile.record() }))?);
				},
				Err(err) => {
					if let Some(message) = &dashboard.submit.message {
						eprintln!("{message}");
					}
					return Err(err);
				},
			}
		},
	}

	Ok(())
}
