use fitness_client::networks::LOCALHOST_CHAIN_ID;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(name = "fitness-cli", version, about = "Developer tooling for the fitness data store")]
pub struct Cli {
	#[command(subcommand)]
	pub subcommand: Subcommand,

	/// Chain id of the network to use.
	#[arg(long, env = "FITNESS_CHAIN_ID", default_value_t = LOCALHOST_CHAIN_ID)]
	pub chain_id: u64,

	/// Overrides the RPC URL of the selected network.
	#[arg(long, env = "FITNESS_RPC_URL")]
	pub rpc_url: Option<String>,

	/// JSON list of `{chainId, name, rpcUrl, contract}` replacing the built-in networks.
	#[arg(long, env = "FITNESS_NETWORKS")]
	pub networks: Option<PathBuf>,

	/// Receipt polling interval, in milliseconds.
	#[arg(long, default_value_t = 1000)]
	pub poll_interval_ms: u64,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
	/// Print the contract deployment of the selected network.
	Address,

	/// Check the RPC endpoint and the contract behind it.
	Check {
		/// Account to query with `hasFitnessData` and `getTotalWorkouts`.
		#[arg(long)]
		account: String,
	},

	/// Print an account's record as JSON.
	Show {
		account: String,

		/// Sign the reveal message with the account first.
		#[arg(long)]
		reveal: bool,
	},

	/// Submit a workout from an account the node signs for, and wait for it.
	AddWorkout {
		#[arg(long)]
		from: String,

		#[arg(long, default_value = "")]
		steps: String,

		/// Running distance in meters.
		#[arg(long, default_value = "")]
		distance: String,

		#[arg(long, default_value = "")]
		calories: String,

		/// Workout duration in minutes.
		#[arg(long, default_value = "")]
		duration: String,

		/// Average heart rate.
		#[arg(long, default_value = "")]
		heartrate: String,

		#[arg(long, default_value = "")]
		name: String,
	},
}
