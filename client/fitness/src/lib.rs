//! # Fitness client
//!
//! Talks to a deployed FitnessDataStorage contract (or the fitness data
//! precompile, which exposes the same interface) through a wallet or node.
//!
//! - [`networks`] maps a chain id to the deployed contract address.
//! - [`reader`] loads a record into a [`reader::ProfileState`].
//! - [`writer`] submits a workout and tracks it in a [`writer::SubmitState`].
//! - [`dashboard`] ties both to one wallet session.

pub mod abi;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod networks;
pub mod reader;
pub mod transport;
pub mod writer;

pub use dashboard::{Dashboard, WalletSession};
pub use error::ClientError;
pub use networks::{Deployment, Network, NetworkRegistry};
pub use reader::{FitnessReader, FitnessRecord, ProfileData, ProfileState, Visibility};
pub use transport::{ContractTransport, HttpTransport};
pub use writer::{FitnessWriter, SubmitOutcome, SubmitState, SubmitStatus, WorkoutForm, WorkoutSubmission};

/// Interface version reported by `protocolId()`.
pub const EXPECTED_PROTOCOL_ID: u64 = 10001;

#[cfg(test)]
mod mock;
