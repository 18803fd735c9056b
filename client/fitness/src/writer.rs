//! Write side: form conversion, submission and confirmation tracking.

use crate::{
    error::ClientError,
    feedback,
    networks::Deployment,
    transport::{ContractTransport, TransactionReceipt, TransactionRequest},
};
use ethabi::{Address, Hash, RawLog, Token, Uint};
use std::{sync::Arc, time::Duration};

const LOG_TARGET: &str = "fitness-client";

pub const GAS_LIMIT: u64 = 300_000;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const SUCCESS_MESSAGE: &str = "Workout logged successfully!";

/// Raw form input, one string per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutForm {
    pub name: String,
    pub steps: String,
    pub running_distance: String,
    pub calories_burned: String,
    pub workout_duration: String,
    pub heart_rate_avg: String,
}

/// Arguments of one `setFitnessData` call. Metrics span the full uint256 range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutSubmission {
    pub name: String,
    pub steps: Uint,
    pub running_distance: Uint,
    pub calories_burned: Uint,
    pub workout_duration: Uint,
    pub heart_rate_avg: Uint,
}

impl WorkoutForm {
    /// Blank numeric fields count as zero.
    pub fn to_submission(&self) -> Result<WorkoutSubmission, ClientError> {
        Ok(WorkoutSubmission {
            name: self.name.clone(),
            steps: parse_field("steps", &self.steps)?,
            running_distance: parse_field("runningDistance", &self.running_distance)?,
            calories_burned: parse_field("caloriesBurned", &self.calories_burned)?,
            workout_duration: parse_field("workoutDuration", &self.workout_duration)?,
            heart_rate_avg: parse_field("heartRateAvg", &self.heart_rate_avg)?,
        })
    }
}

fn parse_field(field: &'static str, raw: &str) -> Result<Uint, ClientError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Uint::zero());
    }
    Uint::from_dec_str(trimmed).map_err(|_| ClientError::InvalidField { field, value: raw.to_string() })
}

impl WorkoutSubmission {
    pub fn tokens(&self) -> Vec<Token> {
        vec![
            Token::Uint(self.steps),
            Token::Uint(self.running_distance),
            Token::Uint(self.calories_burned),
            Token::Uint(self.workout_duration),
            Token::Uint(self.heart_rate_avg),
            Token::String(self.name.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    /// Waiting for the wallet to accept the transaction.
    AwaitingWallet,
    Broadcast(Hash),
    Confirmed(Hash),
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitState {
    pub status: SubmitStatus,
    pub message: Option<String>,
}

impl SubmitState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self.status, SubmitStatus::AwaitingWallet | SubmitStatus::Broadcast(_))
    }
}

/// A confirmed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub transaction_hash: Hash,
    pub block_number: u64,
    /// Timestamp carried by the `FitnessDataUpdated` log, when present.
    pub timestamp: Option<u64>,
}

pub struct FitnessWriter<T> {
    transport: Arc<T>,
    deployment: Deployment,
    poll_interval: Duration,
}

impl<T: ContractTransport> FitnessWriter<T> {
    pub fn new(transport: Arc<T>, deployment: Deployment) -> Self {
        Self { transport, deployment, poll_interval: DEFAULT_POLL_INTERVAL }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Broadcasts the workout and waits for it to be mined.
    pub async fn submit(
        &self,
        state: &mut SubmitState,
        from: Option<Address>,
        form: &WorkoutForm,
    ) -> Result<SubmitOutcome, ClientError> {
        let hash = self.broadcast(state, from, form).await?;
        self.confirm(state, hash).await
    }

    /// Hands the transaction to the wallet. Refused while an earlier
    /// submission is still in flight.
    pub async fn broadcast(
        &self,
        state: &mut SubmitState,
        from: Option<Address>,
        form: &WorkoutForm,
    ) -> Result<Hash, ClientError> {
        if state.is_in_flight() {
            return Err(ClientError::AlreadySubmitted);
        }
        state.message = None;

        let Some(from) = from else {
            return Err(self.reject(state, ClientError::WalletNotConnected));
        };
        let submission = match form.to_submission() {
            Ok(submission) => submission,
            Err(err) => return Err(self.reject(state, err)),
        };

        let data = match self.deployment.abi.encode("setFitnessData", &submission.tokens()) {
            Ok(data) => data,
            Err(err) => return Err(self.reject(state, err)),
        };
        let tx = TransactionRequest { from, to: self.deployment.contract(), data, gas: GAS_LIMIT };

        state.status = SubmitStatus::AwaitingWallet;
        log::debug!(target: LOG_TARGET, "submitting workout for {from:?}: {submission:?}");

        match self.transport.send_transaction(tx).await {
            Ok(hash) => {
                log::info!(target: LOG_TARGET, "transaction {hash:?} broadcast");
                state.status = SubmitStatus::Broadcast(hash);
                Ok(hash)
            }
            Err(err) => Err(self.fail(state, err)),
        }
    }

    /// Polls for the receipt of `hash` until it is mined. There is no timeout,
    /// and failed lookups are retried: the transaction stays in flight until
    /// a receipt arrives.
    pub async fn confirm(&self, state: &mut SubmitState, hash: Hash) -> Result<SubmitOutcome, ClientError> {
        let receipt = loop {
            match self.transport.transaction_receipt(hash).await {
                Ok(Some(receipt)) => break receipt,
                Ok(None) => {},
                Err(err) => log::warn!(target: LOG_TARGET, "receipt lookup for {hash:?} failed, retrying: {err}"),
            }
            tokio::time::sleep(self.poll_interval).await;
        };

        if !receipt.success {
            return Err(self.fail(state, ClientError::Reverted(hash)));
        }

        log::info!(target: LOG_TARGET, "transaction {hash:?} confirmed in block {}", receipt.block_number);
        state.status = SubmitStatus::Confirmed(hash);
        state.message = Some(SUCCESS_MESSAGE.into());

        Ok(SubmitOutcome {
            transaction_hash: hash,
            block_number: receipt.block_number,
            timestamp: self.updated_timestamp(&receipt),
        })
    }

    fn updated_timestamp(&self, receipt: &TransactionReceipt) -> Option<u64> {
        let event = self.deployment.abi.updated_event().ok()?;
        receipt
            .logs
            .iter()
            .filter(|log| log.address == self.deployment.contract())
            .filter(|log| log.topics.first() == Some(&event.signature()))
            .find_map(|log| {
                let parsed = event.parse_log(RawLog { topics: log.topics.clone(), data: log.data.clone() }).ok()?;
                parsed.params.into_iter().find(|p| p.name == "timestamp").and_then(|p| match p.value {
                    Token::Uint(value) if value <= Uint::from(u64::MAX) => Some(value.low_u64()),
                    _ => None,
                })
            })
    }

    // Precondition failures are shown verbatim and leave the state idle.
    fn reject(&self, state: &mut SubmitState, err: ClientError) -> ClientError {
        state.status = SubmitStatus::Idle;
        state.message = Some(err.to_string());
        err
    }

    fn fail(&self, state: &mut SubmitState, err: ClientError) -> ClientError {
        log::error!(target: LOG_TARGET, "Transaction error: {err}");
        state.status = SubmitStatus::Failed;
        state.message = Some(feedback::failure_message(&err.to_string(), &self.deployment.network.name));
        err
    }
}
