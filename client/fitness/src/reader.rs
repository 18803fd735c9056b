//! Read side: fetching a record and the profile state it feeds.

use crate::{error::ClientError, networks::Deployment, transport::ContractTransport};
use chrono::{DateTime, SecondsFormat, Utc};
use ethabi::{Address, Token, Uint};
use serde::{Serialize, Serializer};
use std::sync::Arc;

const LOG_TARGET: &str = "fitness-client";

pub const LOAD_ERROR_MESSAGE: &str = "Error loading fitness data";

/// A record as the client sees it. Metrics are uint256 on the contract and
/// serialize as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessRecord {
    pub name: String,
    #[serde(serialize_with = "decimal")]
    pub steps: Uint,
    #[serde(serialize_with = "decimal")]
    pub running_distance_meters: Uint,
    #[serde(serialize_with = "decimal")]
    pub calories_burned: Uint,
    #[serde(serialize_with = "decimal")]
    pub workout_duration_minutes: Uint,
    #[serde(serialize_with = "decimal")]
    pub heart_rate_avg_bpm: Uint,
    pub total_workouts: u64,
    pub last_update_timestamp: u64,
}

fn decimal<S: Serializer>(value: &Uint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProfileData {
    #[default]
    NotLoaded,
    /// The account has never written a record.
    Empty,
    Loaded(FitnessRecord),
}

/// Whether the numeric fields are shown as authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Locked,
    Revealed,
}

/// What the profile view shows. Owned by the caller and updated in place by
/// [`FitnessReader::refresh`] and [`FitnessReader::reveal`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub data: ProfileData,
    pub visibility: Visibility,
    pub message: Option<String>,
}

impl ProfileState {
    pub fn record(&self) -> Option<&FitnessRecord> {
        match &self.data {
            ProfileData::Loaded(record) => Some(record),
            _ => None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.record().is_some()
    }

    pub fn is_revealed(&self) -> bool {
        self.visibility == Visibility::Revealed
    }
}

/// The message the wallet is asked to sign before values are revealed.
pub fn reveal_message(account: Address, at: DateTime<Utc>) -> String {
    format!(
        "Reveal Fitness Data\n\nWallet: {:?}\nTimestamp: {}\n\nSign to reveal your fitness data.",
        account,
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

pub struct FitnessReader<T> {
    transport: Arc<T>,
    deployment: Deployment,
}

impl<T: ContractTransport> FitnessReader<T> {
    pub fn new(transport: Arc<T>, deployment: Deployment) -> Self {
        Self { transport, deployment }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    async fn read(&self, function: &'static str, args: &[Token]) -> Result<Vec<Token>, ClientError> {
        let abi = &self.deployment.abi;
        let data = abi.encode(function, args)?;
        let output = self.transport.call(self.deployment.contract(), data).await?;
        abi.decode(function, &output)
    }

    async fn read_single(&self, function: &'static str, account: Address) -> Result<Token, ClientError> {
        self.read(function, &[Token::Address(account)])
            .await?
            .into_iter()
            .next()
            .ok_or(ClientError::UnexpectedOutput(function))
    }

    async fn read_uint(&self, function: &'static str, account: Address) -> Result<Uint, ClientError> {
        let token = self.read_single(function, account).await?;
        to_uint(token, function)
    }

    async fn read_u64(&self, function: &'static str, account: Address) -> Result<u64, ClientError> {
        let token = self.read_single(function, account).await?;
        to_u64(token, function)
    }

    async fn read_string(&self, function: &'static str, account: Address) -> Result<String, ClientError> {
        match self.read_single(function, account).await? {
            Token::String(value) => Ok(value),
            _ => Err(ClientError::UnexpectedOutput(function)),
        }
    }

    pub async fn has_fitness_data(&self, account: Address) -> Result<bool, ClientError> {
        match self.read_single("hasFitnessData", account).await? {
            Token::Bool(value) => Ok(value),
            _ => Err(ClientError::UnexpectedOutput("hasFitnessData")),
        }
    }

    pub async fn total_workouts(&self, account: Address) -> Result<u64, ClientError> {
        self.read_u64("getTotalWorkouts", account).await
    }

    /// `None` when the account has no record. Otherwise the eight field
    /// getters are issued together and all of them must succeed.
    pub async fn fetch(&self, account: Address) -> Result<Option<FitnessRecord>, ClientError> {
        if !self.has_fitness_data(account).await? {
            return Ok(None);
        }

        let (
            name,
            steps,
            running_distance_meters,
            calories_burned,
            workout_duration_minutes,
            heart_rate_avg_bpm,
            total_workouts,
            last_update_timestamp,
        ) = futures::try_join!(
            self.read_string("getName", account),
            self.read_uint("getSteps", account),
            self.read_uint("getRunningDistance", account),
            self.read_uint("getCaloriesBurned", account),
            self.read_uint("getWorkoutDuration", account),
            self.read_uint("getHeartRateAvg", account),
            self.read_u64("getTotalWorkouts", account),
            self.read_u64("getLastUpdate", account),
        )?;

        Ok(Some(FitnessRecord {
            name,
            steps,
            running_distance_meters,
            calories_burned,
            workout_duration_minutes,
            heart_rate_avg_bpm,
            total_workouts,
            last_update_timestamp,
        }))
    }

    /// The whole record in a single `getAllFitnessData` call. Zero-valued for
    /// accounts without a record.
    pub async fn fetch_all(&self, account: Address) -> Result<FitnessRecord, ClientError> {
        const FUNCTION: &str = "getAllFitnessData";
        let tokens = self.read(FUNCTION, &[Token::Address(account)]).await?;
        let [name, steps, distance, calories, duration, heart_rate, workouts, last_update]: [Token; 8] =
            tokens.try_into().map_err(|_| ClientError::UnexpectedOutput(FUNCTION))?;

        let Token::String(name) = name else {
            return Err(ClientError::UnexpectedOutput(FUNCTION));
        };

        Ok(FitnessRecord {
            name,
            steps: to_uint(steps, FUNCTION)?,
            running_distance_meters: to_uint(distance, FUNCTION)?,
            calories_burned: to_uint(calories, FUNCTION)?,
            workout_duration_minutes: to_uint(duration, FUNCTION)?,
            heart_rate_avg_bpm: to_uint(heart_rate, FUNCTION)?,
            total_workouts: to_u64(workouts, FUNCTION)?,
            last_update_timestamp: to_u64(last_update, FUNCTION)?,
        })
    }

    pub async fn protocol_id(&self) -> Result<u64, ClientError> {
        let token = self
            .read("protocolId", &[])
            .await?
            .into_iter()
            .next()
            .ok_or(ClientError::UnexpectedOutput("protocolId"))?;
        to_u64(token, "protocolId")
    }

    /// Checks the attached contract reports the expected interface version.
    pub async fn verify_interface(&self, expected: u64) -> Result<u64, ClientError> {
        let actual = self.protocol_id().await?;
        if actual != expected {
            return Err(ClientError::InterfaceMismatch { expected, actual });
        }
        Ok(actual)
    }

    /// Reloads `state` for `account`. On failure the previous contents are
    /// kept and only the message changes. Returns whether the load succeeded.
    pub async fn refresh(&self, state: &mut ProfileState, account: Option<Address>) -> bool {
        state.message = None;
        let Some(account) = account else {
            return false;
        };

        match self.fetch(account).await {
            Ok(record) => {
                state.data = record.map_or(ProfileData::Empty, ProfileData::Loaded);
                state.visibility = Visibility::Locked;
                true
            }
            Err(err) => {
                log::error!(target: LOG_TARGET, "Error refreshing data for {account:?}: {err}");
                state.message = Some(LOAD_ERROR_MESSAGE.into());
                false
            }
        }
    }

    /// Asks the wallet to sign [`reveal_message`] and, once it does, shows
    /// the numeric fields as authoritative. No value is transformed.
    pub async fn reveal(&self, state: &mut ProfileState, account: Option<Address>) -> Result<(), ClientError> {
        state.message = None;
        let result = self.try_reveal(state, account).await;
        if let Err(err) = &result {
            state.message = Some(err.to_string());
        }
        result
    }

    async fn try_reveal(&self, state: &mut ProfileState, account: Option<Address>) -> Result<(), ClientError> {
        let account = account.ok_or(ClientError::WalletNotConnected)?;
        if !state.has_data() {
            return Err(ClientError::NoData);
        }

        let message = reveal_message(account, Utc::now());
        self.transport.sign_message(account, &message).await.map_err(|err| {
            log::warn!(target: LOG_TARGET, "reveal signature failed: {err}");
            ClientError::SignatureRejected(err.to_string())
        })?;

        state.visibility = Visibility::Revealed;
        Ok(())
    }
}

fn to_uint(token: Token, function: &'static str) -> Result<Uint, ClientError> {
    match token {
        Token::Uint(value) => Ok(value),
        _ => Err(ClientError::UnexpectedOutput(function)),
    }
}

// Counters, timestamps and the interface id.
fn to_u64(token: Token, function: &'static str) -> Result<u64, ClientError> {
    match token {
        Token::Uint(value) if value <= Uint::from(u64::MAX) => Ok(value.low_u64()),
        _ => Err(ClientError::UnexpectedOutput(function)),
    }
}
