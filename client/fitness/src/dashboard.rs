//! One user session: wallet, resolved deployment, profile and submit state.

use crate::{
    error::ClientError,
    networks::{Deployment, NetworkRegistry},
    reader::{FitnessReader, ProfileState},
    transport::ContractTransport,
    writer::{FitnessWriter, SubmitOutcome, SubmitState, WorkoutForm, DEFAULT_POLL_INTERVAL},
};
use ethabi::Address;
use std::{sync::Arc, time::Duration};

const LOG_TARGET: &str = "fitness-client";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletSession {
    pub account: Option<Address>,
    pub chain_id: u64,
}

pub struct Dashboard<T> {
    transport: Arc<T>,
    session: WalletSession,
    deployment: Option<Deployment>,
    poll_interval: Duration,
    pub profile: ProfileState,
    pub submit: SubmitState,
}

impl<T: ContractTransport> Dashboard<T> {
    /// Reads the wallet's chain id and resolves the deployment for it. An
    /// unsupported network is not an error here; it blocks every later read
    /// and write instead.
    pub async fn connect(
        transport: Arc<T>,
        registry: &NetworkRegistry,
        account: Option<Address>,
    ) -> Result<Self, ClientError> {
        let chain_id = transport.chain_id().await?;
        let deployment = match registry.resolve(chain_id) {
            Ok(deployment) => Some(deployment),
            Err(err) => {
                log::warn!(target: LOG_TARGET, "{err}");
                None
            }
        };

        Ok(Self {
            transport,
            session: WalletSession { account, chain_id },
            deployment,
            poll_interval: DEFAULT_POLL_INTERVAL,
            profile: ProfileState::default(),
            submit: SubmitState::default(),
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn session(&self) -> WalletSession {
        self.session
    }

    pub fn deployment(&self) -> Result<&Deployment, ClientError> {
        self.deployment.as_ref().ok_or(ClientError::UnsupportedNetwork(self.session.chain_id))
    }

    pub fn reader(&self) -> Result<FitnessReader<T>, ClientError> {
        Ok(FitnessReader::new(self.transport.clone(), self.deployment()?.clone()))
    }

    pub fn writer(&self) -> Result<FitnessWriter<T>, ClientError> {
        Ok(FitnessWriter::new(self.transport.clone(), self.deployment()?.clone()).with_poll_interval(self.poll_interval))
    }

    pub async fn refresh(&mut self) -> bool {
        let reader = match self.reader() {
            Ok(reader) => reader,
            Err(err) => {
                self.profile.message = Some(err.to_string());
                return false;
            }
        };
        reader.refresh(&mut self.profile, self.session.account).await
    }

    pub async fn reveal(&mut self) -> Result<(), ClientError> {
        let reader = self.reader().map_err(|err| {
            self.profile.message = Some(err.to_string());
            err
        })?;
        reader.reveal(&mut self.profile, self.session.account).await
    }

    /// Submits the form and, once the write is confirmed, reloads the profile.
    pub async fn submit_workout(&mut self, form: &WorkoutForm) -> Result<SubmitOutcome, ClientError> {
        if self.session.account.is_none() {
            self.submit.message = Some(ClientError::WalletNotConnected.to_string());
            return Err(ClientError::WalletNotConnected);
        }
        let writer = self.writer().map_err(|err| {
            self.submit.message = Some(err.to_string());
            err
        })?;
        let outcome = writer.submit(&mut self.submit, self.session.account, form).await?;
        self.refresh().await;
        Ok(outcome)
    }
}
