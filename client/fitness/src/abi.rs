//! The FitnessDataStorage contract interface.

use crate::error::ClientError;
use ethabi::{Contract, Event, Function, Token};

const FITNESS_DATA_STORAGE_ABI: &str = include_str!("../abi/FitnessDataStorage.json");

/// Parsed contract ABI shared by every deployment.
#[derive(Debug, Clone)]
pub struct FitnessAbi {
    contract: Contract,
}

impl FitnessAbi {
    pub fn load() -> Result<Self, ClientError> {
        let contract = Contract::load(FITNESS_DATA_STORAGE_ABI.as_bytes())?;
        Ok(Self { contract })
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn function(&self, name: &str) -> Result<&Function, ClientError> {
        Ok(self.contract.function(name)?)
    }

    /// Calldata for `name(args..)`, selector included.
    pub fn encode(&self, name: &str, args: &[Token]) -> Result<Vec<u8>, ClientError> {
        Ok(self.function(name)?.encode_input(args)?)
    }

    pub fn decode(&self, name: &str, output: &[u8]) -> Result<Vec<Token>, ClientError> {
        Ok(self.function(name)?.decode_output(output)?)
    }

    pub fn updated_event(&self) -> Result<&Event, ClientError> {
        Ok(self.contract.event("FitnessDataUpdated")?)
    }
}
