//! Chain id to contract deployment resolution.

use crate::{
    abi::FitnessAbi,
    error::ClientError,
    transport::{format_address, parse_address},
};
use ethabi::Address;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path, sync::Arc};

pub const LOCALHOST_CHAIN_ID: u64 = 31337;
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

const BUILTIN_NETWORKS: &[(u64, &str, &str, &str)] = &[
    (
        LOCALHOST_CHAIN_ID,
        "localhost",
        "http://localhost:8545",
        "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0",
    ),
    (
        SEPOLIA_CHAIN_ID,
        "Sepolia",
        "https://rpc.sepolia.org",
        "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub contract: Address,
}

/// One entry of a networks override file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEntry {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub contract: String,
}

impl TryFrom<NetworkEntry> for Network {
    type Error = ClientError;

    fn try_from(entry: NetworkEntry) -> Result<Self, Self::Error> {
        let contract = parse_address(&entry.contract)
            .map_err(|_| ClientError::Config(format!("bad contract address {:?}", entry.contract)))?;
        Ok(Network { chain_id: entry.chain_id, name: entry.name, rpc_url: entry.rpc_url, contract })
    }
}

impl From<&Network> for NetworkEntry {
    fn from(network: &Network) -> Self {
        NetworkEntry {
            chain_id: network.chain_id,
            name: network.name.clone(),
            rpc_url: network.rpc_url.clone(),
            contract: format_address(&network.contract),
        }
    }
}

/// A network the store is deployed on, together with its interface.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub network: Network,
    pub abi: Arc<FitnessAbi>,
}

impl Deployment {
    pub fn contract(&self) -> Address {
        self.network.contract
    }
}

#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: BTreeMap<u64, Network>,
    abi: Arc<FitnessAbi>,
}

impl NetworkRegistry {
    /// The local development network and Sepolia.
    pub fn builtin() -> Result<Self, ClientError> {
        let entries = BUILTIN_NETWORKS.iter().map(|(chain_id, name, rpc_url, contract)| NetworkEntry {
            chain_id: *chain_id,
            name: name.to_string(),
            rpc_url: rpc_url.to_string(),
            contract: contract.to_string(),
        });
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = NetworkEntry>) -> Result<Self, ClientError> {
        let mut networks = BTreeMap::new();
        for entry in entries {
            let network = Network::try_from(entry)?;
            if networks.insert(network.chain_id, network).is_some() {
                return Err(ClientError::Config("duplicate chainId".into()));
            }
        }
        Ok(Self { networks, abi: Arc::new(FitnessAbi::load()?) })
    }

    /// Parses a JSON list of `{chainId, name, rpcUrl, contract}` entries.
    /// The list replaces the built-in table.
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        let entries: Vec<NetworkEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let json = std::fs::read_to_string(path)?;
        log::debug!(target: "fitness-client", "loading networks from {}", path.display());
        Self::from_json(&json)
    }

    pub fn set_rpc_url(&mut self, chain_id: u64, rpc_url: impl Into<String>) -> Result<(), ClientError> {
        let network = self.networks.get_mut(&chain_id).ok_or(ClientError::UnsupportedNetwork(chain_id))?;
        network.rpc_url = rpc_url.into();
        Ok(())
    }

    pub fn network(&self, chain_id: u64) -> Option<&Network> {
        self.networks.get(&chain_id)
    }

    pub fn networks(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }

    pub fn resolve(&self, chain_id: u64) -> Result<Deployment, ClientError> {
        let network = self.network(chain_id).ok_or(ClientError::UnsupportedNetwork(chain_id))?;
        Ok(Deployment { network: network.clone(), abi: self.abi.clone() })
    }
}
