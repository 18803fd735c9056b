//! Wallet and node access.
//!
//! [`ContractTransport`] is the small slice of an EIP-1193 provider the read
//! and write clients need. [`HttpTransport`] implements it over Ethereum
//! JSON-RPC, which covers a dev node with unlocked accounts as well as any
//! endpoint that signs on behalf of its accounts.

use crate::error::ClientError;
use async_trait::async_trait;
use ethabi::{Address, Hash};
use jsonrpsee::{
    core::client::ClientT,
    http_client::{HttpClient, HttpClientBuilder},
    rpc_params,
};
use serde::Deserialize;
use serde_json::json;

/// A contract write as handed to the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
    pub gas: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<Hash>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: Hash,
    pub block_number: u64,
    /// `false` when the transaction was mined but reverted.
    pub success: bool,
    pub logs: Vec<ReceiptLog>,
}

#[async_trait]
pub trait ContractTransport: Send + Sync {
    async fn chain_id(&self) -> Result<u64, ClientError>;

    /// Read-only call against the latest block. Returns the raw return data.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ClientError>;

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Hash, ClientError>;

    /// `None` while the transaction is not yet mined.
    async fn transaction_receipt(&self, hash: Hash) -> Result<Option<TransactionReceipt>, ClientError>;

    async fn sign_message(&self, signer: Address, message: &str) -> Result<Vec<u8>, ClientError>;
}

pub struct HttpTransport {
    client: HttpClient,
    url: String,
}

impl HttpTransport {
    pub fn new(url: &str) -> Result<Self, ClientError> {
        let client = HttpClientBuilder::default().build(url)?;
        Ok(Self { client, url: url.to_string() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    status: Option<String>,
    #[serde(default)]
    logs: Vec<RpcLog>,
}

#[derive(Debug, Deserialize)]
struct RpcLog {
    address: String,
    topics: Vec<String>,
    data: String,
}

impl TryFrom<RpcReceipt> for TransactionReceipt {
    type Error = ClientError;

    fn try_from(raw: RpcReceipt) -> Result<Self, Self::Error> {
        let logs = raw
            .logs
            .into_iter()
            .map(|log| {
                Ok(ReceiptLog {
                    address: parse_address(&log.address)?,
                    topics: log.topics.iter().map(|t| parse_hash(t)).collect::<Result<_, _>>()?,
                    data: from_hex(&log.data)?,
                })
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        Ok(TransactionReceipt {
            transaction_hash: parse_hash(&raw.transaction_hash)?,
            block_number: raw.block_number.as_deref().map(parse_quantity).transpose()?.unwrap_or_default(),
            // Pre-Byzantium receipts carry no status; treat them as successful.
            success: raw.status.as_deref().map(parse_quantity).transpose()?.map_or(true, |s| s == 1),
            logs,
        })
    }
}

#[async_trait]
impl ContractTransport for HttpTransport {
    async fn chain_id(&self) -> Result<u64, ClientError> {
        let raw: String = self.client.request("eth_chainId", rpc_params![]).await?;
        parse_quantity(&raw)
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ClientError> {
        let request = json!({ "to": format_address(&to), "data": to_hex(&data) });
        let raw: String = self.client.request("eth_call", rpc_params![request, "latest"]).await?;
        from_hex(&raw)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Hash, ClientError> {
        let request = json!({
            "from": format_address(&tx.from),
            "to": format_address(&tx.to),
            "data": to_hex(&tx.data),
            "gas": format!("{:#x}", tx.gas),
        });
        let raw: String = self.client.request("eth_sendTransaction", rpc_params![request]).await?;
        parse_hash(&raw)
    }

    async fn transaction_receipt(&self, hash: Hash) -> Result<Option<TransactionReceipt>, ClientError> {
        let raw: Option<RpcReceipt> = self
            .client
            .request("eth_getTransactionReceipt", rpc_params![to_hex(hash.as_bytes())])
            .await?;
        raw.map(TransactionReceipt::try_from).transpose()
    }

    async fn sign_message(&self, signer: Address, message: &str) -> Result<Vec<u8>, ClientError> {
        let raw: String = self
            .client
            .request("personal_sign", rpc_params![to_hex(message.as_bytes()), format_address(&signer)])
            .await?;
        from_hex(&raw)
    }
}

pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn format_address(address: &Address) -> String {
    to_hex(address.as_bytes())
}

pub fn from_hex(raw: &str) -> Result<Vec<u8>, ClientError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|e| ClientError::Rpc(format!("invalid hex data {raw:?}: {e}")))
}

pub fn parse_quantity(raw: &str) -> Result<u64, ClientError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16).map_err(|e| ClientError::Rpc(format!("invalid quantity {raw:?}: {e}")))
}

pub fn parse_address(raw: &str) -> Result<Address, ClientError> {
    let bytes = from_hex(raw)?;
    if bytes.len() != 20 {
        return Err(ClientError::Rpc(format!("invalid address {raw:?}")));
    }
    Ok(Address::from_slice(&bytes))
}

pub fn parse_hash(raw: &str) -> Result<Hash, ClientError> {
    let bytes = from_hex(raw)?;
    if bytes.len() != 32 {
        return Err(ClientError::Rpc(format!("invalid hash {raw:?}")));
    }
    Ok(Hash::from_slice(&bytes))
}
