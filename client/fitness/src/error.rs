use ethabi::Hash;

/// Errors raised by the fitness client.
///
/// The `Display` text of the user-facing variants is what the dashboard shows.
/// Transport failures keep the node's or wallet's own message so that
/// [`crate::feedback::FailureKind::classify`] can match on it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("No contract deployed on network with chainId {0}")]
    UnsupportedNetwork(u64),

    #[error("Please connect your wallet first")]
    WalletNotConnected,

    #[error("No data to reveal")]
    NoData,

    #[error("Signature cancelled or failed")]
    SignatureRejected(String),

    #[error("Transaction already submitted. Please wait for confirmation.")]
    AlreadySubmitted,

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("{0}")]
    Rpc(String),

    #[error("Transaction {0:?} reverted")]
    Reverted(Hash),

    #[error("Unexpected output from {0}")]
    UnexpectedOutput(&'static str),

    #[error("Contract reports protocolId {actual}, expected {expected}")]
    InterfaceMismatch { expected: u64, actual: u64 },

    #[error("RPC endpoint is on chainId {actual}, expected {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("Invalid network configuration: {0}")]
    Config(String),

    #[error("ABI error: {0}")]
    Abi(#[from] ethabi::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<jsonrpsee::core::ClientError> for ClientError {
    fn from(err: jsonrpsee::core::ClientError) -> Self {
        match err {
            jsonrpsee::core::ClientError::Call(call) => ClientError::Rpc(call.message().to_string()),
            other => ClientError::Rpc(other.to_string()),
        }
    }
}
