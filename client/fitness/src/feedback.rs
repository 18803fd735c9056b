//! Turns wallet and node failures into messages for the user.

/// Category of a failed write, recognised from the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UserRejected,
    InsufficientFunds,
    Network,
    Nonce,
    Gas,
    Underpriced,
    AlreadyKnown,
    Other,
}

// First match wins.
const PATTERNS: &[(&str, FailureKind)] = &[
    ("User rejected", FailureKind::UserRejected),
    ("insufficient funds", FailureKind::InsufficientFunds),
    ("network", FailureKind::Network),
    ("nonce", FailureKind::Nonce),
    ("gas", FailureKind::Gas),
    ("replacement transaction underpriced", FailureKind::Underpriced),
    ("already known", FailureKind::AlreadyKnown),
];

impl FailureKind {
    pub fn classify(message: &str) -> Self {
        PATTERNS
            .iter()
            .find(|(needle, _)| message.contains(needle))
            .map_or(FailureKind::Other, |(_, kind)| *kind)
    }

    /// `network` is the display name of the network the wallet is on.
    pub fn user_message(self, network: &str) -> String {
        match self {
            FailureKind::UserRejected => {
                "Transaction rejected: Please approve the transaction in your wallet.".into()
            }
            FailureKind::InsufficientFunds => {
                "Insufficient funds: Please add some test ETH to your wallet.".into()
            }
            FailureKind::Network => {
                format!("Network error: Please ensure you're connected to the correct network ({network}).")
            }
            FailureKind::Nonce => "Transaction nonce error. Please refresh the page and try again.".into(),
            FailureKind::Gas => "Gas estimation failed. Please try again.".into(),
            FailureKind::Underpriced => "Transaction underpriced. Please wait a moment and try again.".into(),
            FailureKind::AlreadyKnown => "Transaction already submitted. Please wait for confirmation.".into(),
            FailureKind::Other => "Transaction failed. Please check your connection and try again.".into(),
        }
    }
}

pub fn failure_message(error_text: &str, network: &str) -> String {
    FailureKind::classify(error_text).user_message(network)
}
