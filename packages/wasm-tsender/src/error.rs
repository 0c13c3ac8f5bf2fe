//! Error types for wasm-tsender

use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Main error type for airdrop operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AirdropError {
    /// Amount text is not a valid non-negative decimal for the token
    #[error("Invalid amount format: {0}")]
    InvalidAmountFormat(String),
    /// Recipients or amounts list is empty
    #[error("Recipients and amounts cannot be empty")]
    EmptyInput,
    /// Recipient and amount counts differ
    #[error("Number of recipients must match number of amounts ({recipients} recipients, {amounts} amounts)")]
    LengthMismatch { recipients: usize, amounts: usize },
    /// Malformed EVM address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// Token decimals have not been loaded yet
    #[error("Token decimals not available")]
    TokenNotLoaded,
    /// No batch-transfer contract is deployed on this chain
    #[error("No TSender deployment for chain {0}")]
    UnsupportedChain(u64),
    /// Only the checked contract is deployed on this chain
    #[error("Chain {0} only has the safer version")]
    UnsafeModeUnavailable(u64),
    /// Reading the current allowance failed
    #[error("Failed to read allowance: {0}")]
    AllowanceReadFailed(String),
    /// Approval was rejected by the wallet or reverted
    #[error("Approval failed: {0}")]
    ApprovalFailed(String),
    /// Batch transfer was rejected by the wallet or reverted
    #[error("Transfer failed: {0}")]
    TransferFailed(String),
    /// A previous submission has not finished yet
    #[error("A submission is already in progress")]
    SubmissionInFlight,
    /// Malformed data crossing the JS boundary
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AirdropError {
    /// Whether the user can fix this error by editing the form
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AirdropError::InvalidAmountFormat(_)
                | AirdropError::EmptyInput
                | AirdropError::LengthMismatch { .. }
                | AirdropError::InvalidAddress(_)
                | AirdropError::TokenNotLoaded
                | AirdropError::InvalidInput(_)
        )
    }
}

/// Failure reported by a chain collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The user declined the request in their wallet
    #[error("rejected in wallet: {0}")]
    Rejected(String),
    /// The transaction was included but reverted
    #[error("transaction {0} reverted")]
    Reverted(String),
    /// Transport or node error
    #[error("rpc error: {0}")]
    Rpc(String),
}

// REQUIRED: Converts to JS Error with stack trace
impl From<AirdropError> for JsValue {
    fn from(err: AirdropError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

impl From<ChainError> for JsValue {
    fn from(err: ChainError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
