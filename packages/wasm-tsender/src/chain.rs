//! Boundary to the wallet and the chain
//!
//! Everything that talks to a node or a wallet sits behind
//! [`ChainCollaborator`]. The browser build implements it over a JS object
//! (see `wasm::collaborator`); tests use in-memory fakes.

use crate::error::ChainError;
use async_trait::async_trait;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Hash of a transaction accepted by the wallet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHandle(pub String);

impl TransactionHandle {
    pub fn new(hash: impl Into<String>) -> Self {
        TransactionHandle(hash.into())
    }

    pub fn hash(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution outcome recorded in a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Receipt of an included transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: String,
    pub status: ReceiptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }

    /// Turn a reverted receipt into an error
    pub fn into_result(self) -> Result<Receipt, ChainError> {
        match self.status {
            ReceiptStatus::Success => Ok(self),
            ReceiptStatus::Reverted => Err(ChainError::Reverted(self.transaction_hash)),
        }
    }
}

/// Reads and writes the airdrop flow needs from the chain
///
/// Every method is a suspension point. Implementations are not required to
/// be `Send`: in the browser they wrap JS promises.
#[async_trait(?Send)]
pub trait ChainCollaborator {
    /// ERC20 `allowance(owner, spender)` of `token`
    async fn read_allowance(
        &self,
        token: &str,
        owner: &str,
        spender: &str,
    ) -> Result<BigUint, ChainError>;

    /// Ask the wallet to send ERC20 `approve(spender, amount)` on `token`
    async fn send_approval(
        &self,
        token: &str,
        spender: &str,
        amount: &BigUint,
    ) -> Result<TransactionHandle, ChainError>;

    /// Ask the wallet to send `airdropERC20(token, recipients, amounts, total)`
    /// to the batch-transfer `contract`
    async fn send_batch_transfer(
        &self,
        contract: &str,
        token: &str,
        recipients: &[String],
        amounts: &[BigUint],
        total: &BigUint,
    ) -> Result<TransactionHandle, ChainError>;

    /// Wait until the transaction is included and return its receipt
    async fn await_confirmation(&self, handle: &TransactionHandle) -> Result<Receipt, ChainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_receipt() {
        let json = r#"{ "transactionHash": "0xabc", "status": "reverted", "blockNumber": 12 }"#;
        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Reverted);
        assert_eq!(receipt.block_number, Some(12));
        assert_eq!(
            receipt.into_result(),
            Err(ChainError::Reverted("0xabc".to_string()))
        );
    }

    #[test]
    fn test_receipt_without_block() {
        let json = r#"{ "transactionHash": "0x01", "status": "success" }"#;
        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert!(receipt.is_success());
        assert!(receipt.into_result().is_ok());
    }
}
