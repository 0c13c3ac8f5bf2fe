//! In-memory chain used by the unit tests

use crate::chain::{ChainCollaborator, Receipt, ReceiptStatus, TransactionHandle};
use crate::error::ChainError;
use async_trait::async_trait;
use futures::channel::oneshot;
use num_bigint::BigUint;
use std::cell::{Cell, RefCell};

pub const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const CONTRACT: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
pub const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub fn units(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 10).unwrap()
}

/// One request made to the chain, in the order it was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ReadAllowance {
        token: String,
        owner: String,
        spender: String,
    },
    Approve {
        token: String,
        spender: String,
        amount: BigUint,
    },
    BatchTransfer {
        contract: String,
        token: String,
        recipients: Vec<String>,
        amounts: Vec<BigUint>,
        total: BigUint,
    },
    AwaitConfirmation(String),
}

#[derive(Debug, Default)]
pub struct MockChain {
    pub allowance: RefCell<BigUint>,
    pub fail_allowance: Cell<bool>,
    pub reject_approval: Cell<bool>,
    pub revert_approval: Cell<bool>,
    pub reject_transfer: Cell<bool>,
    pub revert_transfer: Cell<bool>,
    calls: RefCell<Vec<Call>>,
    approvals: RefCell<Vec<String>>,
    nonce: Cell<u64>,
    hold: RefCell<Option<oneshot::Receiver<()>>>,
}

impl MockChain {
    pub fn new(allowance: BigUint) -> Self {
        MockChain {
            allowance: RefCell::new(allowance),
            ..Default::default()
        }
    }

    /// Make the next confirmation wait until the returned sender fires
    pub fn hold_confirmations(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold.borrow_mut() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn approval_count(&self) -> usize {
        self.count(|call| matches!(call, Call::Approve { .. }))
    }

    pub fn transfer_count(&self) -> usize {
        self.count(|call| matches!(call, Call::BatchTransfer { .. }))
    }

    pub fn allowance_reads(&self) -> usize {
        self.count(|call| matches!(call, Call::ReadAllowance { .. }))
    }

    fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| f(call)).count()
    }

    fn next_hash(&self) -> TransactionHandle {
        let nonce = self.nonce.get() + 1;
        self.nonce.set(nonce);
        TransactionHandle::new(format!("0x{:064x}", nonce))
    }
}

#[async_trait(?Send)]
impl ChainCollaborator for MockChain {
    async fn read_allowance(
        &self,
        token: &str,
        owner: &str,
        spender: &str,
    ) -> Result<BigUint, ChainError> {
        self.calls.borrow_mut().push(Call::ReadAllowance {
            token: token.to_string(),
            owner: owner.to_string(),
            spender: spender.to_string(),
        });
        if self.fail_allowance.get() {
            return Err(ChainError::Rpc("node unavailable".to_string()));
        }
        Ok(self.allowance.borrow().clone())
    }

    async fn send_approval(
        &self,
        token: &str,
        spender: &str,
        amount: &BigUint,
    ) -> Result<TransactionHandle, ChainError> {
        self.calls.borrow_mut().push(Call::Approve {
            token: token.to_string(),
            spender: spender.to_string(),
            amount: amount.clone(),
        });
        if self.reject_approval.get() {
            return Err(ChainError::Rejected("User rejected the request".to_string()));
        }
        let handle = self.next_hash();
        self.approvals.borrow_mut().push(handle.0.clone());
        if !self.revert_approval.get() {
            *self.allowance.borrow_mut() = amount.clone();
        }
        Ok(handle)
    }

    async fn send_batch_transfer(
        &self,
        contract: &str,
        token: &str,
        recipients: &[String],
        amounts: &[BigUint],
        total: &BigUint,
    ) -> Result<TransactionHandle, ChainError> {
        self.calls.borrow_mut().push(Call::BatchTransfer {
            contract: contract.to_string(),
            token: token.to_string(),
            recipients: recipients.to_vec(),
            amounts: amounts.to_vec(),
            total: total.clone(),
        });
        if self.reject_transfer.get() {
            return Err(ChainError::Rejected("User rejected the request".to_string()));
        }
        Ok(self.next_hash())
    }

    async fn await_confirmation(&self, handle: &TransactionHandle) -> Result<Receipt, ChainError> {
        self.calls
            .borrow_mut()
            .push(Call::AwaitConfirmation(handle.0.clone()));
        let hold = self.hold.borrow_mut().take();
        if let Some(rx) = hold {
            let _ = rx.await;
        }

        let is_approval = self.approvals.borrow().contains(&handle.0);
        let reverted = if is_approval {
            self.revert_approval.get()
        } else {
            self.revert_transfer.get()
        };
        Ok(Receipt {
            transaction_hash: handle.0.clone(),
            status: if reverted {
                ReceiptStatus::Reverted
            } else {
                ReceiptStatus::Success
            },
            block_number: Some(self.nonce.get()),
        })
    }
}
