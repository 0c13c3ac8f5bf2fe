//! Approve-then-airdrop sequencing
//!
//! A submission walks an explicit status machine:
//!
//! ```text
//! Idle -> WalletPending -> Confirming -> { Confirmed | Failed }
//! ```
//!
//! When the allowance is too low, the approval leg runs first and passes
//! through `WalletPending -> Confirming` before the transfer leg does the
//! same. The transfer is never sent before the approval is included.
//! While a submission is in `WalletPending` or `Confirming`, new submissions
//! are rejected.

use crate::chain::{ChainCollaborator, Receipt, TransactionHandle};
use crate::error::{AirdropError, ChainError};
use crate::plan::TransferPlan;
use log::{debug, info, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Observable state of the current submission
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "camelCase")]
pub enum TransactionStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Waiting for the user to sign in the wallet
    WalletPending,
    /// Sent, waiting for inclusion
    Confirming,
    /// Airdrop included on chain
    Confirmed,
    /// Submission ended with an error
    Failed(String),
}

impl TransactionStatus {
    /// A submission is running
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            TransactionStatus::WalletPending | TransactionStatus::Confirming
        )
    }

    /// Text for the submit button while a submission is running or done
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TransactionStatus::Idle => None,
            TransactionStatus::WalletPending => Some("Confirming in wallet..."),
            TransactionStatus::Confirming => Some("Waiting for transaction to be included..."),
            TransactionStatus::Confirmed => Some("Transaction confirmed."),
            TransactionStatus::Failed(_) => Some("Error, see console."),
        }
    }
}

/// Token and batch-transfer contract of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirdropTarget {
    /// ERC20 token being sent
    pub token: String,
    /// TSender contract, also the spender of the approval
    pub contract: String,
}

/// Receipts of a completed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    /// Present when an approval had to be sent first
    pub approval: Option<Receipt>,
    pub transfer: Receipt,
}

type StatusListener = Rc<dyn Fn(&TransactionStatus)>;

/// Drives one submission at a time against a [`ChainCollaborator`]
#[derive(Default)]
pub struct TransactionSequencer {
    status: RefCell<TransactionStatus>,
    transfer_hash: RefCell<Option<TransactionHandle>>,
    listener: RefCell<Option<StatusListener>>,
}

impl std::fmt::Debug for TransactionSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionSequencer")
            .field("status", &self.status.borrow())
            .field("transfer_hash", &self.transfer_hash.borrow())
            .finish()
    }
}

impl TransactionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TransactionStatus {
        self.status.borrow().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.status.borrow().is_in_flight()
    }

    /// Hash of the last airdrop transaction the wallet accepted
    pub fn transfer_hash(&self) -> Option<TransactionHandle> {
        self.transfer_hash.borrow().clone()
    }

    /// Register a callback invoked on every status change
    pub fn set_listener(&self, listener: impl Fn(&TransactionStatus) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Claim the sequencer for a new submission
    ///
    /// Moves to `WalletPending`. Fails with `SubmissionInFlight`, leaving the
    /// running submission untouched, when one is already in progress.
    pub fn begin(&self) -> Result<(), AirdropError> {
        if self.is_in_flight() {
            warn!("Submission rejected, previous one is {:?}", self.status());
            return Err(AirdropError::SubmissionInFlight);
        }
        self.transfer_hash.borrow_mut().take();
        self.transition(TransactionStatus::WalletPending);
        Ok(())
    }

    /// End the current submission with `err` and hand it back
    pub fn abort(&self, err: AirdropError) -> AirdropError {
        warn!("Submission failed: {}", err);
        self.transition(TransactionStatus::Failed(err.to_string()));
        err
    }

    /// Claim the sequencer and run `plan` to completion
    pub async fn execute<C>(
        &self,
        target: &AirdropTarget,
        plan: &TransferPlan,
        chain: &C,
    ) -> Result<TransactionResult, AirdropError>
    where
        C: ChainCollaborator + ?Sized,
    {
        self.begin()?;
        self.run(target, plan, chain).await
    }

    /// Run `plan` on a sequencer already claimed with [`begin`](Self::begin)
    pub async fn run<C>(
        &self,
        target: &AirdropTarget,
        plan: &TransferPlan,
        chain: &C,
    ) -> Result<TransactionResult, AirdropError>
    where
        C: ChainCollaborator + ?Sized,
    {
        let approval = if plan.needs_approval {
            let receipt = self
                .approve(target, plan, chain)
                .await
                .map_err(|e| self.abort(AirdropError::ApprovalFailed(e.to_string())))?;
            Some(receipt)
        } else {
            None
        };

        let transfer = self
            .transfer(target, plan, chain)
            .await
            .map_err(|e| self.abort(AirdropError::TransferFailed(e.to_string())))?;

        info!(
            "Airdrop of {} to {} recipients confirmed in {}",
            plan.total,
            plan.len(),
            transfer.transaction_hash
        );
        self.transition(TransactionStatus::Confirmed);
        Ok(TransactionResult { approval, transfer })
    }

    async fn approve<C>(
        &self,
        target: &AirdropTarget,
        plan: &TransferPlan,
        chain: &C,
    ) -> Result<Receipt, ChainError>
    where
        C: ChainCollaborator + ?Sized,
    {
        self.transition(TransactionStatus::WalletPending);
        debug!("Requesting approval of {} for {}", plan.total, target.contract);
        let handle = chain
            .send_approval(&target.token, &target.contract, &plan.total)
            .await?;

        self.transition(TransactionStatus::Confirming);
        let receipt = chain.await_confirmation(&handle).await?.into_result()?;
        info!("Approval confirmed: {}", receipt.transaction_hash);
        Ok(receipt)
    }

    async fn transfer<C>(
        &self,
        target: &AirdropTarget,
        plan: &TransferPlan,
        chain: &C,
    ) -> Result<Receipt, ChainError>
    where
        C: ChainCollaborator + ?Sized,
    {
        self.transition(TransactionStatus::WalletPending);
        debug!("Requesting airdrop to {} recipients", plan.len());
        let handle = chain
            .send_batch_transfer(
                &target.contract,
                &target.token,
                &plan.recipients,
                &plan.amounts,
                &plan.total,
            )
            .await?;

        info!("Airdrop submitted: {}", handle);
        *self.transfer_hash.borrow_mut() = Some(handle.clone());
        self.transition(TransactionStatus::Confirming);
        chain.await_confirmation(&handle).await?.into_result()
    }

    fn transition(&self, next: TransactionStatus) {
        {
            let mut status = self.status.borrow_mut();
            if *status == next {
                return;
            }
            debug!("Status {:?} -> {:?}", *status, next);
            *status = next.clone();
        }
        // cloned out so the listener may replace itself
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(&next);
        }
    }
}
