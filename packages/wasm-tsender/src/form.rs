//! Airdrop form controller
//!
//! Holds the raw text fields, persists them through a [`KeyValueStore`] and
//! recomputes a [`FormView`] on every change. Submission status in the view
//! is always read live from the sequencer. Submission snapshots the
//! fields and runs them through parsing, planning and sequencing against a
//! [`ChainCollaborator`].
//!
//! The view's balance and validity flags are advisory. [`Submission`]
//! re-validates everything from the raw text and a freshly read allowance.

use crate::address::validate_address;
use crate::amount::{approximate_total, format_amount, parse_amount_list, AmountBatch, AmountIssue};
use crate::chain::ChainCollaborator;
use crate::config::{Deployments, SendMode};
use crate::error::AirdropError;
use crate::normalize::split_entries;
use crate::plan::{build_plan, check_lengths};
use crate::sequencer::{AirdropTarget, TransactionResult, TransactionSequencer, TransactionStatus};
use crate::store::{KeyValueStore, AMOUNTS_KEY, RECIPIENTS_KEY, TOKEN_ADDRESS_KEY};
use crate::types::{serialize_units, SubmitContext, TokenMetadata};
use log::{debug, info};
use num_bigint::BigUint;
use serde::Serialize;
use std::rc::Rc;

/// Everything the presentation layer shows, derived from the current fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub recipient_count: usize,
    pub amount_count: usize,
    /// Exact sum of the valid amounts, in smallest units
    #[serde(serialize_with = "serialize_units")]
    pub total: BigUint,
    /// `total` in whole tokens, once decimals are known
    pub total_tokens: Option<String>,
    /// Float sum of the typed amounts, display only
    pub approximate_total: f64,
    pub amounts_valid: bool,
    pub amounts_error: Option<String>,
    pub amount_issues: Vec<AmountIssue>,
    pub has_enough_tokens: bool,
    pub token_address_valid: bool,
    pub token_name: Option<String>,
    pub decimals: Option<u8>,
    pub status: TransactionStatus,
    pub can_submit: bool,
    pub button_label: String,
}

/// Snapshot of the form taken when the user presses send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub token_address: String,
    pub recipients: String,
    pub amounts: String,
    pub decimals: Option<u8>,
    pub mode: SendMode,
    pub deployments: Deployments,
}

impl Submission {
    /// Validate, plan and send the snapshot
    ///
    /// Every failure after the sequencer is claimed leaves it in `Failed`.
    pub async fn execute<C>(
        &self,
        sequencer: &TransactionSequencer,
        chain: &C,
        ctx: &SubmitContext,
    ) -> Result<TransactionResult, AirdropError>
    where
        C: ChainCollaborator + ?Sized,
    {
        sequencer.begin()?;

        let (target, recipients, amounts) = self.validate(ctx).map_err(|e| sequencer.abort(e))?;

        let allowance = chain
            .read_allowance(&target.token, &ctx.owner, &target.contract)
            .await
            .map_err(|e| sequencer.abort(AirdropError::AllowanceReadFailed(e.to_string())))?;
        debug!("Allowance for {}: {}", target.contract, allowance);

        let plan = build_plan(recipients, amounts, &allowance).map_err(|e| sequencer.abort(e))?;
        info!(
            "Sending {} to {} recipients (approval needed: {})",
            plan.total,
            plan.len(),
            plan.needs_approval
        );
        sequencer.run(&target, &plan, chain).await
    }

    fn validate(
        &self,
        ctx: &SubmitContext,
    ) -> Result<(AirdropTarget, Vec<String>, Vec<BigUint>), AirdropError> {
        let decimals = self.decimals.ok_or(AirdropError::TokenNotLoaded)?;
        let contract = self.deployments.spender(ctx.chain_id, self.mode)?.to_string();
        let token = self.token_address.trim().to_string();
        if !validate_address(&token) {
            return Err(AirdropError::InvalidAddress(format!("token '{}'", token)));
        }

        let recipients = split_entries(&self.recipients);
        let amount_texts = split_entries(&self.amounts);
        check_lengths(recipients.len(), amount_texts.len())?;

        let batch = parse_amount_list(&amount_texts, Some(decimals));
        let amounts = batch.valid_amounts().ok_or_else(|| {
            AirdropError::InvalidAmountFormat(
                batch
                    .issues
                    .first()
                    .map(|issue| issue.reason.clone())
                    .unwrap_or_default(),
            )
        })?;

        Ok((AirdropTarget { token, contract }, recipients, amounts))
    }
}

/// Form state with load-on-start and save-on-change persistence
pub struct AirdropForm<S: KeyValueStore> {
    store: S,
    deployments: Deployments,
    token_address: String,
    recipients: String,
    amounts: String,
    token: TokenMetadata,
    mode: SendMode,
    sequencer: Rc<TransactionSequencer>,
    view: FormView,
}

impl<S: KeyValueStore> AirdropForm<S> {
    /// Create the form, restoring the persisted fields verbatim
    pub fn new(store: S, deployments: Deployments) -> Self {
        let token_address = store.get(TOKEN_ADDRESS_KEY).unwrap_or_default();
        let recipients = store.get(RECIPIENTS_KEY).unwrap_or_default();
        let amounts = store.get(AMOUNTS_KEY).unwrap_or_default();
        let sequencer = Rc::new(TransactionSequencer::new());

        let mut form = AirdropForm {
            store,
            deployments,
            token_address,
            recipients,
            amounts,
            token: TokenMetadata::default(),
            mode: SendMode::default(),
            view: FormView::empty(),
            sequencer,
        };
        form.on_input_changed();
        form
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    pub fn recipients(&self) -> &str {
        &self.recipients
    }

    pub fn amounts(&self) -> &str {
        &self.amounts
    }

    pub fn token(&self) -> &TokenMetadata {
        &self.token
    }

    pub fn mode(&self) -> SendMode {
        self.mode
    }

    /// Current view; status-dependent fields are read from the sequencer
    pub fn view(&self) -> FormView {
        self.view
            .clone()
            .with_status(self.sequencer.status(), self.mode)
    }

    pub fn status(&self) -> TransactionStatus {
        self.sequencer.status()
    }

    pub fn sequencer(&self) -> Rc<TransactionSequencer> {
        self.sequencer.clone()
    }

    /// Change the token; metadata of the previous token is dropped
    pub fn set_token_address(&mut self, value: &str) {
        if self.token_address != value {
            self.token = TokenMetadata::default();
        }
        self.token_address = value.to_string();
        self.store.set(TOKEN_ADDRESS_KEY, value);
        self.on_input_changed();
    }

    pub fn set_recipients(&mut self, value: &str) {
        self.recipients = value.to_string();
        self.store.set(RECIPIENTS_KEY, value);
        self.on_input_changed();
    }

    pub fn set_amounts(&mut self, value: &str) {
        self.amounts = value.to_string();
        self.store.set(AMOUNTS_KEY, value);
        self.on_input_changed();
    }

    /// Replace the token metadata snapshot
    pub fn set_token(&mut self, token: TokenMetadata) {
        self.token = token;
        self.on_input_changed();
    }

    pub fn set_mode(&mut self, mode: SendMode) {
        self.mode = mode;
        self.on_input_changed();
    }

    pub fn set_deployments(&mut self, deployments: Deployments) {
        self.deployments = deployments;
    }

    /// Recompute the view from the current fields
    pub fn on_input_changed(&mut self) {
        self.view = self.compute_view();
    }

    /// Snapshot the fields for a submission
    pub fn submission(&self) -> Submission {
        Submission {
            token_address: self.token_address.clone(),
            recipients: self.recipients.clone(),
            amounts: self.amounts.clone(),
            decimals: self.token.decimals,
            mode: self.mode,
            deployments: self.deployments.clone(),
        }
    }

    /// Validate and send the current fields
    pub async fn submit<C>(
        &self,
        chain: &C,
        ctx: &SubmitContext,
    ) -> Result<TransactionResult, AirdropError>
    where
        C: ChainCollaborator + ?Sized,
    {
        self.submission()
            .execute(&self.sequencer, chain, ctx)
            .await
    }

    fn compute_view(&self) -> FormView {
        let recipients = split_entries(&self.recipients);
        let amount_texts = split_entries(&self.amounts);
        let decimals = self.token.decimals;

        // nothing can be parsed before decimals are known; no inline error for it
        let batch = match decimals {
            Some(_) => parse_amount_list(&amount_texts, decimals),
            None => AmountBatch::default(),
        };
        let amounts_valid = batch.all_valid();
        let amounts_error = (!amounts_valid).then(|| "Invalid amount format detected".to_string());

        let has_enough_tokens = match &self.token.balance {
            Some(balance) if !self.token_address.is_empty() && batch.total > BigUint::default() => {
                balance >= &batch.total
            }
            _ => true,
        };

        FormView {
            recipient_count: recipients.len(),
            amount_count: amount_texts.len(),
            total_tokens: decimals.map(|d| format_amount(&batch.total, d)),
            total: batch.total,
            approximate_total: approximate_total(&amount_texts),
            amounts_valid,
            amounts_error,
            amount_issues: batch.issues,
            has_enough_tokens,
            token_address_valid: validate_address(self.token_address.trim()),
            token_name: self.token.name.clone(),
            decimals,
            status: TransactionStatus::Idle,
            can_submit: false,
            button_label: String::new(),
        }
    }
}

impl FormView {
    fn with_status(mut self, status: TransactionStatus, mode: SendMode) -> Self {
        // entries cannot be parsed until the token's decimals are known
        let amounts_ready = self.decimals.is_some() || self.amount_count == 0;
        self.can_submit = !status.is_in_flight()
            && self.has_enough_tokens
            && self.amounts_valid
            && amounts_ready;
        self.button_label = match status.label() {
            Some(label) if status.is_in_flight() || matches!(status, TransactionStatus::Failed(_)) => {
                label.to_string()
            }
            _ if !self.has_enough_tokens => "Insufficient token balance".to_string(),
            _ if !self.amounts_valid => "Invalid amounts".to_string(),
            _ if mode.is_unsafe() => "Send Tokens (Unsafe)".to_string(),
            _ => "Send Tokens".to_string(),
        };
        self.status = status;
        self
    }

    fn empty() -> Self {
        FormView {
            recipient_count: 0,
            amount_count: 0,
            total: BigUint::default(),
            total_tokens: None,
            approximate_total: 0.0,
            amounts_valid: true,
            amounts_error: None,
            amount_issues: Vec::new(),
            has_enough_tokens: true,
            token_address_valid: false,
            token_name: None,
            decimals: None,
            status: TransactionStatus::Idle,
            can_submit: false,
            button_label: String::new(),
        }
    }
}
