//! wasm-tsender: WASM module for batch ERC20 airdrops through TSender
//!
//! This crate provides:
//! - Splitting and exact parsing of recipient and amount fields
//! - Transfer planning (length checks, exact totals, approval decision)
//! - Approve-then-airdrop sequencing with an observable status machine
//! - A form controller with injected persistence
//!
//! # Architecture
//!
//! The crate follows a two-layer architecture:
//! - **Core layer** (`src/*.rs`): Pure Rust logic, no WASM dependencies
//! - **WASM layer** (`src/wasm/*.rs`): Thin wrappers with `#[wasm_bindgen]`
//!
//! Wallet and node access sit behind [`ChainCollaborator`]; the WASM layer
//! implements it over a JS object.

pub mod address;
pub mod amount;
pub mod chain;
pub mod config;
pub mod error;
pub mod form;
pub mod normalize;
pub mod plan;
pub mod sequencer;
pub mod store;
pub mod types;
pub mod wasm;

#[cfg(test)]
mod test_utils;

// Re-export main types for convenience
pub use address::{decode_address, validate_address};
pub use amount::{format_amount, parse_amount, parse_amount_list, AmountBatch};
pub use chain::{ChainCollaborator, Receipt, ReceiptStatus, TransactionHandle};
pub use config::{Deployment, Deployments, SendMode};
pub use error::{AirdropError, ChainError};
pub use form::{AirdropForm, FormView, Submission};
pub use normalize::split_entries;
pub use plan::{build_plan, TransferPlan};
pub use sequencer::{AirdropTarget, TransactionResult, TransactionSequencer, TransactionStatus};
pub use store::{KeyValueStore, MemoryStore};
pub use types::{SubmitContext, TokenMetadata};
