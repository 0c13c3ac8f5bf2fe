//! Batch-transfer contract deployments
//!
//! TSender comes in two variants per chain: the checked contract and a
//! gas-optimized "no_check" contract that skips some safety checks. Which
//! addresses exist is supplied by the host as a chain id keyed table.

use crate::error::AirdropError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which batch-transfer contract to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SendMode {
    /// Checked contract
    #[default]
    Safe,
    /// Gas-optimized contract without safety checks
    Unsafe,
}

impl SendMode {
    pub fn is_unsafe(self) -> bool {
        matches!(self, SendMode::Unsafe)
    }
}

/// Contract addresses on one chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Checked TSender contract
    #[serde(default)]
    pub tsender: Option<String>,
    /// Gas-optimized contract, absent on chains that only have the safer version
    #[serde(default)]
    pub no_check: Option<String>,
}

impl Deployment {
    fn address(&self, mode: SendMode) -> Option<&str> {
        match mode {
            SendMode::Safe => self.tsender.as_deref(),
            SendMode::Unsafe => self.no_check.as_deref(),
        }
        .filter(|address| !address.is_empty())
    }
}

/// Deployments keyed by chain id
///
/// # Example
/// ```json
/// { "1": { "tsender": "0x3aD9...", "noCheck": null }, "31337": { "tsender": "0x5FbD..." } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deployments {
    chains: BTreeMap<u64, Deployment>,
}

impl Deployments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, AirdropError> {
        serde_json::from_str(json)
            .map_err(|e| AirdropError::InvalidInput(format!("Invalid deployments: {}", e)))
    }

    pub fn insert(&mut self, chain_id: u64, deployment: Deployment) {
        self.chains.insert(chain_id, deployment);
    }

    pub fn get(&self, chain_id: u64) -> Option<&Deployment> {
        self.chains.get(&chain_id)
    }

    /// Address of the batch-transfer contract for `chain_id` in `mode`
    pub fn spender(&self, chain_id: u64, mode: SendMode) -> Result<&str, AirdropError> {
        let deployment = self
            .chains
            .get(&chain_id)
            .ok_or(AirdropError::UnsupportedChain(chain_id))?;
        deployment.address(mode).ok_or(match mode {
            SendMode::Unsafe => AirdropError::UnsafeModeUnavailable(chain_id),
            SendMode::Safe => AirdropError::UnsupportedChain(chain_id),
        })
    }
}
