//! WASM bindings for the airdrop form
//!
//! Thin wrapper around the core AirdropForm with #[wasm_bindgen]

use crate::config::{Deployments, SendMode};
use crate::error::AirdropError;
use crate::form::AirdropForm;
use crate::types::{SubmitContext, TokenMetadata};
use crate::wasm::collaborator::JsChainCollaborator;
use crate::wasm::store::HostStore;
use crate::wasm::try_into_js_value::units_from_js_value;
use log::warn;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// WASM-exposed airdrop form
#[wasm_bindgen]
pub struct WasmAirdropForm {
    inner: Rc<RefCell<AirdropForm<HostStore>>>,
}

#[wasm_bindgen]
impl WasmAirdropForm {
    /// Create the form and restore its persisted fields
    ///
    /// # Arguments
    /// * `store` - Object with getItem/setItem (e.g. `localStorage`), or undefined
    /// * `deployments` - TSender addresses by chain id, or undefined
    ///
    /// # Example Deployments
    /// ```json
    /// { "31337": { "tsender": "0x5FbDB2315678afecb367f032d93F642f64180aa3", "noCheck": null } }
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(store: JsValue, deployments: JsValue) -> Result<WasmAirdropForm, JsValue> {
        let deployments = deployments_from_js(&deployments)?;
        let form = AirdropForm::new(HostStore::from_js(store), deployments);
        Ok(WasmAirdropForm {
            inner: Rc::new(RefCell::new(form)),
        })
    }

    #[wasm_bindgen(getter, js_name = tokenAddress)]
    pub fn token_address(&self) -> String {
        self.inner.borrow().token_address().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn recipients(&self) -> String {
        self.inner.borrow().recipients().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn amounts(&self) -> String {
        self.inner.borrow().amounts().to_string()
    }

    #[wasm_bindgen(js_name = setTokenAddress)]
    pub fn set_token_address(&self, value: &str) {
        self.inner.borrow_mut().set_token_address(value);
    }

    #[wasm_bindgen(js_name = setRecipients)]
    pub fn set_recipients(&self, value: &str) {
        self.inner.borrow_mut().set_recipients(value);
    }

    #[wasm_bindgen(js_name = setAmounts)]
    pub fn set_amounts(&self, value: &str) {
        self.inner.borrow_mut().set_amounts(value);
    }

    /// Set token metadata as it arrives from the ERC20 reads
    ///
    /// # Arguments
    /// * `decimals` - `decimals()`, undefined while loading
    /// * `name` - `name()`, undefined while loading
    /// * `balance` - `balanceOf(owner)` as BigInt, undefined while loading
    #[wasm_bindgen(js_name = setToken)]
    pub fn set_token(
        &self,
        decimals: Option<u8>,
        name: Option<String>,
        balance: JsValue,
    ) -> Result<(), JsValue> {
        let balance = if balance.is_undefined() || balance.is_null() {
            None
        } else {
            Some(units_from_js_value(&balance)?)
        };
        self.inner.borrow_mut().set_token(TokenMetadata {
            decimals,
            name,
            balance,
        });
        Ok(())
    }

    /// Switch between the checked and the gas-optimized contract
    #[wasm_bindgen(js_name = setUnsafeMode)]
    pub fn set_unsafe_mode(&self, unsafe_mode: bool) {
        let mode = if unsafe_mode {
            SendMode::Unsafe
        } else {
            SendMode::Safe
        };
        self.inner.borrow_mut().set_mode(mode);
    }

    #[wasm_bindgen(js_name = setDeployments)]
    pub fn set_deployments(&self, deployments: JsValue) -> Result<(), JsValue> {
        let deployments = deployments_from_js(&deployments)?;
        self.inner.borrow_mut().set_deployments(deployments);
        Ok(())
    }

    /// Derived view: totals, validity, balance check, button state
    #[wasm_bindgen]
    pub fn view(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.borrow().view())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Current submission status: `{ state, reason? }`
    #[wasm_bindgen]
    pub fn status(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.borrow().status())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Hash of the last airdrop transaction accepted by the wallet
    #[wasm_bindgen(getter, js_name = transferHash)]
    pub fn transfer_hash(&self) -> Option<String> {
        self.inner
            .borrow()
            .sequencer()
            .transfer_hash()
            .map(|handle| handle.0)
    }

    /// Register a callback receiving every status change
    #[wasm_bindgen(js_name = onStatusChange)]
    pub fn on_status_change(&self, callback: js_sys::Function) {
        self.inner.borrow().sequencer().set_listener(move |status| {
            let value = match serde_wasm_bindgen::to_value(status) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Failed to serialize status: {}", e);
                    return;
                }
            };
            if callback.call1(&JsValue::NULL, &value).is_err() {
                warn!("Status callback threw");
            }
        });
    }

    /// Validate the fields and run approve-then-airdrop
    ///
    /// # Arguments
    /// * `collaborator` - Object with readAllowance, sendApproval,
    ///   sendBatchTransfer and awaitConfirmation
    /// * `context` - `{ owner, chainId }` of the connected wallet
    ///
    /// # Returns
    /// Promise of `{ approval?, transfer }` receipts; rejects with an Error
    pub fn submit(&self, collaborator: JsValue, context: JsValue) -> js_sys::Promise {
        let (submission, sequencer) = {
            let form = self.inner.borrow();
            (form.submission(), form.sequencer())
        };

        future_to_promise(async move {
            let ctx: SubmitContext = serde_wasm_bindgen::from_value(context)
                .map_err(|e| AirdropError::InvalidInput(format!("Invalid context: {}", e)))?;
            let chain = JsChainCollaborator::new(collaborator);
            let result = submission.execute(&sequencer, &chain, &ctx).await?;
            serde_wasm_bindgen::to_value(&result)
                .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
        })
    }
}

fn deployments_from_js(value: &JsValue) -> Result<Deployments, AirdropError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Deployments::new());
    }
    // via JSON so chain id keys parse as integers
    let json = js_sys::JSON::stringify(value)
        .map_err(|_| AirdropError::InvalidInput("Deployments are not serializable".to_string()))?;
    Deployments::from_json(&String::from(json))
}
