//! JS-backed chain collaborator
//!
//! Adapts a plain JS object (usually built on wagmi/viem actions) to
//! [`ChainCollaborator`]. Each method may return a value or a Promise:
//!
//! ```javascript
//! {
//!   readAllowance: (token, owner, spender) => readContract(...),        // bigint
//!   sendApproval: (token, spender, amount) => writeContract(...),       // hash
//!   sendBatchTransfer: (contract, token, recipients, amounts, total) => writeContract(...),
//!   awaitConfirmation: (hash) => waitForTransactionReceipt(...),        // receipt
//! }
//! ```

use crate::chain::{ChainCollaborator, Receipt, TransactionHandle};
use crate::error::ChainError;
use crate::wasm::try_into_js_value::{units_from_js_value, TryIntoJsValue};
use async_trait::async_trait;
use num_bigint::BigUint;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// EIP-1193 code for a request the user rejected
const USER_REJECTED_CODE: f64 = 4001.0;

/// [`ChainCollaborator`] over a JS object
pub struct JsChainCollaborator {
    inner: JsValue,
}

impl JsChainCollaborator {
    pub fn new(inner: JsValue) -> Self {
        JsChainCollaborator { inner }
    }

    /// Call `method` on the wrapped object and await the result
    async fn call(&self, method: &str, args: &[JsValue]) -> Result<JsValue, ChainError> {
        let function = js_sys::Reflect::get(&self.inner, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| ChainError::Rpc(format!("collaborator has no method '{}'", method)))?;

        let args: js_sys::Array = args.iter().collect();
        let returned = function.apply(&self.inner, &args).map_err(classify_error)?;
        JsFuture::from(js_sys::Promise::resolve(&returned))
            .await
            .map_err(classify_error)
    }
}

fn to_js<T: TryIntoJsValue>(value: &T) -> Result<JsValue, ChainError> {
    value
        .try_to_js_value()
        .map_err(|e| ChainError::Rpc(e.to_string()))
}

fn hash_from_js(value: JsValue) -> Result<TransactionHandle, ChainError> {
    value
        .as_string()
        .map(TransactionHandle)
        .ok_or_else(|| ChainError::Rpc("expected a transaction hash string".to_string()))
}

/// Map a thrown JS value to a [`ChainError`]
fn classify_error(err: JsValue) -> ChainError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    let code = js_sys::Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let name = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.name()))
        .unwrap_or_default();

    if code == Some(USER_REJECTED_CODE) || name.contains("UserRejected") {
        ChainError::Rejected(message)
    } else {
        ChainError::Rpc(message)
    }
}

#[async_trait(?Send)]
impl ChainCollaborator for JsChainCollaborator {
    async fn read_allowance(
        &self,
        token: &str,
        owner: &str,
        spender: &str,
    ) -> Result<BigUint, ChainError> {
        let value = self
            .call(
                "readAllowance",
                &[token.into(), owner.into(), spender.into()],
            )
            .await?;
        units_from_js_value(&value).map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn send_approval(
        &self,
        token: &str,
        spender: &str,
        amount: &BigUint,
    ) -> Result<TransactionHandle, ChainError> {
        let value = self
            .call("sendApproval", &[token.into(), spender.into(), to_js(amount)?])
            .await?;
        hash_from_js(value)
    }

    async fn send_batch_transfer(
        &self,
        contract: &str,
        token: &str,
        recipients: &[String],
        amounts: &[BigUint],
        total: &BigUint,
    ) -> Result<TransactionHandle, ChainError> {
        let value = self
            .call(
                "sendBatchTransfer",
                &[
                    contract.into(),
                    token.into(),
                    to_js(&recipients.to_vec())?,
                    to_js(&amounts.to_vec())?,
                    to_js(total)?,
                ],
            )
            .await?;
        hash_from_js(value)
    }

    async fn await_confirmation(&self, handle: &TransactionHandle) -> Result<Receipt, ChainError> {
        let value = self
            .call("awaitConfirmation", &[handle.hash().into()])
            .await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| ChainError::Rpc(format!("Invalid receipt: {}", e)))
    }
}
