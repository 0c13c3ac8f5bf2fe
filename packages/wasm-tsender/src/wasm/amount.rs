//! WASM bindings for amount handling
//!
//! AmountNamespace exposes the pure parsing helpers so the UI can validate
//! single fields without going through the form.

use crate::amount::{format_amount, parse_amount, parse_amount_list};
use crate::js_obj;
use crate::normalize::split_entries;
use crate::wasm::try_into_js_value::{units_from_js_value, TryIntoJsValue};
use wasm_bindgen::prelude::*;

/// Namespace for amount operations
#[wasm_bindgen]
pub struct AmountNamespace;

#[wasm_bindgen]
impl AmountNamespace {
    /// Split comma or newline separated text into trimmed entries
    #[wasm_bindgen(js_name = splitEntries)]
    pub fn split_entries(raw: &str) -> Vec<String> {
        split_entries(raw)
    }

    /// Parse decimal text into smallest units
    ///
    /// # Arguments
    /// * `text` - Decimal amount, e.g. "1.5"
    /// * `decimals` - Token decimals, undefined while not loaded
    ///
    /// # Returns
    /// Amount as BigInt
    #[wasm_bindgen(js_name = parseAmount)]
    pub fn parse_amount(text: &str, decimals: Option<u8>) -> Result<JsValue, JsValue> {
        let amount = parse_amount(text, decimals)?;
        Ok(amount.try_to_js_value()?)
    }

    /// Format smallest units (BigInt, number or string) as decimal text
    #[wasm_bindgen(js_name = formatAmount)]
    pub fn format_amount(value: JsValue, decimals: u8) -> Result<String, JsValue> {
        let value = units_from_js_value(&value)?;
        Ok(format_amount(&value, decimals))
    }

    /// Parse a whole comma or newline separated amount field
    ///
    /// # Returns
    /// `{ amounts: (bigint | undefined)[], total: bigint, allValid: boolean, issues }`
    #[wasm_bindgen(js_name = parseAmountList)]
    pub fn parse_amount_list(raw: &str, decimals: Option<u8>) -> Result<JsValue, JsValue> {
        let batch = parse_amount_list(&split_entries(raw), decimals);
        Ok(js_obj!(
            "amounts" => batch.amounts,
            "total" => batch.total,
            "allValid" => batch.all_valid(),
            "issues" => batch.issues,
        )?)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_parse_amount_returns_bigint() {
        let value = AmountNamespace::parse_amount("1.5", Some(6)).unwrap();
        assert!(value.is_bigint());
        assert!(AmountNamespace::parse_amount("1.5", None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_parse_amount_list_object() {
        let result = AmountNamespace::parse_amount_list("10, x", Some(2)).unwrap();
        let all_valid = js_sys::Reflect::get(&result, &"allValid".into()).unwrap();
        assert_eq!(all_valid.as_bool(), Some(false));
    }
}
