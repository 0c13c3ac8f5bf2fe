//! Rust to JavaScript value conversion
//!
//! This module provides the TryIntoJsValue trait for converting Rust types
//! to JavaScript values. Token amounts always cross as `BigInt`.

use crate::amount::AmountIssue;
use crate::error::AirdropError;
use num_bigint::BigUint;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Error type for JS conversion failures
#[derive(Debug, Clone)]
pub struct JsConversionError(String);

impl JsConversionError {
    pub fn new(msg: &str) -> Self {
        JsConversionError(msg.to_string())
    }
}

impl std::fmt::Display for JsConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<JsConversionError> for JsValue {
    fn from(err: JsConversionError) -> Self {
        js_sys::Error::new(&err.0).into()
    }
}

/// Trait for converting Rust types to JavaScript values
pub trait TryIntoJsValue {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError>;
}

impl TryIntoJsValue for String {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        Ok(JsValue::from_str(self))
    }
}

impl TryIntoJsValue for bool {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        Ok(JsValue::from_bool(*self))
    }
}

impl TryIntoJsValue for usize {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        Ok(JsValue::from_f64(*self as f64))
    }
}

impl TryIntoJsValue for BigUint {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        // Convert to BigInt via string, BigInt::from only supports 64 bits
        js_sys::BigInt::new(&JsValue::from_str(&self.to_str_radix(10)))
            .map(|b| b.into())
            .map_err(|_| JsConversionError::new("Failed to create BigInt"))
    }
}

impl TryIntoJsValue for AmountIssue {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        crate::js_obj!(
            "index" => self.index,
            "text" => self.text,
            "reason" => self.reason,
        )
    }
}

impl<T: TryIntoJsValue> TryIntoJsValue for Option<T> {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        match self {
            Some(v) => v.try_to_js_value(),
            None => Ok(JsValue::undefined()),
        }
    }
}

impl<T: TryIntoJsValue> TryIntoJsValue for Vec<T> {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        let arr = js_sys::Array::new();
        for item in self {
            arr.push(&item.try_to_js_value()?);
        }
        Ok(arr.into())
    }
}

/// Read smallest units from a JS `BigInt`, integral number or decimal string
pub fn units_from_js_value(value: &JsValue) -> Result<BigUint, AirdropError> {
    let digits = if let Some(big) = value.dyn_ref::<js_sys::BigInt>() {
        String::from(
            big.to_string(10)
                .map_err(|_| AirdropError::InvalidInput("Invalid BigInt".to_string()))?,
        )
    } else if let Some(text) = value.as_string() {
        text
    } else if let Some(number) = value.as_f64() {
        if number < 0.0 || number.fract() != 0.0 || number > 9_007_199_254_740_991.0 {
            return Err(AirdropError::InvalidInput(format!(
                "{} is not a safe non-negative integer, pass a BigInt",
                number
            )));
        }
        (number as u64).to_string()
    } else {
        return Err(AirdropError::InvalidInput(
            "Expected a BigInt, number or string amount".to_string(),
        ));
    };

    BigUint::parse_bytes(digits.trim().as_bytes(), 10).ok_or_else(|| {
        AirdropError::InvalidInput(format!("'{}' is not a non-negative integer", digits))
    })
}

/// Macro for building JavaScript objects
#[macro_export]
macro_rules! js_obj {
    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        use $crate::wasm::try_into_js_value::{TryIntoJsValue, JsConversionError};
        let obj = js_sys::Object::new();
        $(
            js_sys::Reflect::set(
                &obj,
                &wasm_bindgen::JsValue::from_str($key),
                &TryIntoJsValue::try_to_js_value(&$value)?
            ).map_err(|_| JsConversionError::new(&format!("Failed to set property: {}", $key)))?;
        )*
        Ok::<wasm_bindgen::JsValue, JsConversionError>(obj.into())
    }};
}
