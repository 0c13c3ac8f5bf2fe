//! JS-backed key-value store
//!
//! Wraps any object with `getItem(key)` / `setItem(key, value)`, so
//! `window.localStorage` can be passed in directly.

use crate::store::{KeyValueStore, MemoryStore};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Store handed in by the host, or an in-memory one when none was given
pub enum HostStore {
    Js(JsValue),
    Memory(MemoryStore),
}

impl HostStore {
    pub fn from_js(value: JsValue) -> Self {
        if value.is_undefined() || value.is_null() {
            HostStore::Memory(MemoryStore::new())
        } else {
            HostStore::Js(value)
        }
    }

    fn method(obj: &JsValue, name: &str) -> Option<js_sys::Function> {
        js_sys::Reflect::get(obj, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
    }
}

impl KeyValueStore for HostStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            HostStore::Memory(store) => store.get(key),
            HostStore::Js(obj) => Self::method(obj, "getItem")?
                .call1(obj, &JsValue::from_str(key))
                .ok()?
                .as_string(),
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self {
            HostStore::Memory(store) => store.set(key, value),
            HostStore::Js(obj) => {
                let stored = Self::method(obj, "setItem").map(|f| {
                    f.call2(obj, &JsValue::from_str(key), &JsValue::from_str(value))
                });
                // quota errors and missing methods only cost persistence
                if !matches!(stored, Some(Ok(_))) {
                    warn!("Failed to persist '{}'", key);
                }
            }
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_missing_store_falls_back_to_memory() {
        let store = HostStore::from_js(JsValue::UNDEFINED);
        store.set("amounts", "1, 2");
        assert_eq!(store.get("amounts").as_deref(), Some("1, 2"));
    }

    #[wasm_bindgen_test]
    fn test_object_without_methods() {
        let store = HostStore::from_js(js_sys::Object::new().into());
        store.set("amounts", "1");
        assert_eq!(store.get("amounts"), None);
    }
}
