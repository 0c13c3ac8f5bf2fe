//! Persistence of form fields
//!
//! The form keeps its raw text in a key-value store so a reload restores
//! what the user typed. Values are opaque strings, restored verbatim.

use std::cell::RefCell;
use std::collections::HashMap;

/// Store key of the token address field
pub const TOKEN_ADDRESS_KEY: &str = "tokenAddress";
/// Store key of the recipients field
pub const RECIPIENTS_KEY: &str = "recipients";
/// Store key of the amounts field
pub const AMOUNTS_KEY: &str = "amounts";

/// String key-value storage, e.g. `window.localStorage`
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-process store, used when the host provides none
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value);
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}
