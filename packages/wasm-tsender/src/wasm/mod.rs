//! WASM bindings for wasm-tsender
//!
//! This module contains thin wrappers with #[wasm_bindgen] that delegate
//! to the core Rust implementations, plus adapters that turn host JS
//! objects into the core's collaborator and store traits.

pub mod amount;
pub mod collaborator;
pub mod form;
pub mod store;
pub mod try_into_js_value;

// Re-export WASM types
pub use amount::AmountNamespace;
pub use collaborator::JsChainCollaborator;
pub use form::WasmAirdropForm;
pub use store::HostStore;
