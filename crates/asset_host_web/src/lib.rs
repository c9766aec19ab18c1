//! Browser (`wasm32`) implementation of the [`asset_host`] object-store contract.
//!
//! [`WebObjectStore`] talks to the Firebase Storage REST surface. Request construction and
//! response decoding live in [`rest`] and are plain functions, so they run in native tests.
//! The `fetch` transport is split under `bridge/`:
//! - `bridge::interop` (wasm binding and a non-wasm shim)

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time store-strategy selection and the adapter factory used for runtime wiring.
pub mod adapters;
mod bridge;
pub mod config;
pub mod rest;
pub mod store;

pub use adapters::{
    object_store_client, selected_store_strategy, store_strategy_name, ObjectStoreAdapter,
    StoreStrategy,
};
pub use config::{FirebaseStorageConfig, DEFAULT_API_BASE};
pub use rest::{HttpMethod, HttpRequest, HttpResponse};
pub use store::WebObjectStore;
