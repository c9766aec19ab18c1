//! Typed object-store contracts and the virtual path model behind the asset explorer.
//!
//! This crate is the boundary between the headless explorer engine (`asset_explorer`) and
//! concrete storage backends. It exposes the [`VirtualPath`] model, the object-safe
//! [`ObjectStoreClient`] trait, and in-process adapters; browser transport lives in
//! `asset_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod content_type;
pub mod path;
pub mod store;
pub mod time;

pub use content_type::{content_type_for, extension_of, OCTET_STREAM};
pub use path::{sanitize_name, NameError, VirtualPath, PATH_SEPARATOR};
pub use store::memory::{MemoryObject, MemoryObjectStore, MemoryStoreOp};
pub use store::service::{NoopObjectStore, ObjectStoreClient, ObjectStoreFuture};
pub use store::types::{StoreListing, StoreObject, StoreRef};
pub use time::{next_upload_stamp_ms, unix_time_ms_now};
