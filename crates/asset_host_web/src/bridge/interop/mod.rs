//! Shared transport interop for the browser bridge.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for the bridge.

use crate::rest::{HttpRequest, HttpResponse};

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub async fn fetch(request: &HttpRequest, body: &[u8]) -> Result<HttpResponse, String> {
    imp::fetch(request, body).await
}
