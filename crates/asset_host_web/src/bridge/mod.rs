//! Browser capability bridge for [`crate::WebObjectStore`].
//!
//! The store only needs one capability from the host: issuing an HTTP request and reading the
//! status plus text body back.

mod interop;

use crate::rest::{HttpRequest, HttpResponse};

pub(crate) async fn fetch(request: &HttpRequest, body: &[u8]) -> Result<HttpResponse, String> {
    interop::fetch(request, body).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::rest::HttpMethod;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn fetch_public_api_non_wasm_parity() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "https://firebasestorage.googleapis.com/v0/b/demo/o".to_string(),
            headers: Vec::new(),
        };
        assert_eq!(
            block_on(fetch(&request, &[])).expect_err("fetch should fail"),
            "Browser fetch is only available when compiled for wasm32"
        );
    }
}
