use super::*;

fn unsupported() -> String {
    "Browser fetch is only available when compiled for wasm32".to_string()
}

pub async fn fetch(_request: &HttpRequest, _body: &[u8]) -> Result<HttpResponse, String> {
    Err(unsupported())
}
