use super::*;
use js_sys::Promise;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = r#"
function hasBody(method) {
  return method === 'POST';
}

export async function jsStoreFetch(request, body) {
  if (typeof fetch !== 'function') {
    throw new Error('fetch is unavailable in this browser context');
  }
  const init = {
    method: request.method,
    headers: new Headers(request.headers || []),
  };
  if (hasBody(request.method)) {
    init.body = body.slice();
  }
  const response = await fetch(request.url, init);
  const text = await response.text();
  return { status: response.status, body: text };
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsStoreFetch)]
    fn js_store_fetch(request: JsValue, body: &[u8]) -> Promise;
}

async fn await_promise(promise: Promise) -> Result<JsValue, String> {
    JsFuture::from(promise).await.map_err(js_error_to_string)
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

pub async fn fetch(request: &HttpRequest, body: &[u8]) -> Result<HttpResponse, String> {
    let value = request
        .serialize(&Serializer::json_compatible())
        .map_err(|e| e.to_string())?;
    let response = await_promise(js_store_fetch(value, body)).await?;
    from_value(response).map_err(|e| e.to_string())
}
