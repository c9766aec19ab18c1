//! Firebase Storage REST requests and response decoding.
//!
//! Nothing here performs I/O: requests are described as [`HttpRequest`] values for the bridge
//! transport and responses come back as [`HttpResponse`] text.

use asset_host::{StoreListing, StoreObject, StoreRef};
use serde::{Deserialize, Serialize};

use crate::config::FirebaseStorageConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// HTTP verbs used by the storage surface.
pub enum HttpMethod {
    /// Listing and metadata reads.
    Get,
    /// Media uploads.
    Post,
    /// Object removal.
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Request handed to the `fetch` transport. The body travels separately as raw bytes.
pub struct HttpRequest {
    /// Verb.
    pub method: HttpMethod,
    /// Absolute URL, already encoded.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Status and text body returned by the transport.
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl HttpResponse {
    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Percent-encodes `raw` for use as a single URL component.
///
/// Only RFC 3986 unreserved characters pass through; `/` is encoded too.
pub fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte))
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn headers(auth_token: Option<&str>) -> Vec<(String, String)> {
    auth_token
        .map(|token| vec![("Authorization".to_string(), format!("Firebase {token}"))])
        .unwrap_or_default()
}

fn object_url(config: &FirebaseStorageConfig, path: &str) -> String {
    format!("{}/{}", config.objects_url(), encode_component(path))
}

/// One page of the delimiter listing under `prefix` (given without trailing `/`).
pub fn list_request(
    config: &FirebaseStorageConfig,
    prefix: &str,
    page_token: Option<&str>,
    auth_token: Option<&str>,
) -> HttpRequest {
    let mut url = format!(
        "{}?prefix={}&delimiter=%2F",
        config.objects_url(),
        encode_component(&format!("{prefix}/"))
    );
    if let Some(size) = config.page_size {
        url.push_str(&format!("&maxResults={size}"));
    }
    if let Some(token) = page_token {
        url.push_str(&format!("&pageToken={}", encode_component(token)));
    }
    HttpRequest {
        method: HttpMethod::Get,
        url,
        headers: headers(auth_token),
    }
}

/// Media upload of `path`; the object bytes are the request body.
pub fn upload_request(
    config: &FirebaseStorageConfig,
    path: &str,
    content_type: &str,
    auth_token: Option<&str>,
) -> HttpRequest {
    let mut headers = headers(auth_token);
    headers.push(("Content-Type".to_string(), content_type.to_string()));
    HttpRequest {
        method: HttpMethod::Post,
        url: format!(
            "{}?uploadType=media&name={}",
            config.objects_url(),
            encode_component(path)
        ),
        headers,
    }
}

/// Metadata read of `path`.
pub fn metadata_request(
    config: &FirebaseStorageConfig,
    path: &str,
    auth_token: Option<&str>,
) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url: object_url(config, path),
        headers: headers(auth_token),
    }
}

/// Removal of `path`.
pub fn delete_request(
    config: &FirebaseStorageConfig,
    path: &str,
    auth_token: Option<&str>,
) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Delete,
        url: object_url(config, path),
        headers: headers(auth_token),
    }
}

/// Tokenized media URL of `path`.
pub fn download_url(config: &FirebaseStorageConfig, path: &str, token: &str) -> String {
    format!(
        "{}?alt=media&token={}",
        object_url(config, path),
        encode_component(token)
    )
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps a non-2xx response to error text, preferring the JSON error message.
///
/// # Errors
///
/// Returns `storage request failed ({status}): {message}` for any non-2xx status.
pub fn check_status(response: &HttpResponse) -> Result<(), String> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorEnvelope>(&response.body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| response.body.trim().to_string());
    Err(format!(
        "storage request failed ({}): {message}",
        response.status
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRef {
    name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One page of a delimiter listing.
pub struct ListPage {
    #[serde(default)]
    prefixes: Vec<String>,
    #[serde(default)]
    items: Vec<ItemRef>,
    /// Token for the following page, absent on the last one.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ListPage {
    /// Appends this page's entries to `listing`.
    ///
    /// Prefixes lose their trailing `/`. Folder placeholder objects (keys ending in `/`) are
    /// skipped.
    pub fn append_to(self, listing: &mut StoreListing) {
        listing.sub_prefixes.extend(
            self.prefixes
                .into_iter()
                .map(|prefix| prefix.trim_end_matches('/').to_string())
                .filter(|prefix| !prefix.is_empty())
                .map(StoreObject::from_full_path),
        );
        listing.items.extend(
            self.items
                .into_iter()
                .filter(|item| !item.name.ends_with('/'))
                .map(|item| StoreObject::from_full_path(item.name)),
        );
    }
}

/// Decodes a list response.
///
/// # Errors
///
/// Returns the status error or the JSON decoding error.
pub fn decode_list_page(response: &HttpResponse) -> Result<ListPage, String> {
    check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| format!("invalid list response: {e}"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Object metadata returned by uploads and metadata reads.
pub struct ObjectMetadata {
    /// Full key.
    pub name: String,
    /// Size in bytes, sent as a decimal string.
    #[serde(default)]
    pub size: Option<String>,
    /// Stored content type.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Comma-separated download tokens.
    #[serde(default)]
    pub download_tokens: Option<String>,
}

impl ObjectMetadata {
    /// First download token, if the object has one.
    pub fn first_download_token(&self) -> Option<&str> {
        self.download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').map(str::trim).find(|t| !t.is_empty()))
    }

    /// Converts upload metadata to a [`StoreRef`], falling back to what was sent.
    pub fn into_store_ref(self, sent_len: usize, sent_content_type: &str) -> StoreRef {
        let size = self
            .size
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(sent_len as u64);
        StoreRef {
            full_path: self.name,
            size,
            content_type: self
                .content_type
                .unwrap_or_else(|| sent_content_type.to_string()),
        }
    }
}

/// Decodes an upload or metadata response.
///
/// # Errors
///
/// Returns the status error or the JSON decoding error.
pub fn decode_metadata(response: &HttpResponse) -> Result<ObjectMetadata, String> {
    check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| format!("invalid metadata response: {e}"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> FirebaseStorageConfig {
        FirebaseStorageConfig::new("demo.appspot.com")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn encode_component_escapes_separators_and_spaces() {
        assert_eq!(encode_component("multimedia/bts/a b.webp"), "multimedia%2Fbts%2Fa%20b.webp");
        assert_eq!(encode_component("ünï"), "%C3%BCn%C3%AF");
        assert_eq!(encode_component("a-z_0.9~"), "a-z_0.9~");
    }

    #[test]
    fn list_request_uses_trailing_slash_prefix_and_delimiter() {
        let mut config = config();
        config.page_size = Some(100);
        let request = list_request(&config, "multimedia/bts", Some("tok/1"), Some("id-token"));
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url,
            "https://firebasestorage.googleapis.com/v0/b/demo.appspot.com/o\
             ?prefix=multimedia%2Fbts%2F&delimiter=%2F&maxResults=100&pageToken=tok%2F1"
        );
        assert_eq!(
            request.headers,
            vec![("Authorization".to_string(), "Firebase id-token".to_string())]
        );
    }

    #[test]
    fn upload_request_carries_name_and_content_type() {
        let request = upload_request(&config(), "multimedia/a.webp", "image/webp", None);
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.ends_with("/o?uploadType=media&name=multimedia%2Fa.webp"));
        assert_eq!(
            request.headers,
            vec![("Content-Type".to_string(), "image/webp".to_string())]
        );
    }

    #[test]
    fn object_requests_address_the_encoded_key() {
        let meta = metadata_request(&config(), "multimedia/a.webp", None);
        let delete = delete_request(&config(), "multimedia/a.webp", None);
        assert_eq!(meta.url, delete.url);
        assert!(delete.url.ends_with("/o/multimedia%2Fa.webp"));
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(
            download_url(&config(), "multimedia/a.webp", "t-1"),
            format!("{}?alt=media&token=t-1", meta.url)
        );
    }

    #[test]
    fn list_page_appends_prefixes_and_items() {
        let page = decode_list_page(&ok(r#"{
            "prefixes": ["multimedia/bts/", "multimedia/office/"],
            "items": [
                {"name": "multimedia/a.webp", "bucket": "demo"},
                {"name": "multimedia/placeholder/", "bucket": "demo"}
            ],
            "nextPageToken": "next"
        }"#))
        .expect("decode");
        assert_eq!(page.next_page_token.as_deref(), Some("next"));

        let mut listing = StoreListing::default();
        page.append_to(&mut listing);
        assert_eq!(
            listing,
            StoreListing {
                items: vec![StoreObject::from_full_path("multimedia/a.webp")],
                sub_prefixes: vec![
                    StoreObject::from_full_path("multimedia/bts"),
                    StoreObject::from_full_path("multimedia/office"),
                ],
            }
        );
    }

    #[test]
    fn empty_list_page_decodes() {
        let page = decode_list_page(&ok("{}")).expect("decode");
        assert_eq!(page, ListPage::default());
    }

    #[test]
    fn error_responses_surface_status_and_message() {
        let response = HttpResponse {
            status: 403,
            body: r#"{"error":{"code":403,"message":"Permission denied."}}"#.to_string(),
        };
        assert_eq!(
            check_status(&response),
            Err("storage request failed (403): Permission denied.".to_string())
        );
        let plain = HttpResponse {
            status: 502,
            body: "bad gateway\n".to_string(),
        };
        assert_eq!(
            decode_metadata(&plain).expect_err("502"),
            "storage request failed (502): bad gateway"
        );
    }

    #[test]
    fn metadata_yields_store_ref_and_first_token() {
        let meta = decode_metadata(&ok(r#"{
            "name": "multimedia/a.webp",
            "size": "2048",
            "contentType": "image/webp",
            "downloadTokens": "t-1,t-2"
        }"#))
        .expect("decode");
        assert_eq!(meta.first_download_token(), Some("t-1"));
        assert_eq!(
            meta.into_store_ref(10, "application/octet-stream"),
            StoreRef {
                full_path: "multimedia/a.webp".to_string(),
                size: 2048,
                content_type: "image/webp".to_string(),
            }
        );

        let bare = decode_metadata(&ok(r#"{"name":"multimedia/b"}"#)).expect("decode");
        assert_eq!(bare.first_download_token(), None);
        assert_eq!(bare.into_store_ref(3, "image/png").size, 3);
    }
}
