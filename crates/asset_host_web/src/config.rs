//! Connection settings for the Firebase Storage REST surface.

use serde::{Deserialize, Serialize};

/// REST base used when `apiBase` is not configured.
pub const DEFAULT_API_BASE: &str = "https://firebasestorage.googleapis.com/v0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Bucket and endpoint settings for [`crate::WebObjectStore`].
pub struct FirebaseStorageConfig {
    /// Bucket name, for example `my-project.appspot.com`.
    pub bucket: String,
    /// REST base without trailing `/`.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Page size requested per list call. The store default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl FirebaseStorageConfig {
    /// Creates settings for `bucket` against the public REST endpoint.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            api_base: default_api_base(),
            page_size: None,
        }
    }

    /// Parses a JSON settings document and validates it.
    ///
    /// # Errors
    ///
    /// Returns the parse or validation failure as text.
    pub fn from_json_str(raw: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the bucket is set and the endpoint is an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.bucket.trim().is_empty() || self.bucket.contains('/') {
            return Err(format!("invalid storage bucket {:?}", self.bucket));
        }
        if !(self.api_base.starts_with("https://") || self.api_base.starts_with("http://")) {
            return Err(format!("storage api base must be http(s): {}", self.api_base));
        }
        if self.page_size == Some(0) {
            return Err("page size must be positive".to_string());
        }
        Ok(())
    }

    /// Object collection URL of the bucket (`{api_base}/b/{bucket}/o`).
    pub fn objects_url(&self) -> String {
        format!(
            "{}/b/{}/o",
            self.api_base.trim_end_matches('/'),
            self.bucket
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn api_base_defaults_when_absent() {
        let config = FirebaseStorageConfig::from_json_str(r#"{"bucket":"demo.appspot.com"}"#)
            .expect("parse");
        assert_eq!(config, FirebaseStorageConfig::new("demo.appspot.com"));
        assert_eq!(
            config.objects_url(),
            "https://firebasestorage.googleapis.com/v0/b/demo.appspot.com/o"
        );
    }

    #[test]
    fn validate_rejects_unusable_settings() {
        assert!(FirebaseStorageConfig::new("  ").validate().is_err());
        assert!(FirebaseStorageConfig::from_json_str(
            r#"{"bucket":"demo","apiBase":"ftp://storage.local"}"#
        )
        .is_err());
        assert!(
            FirebaseStorageConfig::from_json_str(r#"{"bucket":"demo","pageSize":0}"#).is_err()
        );
    }

    #[test]
    fn trailing_slash_in_api_base_is_ignored() {
        let config = FirebaseStorageConfig {
            api_base: "http://localhost:9199/v0/".to_string(),
            ..FirebaseStorageConfig::new("demo")
        };
        assert_eq!(config.objects_url(), "http://localhost:9199/v0/b/demo/o");
    }
}
