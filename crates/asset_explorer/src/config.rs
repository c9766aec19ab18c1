//! Explorer configuration: namespace root, folder marker, and media-type extension sets.

use asset_host::{extension_of, VirtualPath, PATH_SEPARATOR};
use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

/// Default namespace root segment.
pub const DEFAULT_ROOT: &str = "multimedia";
/// Default reserved file name that keeps an otherwise-empty folder listable.
pub const DEFAULT_MARKER_NAME: &str = ".keep";

const DEFAULT_VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "webm", "ogg", "mov", "m4v"];
const DEFAULT_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "avif"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Explorer settings. Every field falls back to its default when absent from JSON.
pub struct ExplorerConfig {
    /// Namespace root segment every virtual path starts with.
    pub root: String,
    /// Reserved marker file name, hidden from every listing.
    pub marker_name: String,
    /// Extensions (lowercase, no dot) classified as video.
    pub video_extensions: Vec<String>,
    /// Extensions (lowercase, no dot) routed through image recompression before upload.
    pub image_extensions: Vec<String>,
    /// Prefix uploaded file names with a unix-millisecond stamp (`{ms}_{name}`).
    pub timestamp_upload_names: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            marker_name: DEFAULT_MARKER_NAME.to_string(),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS.map(str::to_string).to_vec(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.map(str::to_string).to_vec(),
            timestamp_upload_names: false,
        }
    }
}

impl ExplorerConfig {
    /// Parses a JSON override document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidConfig`] for malformed JSON or invalid values.
    pub fn from_json_str(raw: &str) -> Result<Self, ExplorerError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ExplorerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the root and marker are usable single segments.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ExplorerError> {
        VirtualPath::root(&self.root)
            .map_err(|e| ExplorerError::InvalidConfig(format!("root: {e}")))?;
        if self.root.trim() != self.root {
            return Err(ExplorerError::InvalidConfig(
                "root: surrounding whitespace".to_string(),
            ));
        }
        if self.marker_name.is_empty()
            || self.marker_name.contains([PATH_SEPARATOR, '\\'])
            || self.marker_name.trim() != self.marker_name
        {
            return Err(ExplorerError::InvalidConfig(format!(
                "marker name {:?} must be a single non-blank segment",
                self.marker_name
            )));
        }
        Ok(())
    }

    /// Returns the namespace root as a path.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidConfig`] when the configured root is not a valid segment.
    pub fn root_path(&self) -> Result<VirtualPath, ExplorerError> {
        VirtualPath::root(&self.root)
            .map_err(|e| ExplorerError::InvalidConfig(format!("root: {e}")))
    }

    /// Returns `true` for the reserved folder marker.
    pub fn is_marker(&self, name: &str) -> bool {
        name == self.marker_name
    }

    /// Returns `true` when `name` has a configured video extension.
    pub fn is_video(&self, name: &str) -> bool {
        matches_extension(name, &self.video_extensions)
    }

    /// Returns `true` when `name` has a configured image extension.
    pub fn is_image(&self, name: &str) -> bool {
        matches_extension(name, &self.image_extensions)
    }
}

fn matches_extension(name: &str, set: &[String]) -> bool {
    extension_of(name)
        .is_some_and(|ext| set.iter().any(|candidate| candidate.eq_ignore_ascii_case(&ext)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_use_multimedia_root_and_keep_marker() {
        let config = ExplorerConfig::default();
        config.validate().expect("defaults are valid");
        assert_eq!(config.root_path().expect("root").as_str(), "multimedia");
        assert!(config.is_marker(".keep"));
        assert!(!config.is_marker("keep"));
    }

    #[test]
    fn partial_json_overrides_keep_remaining_defaults() {
        let config =
            ExplorerConfig::from_json_str(r#"{"root":"assets","timestampUploadNames":true}"#)
                .expect("parse");
        assert_eq!(config.root, "assets");
        assert!(config.timestamp_upload_names);
        assert_eq!(config.marker_name, DEFAULT_MARKER_NAME);
        assert!(config.is_video("clip.MP4"));
    }

    #[test]
    fn invalid_roots_and_markers_are_rejected() {
        for raw in [
            r#"{"root":""}"#,
            r#"{"root":"a/b"}"#,
            r#"{"root":" padded "}"#,
            r#"{"markerName":""}"#,
            r#"{"markerName":"x/.keep"}"#,
            r#"{"root":1}"#,
        ] {
            let err = ExplorerConfig::from_json_str(raw).expect_err(raw);
            assert!(matches!(err, ExplorerError::InvalidConfig(_)), "raw={raw}");
        }
    }

    #[test]
    fn media_classification_is_case_insensitive() {
        let config = ExplorerConfig::default();
        assert!(config.is_video("a.WebM"));
        assert!(!config.is_video("a.webp"));
        assert!(config.is_image("a.JPG"));
        assert!(!config.is_image(".keep"));
    }
}
