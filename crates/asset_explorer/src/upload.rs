//! Batch uploads into a directory chosen once per batch.

use std::{future::Future, pin::Pin, rc::Rc};

use asset_host::{
    content_type_for, next_upload_stamp_ms, sanitize_name, ObjectStoreClient, VirtualPath,
};
use leptos::logging;
use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A file selected for upload.
pub struct UploadFile {
    /// Original file name as picked by the user.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Builds an upload file.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Destination directory of a batch, fixed when the batch starts.
pub struct UploadTarget(VirtualPath);

impl UploadTarget {
    /// Freezes `path` as a batch destination.
    pub fn new(path: VirtualPath) -> Self {
        Self(path)
    }

    /// Destination directory.
    pub fn path(&self) -> &VirtualPath {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Progress after each settled file. `completed` never decreases within a batch.
pub struct UploadProgress {
    /// Files settled so far, successful or not.
    pub completed: usize,
    /// Files in the batch.
    pub total: usize,
    /// `completed * 100 / total`, rounded down; 100 for an empty batch.
    pub percent: u8,
}

impl UploadProgress {
    fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (completed * 100 / total).min(100) as u8
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A file that landed in the store.
pub struct UploadedAsset {
    /// Destination key.
    pub path: VirtualPath,
    /// Access URL, when it could be resolved after the upload.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Batch outcome. The caller decides whether to surface a partial-failure summary.
pub struct UploadReport {
    /// Files stored.
    pub succeeded: usize,
    /// Files that could not be stored.
    pub failed: usize,
    /// Stored files in upload order.
    pub uploaded: Vec<UploadedAsset>,
    /// Failures in upload order.
    pub errors: Vec<ExplorerError>,
}

/// Object-safe boxed future used by [`ImageRecompressor`].
pub type RecompressFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// External image recompression step applied to image inputs before upload.
pub trait ImageRecompressor {
    /// Returns the file to upload in place of `file`. The name may change (e.g. to `.webp`).
    fn recompress<'a>(
        &'a self,
        file: &'a UploadFile,
    ) -> RecompressFuture<'a, Result<UploadFile, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Recompressor that uploads images unchanged.
pub struct PassthroughRecompressor;

impl ImageRecompressor for PassthroughRecompressor {
    fn recompress<'a>(
        &'a self,
        file: &'a UploadFile,
    ) -> RecompressFuture<'a, Result<UploadFile, String>> {
        Box::pin(async move { Ok(file.clone()) })
    }
}

/// Replaces every character outside `[A-Za-z0-9.]` with `_`.
pub fn storage_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

#[derive(Clone)]
/// Sequential batch uploader with per-file error isolation.
pub struct UploadCoordinator {
    store: Rc<dyn ObjectStoreClient>,
    config: Rc<ExplorerConfig>,
    recompressor: Rc<dyn ImageRecompressor>,
}

impl UploadCoordinator {
    /// Creates a coordinator that uploads images unchanged.
    pub fn new(store: Rc<dyn ObjectStoreClient>, config: Rc<ExplorerConfig>) -> Self {
        Self::with_recompressor(store, config, Rc::new(PassthroughRecompressor))
    }

    /// Creates a coordinator with an image recompression step.
    pub fn with_recompressor(
        store: Rc<dyn ObjectStoreClient>,
        config: Rc<ExplorerConfig>,
        recompressor: Rc<dyn ImageRecompressor>,
    ) -> Self {
        Self {
            store,
            config,
            recompressor,
        }
    }

    /// Uploads `files` one after another into `target`.
    ///
    /// `on_progress` runs once after every file, whatever its outcome. A failing file is counted
    /// and the batch moves on.
    pub async fn upload_batch(
        &self,
        files: Vec<UploadFile>,
        target: UploadTarget,
        mut on_progress: impl FnMut(UploadProgress),
    ) -> UploadReport {
        let total = files.len();
        let mut report = UploadReport::default();
        for (idx, file) in files.iter().enumerate() {
            match self.upload_one(file, &target).await {
                Ok(asset) => {
                    report.succeeded += 1;
                    report.uploaded.push(asset);
                }
                Err(err) => {
                    logging::warn!("upload of {:?} failed: {err}", file.name);
                    report.failed += 1;
                    report.errors.push(err);
                }
            }
            on_progress(UploadProgress::new(idx + 1, total));
        }
        if total == 0 {
            on_progress(UploadProgress::new(0, 0));
        }
        report
    }

    /// Uploads a single file into `target`.
    ///
    /// # Errors
    ///
    /// Returns a name error for unusable file names or [`ExplorerError::UploadFailed`] when the
    /// store rejects the object.
    pub async fn upload_one(
        &self,
        file: &UploadFile,
        target: &UploadTarget,
    ) -> Result<UploadedAsset, ExplorerError> {
        let prepared = self.prepare(file).await;
        let name = self.destination_name(&prepared.name)?;
        let destination = target.path().join(&name)?;
        let content_type = content_type_for(&name);

        self.store
            .put(destination.as_str(), &prepared.bytes, content_type)
            .await
            .map_err(|reason| ExplorerError::UploadFailed {
                path: destination.to_string(),
                reason,
            })?;

        let url = match self.store.download_url(destination.as_str()).await {
            Ok(url) => Some(url),
            Err(reason) => {
                logging::warn!("uploaded `{destination}` but its url is unavailable: {reason}");
                None
            }
        };
        Ok(UploadedAsset {
            path: destination,
            url,
        })
    }

    async fn prepare(&self, file: &UploadFile) -> UploadFile {
        if !self.config.is_image(&file.name) {
            return file.clone();
        }
        match self.recompressor.recompress(file).await {
            Ok(out) => out,
            Err(reason) => {
                logging::warn!(
                    "recompression of {:?} failed, uploading original: {reason}",
                    file.name
                );
                file.clone()
            }
        }
    }

    fn destination_name(&self, raw: &str) -> Result<String, ExplorerError> {
        let name = sanitize_name(raw)?;
        if self.config.is_marker(&name) {
            return Err(ExplorerError::InvalidName { name });
        }
        let safe = storage_safe_name(&name);
        Ok(if self.config.timestamp_upload_names {
            format!("{}_{safe}", next_upload_stamp_ms())
        } else {
            safe
        })
    }
}
