//! Directory listing over a flat object store.
//!
//! One store call per directory. Common prefixes become [`FolderEntry`] values; leaf objects
//! become [`FileEntry`] values with a freshly resolved access URL. Nothing is cached between
//! listings because the store may rotate URL tokens.

use std::rc::Rc;

use asset_host::{ObjectStoreClient, StoreObject, VirtualPath};
use futures::future::try_join_all;
use leptos::logging;
use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Client-side filter applied to the files of a listing. Folders are never filtered.
pub enum TypeFilter {
    /// Every file.
    #[default]
    All,
    /// Files whose extension is not a configured video extension.
    Image,
    /// Files with a configured video extension.
    Video,
}

impl TypeFilter {
    /// Returns `true` when a file called `name` passes the filter.
    pub fn admits(self, config: &ExplorerConfig, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Image => !config.is_video(name),
            Self::Video => config.is_video(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Directory inferred from a common key prefix. It has no object of its own.
pub struct FolderEntry {
    /// Last path segment.
    pub name: String,
    /// Full virtual path of the folder.
    pub full_path: VirtualPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Leaf object with an access URL valid for the lifetime of the listing that produced it.
pub struct FileEntry {
    /// Last path segment.
    pub name: String,
    /// Full virtual path (object key).
    pub full_path: VirtualPath,
    /// Fetchable, possibly time-limited URL.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// A listed directory entry.
pub enum DirectoryEntry {
    /// Inferred folder.
    Folder(FolderEntry),
    /// Stored file.
    File(FileEntry),
}

impl DirectoryEntry {
    /// Entry name.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::File(file) => &file.name,
        }
    }

    /// Entry path.
    pub fn full_path(&self) -> &VirtualPath {
        match self {
            Self::Folder(folder) => &folder.full_path,
            Self::File(file) => &file.full_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Folders and files of one directory, in store-return order.
pub struct DirectoryListing {
    /// Directory that was listed.
    pub path: VirtualPath,
    /// Filter the files were narrowed with.
    pub filter: TypeFilter,
    /// Sub-directories.
    pub folders: Vec<FolderEntry>,
    /// Files, without the folder marker.
    pub files: Vec<FileEntry>,
}

impl DirectoryListing {
    /// Returns `true` when the directory shows no folders and no files.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Folders first, then files, as tagged entries.
    pub fn entries(&self) -> Vec<DirectoryEntry> {
        self.folders
            .iter()
            .cloned()
            .map(DirectoryEntry::Folder)
            .chain(self.files.iter().cloned().map(DirectoryEntry::File))
            .collect()
    }

    /// Finds a folder by name.
    pub fn folder(&self, name: &str) -> Option<&FolderEntry> {
        self.folders.iter().find(|folder| folder.name == name)
    }

    /// Finds a file by name.
    pub fn file(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|file| file.name == name)
    }
}

#[derive(Clone)]
/// Lists virtual directories through an [`ObjectStoreClient`].
pub struct DirectoryLister {
    store: Rc<dyn ObjectStoreClient>,
    config: Rc<ExplorerConfig>,
}

impl DirectoryLister {
    /// Creates a lister over `store`.
    pub fn new(store: Rc<dyn ObjectStoreClient>, config: Rc<ExplorerConfig>) -> Self {
        Self { store, config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Lists `path`, partitioning store results into folders and files.
    ///
    /// The marker object is dropped before URLs are resolved. URLs for the remaining files are
    /// resolved concurrently and the listing fails as a whole if any lookup fails. Keys are used
    /// exactly as the store reports them; a key that is not a direct child of `path` or has an
    /// empty segment is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::ListFailed`] when the store listing or a URL lookup fails.
    pub async fn list(
        &self,
        path: &VirtualPath,
        filter: TypeFilter,
    ) -> Result<DirectoryListing, ExplorerError> {
        let list_failed = |reason: String| ExplorerError::ListFailed {
            path: path.to_string(),
            reason,
        };

        let raw = match self.store.list(path.as_str()).await {
            Ok(raw) => raw,
            Err(reason) => {
                logging::warn!("asset listing failed for `{path}`: {reason}");
                return Err(list_failed(reason));
            }
        };

        let folders = raw
            .sub_prefixes
            .iter()
            .filter_map(|prefix| child_path(path, prefix))
            .map(|full_path| FolderEntry {
                name: full_path.name().to_string(),
                full_path,
            })
            .collect::<Vec<_>>();

        let visible = raw
            .items
            .iter()
            .filter(|item| !self.config.is_marker(&item.name))
            .filter(|item| filter.admits(&self.config, &item.name))
            .filter_map(|item| child_path(path, item))
            .collect::<Vec<_>>();

        let files = try_join_all(visible.into_iter().map(|full_path| async move {
            let url = self
                .store
                .download_url(full_path.as_str())
                .await
                .map_err(|reason| format!("url for `{full_path}`: {reason}"))?;
            Ok::<_, String>(FileEntry {
                name: full_path.name().to_string(),
                full_path,
                url,
            })
        }))
        .await
        .map_err(|reason| {
            logging::warn!("asset listing failed for `{path}`: {reason}");
            list_failed(reason)
        })?;

        Ok(DirectoryListing {
            path: path.clone(),
            filter,
            folders,
            files,
        })
    }
}

fn child_path(parent: &VirtualPath, object: &StoreObject) -> Option<VirtualPath> {
    match VirtualPath::from_store_key(&object.full_path) {
        Some(child) if child != *parent && child.parent() == *parent => Some(child),
        _ => {
            logging::warn!(
                "skipping store key {:?} while listing `{parent}`",
                object.full_path
            );
            None
        }
    }
}
