//! Folder creation and recursive deletion over a store without directories.
//!
//! A folder exists only while at least one object shares its prefix. Creating an empty folder
//! writes a zero-byte marker; deleting a folder removes every descendant, after which the
//! folder stops appearing in listings of its parent.

use std::rc::Rc;

use asset_host::{sanitize_name, ObjectStoreClient, ObjectStoreFuture, VirtualPath, OCTET_STREAM};
use futures::future::{join, join_all};
use leptos::logging;
use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;
use crate::error::{DeleteFailure, ExplorerError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Outcome of a fully successful recursive delete.
pub struct DeleteSummary {
    /// Objects removed, marker objects included.
    pub deleted: usize,
}

#[derive(Debug, Default)]
struct DeleteTally {
    deleted: usize,
    failures: Vec<DeleteFailure>,
}

impl DeleteTally {
    fn absorb(&mut self, other: DeleteTally) {
        self.deleted += other.deleted;
        self.failures.extend(other.failures);
    }
}

#[derive(Clone)]
/// Folder and file mutations.
pub struct FolderOperations {
    store: Rc<dyn ObjectStoreClient>,
    config: Rc<ExplorerConfig>,
}

impl FolderOperations {
    /// Creates folder operations over `store`.
    pub fn new(store: Rc<dyn ObjectStoreClient>, config: Rc<ExplorerConfig>) -> Self {
        Self { store, config }
    }

    /// Creates `raw_name` under `parent` by writing the marker object inside it.
    ///
    /// The folder must not be assumed to exist until this resolves `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::EmptyName`]/[`ExplorerError::InvalidName`] before touching the
    /// store, or [`ExplorerError::CreateFolderFailed`] when the marker upload fails.
    pub async fn create_folder(
        &self,
        parent: &VirtualPath,
        raw_name: &str,
    ) -> Result<VirtualPath, ExplorerError> {
        let name = sanitize_name(raw_name)?;
        let child = parent.join(&name)?;
        let marker = child.join(&self.config.marker_name)?;
        self.store
            .put(marker.as_str(), &[], OCTET_STREAM)
            .await
            .map_err(|reason| ExplorerError::CreateFolderFailed {
                path: child.to_string(),
                reason,
            })?;
        Ok(child)
    }

    /// Deletes a single object.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::DeleteFailed`] when the store rejects the delete.
    pub async fn delete_file(&self, path: &VirtualPath) -> Result<(), ExplorerError> {
        self.store
            .delete(path.as_str())
            .await
            .map_err(|reason| ExplorerError::DeleteFailed {
                path: path.to_string(),
                reason,
            })
    }

    /// Recursively deletes every object below `path`.
    ///
    /// Leaf deletes and sub-folder recursions at each level are issued together and awaited
    /// jointly. A failing branch never stops its siblings; once every branch has settled, all
    /// failures are reported together.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::RootProtected`] for the namespace root and
    /// [`ExplorerError::DeleteFolderFailed`] listing every object or subtree left behind.
    pub async fn delete_folder(&self, path: &VirtualPath) -> Result<DeleteSummary, ExplorerError> {
        if path.is_root() {
            return Err(ExplorerError::RootProtected {
                path: path.to_string(),
            });
        }
        let tally = self.delete_tree(path.to_string()).await;
        if tally.failures.is_empty() {
            return Ok(DeleteSummary {
                deleted: tally.deleted,
            });
        }
        logging::warn!(
            "folder delete `{path}` settled with {} failure(s)",
            tally.failures.len()
        );
        Err(ExplorerError::DeleteFolderFailed {
            path: path.to_string(),
            deleted: tally.deleted,
            failures: tally.failures,
        })
    }

    fn delete_tree<'a>(&'a self, prefix: String) -> ObjectStoreFuture<'a, DeleteTally> {
        Box::pin(async move {
            let listing = match self.store.list(&prefix).await {
                Ok(listing) => listing,
                Err(reason) => {
                    logging::warn!("folder delete could not list `{prefix}`: {reason}");
                    return DeleteTally {
                        deleted: 0,
                        failures: vec![DeleteFailure {
                            path: prefix,
                            reason,
                        }],
                    };
                }
            };

            let leaves = join_all(listing.items.iter().map(|item| async move {
                let result = self.store.delete(&item.full_path).await;
                (item.full_path.as_str(), result)
            }));
            let subtrees = join_all(
                listing
                    .sub_prefixes
                    .iter()
                    .map(|sub| self.delete_tree(sub.full_path.clone())),
            );
            let (leaf_results, subtree_tallies) = join(leaves, subtrees).await;

            let mut tally = DeleteTally::default();
            for (path, result) in leaf_results {
                match result {
                    Ok(()) => tally.deleted += 1,
                    Err(reason) => {
                        logging::warn!("folder delete could not remove `{path}`: {reason}");
                        tally.failures.push(DeleteFailure {
                            path: path.to_string(),
                            reason,
                        });
                    }
                }
            }
            for sub in subtree_tallies {
                tally.absorb(sub);
            }
            tally
        })
    }
}
