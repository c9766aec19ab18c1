//! Error taxonomy for explorer operations.

use asset_host::NameError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One object or subtree that a recursive delete could not remove.
pub struct DeleteFailure {
    /// Object key, or folder path when its listing failed.
    pub path: String,
    /// Store-reported cause.
    pub reason: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors surfaced by explorer operations.
///
/// Name errors are raised before any store call. Store errors collapse every backend cause into
/// one kind per operation.
pub enum ExplorerError {
    /// A name contains a separator or is a relative segment.
    #[error("invalid name {name:?}: names cannot contain `/` or `\\`")]
    InvalidName {
        /// Offending name.
        name: String,
    },
    /// A name is empty after trimming.
    #[error("name cannot be empty")]
    EmptyName,
    /// The namespace root was targeted by a destructive operation.
    #[error("`{path}` is the namespace root and cannot be deleted")]
    RootProtected {
        /// Root path.
        path: String,
    },
    /// A navigation target lies outside the session's namespace root.
    #[error("`{path}` is outside the namespace root `{root}`")]
    OutsideRoot {
        /// Requested path.
        path: String,
        /// Session root.
        root: String,
    },
    /// Listing a directory failed.
    #[error("listing `{path}` failed: {reason}")]
    ListFailed {
        /// Directory path.
        path: String,
        /// Store-reported cause.
        reason: String,
    },
    /// Writing a folder marker failed.
    #[error("creating folder `{path}` failed: {reason}")]
    CreateFolderFailed {
        /// Folder path that was being created.
        path: String,
        /// Store-reported cause.
        reason: String,
    },
    /// Deleting a single object failed.
    #[error("deleting `{path}` failed: {reason}")]
    DeleteFailed {
        /// Object key.
        path: String,
        /// Store-reported cause.
        reason: String,
    },
    /// A recursive delete settled with at least one failed branch.
    #[error(
        "deleting folder `{path}` left {} failure(s) after removing {deleted} object(s)",
        .failures.len()
    )]
    DeleteFolderFailed {
        /// Folder path.
        path: String,
        /// Objects removed before every branch settled.
        deleted: usize,
        /// Every object or subtree that could not be removed.
        failures: Vec<DeleteFailure>,
    },
    /// Uploading a file failed.
    #[error("uploading `{path}` failed: {reason}")]
    UploadFailed {
        /// Destination key, or the raw file name when no key could be built.
        path: String,
        /// Cause.
        reason: String,
    },
    /// Explorer configuration is unusable.
    #[error("invalid explorer config: {0}")]
    InvalidConfig(String),
}

impl From<NameError> for ExplorerError {
    fn from(value: NameError) -> Self {
        match value {
            NameError::Invalid { name } => Self::InvalidName { name },
            NameError::Empty => Self::EmptyName,
        }
    }
}

impl ExplorerError {
    /// Returns `true` for client-side validation errors that never reached the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. }
                | Self::EmptyName
                | Self::RootProtected { .. }
                | Self::OutsideRoot { .. }
                | Self::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_errors_map_to_validation_variants() {
        let invalid: ExplorerError = NameError::Invalid {
            name: "a/b".to_string(),
        }
        .into();
        assert_eq!(
            invalid,
            ExplorerError::InvalidName {
                name: "a/b".to_string()
            }
        );
        assert!(invalid.is_validation());
        assert_eq!(ExplorerError::from(NameError::Empty), ExplorerError::EmptyName);
    }

    #[test]
    fn delete_folder_message_counts_failures() {
        let err = ExplorerError::DeleteFolderFailed {
            path: "multimedia/bts".to_string(),
            deleted: 3,
            failures: vec![DeleteFailure {
                path: "multimedia/bts/a.webp".to_string(),
                reason: "denied".to_string(),
            }],
        };
        assert_eq!(
            err.to_string(),
            "deleting folder `multimedia/bts` left 1 failure(s) after removing 3 object(s)"
        );
        assert!(!err.is_validation());
    }
}
