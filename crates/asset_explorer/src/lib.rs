//! Headless asset explorer over a flat, prefix-addressed object store.
//!
//! The store has no directories. This crate infers them from shared key prefixes, keeps empty
//! folders listable with a reserved marker object, deletes folders recursively with partial
//! failure tolerance, and drives three independent navigation surfaces (explorer, upload
//! picker, gallery picker) from the same primitives.
//!
//! Store access goes through [`asset_host::ObjectStoreClient`]; browser wiring lives in
//! `asset_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod folders;
pub mod listing;
pub mod session;
pub mod surfaces;
pub mod upload;

pub use config::{ExplorerConfig, DEFAULT_MARKER_NAME, DEFAULT_ROOT};
pub use error::{DeleteFailure, ExplorerError};
pub use folders::{DeleteSummary, FolderOperations};
pub use listing::{
    DirectoryEntry, DirectoryLister, DirectoryListing, FileEntry, FolderEntry, TypeFilter,
};
pub use session::{ListTicket, ListingOutcome, ListingState, NavigationSession};
pub use surfaces::{AssetSurfaces, MutationOutcome, SurfaceKind};
pub use upload::{
    storage_safe_name, ImageRecompressor, PassthroughRecompressor, RecompressFuture,
    UploadCoordinator, UploadFile, UploadProgress, UploadReport, UploadTarget, UploadedAsset,
};
