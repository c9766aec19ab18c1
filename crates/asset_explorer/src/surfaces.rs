//! The three explorer surfaces and the rules for keeping them in sync after mutations.
//!
//! The management explorer, the upload-destination picker, and the gallery picker each own a
//! [`NavigationSession`]. A mutation made from one surface re-lists that surface; other surfaces
//! are re-listed only when they show the mutated directory at that moment.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use asset_host::{ObjectStoreClient, VirtualPath};
use leptos::logging;
use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use crate::folders::{DeleteSummary, FolderOperations};
use crate::listing::{DirectoryLister, FileEntry, FolderEntry, TypeFilter};
use crate::session::{ListTicket, ListingOutcome, NavigationSession};
use crate::upload::{
    ImageRecompressor, UploadCoordinator, UploadFile, UploadProgress, UploadReport, UploadTarget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// UI surface owning a navigation session.
pub enum SurfaceKind {
    /// Asset management explorer.
    Explorer,
    /// Destination picker used before an upload batch.
    UploadPicker,
    /// Image picker used when choosing a gallery image.
    GalleryPicker,
}

impl SurfaceKind {
    /// Every surface, in display order.
    pub const ALL: [SurfaceKind; 3] = [Self::Explorer, Self::UploadPicker, Self::GalleryPicker];

    /// File filter a surface starts with.
    pub fn default_filter(self) -> TypeFilter {
        match self {
            Self::Explorer | Self::UploadPicker => TypeFilter::All,
            Self::GalleryPicker => TypeFilter::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Directory mutation made from one surface.
pub struct MutationOutcome<T> {
    /// Operation result.
    pub value: T,
    /// Directory that changed.
    pub directory: VirtualPath,
    /// Other surfaces that were showing `directory` (or, after a folder delete, a path inside
    /// the deleted folder) when the mutation finished.
    pub coinciding: Vec<SurfaceKind>,
}

/// Owner of the three surface sessions and the shared store primitives.
///
/// Sessions sit behind their own [`RefCell`], borrowed only between awaits. A surface can
/// therefore be navigated while another listing or mutation is in flight, with the late result
/// dropped by the session's stale guard. Share it as `Rc<AssetSurfaces>`.
pub struct AssetSurfaces {
    store: Rc<dyn ObjectStoreClient>,
    config: Rc<ExplorerConfig>,
    lister: DirectoryLister,
    folders: FolderOperations,
    uploads: UploadCoordinator,
    explorer: RefCell<NavigationSession>,
    upload_picker: RefCell<NavigationSession>,
    gallery_picker: RefCell<NavigationSession>,
}

impl AssetSurfaces {
    /// Builds the surfaces over `store`, every session starting at the configured root.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidConfig`] when `config` does not validate.
    pub fn new(
        store: Rc<dyn ObjectStoreClient>,
        config: ExplorerConfig,
    ) -> Result<Self, ExplorerError> {
        config.validate()?;
        let root = config.root_path()?;
        let config = Rc::new(config);
        let session = |kind: SurfaceKind| {
            RefCell::new(NavigationSession::new(root.clone(), kind.default_filter()))
        };
        Ok(Self {
            lister: DirectoryLister::new(store.clone(), config.clone()),
            folders: FolderOperations::new(store.clone(), config.clone()),
            uploads: UploadCoordinator::new(store.clone(), config.clone()),
            store,
            config,
            explorer: session(SurfaceKind::Explorer),
            upload_picker: session(SurfaceKind::UploadPicker),
            gallery_picker: session(SurfaceKind::GalleryPicker),
        })
    }

    /// Replaces the upload coordinator's recompression step.
    pub fn set_recompressor(&mut self, recompressor: Rc<dyn ImageRecompressor>) {
        self.uploads = UploadCoordinator::with_recompressor(
            self.store.clone(),
            self.config.clone(),
            recompressor,
        );
    }

    /// Configuration shared by every surface.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Shared lister.
    pub fn lister(&self) -> &DirectoryLister {
        &self.lister
    }

    /// Shared folder operations.
    pub fn folders(&self) -> &FolderOperations {
        &self.folders
    }

    fn cell(&self, kind: SurfaceKind) -> &RefCell<NavigationSession> {
        match kind {
            SurfaceKind::Explorer => &self.explorer,
            SurfaceKind::UploadPicker => &self.upload_picker,
            SurfaceKind::GalleryPicker => &self.gallery_picker,
        }
    }

    /// Session of `kind`. Do not hold the guard across an await.
    pub fn session(&self, kind: SurfaceKind) -> Ref<'_, NavigationSession> {
        self.cell(kind).borrow()
    }

    /// Mutable session of `kind`, for navigation transitions. Do not hold the guard across an
    /// await.
    pub fn session_mut(&self, kind: SurfaceKind) -> RefMut<'_, NavigationSession> {
        self.cell(kind).borrow_mut()
    }

    /// Runs the store call for `ticket` with no session borrowed, then applies the result to
    /// `kind`. A result dropped as stale reports success.
    async fn fulfill(&self, kind: SurfaceKind, ticket: ListTicket) -> Result<(), ExplorerError> {
        let result = self.lister.list(ticket.path(), ticket.filter()).await;
        let err = result.as_ref().err().cloned();
        let outcome = self.session_mut(kind).accept(&ticket, result);
        match (outcome, err) {
            (ListingOutcome::Applied, Some(err)) => Err(err),
            _ => Ok(()),
        }
    }

    /// Re-lists the current directory of `kind`.
    ///
    /// # Errors
    ///
    /// Returns the listing error after recording it in the session.
    pub async fn refresh(&self, kind: SurfaceKind) -> Result<(), ExplorerError> {
        let ticket = self.session_mut(kind).begin_listing();
        self.fulfill(kind, ticket).await
    }

    /// Enters `folder` on `kind` and lists it.
    ///
    /// # Errors
    ///
    /// Returns a navigation or listing error.
    pub async fn open_folder(
        &self,
        kind: SurfaceKind,
        folder: &FolderEntry,
    ) -> Result<(), ExplorerError> {
        let ticket = self.session_mut(kind).navigate_into(folder)?;
        self.fulfill(kind, ticket).await
    }

    /// Jumps `kind` to `path` (a breadcrumb) and lists it.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::OutsideRoot`] or the listing error.
    pub async fn navigate_to(
        &self,
        kind: SurfaceKind,
        path: VirtualPath,
    ) -> Result<(), ExplorerError> {
        let ticket = self.session_mut(kind).navigate_to(path)?;
        self.fulfill(kind, ticket).await
    }

    /// Moves `kind` up one level and lists it. Does nothing at the root.
    ///
    /// # Errors
    ///
    /// Returns the listing error.
    pub async fn go_up(&self, kind: SurfaceKind) -> Result<(), ExplorerError> {
        let ticket = self.session_mut(kind).navigate_up();
        match ticket {
            Some(ticket) => self.fulfill(kind, ticket).await,
            None => Ok(()),
        }
    }

    /// Surfaces other than `origin` whose current path equals `directory`.
    pub fn coinciding(&self, origin: SurfaceKind, directory: &VirtualPath) -> Vec<SurfaceKind> {
        self.surfaces_where(origin, |current| current == directory)
    }

    fn surfaces_where(
        &self,
        origin: SurfaceKind,
        shows: impl Fn(&VirtualPath) -> bool,
    ) -> Vec<SurfaceKind> {
        SurfaceKind::ALL
            .into_iter()
            .filter(|kind| *kind != origin && shows(self.session(*kind).current_path()))
            .collect()
    }

    /// Re-lists every surface in `kinds`, returning the first error after trying them all.
    ///
    /// # Errors
    ///
    /// Returns the first listing error encountered.
    pub async fn refresh_all(&self, kinds: &[SurfaceKind]) -> Result<(), ExplorerError> {
        let mut first_err = None;
        for kind in kinds {
            if let Err(err) = self.refresh(*kind).await {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Creates a folder inside the current directory of `origin` and moves `origin` into it.
    ///
    /// Other surfaces showing the parent directory are reported, not refreshed.
    ///
    /// # Errors
    ///
    /// Returns a validation or [`ExplorerError::CreateFolderFailed`] error. Listing the new
    /// folder is recorded in the session but does not fail the creation.
    pub async fn create_folder_from(
        &self,
        origin: SurfaceKind,
        raw_name: &str,
    ) -> Result<MutationOutcome<VirtualPath>, ExplorerError> {
        let parent = self.session(origin).current_path().clone();
        let created = self.folders.create_folder(&parent, raw_name).await?;
        let coinciding = self.coinciding(origin, &parent);
        let ticket = self.session_mut(origin).navigate_to(created.clone())?;
        if let Err(err) = self.fulfill(origin, ticket).await {
            logging::warn!("listing new folder `{created}` failed: {err}");
        }
        Ok(MutationOutcome {
            value: created,
            directory: parent,
            coinciding,
        })
    }

    /// Recursively deletes `folder` and re-lists `origin`.
    ///
    /// Reported surfaces include those showing the parent directory and those sitting anywhere
    /// inside the deleted subtree.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::RootProtected`] or [`ExplorerError::DeleteFolderFailed`]; the
    /// origin surface is re-listed either way.
    pub async fn delete_folder_from(
        &self,
        origin: SurfaceKind,
        folder: &FolderEntry,
    ) -> Result<MutationOutcome<DeleteSummary>, ExplorerError> {
        let result = self.folders.delete_folder(&folder.full_path).await;
        let directory = folder.full_path.parent();
        let coinciding = self.surfaces_where(origin, |current| {
            current == &directory || current.is_within(&folder.full_path)
        });
        self.relist_after_mutation(origin).await;
        Ok(MutationOutcome {
            value: result?,
            directory,
            coinciding,
        })
    }

    /// Deletes `file` and re-lists `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::DeleteFailed`].
    pub async fn delete_file_from(
        &self,
        origin: SurfaceKind,
        file: &FileEntry,
    ) -> Result<MutationOutcome<()>, ExplorerError> {
        self.folders.delete_file(&file.full_path).await?;
        let directory = file.full_path.parent();
        let coinciding = self.coinciding(origin, &directory);
        self.relist_after_mutation(origin).await;
        Ok(MutationOutcome {
            value: (),
            directory,
            coinciding,
        })
    }

    async fn relist_after_mutation(&self, origin: SurfaceKind) {
        if let Err(err) = self.refresh(origin).await {
            logging::warn!("re-listing {origin:?} after a change failed: {err}");
        }
    }

    /// Freezes the upload picker's current directory as the destination of a new batch.
    pub fn begin_upload(&self) -> UploadTarget {
        UploadTarget::new(self.session(SurfaceKind::UploadPicker).current_path().clone())
    }

    /// Uploads `files` into `target`, then re-lists the upload picker and every surface
    /// showing `target`.
    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
        target: UploadTarget,
        on_progress: impl FnMut(UploadProgress),
    ) -> UploadReport {
        let directory = target.path().clone();
        let report = self.uploads.upload_batch(files, target, on_progress).await;
        let mut stale = self.coinciding(SurfaceKind::UploadPicker, &directory);
        stale.insert(0, SurfaceKind::UploadPicker);
        if let Err(err) = self.refresh_all(&stale).await {
            logging::warn!("re-listing after upload to `{directory}` failed: {err}");
        }
        report
    }
}
