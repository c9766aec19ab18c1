//! Per-surface navigation over the virtual namespace.
//!
//! Every UI surface owns one [`NavigationSession`]. Sessions never share state: two sessions
//! over the same store can sit in different directories at the same time.
//!
//! Listing is split in two steps so a surface can run the store call without holding the
//! session: [`NavigationSession::begin_listing`] issues a [`ListTicket`] and
//! [`NavigationSession::accept`] applies the result only if no navigation happened since.

use asset_host::VirtualPath;
use leptos::logging;

use crate::error::ExplorerError;
use crate::listing::{DirectoryLister, DirectoryListing, FolderEntry, TypeFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to list one directory, tagged with the navigation generation it was issued in.
pub struct ListTicket {
    path: VirtualPath,
    filter: TypeFilter,
    generation: u64,
}

impl ListTicket {
    /// Directory to list.
    pub fn path(&self) -> &VirtualPath {
        &self.path
    }

    /// Filter to list with.
    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    /// Navigation generation the ticket belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether a listing result was applied to the session.
pub enum ListingOutcome {
    /// The result matched the current view and was stored.
    Applied,
    /// The session navigated since the ticket was issued; the result was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// What a surface should render for its current directory.
pub enum ListingState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A listing for the current generation is in flight.
    Loading,
    /// Latest listing of the current directory.
    Ready(DirectoryListing),
    /// The latest listing failed; shown inline until the user retries.
    Failed(ExplorerError),
}

#[derive(Debug, Clone)]
/// Cursor over the virtual namespace for a single UI surface.
pub struct NavigationSession {
    root: VirtualPath,
    current: VirtualPath,
    filter: TypeFilter,
    generation: u64,
    state: ListingState,
}

impl NavigationSession {
    /// Creates a session positioned at `root`.
    pub fn new(root: VirtualPath, filter: TypeFilter) -> Self {
        Self {
            current: root.clone(),
            root,
            filter,
            generation: 0,
            state: ListingState::Idle,
        }
    }

    /// Namespace root of the session.
    pub fn root(&self) -> &VirtualPath {
        &self.root
    }

    /// Directory currently shown.
    pub fn current_path(&self) -> &VirtualPath {
        &self.current
    }

    /// `true` when the current directory is the root ("up" would be a no-op).
    pub fn at_root(&self) -> bool {
        self.current == self.root
    }

    /// File filter of the session.
    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    /// Render state of the current directory.
    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// Latest applied listing, if any.
    pub fn listing(&self) -> Option<&DirectoryListing> {
        match &self.state {
            ListingState::Ready(listing) => Some(listing),
            _ => None,
        }
    }

    /// `true` while a listing of the current view is outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListingState::Loading)
    }

    /// Enters `folder`.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::OutsideRoot`] when the folder is not under this session's root.
    pub fn navigate_into(&mut self, folder: &FolderEntry) -> Result<ListTicket, ExplorerError> {
        self.navigate_to(folder.full_path.clone())
    }

    /// Moves to the parent directory. Returns `None` (and changes nothing) at the root.
    pub fn navigate_up(&mut self) -> Option<ListTicket> {
        if self.at_root() {
            return None;
        }
        self.current = self.current.parent();
        Some(self.begin_listing())
    }

    /// Jumps to an absolute path, for example a folder that was just created.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::OutsideRoot`] when `path` is not under this session's root.
    pub fn navigate_to(&mut self, path: VirtualPath) -> Result<ListTicket, ExplorerError> {
        if !path.is_within(&self.root) {
            return Err(ExplorerError::OutsideRoot {
                path: path.to_string(),
                root: self.root.to_string(),
            });
        }
        self.current = path;
        Ok(self.begin_listing())
    }

    /// Changes the file filter and requests a re-list.
    pub fn set_filter(&mut self, filter: TypeFilter) -> ListTicket {
        self.filter = filter;
        self.begin_listing()
    }

    /// Starts a listing of the current view. Any earlier ticket becomes stale.
    pub fn begin_listing(&mut self) -> ListTicket {
        self.generation += 1;
        self.state = ListingState::Loading;
        ListTicket {
            path: self.current.clone(),
            filter: self.filter,
            generation: self.generation,
        }
    }

    /// Applies a listing result if `ticket` is still current.
    ///
    /// Failures are stored as [`ListingState::Failed`] so the surface never stays in a loading
    /// state.
    pub fn accept(
        &mut self,
        ticket: &ListTicket,
        result: Result<DirectoryListing, ExplorerError>,
    ) -> ListingOutcome {
        if ticket.generation != self.generation || ticket.path != self.current {
            logging::log!(
                "dropping stale listing of `{}` (session now at `{}`)",
                ticket.path,
                self.current
            );
            return ListingOutcome::Stale;
        }
        self.state = match result {
            Ok(listing) => ListingState::Ready(listing),
            Err(err) => ListingState::Failed(err),
        };
        ListingOutcome::Applied
    }

    /// Lists the current view and applies the result.
    ///
    /// # Errors
    ///
    /// Returns the listing error after recording it in [`Self::state`].
    pub async fn refresh(&mut self, lister: &DirectoryLister) -> Result<(), ExplorerError> {
        let ticket = self.begin_listing();
        self.fulfill(ticket, lister).await
    }

    /// Runs the store call for `ticket` and applies the result.
    ///
    /// # Errors
    ///
    /// Returns the listing error after recording it in [`Self::state`].
    pub async fn fulfill(
        &mut self,
        ticket: ListTicket,
        lister: &DirectoryLister,
    ) -> Result<(), ExplorerError> {
        let result = lister.list(ticket.path(), ticket.filter()).await;
        let err = result.as_ref().err().cloned();
        self.accept(&ticket, result);
        match err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use asset_host::{MemoryObjectStore, MemoryStoreOp};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ExplorerConfig;

    fn path(raw: &str) -> VirtualPath {
        VirtualPath::parse(raw).expect("path")
    }

    fn session() -> NavigationSession {
        NavigationSession::new(path("multimedia"), TypeFilter::All)
    }

    fn listing_of(raw: &str) -> DirectoryListing {
        DirectoryListing {
            path: path(raw),
            filter: TypeFilter::All,
            folders: Vec::new(),
            files: Vec::new(),
        }
    }

    #[test]
    fn navigate_up_at_root_is_a_no_op() {
        let mut session = session();
        assert!(session.navigate_up().is_none());
        assert_eq!(session.current_path(), &path("multimedia"));
        assert_eq!(session.state(), &ListingState::Idle);
    }

    #[test]
    fn navigation_transitions_update_current_path() {
        let mut session = session();
        let folder = FolderEntry {
            name: "bts".to_string(),
            full_path: path("multimedia/bts"),
        };
        let ticket = session.navigate_into(&folder).expect("into");
        assert_eq!(ticket.path(), &path("multimedia/bts"));
        assert!(session.is_loading());

        session
            .navigate_to(path("multimedia/bts/2024"))
            .expect("jump");
        let up = session.navigate_up().expect("up");
        assert_eq!(up.path(), &path("multimedia/bts"));
        assert!(!session.at_root());
    }

    #[test]
    fn navigate_to_rejects_paths_outside_root() {
        let mut session = session();
        let err = session
            .navigate_to(path("assets/logo.png"))
            .expect_err("outside root");
        assert!(matches!(err, ExplorerError::OutsideRoot { .. }));
        assert_eq!(session.current_path(), &path("multimedia"));
    }

    #[test]
    fn late_listing_for_an_old_view_is_discarded() {
        let mut session = session();
        let first = session.begin_listing();
        let second = session
            .navigate_to(path("multimedia/office"))
            .expect("navigate");

        assert_eq!(
            session.accept(&second, Ok(listing_of("multimedia/office"))),
            ListingOutcome::Applied
        );
        assert_eq!(
            session.accept(&first, Ok(listing_of("multimedia"))),
            ListingOutcome::Stale
        );
        assert_eq!(
            session.listing().map(|l| l.path.as_str()),
            Some("multimedia/office")
        );
    }

    #[test]
    fn returning_to_a_path_still_discards_the_older_request() {
        let mut session = session();
        let old = session.begin_listing();
        session.navigate_to(path("multimedia/bts")).expect("in");
        let fresh = session.navigate_up().expect("up");
        assert_eq!(old.path(), fresh.path());
        assert_eq!(
            session.accept(&old, Ok(listing_of("multimedia"))),
            ListingOutcome::Stale
        );
        assert!(session.is_loading());
    }

    #[test]
    fn refresh_records_failures_instead_of_loading() {
        let store = MemoryObjectStore::new();
        store.fail_on(MemoryStoreOp::List, "multimedia");
        let lister = DirectoryLister::new(Rc::new(store), Rc::new(ExplorerConfig::default()));
        let mut session = session();
        let err = block_on(session.refresh(&lister)).expect_err("refresh fails");
        assert!(matches!(err, ExplorerError::ListFailed { .. }));
        assert!(matches!(session.state(), ListingState::Failed(_)));
        assert!(!session.is_loading());
    }

    #[test]
    fn independent_sessions_do_not_share_position() {
        let mut a = session();
        let b = session();
        a.navigate_to(path("multimedia/office")).expect("navigate");
        assert_eq!(a.current_path(), &path("multimedia/office"));
        assert_eq!(b.current_path(), &path("multimedia"));
    }
}
