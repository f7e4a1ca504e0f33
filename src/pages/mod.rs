//! Management screens, each run as a [`Page`](crate::actor_framework::Page)
//! behind a [`PageActor`](crate::actor_framework::PageActor).
//!
//! Every page fetches its collection once per load and then answers list
//! commands (search, filter, sort, paging) from memory.

pub mod companies;
pub mod manufacturing;
pub mod orders;
pub mod users;

pub use companies::*;
pub use manufacturing::*;
pub use orders::*;
pub use users::*;

use thiserror::Error;

use crate::collection::{CollectionView, PageSlice, SortDirection, ViewSpec};
use crate::domain::User;
use crate::session::SessionStore;

/// Why a page command did not go through. Load and mutation failures carry
/// the screen's fixed banner text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageActionError {
    #[error("You do not have permission to perform this action")]
    PermissionDenied,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(&'static str),
    #[error("{0}")]
    Failed(&'static str),
}

pub type PageOutcome<V> = Result<V, PageActionError>;

/// Commands every list page understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ListCommand<F, K> {
    Search(String),
    SetFilter(F),
    ClearFilters,
    SortBy(K),
    GoToPage(usize),
    NextPage,
    PreviousPage,
}

impl<F, K> ListCommand<F, K> {
    /// Applies the command to `view`. Out-of-range paging leaves the view as is.
    pub fn apply<S>(self, view: &mut CollectionView<S>)
    where
        S: ViewSpec<Filter = F, SortKey = K>,
        F: Default,
    {
        match self {
            ListCommand::Search(term) => view.set_search_term(term),
            ListCommand::SetFilter(filter) => view.set_filter(filter),
            ListCommand::ClearFilters => {
                view.set_search_term("");
                view.set_filter(F::default());
            }
            ListCommand::SortBy(key) => view.sort_by(key),
            ListCommand::GoToPage(page) => {
                view.go_to_page(page);
            }
            ListCommand::NextPage => {
                view.next_page();
            }
            ListCommand::PreviousPage => {
                view.previous_page();
            }
        }
    }
}

/// What a list page shows: the current slice plus the controls' state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T, F, K> {
    pub slice: PageSlice<T>,
    pub page_numbers: Vec<usize>,
    pub search_term: String,
    pub filter: F,
    pub sort: Option<(K, SortDirection)>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T, F, K> ListSnapshot<T, F, K> {
    pub fn capture<S>(view: &CollectionView<S>, loading: bool, error: Option<&str>) -> Self
    where
        S: ViewSpec<Item = T, Filter = F, SortKey = K>,
        T: Clone,
        F: Clone,
    {
        Self {
            slice: view.page_slice(),
            page_numbers: view.page_numbers(),
            search_term: view.search_term().to_string(),
            filter: view.filter().clone(),
            sort: view.sort(),
            loading,
            error: error.map(str::to_string),
        }
    }
}

/// Loading flag and error banner shared by all pages.
#[derive(Debug, Clone, Default)]
pub struct PageStatus {
    pub loading: bool,
    pub error: Option<&'static str>,
}

impl PageStatus {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish(&mut self, error: Option<&'static str>) {
        self.loading = false;
        self.error = error;
    }
}

/// Whether the signed-in user sees management actions.
pub fn is_admin_or_manager(session: &SessionStore) -> bool {
    session.current_user().is_some_and(|u| u.role.is_admin_or_manager())
}

/// Author recorded on status changes and notes.
pub fn acting_user_name(user: Option<&User>) -> String {
    user.map(User::full_name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Unknown User".to_string())
}
