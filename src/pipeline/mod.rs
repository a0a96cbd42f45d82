//! Client-side list pipeline: filter, then sort, then page.
//!
//! Every stage is a pure function. [`ViewState`] bundles the transient UI
//! inputs (predicate, directive, page position) and is replaced wholesale on
//! each interaction; [`derive`] recomputes the visible window from scratch.
//!
pub mod filter;
pub mod page;
pub mod sort;

pub use filter::{FilterPredicate, filter};
pub use page::{PageWindow, clamp_index, page, page_count};
pub use sort::{SortDirection, SortDirective, sort};

use crate::model::Record;

/// Immutable snapshot of everything the user can change about the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub predicate: FilterPredicate,
    pub directive: SortDirective,
    pub page_size: usize,
    pub page_index: usize,
    /// Whether a new search query sends the user back to page 1.
    pub reset_page_on_search: bool,
}

impl ViewState {
    pub fn new(predicate: FilterPredicate, directive: SortDirective, page_size: usize) -> Self {
        Self {
            predicate,
            directive,
            page_size: page_size.max(1),
            page_index: 1,
            reset_page_on_search: true,
        }
    }

    pub fn with_reset_page_on_search(self, reset: bool) -> Self {
        Self { reset_page_on_search: reset, ..self }
    }

    /// State after a header click on `field`. Always returns to page 1.
    pub fn with_sort_request(&self, field: &str) -> Self {
        Self {
            directive: self.directive.requested(field),
            page_index: 1,
            ..self.clone()
        }
    }

    /// State after the search text settles on `query`.
    pub fn with_query(&self, query: &str) -> Self {
        let page_index = if self.reset_page_on_search && query != self.predicate.query {
            1
        } else {
            self.page_index
        };
        Self {
            predicate: FilterPredicate::new(self.predicate.field.clone(), query),
            page_index,
            ..self.clone()
        }
    }

    /// State after navigating to `index`, clamped against `filtered_len` rows.
    pub fn with_page(&self, index: usize, filtered_len: usize) -> Self {
        Self {
            page_index: clamp_index(filtered_len, self.page_size, index),
            ..self.clone()
        }
    }
}

/// Output of one pipeline run.
#[derive(Clone, Debug)]
pub struct DerivedView<R> {
    /// Rows of the current page.
    pub rows: Vec<R>,
    /// Number of records that passed the filter.
    pub filtered_len: usize,
    pub window: PageWindow,
}

/// Run filter, sort and page over `records` for `state`.
pub fn derive<R: Record + Clone>(records: &[R], state: &ViewState) -> DerivedView<R> {
    let filtered = filter(records, &state.predicate);
    let sorted = sort(&filtered, &state.directive);
    let window = PageWindow::for_len(sorted.len(), state.page_size, state.page_index);
    let rows = page(&sorted, window.size, window.index).to_vec();
    DerivedView { rows, filtered_len: sorted.len(), window }
}

/// Full filtered and sorted sequence, without paging.
pub fn filtered_sorted<R: Record + Clone>(records: &[R], state: &ViewState) -> Vec<R> {
    sort(&filter(records, &state.predicate), &state.directive)
}
