//! Application state and the intents that change it.
//!
//! [`AppState`] owns the record store (written once when the fetch lands),
//! the current [`ViewState`], and the bits of terminal-only state such as the
//! selected row and which rows are expanded. Every user intent replaces the
//! view state wholesale; the visible page is derived on demand.
//!
pub mod keymap;
pub mod settings;
pub mod update;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::debounce::Debouncer;
use crate::error::FetchError;
use crate::model::User;
use crate::pipeline::{self, DerivedView, ViewState};
use crate::ui::theme::Theme;

pub use keymap::Keymap;
pub use settings::Settings;

const APP_DIR: &str = "userlist-viewer";

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Where the one-shot fetch stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Help { scroll: u16 },
}

pub struct AppState {
    pub started_at: Instant,
    /// Everything the remote returned, in response order.
    pub records: Vec<User>,
    pub view: ViewState,
    pub load: LoadState,
    pub input_mode: InputMode,
    /// Text in the search prompt; may be ahead of `view.predicate.query`
    /// while the debounce is pending.
    pub search_input: String,
    pub search: Debouncer<String>,
    /// Row index within the current page.
    pub selected_row: usize,
    /// Ids of users whose address details are open.
    pub expanded: BTreeSet<u64>,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub settings: Settings,
}

impl AppState {
    /// Fresh state waiting for the fetch to complete.
    pub fn new(settings: Settings, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            records: Vec::new(),
            view: settings.initial_view(),
            load: LoadState::Loading,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            search: Debouncer::new(settings.debounce()),
            selected_row: 0,
            expanded: BTreeSet::new(),
            theme,
            keymap,
            modal: None,
            settings,
        }
    }

    /// Run the pipeline for the current state.
    pub fn derived(&self) -> DerivedView<&User> {
        let store: Vec<&User> = self.records.iter().collect();
        pipeline::derive(&store, &self.view)
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Populate the record store from the fetch result.
    pub fn receive_users(&mut self, result: Result<Vec<User>, FetchError>) {
        match result {
            Ok(users) => {
                tracing::info!(count = users.len(), "record store populated");
                self.records = users;
                self.load = LoadState::Ready;
                self.expanded.clear();
                let filtered_len = self.filtered_len();
                self.set_view(self.view.with_page(1, filtered_len));
            }
            Err(e) => {
                tracing::error!(error = %e, "could not load users");
                self.load = LoadState::Failed(e.user_message());
            }
        }
    }

    /// Header click on `field`.
    pub fn on_sort_request(&mut self, field: &str) {
        if !crate::columns::is_sortable(field) {
            tracing::debug!(field, "ignoring sort request on unsortable column");
            return;
        }
        let next = self.view.with_sort_request(field);
        tracing::debug!(key = %next.directive.key, direction = %next.directive.direction, "sort changed");
        self.set_view(next);
    }

    /// Navigate to page `index` (1-based), clamped to the valid range.
    pub fn on_page_change(&mut self, index: usize) {
        let next = self.view.with_page(index, self.filtered_len());
        if next.page_index != self.view.page_index {
            self.selected_row = 0;
        }
        self.set_view(next);
    }

    /// Search text changed. The filter is applied once input has been quiet
    /// for the debounce period.
    pub fn on_search_input(&mut self, text: &str, now: Instant) {
        self.search_input = text.to_string();
        self.search.schedule(text.to_string(), now);
    }

    /// Apply whatever is in the search prompt right away.
    pub fn apply_search_now(&mut self) {
        self.search.cancel();
        let query = self.search_input.clone();
        self.apply_query(&query);
    }

    /// Clear the search prompt and the active filter.
    pub fn cancel_search(&mut self) {
        self.search.cancel();
        self.search_input.clear();
        self.apply_query("");
    }

    /// Advance timers. Returns true when a debounced search was applied.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(query) => {
                self.apply_query(&query);
                true
            }
            None => false,
        }
    }

    /// How long the event loop may block before the next timer is due.
    pub fn poll_timeout(&self, now: Instant, max: Duration) -> Duration {
        self.search
            .deadline()
            .map(|due| due.saturating_duration_since(now).min(max))
            .unwrap_or(max)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.derived().rows.len();
        if rows == 0 {
            self.selected_row = 0;
            return;
        }
        self.selected_row = self.selected_row.saturating_add_signed(delta).min(rows - 1);
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.derived().rows.get(self.selected_row).copied()
    }

    /// Open or close the address details of the selected row.
    pub fn toggle_expanded(&mut self) {
        let Some(id) = self.selected_user().map(|u| u.id) else {
            return;
        };
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: u64) -> bool {
        self.expanded.contains(&id)
    }

    pub fn open_help(&mut self) {
        self.modal = Some(ModalState::Help { scroll: 0 });
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    fn apply_query(&mut self, query: &str) {
        if query == self.view.predicate.query {
            return;
        }
        tracing::debug!(field = %self.view.predicate.field, query, "search applied");
        self.set_view(self.view.with_query(query));
    }

    fn filtered_len(&self) -> usize {
        self.records.iter().filter(|u| self.view.predicate.matches(*u)).count()
    }

    /// Replace the view state and keep the selection on the page.
    fn set_view(&mut self, view: ViewState) {
        self.view = view;
        let rows = self.derived().rows.len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }
}

/// Iterate `key = value` pairs of a config file, skipping blanks and `#` comments.
pub fn conf_pairs(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|raw| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (lhs, rhs) = line.split_once('=')?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());
        (!lhs.is_empty() && !rhs.is_empty()).then_some((lhs, rhs))
    })
}

/// Directory config files live in: `$XDG_CONFIG_HOME/userlist-viewer`
/// or `$HOME/.config/userlist-viewer`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join(APP_DIR))
}

/// Existing config file `name` in the standard location, if there is one.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let p = config_dir()?.join(name);
    p.exists().then(|| p.to_string_lossy().into_owned())
}

/// Where config file `name` should be written: inside `dir` when given,
/// otherwise the standard config directory (created on demand), falling
/// back to the working directory.
pub fn config_file_write_path(dir: Option<&std::path::Path>, name: &str) -> String {
    let base = dir.map(PathBuf::from).or_else(|| {
        let d = config_dir()?;
        std::fs::create_dir_all(&d).ok()?;
        Some(d)
    });
    match base {
        Some(d) => d.join(name).to_string_lossy().into_owned(),
        None => name.to_string(),
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
