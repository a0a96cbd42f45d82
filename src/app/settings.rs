//! Viewer settings: parse/write `settings.conf` and build the initial view.
//!
//! The file uses the same `key = value` format as the theme and keybinding
//! files. Missing keys keep their defaults, unknown keys are skipped, and a
//! value that does not parse leaves the previous value in place.

use std::time::Duration;

use crate::debounce::SEARCH_DEBOUNCE;
use crate::pipeline::{FilterPredicate, SortDirection, SortDirective, ViewState};
use crate::remote::{DEFAULT_ENDPOINT, DEFAULT_FETCH_SIZE};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the user directory.
    pub endpoint: String,
    /// Value of the `size` query parameter.
    pub fetch_size: usize,
    /// Rows per table page.
    pub page_size: usize,
    /// Initial sort column.
    pub sort_key: String,
    pub sort_direction: SortDirection,
    /// Field the search box matches against.
    pub search_field: String,
    /// Quiet period before a search is applied.
    pub debounce_ms: u64,
    /// Return to page 1 whenever the search query changes.
    pub reset_page_on_search: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fetch_size: DEFAULT_FETCH_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_key: "email".to_string(),
            sort_direction: SortDirection::Ascending,
            search_field: "email".to_string(),
            debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
            reset_page_on_search: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to the standard config
    /// locations. If nothing exists yet, write the defaults to `path`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = super::config_file_read_path("settings.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let s = Self::default();
        if let Err(e) = s.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default settings");
        }
        s
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut s = Self::default();
        for (key, val) in super::conf_pairs(contents) {
            match key {
                "endpoint" => s.endpoint = val.to_string(),
                "fetch_size" | "size" => s.fetch_size = val.parse().unwrap_or(s.fetch_size),
                "page_size" => {
                    s.page_size = val.parse::<usize>().ok().filter(|n| *n > 0).unwrap_or(s.page_size)
                }
                "sort_key" => s.sort_key = val.to_string(),
                "sort_direction" => s.sort_direction = val.parse().unwrap_or(s.sort_direction),
                "search_field" => s.search_field = val.to_string(),
                "debounce_ms" => s.debounce_ms = val.parse().unwrap_or(s.debounce_ms),
                "reset_page_on_search" => {
                    s.reset_page_on_search = parse_bool(val).unwrap_or(s.reset_page_on_search)
                }
                _ => tracing::debug!(key, "ignoring unknown settings key"),
            }
        }
        s
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-viewer settings\n");
        buf.push_str("# sort_direction: asc|desc\n");
        buf.push_str("# reset_page_on_search: go back to page 1 when the search text changes\n\n");
        let _ = writeln!(buf, "endpoint = {}", self.endpoint);
        let _ = writeln!(buf, "fetch_size = {}", self.fetch_size);
        let _ = writeln!(buf, "page_size = {}", self.page_size);
        let _ = writeln!(buf, "sort_key = {}", self.sort_key);
        let _ = writeln!(buf, "sort_direction = {}", self.sort_direction);
        let _ = writeln!(buf, "search_field = {}", self.search_field);
        let _ = writeln!(buf, "debounce_ms = {}", self.debounce_ms);
        let _ = writeln!(buf, "reset_page_on_search = {}", self.reset_page_on_search);
        std::fs::write(path, buf)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// View state the table starts in.
    pub fn initial_view(&self) -> ViewState {
        ViewState::new(
            FilterPredicate::new(self.search_field.clone(), ""),
            SortDirective::new(self.sort_key.clone(), self.sort_direction),
            self.page_size,
        )
        .with_reset_page_on_search(self.reset_page_on_search)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overrides_and_keeps_defaults() {
        let s = Settings::parse(
            "# comment\n\
             page_size = 25\n\
             sort_direction = desc\n\
             reset_page_on_search = off\n\
             bogus = 1\n\
             fetch_size = many\n",
        );
        assert_eq!(s.page_size, 25);
        assert_eq!(s.sort_direction, SortDirection::Descending);
        assert!(!s.reset_page_on_search);
        assert_eq!(s.fetch_size, DEFAULT_FETCH_SIZE);
        assert_eq!(s.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(Settings::parse("page_size = 0").page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn initial_view_reflects_settings() {
        let s = Settings { sort_key: "id".into(), search_field: "username".into(), ..Default::default() };
        let v = s.initial_view();
        assert_eq!(v.directive.key, "id");
        assert_eq!(v.predicate.field, "username");
        assert_eq!(v.page_index, 1);
        assert_eq!(s.debounce(), Duration::from_millis(300));
    }
}
