//! Shared UI components (status bar, pagination, modals).
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::{BTreeMap, BTreeSet};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, InputMode};
use crate::pipeline::PageWindow;

/// Text of the pagination bar, or `None` when there is a single page.
///
/// First/previous links are hidden on the first page, next/last on the last.
pub fn pagination_label(window: &PageWindow) -> Option<String> {
    if window.total <= 1 {
        return None;
    }
    let mut parts: Vec<String> = Vec::new();
    if !window.is_first() {
        parts.push("« First".into());
        parts.push("‹ Prev".into());
    }
    parts.push(format!("Page {} / {}", window.index, window.total));
    if !window.is_last() {
        parts.push("Next ›".into());
        parts.push("Last »".into());
    }
    Some(parts.join("   "))
}

pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState, window: &PageWindow) {
    if let Some(label) = pagination_label(window) {
        let p = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.text));
        f.render_widget(p, area);
    }
}

/// Bottom status line: mode, counts, sort directive, pending search.
pub fn status_line(app: &AppState, filtered_len: usize) -> String {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let mut msg = format!(
        "mode: {mode}  showing:{filtered_len}/{}  sort:{} {}  rows/page:{}",
        app.records.len(),
        app.view.directive.key,
        app.view.directive.direction,
        app.view.page_size,
    );
    if !app.view.predicate.query.is_empty() {
        msg.push_str(&format!("  {}~\"{}\"", app.view.predicate.field, app.view.predicate.query));
    }
    if app.search.is_pending() {
        msg.push_str("  (searching…)");
    }
    msg
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState, filtered_len: usize) {
    let p = Paragraph::new(status_line(app, filtered_len))
        .style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

pub fn render_loading(f: &mut Frame, area: Rect, app: &AppState) {
    let y = area.y + area.height / 2;
    let rect = Rect { y, height: area.height.min(1), ..area };
    let p = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK));
    f.render_widget(p, rect);
}

pub fn render_error_line(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let p = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.error_fg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Help entries grouped by section: label -> key specs.
pub fn help_sections(keymap: &Keymap) -> Vec<(&'static str, BTreeMap<String, BTreeSet<String>>)> {
    let mut general: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut navigation: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut sorting: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for ((mods, code), action) in keymap.all_bindings() {
        let key = Keymap::format_key(mods, code);
        let (section, label) = match action {
            KeyAction::Quit => (&mut general, "Quit".to_string()),
            KeyAction::OpenHelp => (&mut general, "Help".to_string()),
            KeyAction::StartSearch => (&mut general, "Search".to_string()),
            KeyAction::ToggleExpand => (&mut general, "Expand / collapse address".to_string()),
            KeyAction::MoveUp => (&mut navigation, "Move up".to_string()),
            KeyAction::MoveDown => (&mut navigation, "Move down".to_string()),
            KeyAction::PrevPage => (&mut navigation, "Previous page".to_string()),
            KeyAction::NextPage => (&mut navigation, "Next page".to_string()),
            KeyAction::FirstPage => (&mut navigation, "First page".to_string()),
            KeyAction::LastPage => (&mut navigation, "Last page".to_string()),
            KeyAction::SortColumn(n) => {
                let Some(col) = crate::columns::sortable_column(n as usize) else {
                    continue;
                };
                (&mut sorting, format!("Sort by {}", col.text))
            }
            KeyAction::Ignore => continue,
        };
        section.entry(label).or_default().insert(key);
    }

    let mut search: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    search.entry("Apply now".into()).or_default().insert("Enter".into());
    search.entry("Clear and close".into()).or_default().insert("Esc".into());

    vec![
        ("General", general),
        ("Navigation", navigation),
        ("Sorting (again to reverse)", sorting),
        ("While searching", search),
    ]
}

pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let mut lines: Vec<Line> = Vec::new();
    for (title, entries) in help_sections(&app.keymap) {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            format!("{title}:"),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (label, keys) in entries {
            let joined = keys.into_iter().collect::<Vec<_>>().join(", ");
            lines.push(Line::from(vec![
                Span::raw(format!("  {label:<28} ")),
                Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
            ]));
        }
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
