//! Users table with expandable address rows.
//!
//! Expanded rows get a bottom margin in the main table; the address
//! sub-table is then drawn into that gap.
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::columns::{ADDRESS_COLUMNS, Align, ColumnHeader, USER_COLUMNS};
use crate::model::{Record, User};
use crate::pipeline::SortDirective;

/// Lines below an expanded row: title, address header, address values.
pub const DETAIL_HEIGHT: u16 = 3;

const USER_WIDTHS: [Constraint; 6] = [
    Constraint::Length(2),
    Constraint::Length(6),
    Constraint::Length(6),
    Constraint::Percentage(25),
    Constraint::Percentage(20),
    Constraint::Percentage(35),
];

const ADDRESS_WIDTHS: [Constraint; 5] = [
    Constraint::Percentage(32),
    Constraint::Percentage(18),
    Constraint::Percentage(18),
    Constraint::Percentage(20),
    Constraint::Percentage(12),
];

fn aligned(text: String, align: Align) -> Cell<'static> {
    let alignment = match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    };
    Cell::from(Line::from(text).alignment(alignment))
}

/// Header label, with an arrow on the active sort column.
pub fn header_label(col: &ColumnHeader, directive: &SortDirective) -> String {
    if col.sortable && col.id == directive.key {
        format!("{} {}", col.text, directive.direction.arrow())
    } else {
        col.text.to_string()
    }
}

fn user_cell(user: &User, col: &ColumnHeader) -> String {
    match col.id {
        "avatar" => user.initials(),
        id => user.field_or_empty(id).to_string(),
    }
}

/// Where each expanded row's address block goes, given the table's inner
/// area. Rows that do not fit get `None`.
pub fn detail_slots(inner: Rect, expanded: &[bool]) -> Vec<Option<Rect>> {
    let bottom = inner.y.saturating_add(inner.height);
    // First data row sits under the header line.
    let mut y = inner.y.saturating_add(1);
    let mut out = Vec::with_capacity(expanded.len());
    for &open in expanded {
        let detail_y = y.saturating_add(1);
        if open && detail_y.saturating_add(DETAIL_HEIGHT) <= bottom {
            out.push(Some(Rect {
                x: inner.x.saturating_add(2),
                y: detail_y,
                width: inner.width.saturating_sub(2),
                height: DETAIL_HEIGHT,
            }));
        } else {
            out.push(None);
        }
        y = detail_y.saturating_add(if open { DETAIL_HEIGHT } else { 0 });
    }
    out
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let view = app.derived();
    let theme = &app.theme;

    let mut header_cells = vec![Cell::from("")];
    header_cells.extend(
        USER_COLUMNS
            .iter()
            .map(|c| aligned(header_label(c, &app.view.directive), c.align)),
    );
    let header = Row::new(header_cells).style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));

    let expanded: Vec<bool> = view.rows.iter().map(|u| app.is_expanded(u.id)).collect();
    let rows = view.rows.iter().enumerate().map(|(i, u)| {
        let marker = if expanded[i] { "▾" } else { "▸" };
        let mut cells = vec![Cell::from(marker)];
        cells.extend(USER_COLUMNS.iter().map(|c| aligned(user_cell(u, c), c.align)));
        let style = if i == app.selected_row {
            Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        let margin = if expanded[i] { DETAIL_HEIGHT } else { 0 };
        Row::new(cells).style(style).bottom_margin(margin)
    });

    let title = format!("Users ({} of {})", view.filtered_len, app.records.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    let table = Table::new(rows, USER_WIDTHS).header(header).block(block).column_spacing(1);
    f.render_widget(table, area);

    if view.rows.is_empty() {
        let msg = if app.view.predicate.query.is_empty() { "No users" } else { "No users match the search" };
        let rect = Rect { y: inner.y.saturating_add(1), height: inner.height.saturating_sub(1).min(1), ..inner };
        f.render_widget(
            Paragraph::new(msg).alignment(Alignment::Center).style(Style::default().fg(theme.muted)),
            rect,
        );
        return;
    }

    for (user, slot) in view.rows.iter().zip(detail_slots(inner, &expanded)) {
        if let Some(rect) = slot {
            render_address(f, rect, app, user);
        }
    }
}

/// The "Address" block under an expanded row.
fn render_address(f: &mut Frame, area: Rect, app: &AppState, user: &User) {
    let theme = &app.theme;
    let [title_area, table_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let title = Paragraph::new("Address")
        .style(Style::default().fg(theme.header_fg).bg(theme.detail_bg).add_modifier(Modifier::BOLD));
    f.render_widget(title, title_area);

    let header = Row::new(ADDRESS_COLUMNS.iter().map(|c| aligned(c.text.to_string(), c.align)))
        .style(Style::default().fg(theme.muted).add_modifier(Modifier::BOLD));
    let values = Row::new(ADDRESS_COLUMNS.iter().map(|c| aligned(user.field_or_empty(c.id).to_string(), c.align)))
        .style(Style::default().fg(theme.text));
    let table = Table::new([values], ADDRESS_WIDTHS)
        .header(header)
        .style(Style::default().bg(theme.detail_bg))
        .column_spacing(1);
    f.render_widget(table, table_area);
}
