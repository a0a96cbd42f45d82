pub mod components;
pub mod theme;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &AppState) {
    let error = app.error_message();
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if error.is_some() { 1 } else { 0 }),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search by {}: {}", app.view.predicate.field, app.search_input),
        _ if !app.view.predicate.query.is_empty() => format!("  filter: {}", app.view.predicate.query),
        _ => String::new(),
    };
    let p = Paragraph::new(format!("{}{prompt}", app.settings.endpoint))
        .block(
            Block::default()
                .title("User list")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    if let Some(msg) = error {
        components::render_error_line(f, root[1], app, msg);
    }

    let view = app.derived();
    if app.is_loading() {
        components::render_loading(f, root[2], app);
    } else {
        users::render_users_table(f, root[2], app);
        components::render_pagination(f, root[3], app, &view.window);
    }

    components::render_status_bar(f, root[4], app, view.filtered_len);

    if let Some(ModalState::Help { scroll }) = app.modal {
        components::render_help_modal(f, f.area(), app, scroll);
    }
}
