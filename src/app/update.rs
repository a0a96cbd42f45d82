//! Event loop: draw, wait for a key or the next timer, dispatch.
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::{Duration, Instant};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};
use crate::columns;
use crate::remote::PendingFetch;
use crate::ui;

const MAX_POLL: Duration = Duration::from_millis(100);

/// What the loop should do after handling a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: AppState,
    mut fetch: PendingFetch,
) -> Result<()> {
    loop {
        if let Some(result) = fetch.try_take() {
            app.receive_users(result);
        }
        app.tick(Instant::now());

        terminal.draw(|f| ui::render(f, &app))?;

        let timeout = app.poll_timeout(Instant::now(), MAX_POLL);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(&mut app, key, Instant::now()) == Flow::Quit {
                    break;
                }
            }
        }
    }

    tracing::info!(uptime = ?app.started_at.elapsed(), "exiting");
    Ok(())
}

/// Route one key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) -> Flow {
    match app.input_mode {
        InputMode::Normal => {
            if let Some(action) = app.keymap.resolve(&key) {
                return handle_action(app, action);
            }
        }
        InputMode::Search => handle_search_key(app, key.code, now),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
    Flow::Continue
}

fn handle_action(app: &mut AppState, action: KeyAction) -> Flow {
    let window = app.derived().window;
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenHelp => app.open_help(),
        KeyAction::StartSearch => {
            app.input_mode = InputMode::Search;
        }
        KeyAction::MoveUp => app.move_selection(-1),
        KeyAction::MoveDown => app.move_selection(1),
        KeyAction::PrevPage => app.on_page_change(window.index.saturating_sub(1)),
        KeyAction::NextPage => app.on_page_change(window.index + 1),
        KeyAction::FirstPage => app.on_page_change(1),
        KeyAction::LastPage => app.on_page_change(window.total),
        KeyAction::ToggleExpand => app.toggle_expanded(),
        KeyAction::SortColumn(n) => {
            if let Some(col) = columns::sortable_column(n as usize) {
                app.on_sort_request(col.id);
            }
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, code: KeyCode, now: Instant) {
    match code {
        KeyCode::Enter => {
            app.apply_search_now();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.cancel_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            let mut text = app.search_input.clone();
            if text.pop().is_some() {
                app.on_search_input(&text, now);
            }
        }
        KeyCode::Char(c) => {
            let mut text = app.search_input.clone();
            text.push(c);
            app.on_search_input(&text, now);
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => app.close_modal(),
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
}
