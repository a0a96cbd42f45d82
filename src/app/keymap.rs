//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only normal mode goes through the keymap. While the search prompt is open,
//! keys are text input and handled directly by the update loop.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic actions a key can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Show the help/keybindings modal.
    OpenHelp,
    /// Open the search prompt.
    StartSearch,
    /// Select the previous row on the page.
    MoveUp,
    /// Select the next row on the page.
    MoveDown,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    /// Expand or collapse the address details of the selected row.
    ToggleExpand,
    /// Sort by the n-th sortable column (1-based).
    SortColumn(u8),
    /// Swallow the key.
    Ignore,
}

/// Mapping from `(modifiers, code)` to [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);

        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Home), KeyAction::FirstPage);
        bindings.insert((M::NONE, End), KeyAction::LastPage);

        bindings.insert((M::NONE, Enter), KeyAction::ToggleExpand);
        bindings.insert((M::NONE, Char(' ')), KeyAction::ToggleExpand);

        for n in 1..=4u8 {
            bindings.insert((M::NONE, Char((b'0' + n) as char)), KeyAction::SortColumn(n));
        }

        Self { bindings }
    }

    /// Load `path` if it exists, else the standard config locations, else
    /// write the defaults to `path` for the user to edit.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = super::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default keybindings");
        }
        km
    }

    /// Defaults overridden by the `<Action> = <KeySpec>` lines of `path`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for (lhs, rhs) in super::conf_pairs(contents) {
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::debug!(lhs, rhs, "ignoring unparseable keybinding"),
            }
        }
        map
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-viewer keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Space, Up, Down, Left, Right, PageUp, PageDown, Home, End, /, ?\n");
        buf.push_str("# Actions: Quit, OpenHelp, StartSearch, MoveUp, MoveDown, PrevPage, NextPage, FirstPage, LastPage, ToggleExpand, SortColumn1..SortColumn4, Ignore\n\n");

        let mut entries: Vec<(String, String)> = self
            .bindings
            .iter()
            .map(|((m, c), a)| (format_action(*a), Self::format_key(*m, *c)))
            .collect();
        entries.sort();
        for (action, key) in entries {
            let _ = writeln!(buf, "{action} = {key}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Human-readable key spec like `Ctrl+c` or `PageDown`.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        let base = match code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            other => key_name(other).map(str::to_string).unwrap_or_else(|| format!("{other:?}")),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn key_name(code: KeyCode) -> Option<&'static str> {
    Some(match code {
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Esc",
        KeyCode::Tab => "Tab",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        _ => return None,
    })
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let (mods, rest) = match spec.trim().strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, spec.trim()),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "Space" => Char(' '),
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Home" => Home,
        "End" => End,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    if let Some(n) = s.strip_prefix("SortColumn") {
        return n.parse::<u8>().ok().filter(|n| (1..=4).contains(n)).map(KeyAction::SortColumn);
    }
    Some(match s {
        "Quit" => KeyAction::Quit,
        "OpenHelp" => KeyAction::OpenHelp,
        "StartSearch" => KeyAction::StartSearch,
        "MoveUp" => KeyAction::MoveUp,
        "MoveDown" => KeyAction::MoveDown,
        "PrevPage" => KeyAction::PrevPage,
        "NextPage" => KeyAction::NextPage,
        "FirstPage" => KeyAction::FirstPage,
        "LastPage" => KeyAction::LastPage,
        "ToggleExpand" => KeyAction::ToggleExpand,
        "Ignore" => KeyAction::Ignore,
        _ => return None,
    })
}

pub fn format_action(a: KeyAction) -> String {
    match a {
        KeyAction::SortColumn(n) => format!("SortColumn{n}"),
        other => format!("{other:?}"),
    }
}
