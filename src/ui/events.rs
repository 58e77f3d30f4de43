use super::navigator::ModeKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key means once the active mode has been taken into account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,

    // Focus changes
    OpenSearch,
    OpenRecent,
    Back,

    // Playback
    TogglePlayPause,
    NextTrack,
    PreviousTrack,

    // Lists
    Up,
    Down,
    Select,

    // Text entry
    Input(char),
    Backspace,
}

pub fn key_to_action(mode: ModeKind, key: KeyEvent) -> Option<Action> {
    // Ctrl+C always gets you out
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match mode {
        ModeKind::Search => key_to_search_action(key),
        // Bindings are bare keys; Ctrl+S or Alt+P mean nothing here
        _ if has_command_modifier(key) => None,
        ModeKind::Idle => key_to_idle_action(key),
        ModeKind::Recent | ModeKind::SearchResults => key_to_list_action(key),
    }
}

/// Shift doesn't count - it's how some terminals report arrows and capitals
fn has_command_modifier(key: KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}

fn key_to_idle_action(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('s') => Some(Action::OpenSearch),
        KeyCode::Char('r') => Some(Action::OpenRecent),
        _ => key_to_transport_action(key),
    }
}

/// Every printable key is text here, so nothing is forwarded to playback
fn key_to_search_action(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c)
            if !c.is_control() && !has_command_modifier(key) =>
        {
            Some(Action::Input(c))
        }
        _ => None,
    }
}

fn key_to_list_action(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Back),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Enter => Some(Action::Select),
        // Transport keys don't clash with list navigation, so they pass through
        _ => key_to_transport_action(key),
    }
}

fn key_to_transport_action(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('p') => Some(Action::TogglePlayPause),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::NextTrack),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::PreviousTrack),
        _ => None,
    }
}
