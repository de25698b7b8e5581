use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, AppMode};

/// Map key events to actions based on current mode
pub fn handle_key(key: KeyEvent, mode: AppMode) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match mode {
        AppMode::Help => handle_key_help(key),
        AppMode::ConfirmCleanup => handle_key_confirm(key),
        AppMode::Idle | AppMode::Scanning | AppMode::Scanned | AppMode::Cleaning => {
            handle_key_main(key)
        }
    }
}

fn handle_key_help(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::HideHelp,
        _ => Action::Tick,
    }
}

fn handle_key_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Action::ConfirmCleanup,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('q') => {
            Action::CancelCleanup
        }
        _ => Action::Tick,
    }
}

fn handle_key_main(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,

        // Pipeline
        KeyCode::Char('s') => Action::Scan,
        KeyCode::Char('c') => Action::Clean,

        // Log
        KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,

        // Help
        KeyCode::Char('?') => Action::ShowHelp,

        _ => Action::Tick,
    }
}
