use crate::app::{App, Mode};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: usize = 10;

/// Poll the terminal for one key press. Returns true when the app should quit.
pub fn handle_events(app: &mut App) -> Result<bool> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            // Ignore release/repeat events (reported on Windows)
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }
            return Ok(handle_key_event(app, key));
        }
    }
    Ok(false)
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Filter => {
            handle_filter_input(app, key);
            false
        }
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                app.exit_mode();
            }
            false
        }
        Mode::Error => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                app.exit_mode();
            } else if key.code == KeyCode::Char('R') {
                app.exit_mode();
                app.reload();
            }
            false
        }
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,

        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home => app.go_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.go_to_bottom(),

        KeyCode::PageUp => app.page_up(PAGE_SIZE),
        KeyCode::PageDown => app.page_down(PAGE_SIZE),
        KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_up(PAGE_SIZE)
        }
        KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_down(PAGE_SIZE)
        }

        KeyCode::Char(' ') => app.toggle_selection(),
        KeyCode::Char('R') => app.reload(),
        KeyCode::Char('/') => app.start_filter(),
        KeyCode::Char('?') => app.enter_help_mode(),

        KeyCode::Esc => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            } else {
                app.selected_rows.clear();
            }
        }

        // 'gg' jumps to the top
        KeyCode::Char('g') => {
            let double = app.last_key_press.is_some_and(|(last, at)| {
                last == KeyCode::Char('g') && at.elapsed() < Duration::from_millis(250)
            });
            if double {
                app.go_to_top();
                app.last_key_press = None;
            } else {
                app.last_key_press = Some((KeyCode::Char('g'), Instant::now()));
            }
            return false;
        }
        _ => {}
    }
    app.last_key_press = None;
    false
}

fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Enter => app.exit_mode(),
        KeyCode::Backspace => {
            app.filter_text.pop();
            app.apply_filter();
        }
        KeyCode::Char(c) => {
            app.filter_text.push(c);
            app.apply_filter();
        }
        _ => {}
    }
}
