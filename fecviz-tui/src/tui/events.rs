use crate::tui::app::{App, Focus, View};
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.cycle_focus();
            return;
        }
        KeyCode::Char('?') => {
            app.view = if app.view == View::Help { View::Histogram } else { View::Help };
            return;
        }
        KeyCode::Esc => {
            app.view = View::Histogram;
            return;
        }
        KeyCode::Char('s') => {
            app.cycle_state(true);
            return;
        }
        KeyCode::Char('S') => {
            app.cycle_state(false);
            return;
        }
        KeyCode::Char('a') => {
            app.show_all();
            return;
        }
        KeyCode::Char('c') => {
            app.cycle_color();
            return;
        }
        KeyCode::Char('e') => {
            app.export_svg();
            return;
        }
        _ => {}
    }
    if app.focus == Focus::Sidebar {
        handle_sidebar(app, key);
    }
}

fn handle_sidebar(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.sidebar_down(),
        KeyCode::Char('k') | KeyCode::Up => app.sidebar_up(),
        KeyCode::Enter => app.select_sidebar(),
        _ => {}
    }
}
