use crossterm::event::{KeyCode, KeyEvent};

use crate::io::appearance::SystemAppearance;
use crate::io::ids::IdProvider;
use crate::io::storage::KeyValueStore;
use crate::model::task::TaskFilter;
use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate<S, I, A>(app: &mut App<S, I, A>, key: KeyEvent)
where
    S: KeyValueStore + Clone,
    I: IdProvider,
    A: SystemAppearance,
{
    let len = app.view.displayed().len();
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => app.status = None,

        // Input box
        KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Char('n') => {
            app.mode = Mode::Edit;
            app.input_cursor = app.input.len();
        }

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => {
            if app.cursor + 1 < len {
                app.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.cursor = len.saturating_sub(1),

        // Task actions
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => app.toggle_row(app.cursor),
        KeyCode::Char('d') | KeyCode::Delete => app.remove_row(app.cursor),
        KeyCode::Char('c') => app.clear_completed(),
        KeyCode::Char('J') => app.shift_cursor_task(1),
        KeyCode::Char('K') => app.shift_cursor_task(-1),
        KeyCode::Char('m') => app.start_move(),

        // Filters and theme
        KeyCode::Char('1') => app.set_filter(TaskFilter::All),
        KeyCode::Char('2') => app.set_filter(TaskFilter::Active),
        KeyCode::Char('3') => app.set_filter(TaskFilter::Completed),
        KeyCode::Char('f') | KeyCode::Tab => app.cycle_filter(),
        KeyCode::Char('t') => app.cycle_theme(),

        _ => {}
    }
}
