use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::io::appearance::SystemAppearance;
use crate::io::ids::IdProvider;
use crate::io::storage::KeyValueStore;
use crate::tui::app::{App, Mode};
use crate::tui::screen::Hit;

/// Handle a mouse event against the hit areas of the last draw
pub fn handle_mouse<S, I, A>(app: &mut App<S, I, A>, mouse: MouseEvent)
where
    S: KeyValueStore + Clone,
    I: IdProvider,
    A: SystemAppearance,
{
    let hit = app.hits.hit(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.mode == Mode::Move {
                app.cancel_move();
            }
            if app.mode == Mode::Edit && hit != Hit::Input {
                app.mode = Mode::Navigate;
            }
            click(app, hit);
        }
        MouseEventKind::Drag(MouseButton::Left) => app.pointer_over(task_row(hit)),
        MouseEventKind::Up(MouseButton::Left) => app.pointer_up(task_row(hit)),
        MouseEventKind::ScrollDown => {
            if app.cursor + 1 < app.view.displayed().len() {
                app.cursor += 1;
            }
        }
        MouseEventKind::ScrollUp => app.cursor = app.cursor.saturating_sub(1),
        _ => {}
    }
}

fn click<S, I, A>(app: &mut App<S, I, A>, hit: Hit)
where
    S: KeyValueStore + Clone,
    I: IdProvider,
    A: SystemAppearance,
{
    match hit {
        Hit::Checkbox(row) => {
            app.cursor = row;
            app.toggle_row(row);
        }
        Hit::Delete(row) => app.remove_row(row),
        // Drag start; a release without moving toggles
        Hit::Row(row) => app.pointer_down(row),
        Hit::Filter(filter) => app.set_filter(filter),
        Hit::ClearCompleted => app.clear_completed(),
        Hit::ThemeToggle => app.cycle_theme(),
        Hit::Input => {
            app.mode = Mode::Edit;
            app.input_cursor = app.input.len();
        }
        Hit::ListBlank | Hit::Nothing => {}
    }
}

/// The task row under the pointer, if any
fn task_row(hit: Hit) -> Option<usize> {
    match hit {
        Hit::Checkbox(row) | Hit::Delete(row) | Hit::Row(row) => Some(row),
        _ => None,
    }
}
