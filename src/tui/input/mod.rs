mod edit;
mod mouse;
mod move_mode;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::appearance::SystemAppearance;
use crate::io::ids::IdProvider;
use crate::io::storage::KeyValueStore;

use super::app::{App, Mode};

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key<S, I, A>(app: &mut App<S, I, A>, key: KeyEvent)
where
    S: KeyValueStore + Clone,
    I: IdProvider,
    A: SystemAppearance,
{
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key),
        Mode::Edit => edit::handle_edit(app, key),
        Mode::Move => move_mode::handle_move(app, key),
    }
}

/// Handle a bracketed paste. Only the input box accepts text; newlines
/// become spaces.
pub fn handle_paste<S, I, A>(app: &mut App<S, I, A>, text: &str) {
    if app.mode != Mode::Edit || text.is_empty() {
        return;
    }
    let clean = text.replace('\n', " ").replace('\r', "");
    app.input.insert_str(app.input_cursor, &clean);
    app.input_cursor += clean.len();
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut app = app_with(&["a"]);
        app.mode = Mode::Edit;
        press_ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn paste_inserts_at_cursor_in_edit_mode() {
        let mut app = app_with(&[]);
        handle_paste(&mut app, "ignored");
        assert_eq!(app.input, "");

        app.mode = Mode::Edit;
        app.input = "Buy ".into();
        app.input_cursor = 4;
        handle_paste(&mut app, "milk\r\nand eggs");
        assert_eq!(app.input, "Buy milk and eggs");
        assert_eq!(app.input_cursor, app.input.len());
    }
}
