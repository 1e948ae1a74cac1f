use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::appearance::SystemAppearance;
use crate::io::ids::IdProvider;
use crate::io::storage::KeyValueStore;
use crate::tui::app::{App, Mode};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary, word_start_before};

pub(super) fn handle_edit<S, I, A>(app: &mut App<S, I, A>, key: KeyEvent)
where
    S: KeyValueStore + Clone,
    I: IdProvider,
    A: SystemAppearance,
{
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        // Stay in the input box so several tasks can be typed in a row
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.mode = Mode::Navigate,

        KeyCode::Backspace if ctrl || alt => delete_word_before(app),
        KeyCode::Char('w') if ctrl => delete_word_before(app),
        KeyCode::Char('u') if ctrl => {
            app.input.drain(..app.input_cursor);
            app.input_cursor = 0;
        }
        KeyCode::Backspace => {
            if let Some(start) = prev_grapheme_boundary(&app.input, app.input_cursor) {
                app.input.drain(start..app.input_cursor);
                app.input_cursor = start;
            }
        }
        KeyCode::Delete => {
            if let Some(end) = next_grapheme_boundary(&app.input, app.input_cursor) {
                app.input.drain(app.input_cursor..end);
            }
        }

        KeyCode::Left => {
            if let Some(pos) = prev_grapheme_boundary(&app.input, app.input_cursor) {
                app.input_cursor = pos;
            }
        }
        KeyCode::Right => {
            if let Some(pos) = next_grapheme_boundary(&app.input, app.input_cursor) {
                app.input_cursor = pos;
            }
        }
        KeyCode::Home => app.input_cursor = 0,
        KeyCode::Char('a') if ctrl => app.input_cursor = 0,
        KeyCode::End => app.input_cursor = app.input.len(),
        KeyCode::Char('e') if ctrl => app.input_cursor = app.input.len(),

        KeyCode::Char(c) if !ctrl => {
            app.input.insert(app.input_cursor, c);
            app.input_cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn delete_word_before<S, I, A>(app: &mut App<S, I, A>) {
    let start = word_start_before(&app.input, app.input_cursor);
    app.input.drain(start..app.input_cursor);
    app.input_cursor = start;
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    use crate::tui::app::Mode;
    use crate::tui::input::handle_key;
    use crate::tui::input::testing::*;
    use crate::tui::render::test_helpers::*;

    fn editing(text: &str) -> TestApp {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, text);
        app
    }

    #[test]
    fn type_and_submit_several_tasks() {
        let mut app = editing("Buy milk");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Walk dog");
        press(&mut app, KeyCode::Enter);
        assert_eq!(contents(&app), vec!["Buy milk", "Walk dog"]);
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.input, "");
    }

    #[test]
    fn blank_submission_is_ignored() {
        let mut app = editing("   ");
        press(&mut app, KeyCode::Enter);
        assert!(app.store.is_empty());
    }

    #[test]
    fn escape_keeps_draft() {
        let mut app = editing("draft");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.input, "draft");
        assert!(app.store.is_empty());
    }

    #[test]
    fn typed_letters_are_not_commands() {
        let mut app = editing("quit");
        assert!(!app.should_quit);
        assert_eq!(app.input, "quit");
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut app = editing("cafe\u{0301}");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "caf");
        assert_eq!(app.input_cursor, 3);
    }

    #[test]
    fn cursor_movement_and_insert() {
        let mut app = editing("Buy mlk");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        type_text(&mut app, "i");
        assert_eq!(app.input, "Buy milk");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.input, "uy milk");
        press(&mut app, KeyCode::End);
        assert_eq!(app.input_cursor, app.input.len());
    }

    #[test]
    fn word_and_line_deletion() {
        let mut app = editing("walk the dog");
        press_ctrl(&mut app, 'w');
        assert_eq!(app.input, "walk the ");
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT),
        );
        assert_eq!(app.input, "walk ");
        press_ctrl(&mut app, 'u');
        assert_eq!(app.input, "");
    }
}
