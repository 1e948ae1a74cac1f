use crossterm::event::{KeyCode, KeyEvent};

use crate::io::appearance::SystemAppearance;
use crate::io::ids::IdProvider;
use crate::io::storage::KeyValueStore;
use crate::tui::app::App;

/// Keyboard drag. The picked-up row stays collapsed while j/k walk the drop
/// marker; Enter drops, Esc puts it back.
pub(super) fn handle_move<S, I, A>(app: &mut App<S, I, A>, key: KeyEvent)
where
    S: KeyValueStore + Clone,
    I: IdProvider,
    A: SystemAppearance,
{
    let len = app.view.displayed().len() as isize;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_pointer(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_pointer(-1),
        KeyCode::Char('g') | KeyCode::Home => app.move_pointer(-len),
        KeyCode::Char('G') | KeyCode::End => app.move_pointer(len),
        KeyCode::Enter | KeyCode::Char('m') | KeyCode::Char(' ') => app.finish_move(),
        KeyCode::Esc | KeyCode::Char('q') => app.cancel_move(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    use crate::io::storage::MemoryStore;
    use crate::model::task::TaskFilter;
    use crate::tui::app::Mode;
    use crate::tui::input::testing::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn move_down_and_drop() {
        let mut app = app_with(&["a", "b", "c", "d"]);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.mode, Mode::Move);
        assert_eq!(app.view.target().collapsed, Some(0));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(contents(&app), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn jump_to_end() {
        let mut app = app_with(&["a", "b", "c"]);
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(contents(&app), vec!["b", "c", "a"]);
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn escape_cancels_without_writing() {
        let storage = MemoryStore::new();
        let mut app = test_app(storage.clone(), &["a", "b", "c"]);
        let writes = storage.write_count();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(contents(&app), vec!["a", "b", "c"]);
        assert_eq!(storage.write_count(), writes);
        assert_eq!(app.view.target().drop_target, None);
    }

    #[test]
    fn drop_in_place_writes_nothing() {
        let storage = MemoryStore::new();
        let mut app = test_app(storage.clone(), &["a", "b"]);
        let writes = storage.write_count();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(contents(&app), vec!["a", "b"]);
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn move_under_filter_uses_full_list_positions() {
        let mut app = app_with(&["a", "b", "c", "d", "e"]);
        // check b and d
        app.toggle_row(1);
        app.toggle_row(3);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.view.filter(), TaskFilter::Active);
        assert_eq!(contents(&app), vec!["a", "c", "e"]);

        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Enter);

        let all: Vec<&str> = app.store.tasks().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(all, vec!["a", "b", "e", "c", "d"]);
        assert_eq!(contents(&app), vec!["a", "e", "c"]);
        assert_eq!(app.cursor, 1);
    }
}
