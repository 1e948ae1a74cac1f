pub mod footer;
pub mod header;
pub mod input_box;
pub mod status_row;
pub mod task_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::io::appearance::SystemAppearance;
use crate::io::ids::IdProvider;
use crate::io::storage::KeyValueStore;
use crate::tui::screen::HitAreas;

use super::app::App;

/// The card never grows wider than this
const CARD_MAX_WIDTH: u16 = 64;

/// Draw the whole screen and record clickable regions
pub fn render<S, I, A>(frame: &mut Frame, app: &mut App<S, I, A>)
where
    S: KeyValueStore + Clone,
    I: IdProvider,
    A: SystemAppearance,
{
    let area = frame.area();
    let palette = app.palette().clone();
    let appearance = app.theme.effective_appearance();
    let preference = app.theme.get_theme();

    // Background fill
    let bg_style = Style::default().bg(palette.background);
    frame.render_widget(Block::default().style(bg_style), area);

    app.hits = HitAreas::default();

    // Layout: card column | status row (1 row)
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let empty = app.view.target().aggregate.is_empty();
    let card = centered_column(rows[0], CARD_MAX_WIDTH);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                         // title + theme toggle
            Constraint::Length(3),                         // new task input
            Constraint::Min(3),                            // task list
            Constraint::Length(if empty { 0 } else { 3 }), // footer
        ])
        .split(card);

    header::render_header(frame, app, &palette, (appearance, preference), chunks[0]);
    input_box::render_input_box(frame, app, &palette, chunks[1]);
    task_list::render_task_list(frame, app, &palette, chunks[2]);
    if !empty {
        footer::render_footer(frame, app, &palette, chunks[3]);
    }

    status_row::render_status_row(frame, app, &palette, rows[1]);
}

/// Horizontally centered column at most `max_width` wide
fn centered_column(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, area.y, width, area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskFilter;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn full_screen_layout() {
        let mut app = app_with(&["Buy milk", "Walk dog"]);
        let output = render_app(&mut app, TERM_W, TERM_H);
        assert!(output.contains("T O D O"));
        assert!(output.contains("Create a new todo"));
        assert!(output.contains("Buy milk"));
        assert!(output.contains("Walk dog"));
        assert!(output.contains("2 items left"));
        assert!(output.contains("Clear Completed"));
        assert!(output.contains("Drag and drop to reorder list"));
    }

    #[test]
    fn empty_collection_hides_footer() {
        let mut app = app_with(&[]);
        let output = render_app(&mut app, TERM_W, TERM_H);
        assert!(!output.contains("items left"));
        assert!(!output.contains("Completed"));
        assert!(!output.contains("Drag and drop"));
        assert!(output.contains("Nothing to do"));
    }

    #[test]
    fn records_hit_areas() {
        let mut app = app_with(&["a", "b"]);
        render_app(&mut app, TERM_W, TERM_H);
        assert!(app.hits.theme_toggle.is_some());
        assert!(app.hits.input.is_some());
        assert_eq!(app.hits.list_rows, 2);
        assert_eq!(app.hits.filters.len(), 3);
        assert!(app.hits.clear_completed.is_some());

        // the first list line is task 0
        let list = app.hits.list.unwrap();
        assert_eq!(app.hits.row_at_y(list.y), Some(0));
    }

    #[test]
    fn filter_is_reflected() {
        let mut app = app_with(&["a", "b"]);
        app.toggle_row(0);
        app.set_filter(TaskFilter::Completed);
        let output = render_app(&mut app, TERM_W, TERM_H);
        assert!(output.contains("1 item left"));
        assert!(output.contains("(\u{2713}) a"));
        assert!(!output.contains(") b"));
    }

    #[test]
    fn centered_column_clamps_width() {
        let area = Rect::new(0, 0, 100, 10);
        assert_eq!(centered_column(area, 64), Rect::new(18, 0, 64, 10));
        let narrow = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_column(narrow, 64), narrow);
    }
}
