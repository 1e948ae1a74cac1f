use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Mode};
use crate::tui::palette::Palette;
use crate::util::unicode::{display_col, display_width};

const PLACEHOLDER: &str = "Create a new todo\u{2026}";
/// " ( ) " in front of the text, matching the task rows
const PREFIX_WIDTH: u16 = 5;

/// Render the new-task input. Shows the terminal cursor while editing.
pub fn render_input_box<S, I, A>(
    frame: &mut Frame,
    app: &mut App<S, I, A>,
    palette: &Palette,
    area: Rect,
) {
    let editing = app.mode == Mode::Edit;
    let border = if editing {
        palette.accent
    } else {
        palette.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(palette.background))
        .style(Style::default().bg(palette.surface));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width <= PREFIX_WIDTH {
        return;
    }
    app.hits.input = Some(inner);

    let text_width = (inner.width - PREFIX_WIDTH) as usize;
    let bg = palette.surface;
    let mut spans = vec![Span::styled(
        " ( ) ",
        Style::default().fg(palette.border).bg(bg),
    )];

    // Horizontal scroll so the cursor stays inside the box
    let cursor_col = display_col(&app.input, app.input_cursor);
    let skip = cursor_col.saturating_sub(text_width.saturating_sub(1));

    if app.input.is_empty() && !editing {
        spans.push(Span::styled(
            PLACEHOLDER,
            Style::default()
                .fg(palette.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        spans.push(Span::styled(
            visible_slice(&app.input, skip, text_width),
            Style::default().fg(palette.text_bright).bg(bg),
        ));
    }

    let line_area = Rect::new(inner.x, inner.y, inner.width, 1);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        line_area,
    );

    if editing {
        let x = inner.x + PREFIX_WIDTH + (cursor_col - skip) as u16;
        frame.set_cursor_position((x.min(inner.x + inner.width - 1), inner.y));
    }
}

/// The part of `s` that starts `skip` cells in and fits in `width` cells
fn visible_slice(s: &str, skip: usize, width: usize) -> String {
    let mut col = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = display_width(c.encode_utf8(&mut [0; 4]));
        if col >= skip {
            if col + w - skip > width {
                break;
            }
            out.push(c);
        }
        col += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn placeholder_when_idle() {
        let mut app = app_with(&[]);
        let palette = app.palette().clone();
        let output = render_to_string(40, 3, |frame, area| {
            render_input_box(frame, &mut app, &palette, area);
        });
        assert!(output.contains("( ) Create a new todo"));
        assert_eq!(app.hits.input, Some(Rect::new(1, 1, 38, 1)));
    }

    #[test]
    fn shows_typed_text_while_editing() {
        let mut app = app_with(&[]);
        app.mode = Mode::Edit;
        app.input = "Buy milk".into();
        app.input_cursor = app.input.len();
        let palette = app.palette().clone();
        let output = render_to_string(40, 3, |frame, area| {
            render_input_box(frame, &mut app, &palette, area);
        });
        assert!(output.contains("( ) Buy milk"));
        assert!(!output.contains("Create a new todo"));
    }

    #[test]
    fn long_input_scrolls_to_cursor() {
        assert_eq!(visible_slice("abcdefgh", 0, 4), "abcd");
        assert_eq!(visible_slice("abcdefgh", 5, 4), "fgh");
        assert_eq!(visible_slice("牛奶牛奶", 2, 4), "奶牛");
    }
}
