use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::tui::palette::Palette;
use crate::util::unicode::{display_width, truncate_to_width};

const NAVIGATE_HINT: &str = "a add  space toggle  d delete  f filter  m move  t theme  q quit";
const EDIT_HINT: &str = "Enter add  Esc done";
const MOVE_HINT: &str = "j/k choose place  Enter drop  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row<S, I, A>(
    frame: &mut Frame,
    app: &App<S, I, A>,
    palette: &Palette,
    area: Rect,
) {
    let bg = palette.background;
    let width = area.width as usize;
    let dim = Style::default().fg(palette.dim).bg(bg);

    let (left, hint) = match (&app.status, app.mode) {
        (Some(status), _) => {
            let fg = if status.is_error {
                palette.danger
            } else {
                palette.accent
            };
            (
                Span::styled(
                    format!(" {}", status.text),
                    Style::default().fg(fg).bg(bg),
                ),
                None,
            )
        }
        (None, Mode::Edit) => (Span::styled(" new task", dim), Some(EDIT_HINT)),
        (None, Mode::Move) => (
            Span::styled(" moving", Style::default().fg(palette.accent_alt).bg(bg)),
            Some(MOVE_HINT),
        ),
        (None, Mode::Navigate) => {
            let reorder = if app.view.target().aggregate.is_empty() {
                ""
            } else {
                " Drag and drop to reorder list"
            };
            (
                Span::styled(reorder, dim),
                app.show_key_hints.then_some(NAVIGATE_HINT),
            )
        }
    };

    let left = Span::styled(
        truncate_to_width(&left.content, width),
        left.style,
    );
    let mut spans = vec![left];
    if let Some(hint) = hint {
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint) + 1;
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(format!("{} ", hint), dim));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
