use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::task::TaskFilter;
use crate::tui::app::{App, Mode};
use crate::tui::palette::Palette;
use crate::tui::screen::{CHECKBOX_WIDTH, DELETE_WIDTH, Screen};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the task rows inside the list card
pub fn render_task_list<S, I, A>(
    frame: &mut Frame,
    app: &mut App<S, I, A>,
    palette: &Palette,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border).bg(palette.background))
        .style(Style::default().bg(palette.surface));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width <= CHECKBOX_WIDTH + DELETE_WIDTH {
        return;
    }

    let screen = app.view.target();
    let len = screen.items.len();
    app.hits.list = Some(inner);
    app.hits.list_rows = len;

    if len == 0 {
        let message = empty_message(screen);
        let y = inner.y + inner.height / 2;
        frame.render_widget(
            Paragraph::new(Span::styled(
                message,
                Style::default().fg(palette.dim).bg(palette.surface),
            ))
            .alignment(Alignment::Center),
            Rect::new(inner.x, y, inner.width, 1),
        );
        app.scroll_offset = 0;
        return;
    }

    // Keep the focused row visible
    let height = inner.height as usize;
    let focus = match app.mode {
        Mode::Move => app.move_row.unwrap_or(app.cursor),
        _ => app.cursor,
    }
    .min(len - 1);
    if focus < app.scroll_offset {
        app.scroll_offset = focus;
    } else if focus >= app.scroll_offset + height {
        app.scroll_offset = focus + 1 - height;
    }
    app.scroll_offset = app.scroll_offset.min(len.saturating_sub(height));
    app.hits.list_scroll = app.scroll_offset;

    let screen = app.view.target();
    let show_cursor = app.mode != Mode::Edit;
    let lines: Vec<Line> = screen
        .items
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .map(|(row, item)| {
            let is_cursor = show_cursor && row == app.cursor;
            let is_drop = screen.drop_target == Some(row);
            let is_collapsed = screen.collapsed == Some(row);
            let bg = if is_cursor || is_drop {
                palette.selection_bg
            } else {
                palette.surface
            };

            let marker = if is_drop {
                Span::styled("\u{25B6}", Style::default().fg(palette.accent_alt).bg(bg))
            } else if is_cursor {
                Span::styled("\u{258E}", Style::default().fg(palette.accent).bg(bg))
            } else {
                Span::styled(" ", Style::default().bg(bg))
            };
            let checkbox = if item.checked {
                Span::styled("(\u{2713}) ", Style::default().fg(palette.accent).bg(bg))
            } else {
                Span::styled("( ) ", Style::default().fg(palette.border).bg(bg))
            };

            let text_width = (inner.width - CHECKBOX_WIDTH - DELETE_WIDTH) as usize;
            let text = truncate_to_width(&item.content, text_width);
            let pad = text_width.saturating_sub(display_width(&text));
            let mut text_style = Style::default().fg(palette.text).bg(bg);
            if item.checked {
                text_style = text_style
                    .fg(palette.dim)
                    .add_modifier(Modifier::CROSSED_OUT);
            }
            if is_collapsed {
                text_style = text_style.fg(palette.dim).add_modifier(Modifier::ITALIC);
            }

            let delete_fg = if is_cursor {
                palette.danger
            } else {
                palette.border
            };

            Line::from(vec![
                marker,
                checkbox,
                Span::styled(text, text_style),
                Span::styled(" ".repeat(pad), Style::default().bg(bg)),
                Span::styled(" \u{2715} ", Style::default().fg(delete_fg).bg(bg)),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(palette.surface)),
        inner,
    );
}

fn empty_message(screen: &Screen) -> &'static str {
    if screen.aggregate.is_empty() {
        return "Nothing to do. Press a to add a task.";
    }
    match screen.aggregate.filter {
        TaskFilter::All => "No tasks",
        TaskFilter::Active => "No active tasks. All done!",
        TaskFilter::Completed => "No completed tasks yet",
    }
}
