use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::task::TaskFilter;
use crate::tui::app::App;
use crate::tui::palette::Palette;
use crate::util::unicode::display_width;

const CLEAR_LABEL: &str = "Clear Completed";
const FILTER_GAP: usize = 2;

/// Render the counter, the filter tabs and the clear-completed action
pub fn render_footer<S, I, A>(
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
    if inner.height == 0 {
        return;
    }

    let bg = palette.surface;
    let aggregate = app.view.target().aggregate;
    let width = inner.width as usize;

    let counter = format!(" {}", aggregate.items_left_label());
    let filters_width: usize = TaskFilter::ALL
        .iter()
        .map(|f| display_width(f.label()))
        .sum::<usize>()
        + FILTER_GAP * (TaskFilter::ALL.len() - 1);
    let clear = format!("{} ", CLEAR_LABEL);

    // Drop the clear action, then the counter, when the card is too narrow
    let mut show_clear = true;
    let mut show_counter = true;
    let fixed = |counter_on: bool, clear_on: bool| {
        filters_width
            + if counter_on { display_width(&counter) } else { 0 }
            + if clear_on { display_width(&clear) } else { 0 }
    };
    if fixed(true, true) + 2 > width {
        show_clear = false;
    }
    if fixed(true, false) + 1 > width {
        show_counter = false;
    }
    let spare = width.saturating_sub(fixed(show_counter, show_clear));
    let (pad_left, pad_right) = if show_clear {
        (spare / 2, spare - spare / 2)
    } else {
        (spare / 2, 0)
    };

    let mut spans = Vec::new();
    let mut x = inner.x;
    let mut advance = |spans: &mut Vec<Span<'static>>, text: String, style: Style| -> Rect {
        let w = display_width(&text) as u16;
        let rect = Rect::new(x, inner.y, w, 1);
        x += w;
        spans.push(Span::styled(text, style));
        rect
    };

    let dim = Style::default().fg(palette.dim).bg(bg);
    if show_counter {
        advance(&mut spans, counter.clone(), dim);
    }
    advance(&mut spans, " ".repeat(pad_left), dim);
    for (i, filter) in TaskFilter::ALL.iter().enumerate() {
        if i > 0 {
            advance(&mut spans, " ".repeat(FILTER_GAP), dim);
        }
        let style = if *filter == aggregate.filter {
            Style::default()
                .fg(palette.accent)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            dim
        };
        let rect = advance(&mut spans, filter.label().to_string(), style);
        app.hits.filters.push((rect, *filter));
    }
    if show_clear {
        advance(&mut spans, " ".repeat(pad_right), dim);
        let rect = advance(&mut spans, CLEAR_LABEL.to_string(), dim);
        app.hits.clear_completed = Some(rect);
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );
}
