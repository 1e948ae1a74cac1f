use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::theme::{Appearance, ThemePreference};
use crate::tui::app::App;
use crate::tui::palette::Palette;
use crate::util::unicode::display_width;

const TITLE: &str = "T O D O";

/// Glyph for the theme toggle: the appearance a click switches to
fn toggle_glyph(appearance: Appearance) -> &'static str {
    match appearance {
        Appearance::Dark => "\u{2600}",  // ☀
        Appearance::Light => "\u{263E}", // ☾
    }
}

/// Render the title line with the theme toggle at the right edge
pub fn render_header<S, I, A>(
    frame: &mut Frame,
    app: &mut App<S, I, A>,
    palette: &Palette,
    (appearance, preference): (Appearance, ThemePreference),
    area: Rect,
) {
    if area.height == 0 || area.width < 4 {
        return;
    }
    let bg = palette.background;
    let width = area.width as usize;

    let mut spans = vec![Span::styled(
        format!(" {}", TITLE),
        Style::default()
            .fg(palette.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];

    // Right side: optional "auto" tag then the glyph cell
    let tag = if preference == ThemePreference::Auto {
        "auto "
    } else {
        ""
    };
    let glyph = format!(" {} ", toggle_glyph(appearance));
    let left_width = 1 + display_width(TITLE);
    let right_width = display_width(tag) + display_width(&glyph);

    if left_width + right_width < width {
        let padding = width - left_width - right_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(tag, Style::default().fg(palette.dim).bg(bg)));
        spans.push(Span::styled(
            glyph.clone(),
            Style::default().fg(palette.text_bright).bg(bg),
        ));
        let glyph_width = display_width(&glyph) as u16;
        app.hits.theme_toggle = Some(Rect::new(
            area.x + area.width - glyph_width,
            area.y,
            glyph_width,
            1,
        ));
    }

    let line_area = Rect::new(area.x, area.y, area.width, 1);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        line_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn title_and_glyph() {
        let mut app = app_with(&[]);
        let palette = app.palette().clone();
        let output = render_to_string(40, 2, |frame, area| {
            render_header(
                frame,
                &mut app,
                &palette,
                (Appearance::Dark, ThemePreference::Auto),
                area,
            );
        });
        let first = output.lines().next().unwrap();
        assert!(first.starts_with(" T O D O"));
        assert!(first.ends_with("auto  \u{2600}"));
        assert_eq!(app.hits.theme_toggle, Some(Rect::new(37, 0, 3, 1)));
    }

    #[test]
    fn explicit_light_shows_moon_without_tag() {
        let mut app = app_with(&[]);
        let palette = app.palette().clone();
        let output = render_to_string(40, 2, |frame, area| {
            render_header(
                frame,
                &mut app,
                &palette,
                (Appearance::Light, ThemePreference::Light),
                area,
            );
        });
        assert!(output.contains("\u{263E}"));
        assert!(!output.contains("auto"));
    }
}
