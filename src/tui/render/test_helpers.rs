use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::appearance::FixedAppearance;
use crate::io::ids::SequentialIds;
use crate::io::storage::MemoryStore;
use crate::model::theme::Appearance;
use crate::model::{AppConfig, StorageConfig};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

pub type TestApp = App<MemoryStore, SequentialIds, FixedAppearance>;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Draw the whole app
pub fn render_app(app: &mut TestApp, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| crate::tui::render::render(frame, app))
}

/// App over `storage` with no samples, a dark system appearance and the
/// given tasks added in order. The cursor starts on the first row.
pub fn test_app(storage: MemoryStore, contents: &[&str]) -> TestApp {
    let config = AppConfig {
        storage: StorageConfig {
            seed_samples: false,
        },
        ..AppConfig::default()
    };
    let mut app = App::new(
        storage,
        SequentialIds::default(),
        FixedAppearance(Appearance::Dark),
        &config,
        None,
    );
    for content in contents {
        app.input = content.to_string();
        app.submit_input();
    }
    app.cursor = 0;
    app
}

pub fn app_with(contents: &[&str]) -> TestApp {
    test_app(MemoryStore::new(), contents)
}

/// Contents of the displayed rows, top to bottom
pub fn contents(app: &TestApp) -> Vec<&str> {
    app.view
        .target()
        .items
        .iter()
        .map(|item| item.content.as_str())
        .collect()
}
