use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{error, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::appearance::{SystemAppearance, TerminalAppearance};
use crate::io::ids::{IdProvider, UuidIds};
use crate::io::recovery::{RecoveryEntry, log_recovery};
use crate::io::storage::{FileStore, KeyValueStore, StorageError, TASKS_KEY, THEME_KEY};
use crate::model::AppConfig;
use crate::model::task::TaskFilter;
use crate::ops::task_store::{LoadSource, StoreError, TaskStore};
use crate::view::{DropOutcome, ThemeController, ViewSynchronizer};

use super::input;
use super::palette::{Palette, Palettes};
use super::render;
use super::screen::{HitAreas, Screen};

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the input box
    Edit,
    /// Keyboard drag: the cursor row is picked up and follows j/k
    Move,
}

/// Transient message shown in the status row
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub at: Instant,
}

/// A mouse drag in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDrag {
    /// Row the pointer was last over
    pub last_row: Option<usize>,
    /// Whether the pointer ever left the source row
    pub moved: bool,
}

const STATUS_TTL: Duration = Duration::from_secs(4);

/// Main application state
pub struct App<S, I, A> {
    pub store: TaskStore<S, I>,
    pub view: ViewSynchronizer<Screen>,
    pub theme: ThemeController<S, A>,
    pub palettes: Palettes,
    pub mode: Mode,
    pub should_quit: bool,
    /// Cursor index into the displayed rows
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    /// New task text being typed
    pub input: String,
    /// Byte offset into `input`
    pub input_cursor: usize,
    /// Pointer row while in Move mode
    pub move_row: Option<usize>,
    pub pointer: Option<PointerDrag>,
    pub status: Option<StatusMessage>,
    pub show_key_hints: bool,
    /// Clickable regions from the last draw
    pub hits: HitAreas,
    /// Where unusable data is written; `None` keeps it in the log only
    pub recovery_dir: Option<PathBuf>,
}

/// The app as run against the real terminal
pub type TerminalApp = App<FileStore, UuidIds, TerminalAppearance>;

impl<S, I, A> App<S, I, A>
where
    S: KeyValueStore + Clone,
    I: IdProvider,
    A: SystemAppearance,
{
    pub fn new(
        storage: S,
        ids: I,
        system: A,
        config: &AppConfig,
        recovery_dir: Option<PathBuf>,
    ) -> Self {
        let theme = ThemeController::load(storage.clone(), system);
        let mut store =
            TaskStore::new(storage, ids).with_seed_samples(config.storage.seed_samples);
        store.load();

        let mut view = ViewSynchronizer::new(Screen::default());
        view.refresh(&store);
        view.apply_theme(&theme);

        let mut app = App {
            store,
            view,
            theme,
            palettes: Palettes::from_config(&config.ui),
            mode: Mode::Navigate,
            should_quit: false,
            cursor: 0,
            scroll_offset: 0,
            input: String::new(),
            input_cursor: 0,
            move_row: None,
            pointer: None,
            status: None,
            show_key_hints: config.ui.show_key_hints,
            hits: HitAreas::default(),
            recovery_dir,
        };

        if let LoadSource::Recovered { raw, error } = app.store.load_source().clone() {
            if let Some(dir) = &app.recovery_dir {
                log_recovery(dir, RecoveryEntry::malformed(TASKS_KEY, &error, &raw));
            }
            app.flash_error("saved tasks were unreadable and have been reset (see: tick recovery)");
        }
        app
    }

    /// Palette for the appearance currently shown
    pub fn palette(&self) -> &Palette {
        self.palettes
            .for_appearance(self.theme.effective_appearance())
    }

    pub fn flash(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            at: Instant::now(),
        });
    }

    pub fn flash_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
            at: Instant::now(),
        });
    }

    /// Drop the status message once it has been shown long enough
    pub fn expire_status(&mut self) {
        if let Some(status) = &self.status
            && status.at.elapsed() >= STATUS_TTL
        {
            self.status = None;
        }
    }

    pub fn cursor_task_id(&self) -> Option<String> {
        self.view.task_id_at(self.cursor).map(str::to_string)
    }

    /// Keep the cursor on a displayed row
    pub fn clamp_cursor(&mut self) {
        let len = self.view.displayed().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    fn report_store_error(&mut self, action: &str, err: StoreError) {
        error!(
            "event=store_write module=tui action={} status=error error={}",
            action, err
        );
        if let StoreError::Storage(_) = err
            && let Some(dir) = &self.recovery_dir
        {
            let value = self.store.to_json().unwrap_or_default();
            log_recovery(
                dir,
                RecoveryEntry::failed_write(TASKS_KEY, &err.to_string(), &value),
            );
        }
        self.flash_error(format!("{}: {}", action, err));
    }

    fn report_theme_error(&mut self, err: StorageError) {
        error!("event=theme_write module=tui status=error error={}", err);
        if let Some(dir) = &self.recovery_dir {
            let value = self.theme.get_theme().to_string();
            log_recovery(
                dir,
                RecoveryEntry::failed_write(THEME_KEY, &err.to_string(), &value),
            );
        }
        self.flash_error(format!("theme: {}", err));
    }

    // -----------------------------------------------------------------------
    // Task actions
    // -----------------------------------------------------------------------

    /// Add the input text as a new task. Blank input is ignored.
    pub fn submit_input(&mut self) {
        let content = std::mem::take(&mut self.input);
        self.input_cursor = 0;
        match self.store.add(&content) {
            Ok(Some(task)) => {
                self.view.task_added(&task, self.store.tasks());
                if let Some(row) = self.view.row_of(&task.id) {
                    self.cursor = row;
                }
            }
            Ok(None) => {}
            Err(e) => {
                self.view.refresh(&self.store);
                self.report_store_error("add", e);
            }
        }
    }

    pub fn toggle_row(&mut self, row: usize) {
        let Some(id) = self.view.task_id_at(row).map(str::to_string) else {
            return;
        };
        let result = self.store.toggle(&id);
        self.view.refresh(&self.store);
        self.clamp_cursor();
        if let Err(e) = result {
            self.report_store_error("toggle", e);
        }
    }

    pub fn remove_row(&mut self, row: usize) {
        let Some(id) = self.view.task_id_at(row).map(str::to_string) else {
            return;
        };
        let result = self.store.remove(&id);
        self.view.refresh(&self.store);
        self.clamp_cursor();
        if let Err(e) = result {
            self.report_store_error("delete", e);
        }
    }

    pub fn clear_completed(&mut self) {
        let result = self.store.clear_completed();
        self.view.refresh(&self.store);
        self.clamp_cursor();
        match result {
            Ok(0) => {}
            Ok(n) => self.flash(format!(
                "cleared {} completed {}",
                n,
                if n == 1 { "task" } else { "tasks" }
            )),
            Err(e) => self.report_store_error("clear completed", e),
        }
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.view.apply_filter(&self.store, filter);
        self.clamp_cursor();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.view.filter().next());
    }

    pub fn cycle_theme(&mut self) {
        match self.view.cycle_theme(&mut self.theme) {
            Ok(preference) => self.flash(format!("theme: {}", preference)),
            Err(e) => self.report_theme_error(e),
        }
    }

    /// Swap the cursor task with its displayed neighbour (`delta` = ±1)
    pub fn shift_cursor_task(&mut self, delta: isize) {
        let Some(id) = self.cursor_task_id() else {
            return;
        };
        let Some(neighbour_row) = self.cursor.checked_add_signed(delta) else {
            return;
        };
        let Some(neighbour) = self.view.task_id_at(neighbour_row).map(str::to_string) else {
            return;
        };
        let result = self.store.move_task(&id, &neighbour);
        self.view.refresh(&self.store);
        if let Some(row) = self.view.row_of(&id) {
            self.cursor = row;
        }
        if let Err(e) = result {
            self.report_store_error("move", e);
        }
    }

    // -----------------------------------------------------------------------
    // Keyboard drag
    // -----------------------------------------------------------------------

    pub fn start_move(&mut self) {
        if self.view.drag_start(self.cursor) {
            self.move_row = Some(self.cursor);
            self.mode = Mode::Move;
        }
    }

    /// Move the drop pointer by `delta` rows
    pub fn move_pointer(&mut self, delta: isize) {
        let Some(current) = self.move_row else {
            return;
        };
        let len = self.view.displayed().len();
        let next = current
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
        if next == current {
            return;
        }
        self.view.drag_leave(current);
        self.view.drag_enter(next);
        self.move_row = Some(next);
        self.cursor = next;
    }

    pub fn finish_move(&mut self) {
        let source = self
            .view
            .drag_source_row()
            .and_then(|row| self.view.task_id_at(row))
            .map(str::to_string);
        let row = self.move_row.take().unwrap_or(self.cursor);
        self.mode = Mode::Navigate;
        let result = self.view.drop_on(&mut self.store, row);
        if let Some(id) = source
            && let Some(row) = self.view.row_of(&id)
        {
            self.cursor = row;
        }
        if let Err(e) = result {
            self.report_store_error("move", e);
        }
    }

    pub fn cancel_move(&mut self) {
        if let Some(row) = self.view.drag_source_row() {
            self.cursor = row;
        }
        self.view.drag_end();
        self.move_row = None;
        self.mode = Mode::Navigate;
    }

    // -----------------------------------------------------------------------
    // Pointer drag
    // -----------------------------------------------------------------------

    pub fn pointer_down(&mut self, row: usize) {
        if self.view.drag_start(row) {
            self.cursor = row;
            self.pointer = Some(PointerDrag {
                last_row: Some(row),
                moved: false,
            });
        }
    }

    /// The pointer is over `row` (or outside the rows) while dragging
    pub fn pointer_over(&mut self, row: Option<usize>) {
        let Some(mut drag) = self.pointer else {
            return;
        };
        if drag.last_row == row {
            return;
        }
        if let Some(previous) = drag.last_row {
            self.view.drag_leave(previous);
        }
        if let Some(row) = row {
            self.view.drag_enter(row);
        }
        drag.last_row = row;
        drag.moved = true;
        self.pointer = Some(drag);
    }

    /// Release the pointer. A press and release on one row without moving
    /// is a click on the task text, which toggles it.
    pub fn pointer_up(&mut self, row: Option<usize>) {
        let Some(drag) = self.pointer.take() else {
            return;
        };
        let source = self.view.drag_source_row();
        let result = match row {
            Some(row) => self.view.drop_on(&mut self.store, row),
            None => {
                self.view.drag_end();
                Ok(DropOutcome::NoTarget)
            }
        };
        match result {
            Ok(DropOutcome::SameRow) if !drag.moved => {
                if let Some(row) = source {
                    self.toggle_row(row);
                }
            }
            Ok(DropOutcome::Moved) => {
                if let Some(row) = row {
                    self.cursor = row.min(self.view.displayed().len().saturating_sub(1));
                }
            }
            Ok(_) => {}
            Err(e) => self.report_store_error("move", e),
        }
    }
}

/// Start the terminal UI against `data_dir`
pub fn run(data_dir: &Path, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage = FileStore::open(data_dir)?;
    let system = TerminalAppearance::new(config.ui.fallback_appearance);
    let mut app = App::new(
        storage,
        UuidIds,
        system,
        config,
        Some(data_dir.to_path_buf()),
    );
    info!(
        "event=tui_start module=tui data_dir={} tasks={}",
        data_dir.display(),
        app.store.len()
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    info!("event=tui_stop module=tui tasks={}", app.store.len());

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TerminalApp,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.expire_status();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
