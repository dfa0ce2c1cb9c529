//! The Screen: query line, status indicator and key dispatch over a [`Surface`].

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::{EnvConfig, DEFAULT_ESCAPE_MAX_UNITS, DEFAULT_INPUT_TIMEOUT_MS};
use crate::core::key::decode;
use crate::core::keymap::{Action, KeyMap, KeyMapConfig};
use crate::core::query::{Caret, Query};
use crate::core::status::Status;
use crate::core::surface::Surface;
use crate::error::Result;
use crate::runtime::input::KeyReader;
use crate::search::SearchCommand;

const HEAD_ROW: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Uninitialized,
    Ready,
    Running,
    Redrawing,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSettings {
    pub input_timeout_ms: u64,
    pub escape_max_units: usize,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            input_timeout_ms: DEFAULT_INPUT_TIMEOUT_MS,
            escape_max_units: DEFAULT_ESCAPE_MAX_UNITS,
        }
    }
}

impl From<&EnvConfig> for ScreenSettings {
    fn from(config: &EnvConfig) -> Self {
        Self {
            input_timeout_ms: config.input_timeout_ms,
            escape_max_units: config.escape_max_units,
        }
    }
}

/// Owns the surface and the query; reads the status and runs searches.
///
/// Every method is a no-op once the Screen is closed.
pub struct Screen<S: Surface, St: Status, C: SearchCommand> {
    surface: S,
    query: Query,
    keymap: KeyMap,
    status: St,
    prev_loaded: usize,
    search: C,
    settings: ScreenSettings,
    reader: KeyReader,
    state: ScreenState,
}

impl<S: Surface, St: Status, C: SearchCommand> Screen<S, St, C> {
    /// Builds a Screen with the stock key bindings and a caret at `(0, 0)`.
    pub fn new(surface: S, status: St, search: C) -> Self {
        let prev_loaded = status.loaded();
        let settings = ScreenSettings::default();
        Self {
            surface,
            query: Query::new(Caret::default()),
            keymap: KeyMap::with_defaults(),
            status,
            prev_loaded,
            search,
            reader: KeyReader::new(settings.escape_max_units),
            settings,
            state: ScreenState::Uninitialized,
        }
    }

    pub fn with_caret(mut self, caret: Caret) -> Self {
        self.query = Query::new(caret);
        self
    }

    /// Applies `key=action` overrides on top of the stock bindings.
    pub fn with_key_overrides(mut self, overrides: &KeyMapConfig) -> Self {
        self.keymap.apply(overrides);
        self
    }

    pub fn with_settings(mut self, settings: ScreenSettings) -> Self {
        self.reader = KeyReader::new(settings.escape_max_units);
        self.settings = settings;
        self
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn status(&self) -> &St {
        &self.status
    }

    pub fn search(&self) -> &C {
        &self.search
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Takes over the terminal and draws the head line.
    pub fn init(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.surface.init_screen()?;
        self.surface.set_echo(false)?;
        self.surface.set_input_timeout_ms(self.settings.input_timeout_ms);
        self.draw();
        self.surface.flush()?;
        self.state = ScreenState::Ready;
        tracing::debug!(columns = self.surface.columns(), "screen initialized");
        Ok(())
    }

    /// Waits up to the input timeout for one key and performs its action.
    ///
    /// A timeout, an undecodable sequence or an unbound key does nothing.
    pub fn wait_input(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        if self.state == ScreenState::Ready {
            self.state = ScreenState::Running;
        }

        let Some(units) = self.reader.read_key(&mut self.surface)? else {
            return Ok(());
        };
        let Some((key, ch)) = decode(&units) else {
            tracing::trace!(?units, "undecodable input dropped");
            return Ok(());
        };
        let Some(action) = self.keymap.dispatch(key, ch) else {
            tracing::trace!(%key, "unbound key");
            return Ok(());
        };
        tracing::debug!(%key, ?action, "dispatch");
        self.perform(action)
    }

    pub fn perform(&mut self, action: Action) -> Result<()> {
        match action {
            Action::StartSearch => self.start_search(),
            Action::Finish => self.finish(),
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::DeleteChar => self.delete_char(),
            Action::InsertChar(ch) => self.insert_char(ch),
        }
    }

    /// Redraws the head line and places the cursor on the caret.
    pub fn refresh(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.state = ScreenState::Redrawing;
        self.draw();
        self.surface.flush()?;
        self.state = ScreenState::Running;
        Ok(())
    }

    /// Whether the status advanced since the last [`Screen::rerender`].
    pub fn changed_state(&self) -> bool {
        self.prev_loaded < self.status.loaded()
    }

    pub fn rerender(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.prev_loaded = self.status.loaded();
        self.refresh()
    }

    pub fn is_closed(&self) -> bool {
        self.state == ScreenState::Closed || self.surface.is_closed()
    }

    pub fn close(&mut self) -> Result<()> {
        if self.state == ScreenState::Closed {
            return Ok(());
        }
        self.state = ScreenState::Closed;
        self.surface.close_screen()?;
        tracing::debug!(query = self.query.text(), "screen closed");
        Ok(())
    }

    /// Runs the search for the current query, drawing each match on the head
    /// line as it arrives, then restores the query view.
    pub fn start_search(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        let query = self.query.text().to_string();
        tracing::info!(query = %query, "search started");

        let surface = &mut self.surface;
        let columns = usize::from(surface.columns());
        let mut drawn = 0usize;
        let outcome = self.search.run(&query, &mut |line| {
            surface.move_cursor(HEAD_ROW, 0);
            surface.write_text(&fit_to_columns(line, columns));
            surface.flush()?;
            drawn += 1;
            Ok(())
        });
        tracing::debug!(drawn, ok = outcome.is_ok(), "search drawn");

        // The query layout comes back even when the producer failed.
        self.surface.clear();
        let restored = self.init();
        outcome.and(restored)
    }

    pub fn finish(&mut self) -> Result<()> {
        self.close()
    }

    pub fn move_left(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.query.move_left();
        self.refresh()
    }

    pub fn move_right(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.query.move_right();
        self.refresh()
    }

    pub fn delete_char(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.query.delete();
        self.refresh()
    }

    pub fn insert_char(&mut self, ch: char) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.query.insert(ch);
        self.refresh()
    }

    /// Stock driver: init, then dispatch keys and follow status changes
    /// until a key closes the Screen.
    pub fn run(&mut self) -> Result<()> {
        self.init()?;
        while !self.is_closed() {
            self.wait_input()?;
            if !self.is_closed() && self.changed_state() {
                self.rerender()?;
            }
        }
        self.close()
    }

    fn draw(&mut self) {
        let summary = self.status.summary();
        let columns = usize::from(self.surface.columns());
        let status_col = columns.saturating_sub(summary.width());

        // Blank the cells up to the status; nothing is diffed. A long query
        // is clipped so it neither hides under the status nor wraps.
        let head = fit_to_columns(self.query.line(), status_col);

        self.surface.move_cursor(HEAD_ROW, 0);
        self.surface.write_text(&head);
        self.surface.move_cursor(HEAD_ROW, to_col(status_col));
        self.surface.write_text(&summary);

        let (row, col) = self.query.cursor_position();
        self.surface.move_cursor(row, col.min(to_col(status_col)));
    }
}

impl<S: Surface, St: Status, C: SearchCommand> Drop for Screen<S, St, C> {
    fn drop(&mut self) {
        if matches!(self.state, ScreenState::Uninitialized | ScreenState::Closed) {
            return;
        }
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = self.close();
        }));
    }
}

/// Pads or truncates `line` to exactly `columns` cells.
///
/// Control characters become `?` so file content cannot drive the terminal.
fn fit_to_columns(line: &str, columns: usize) -> String {
    let limit = columns;
    let mut out = String::with_capacity(limit);
    let mut used = 0usize;
    for ch in line.chars() {
        let ch = if ch.is_control() { '?' } else { ch };
        let width = ch.width().unwrap_or(0);
        if used + width > limit {
            break;
        }
        out.push(ch);
        used += width;
    }
    out.extend(std::iter::repeat(' ').take(limit - used));
    out
}

fn to_col(col: usize) -> u16 {
    col.min(usize::from(u16::MAX)) as u16
}
