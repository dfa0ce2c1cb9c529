//! In-memory surface that records every call.
//!
//! Input is scripted: each entry is either a unit or `None` for an idle
//! timeout. Drawing is mirrored into a character grid so callers can inspect
//! what the terminal would show.

use std::collections::VecDeque;
use std::io;

use crate::core::surface::{ReadMode, Surface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    InitScreen,
    SetEcho(bool),
    SetInputTimeout(u64),
    MoveCursor(u16, u16),
    Write(String),
    Clear,
    Flush,
    CloseScreen,
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    columns: u16,
    ops: Vec<SurfaceOp>,
    input: VecDeque<Option<u8>>,
    grid: Vec<Vec<char>>,
    cursor: (u16, u16),
    initialized: bool,
    closed: bool,
}

impl RecordingSurface {
    pub fn new(columns: u16) -> Self {
        Self {
            columns,
            ops: Vec::new(),
            input: VecDeque::new(),
            grid: Vec::new(),
            cursor: (0, 0),
            initialized: false,
            closed: false,
        }
    }

    /// Queue raw units for the next reads.
    pub fn push_input(&mut self, units: &[u8]) {
        self.input.extend(units.iter().copied().map(Some));
    }

    /// Queue one idle read (timeout with no data).
    pub fn push_idle(&mut self) {
        self.input.push_back(None);
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Text on `row`, trailing blanks trimmed.
    pub fn line(&self, row: u16) -> String {
        self.grid
            .get(usize::from(row))
            .map(|cells| cells.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn put_text(&mut self, text: &str) {
        let (row, mut col) = self.cursor;
        let row_idx = usize::from(row);
        if self.grid.len() <= row_idx {
            self.grid.resize(row_idx + 1, Vec::new());
        }
        let cells = &mut self.grid[row_idx];
        for ch in text.chars() {
            let idx = usize::from(col);
            if idx >= usize::from(self.columns) {
                break;
            }
            if cells.len() <= idx {
                cells.resize(idx + 1, ' ');
            }
            cells[idx] = ch;
            col = col.saturating_add(1);
        }
        self.cursor = (row, col);
    }
}

impl Surface for RecordingSurface {
    fn init_screen(&mut self) -> io::Result<()> {
        self.ops.push(SurfaceOp::InitScreen);
        self.initialized = true;
        self.closed = false;
        self.grid.clear();
        self.cursor = (0, 0);
        Ok(())
    }

    fn set_echo(&mut self, enabled: bool) -> io::Result<()> {
        self.ops.push(SurfaceOp::SetEcho(enabled));
        Ok(())
    }

    fn set_input_timeout_ms(&mut self, timeout_ms: u64) {
        self.ops.push(SurfaceOp::SetInputTimeout(timeout_ms));
    }

    fn move_cursor(&mut self, row: u16, col: u16) {
        self.ops.push(SurfaceOp::MoveCursor(row, col));
        self.cursor = (row, col);
    }

    fn write_text(&mut self, text: &str) {
        self.ops.push(SurfaceOp::Write(text.to_string()));
        self.put_text(text);
    }

    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
        self.grid.clear();
        self.cursor = (0, 0);
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ops.push(SurfaceOp::Flush);
        Ok(())
    }

    fn columns(&self) -> u16 {
        self.columns
    }

    fn read_input_unit(&mut self, mode: ReadMode) -> io::Result<Option<u8>> {
        match mode {
            ReadMode::WaitTimeout => Ok(self.input.pop_front().flatten()),
            ReadMode::NonBlocking => match self.input.front() {
                Some(Some(_)) => Ok(self.input.pop_front().flatten()),
                Some(None) => {
                    // An idle marker ends the burst.
                    self.input.pop_front();
                    Ok(None)
                }
                None => Ok(None),
            },
        }
    }

    fn close_screen(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.ops.push(SurfaceOp::CloseScreen);
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
