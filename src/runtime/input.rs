//! Two-phase key reader.
//!
//! The first unit of a key is read with the normal input timeout. If it cannot
//! stand on its own (ESC or a UTF-8 lead byte), further units are drained
//! without waiting until the sequence is complete, input runs dry, or the cap
//! is hit.

use std::io;

use crate::core::key::{is_self_describing, sequence_status, SequenceStatus};
use crate::core::surface::{ReadMode, Surface};

pub const DEFAULT_MAX_UNITS: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct KeyReader {
    max_units: usize,
}

impl Default for KeyReader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNITS)
    }
}

impl KeyReader {
    /// `max_units` is clamped to at least 1.
    pub fn new(max_units: usize) -> Self {
        Self {
            max_units: max_units.max(1),
        }
    }

    pub fn max_units(&self) -> usize {
        self.max_units
    }

    /// Waits for one key. `Ok(None)` means the timeout passed with no input.
    pub fn read_key<S>(&self, surface: &mut S) -> io::Result<Option<Vec<u8>>>
    where
        S: Surface + ?Sized,
    {
        match surface.read_input_unit(ReadMode::WaitTimeout)? {
            Some(first) => self.complete(surface, first).map(Some),
            None => Ok(None),
        }
    }

    /// Accumulates the rest of the sequence that starts with `first`.
    pub fn complete<S>(&self, surface: &mut S, first: u8) -> io::Result<Vec<u8>>
    where
        S: Surface + ?Sized,
    {
        let mut units = vec![first];
        if is_self_describing(first) {
            return Ok(units);
        }

        while units.len() < self.max_units
            && sequence_status(&units) == SequenceStatus::Incomplete
        {
            match surface.read_input_unit(ReadMode::NonBlocking)? {
                Some(unit) => units.push(unit),
                None => break,
            }
        }
        Ok(units)
    }
}
