//! Editable single-line query buffer.

use unicode_width::UnicodeWidthChar;

/// Caret position: `row` is the display line, `col` counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    pub row: u16,
    pub col: usize,
}

impl Caret {
    pub fn new(row: u16, col: usize) -> Self {
        Self { row, col }
    }
}

/// Query text plus caret.
///
/// Invariant: `caret.col` is always within `[0, text.chars().count()]`.
#[derive(Debug, Clone, Default)]
pub struct Query {
    text: String,
    caret: Caret,
}

impl Query {
    pub fn new(caret: Caret) -> Self {
        Self {
            text: String::new(),
            caret: Caret::new(caret.row, 0),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.caret.col);
        self.text.insert(at, ch);
        self.caret.col += 1;
    }

    /// Backspace: removes the character before the caret.
    pub fn delete(&mut self) {
        if self.caret.col == 0 {
            return;
        }
        let at = self.byte_offset(self.caret.col - 1);
        self.text.remove(at);
        self.caret.col -= 1;
    }

    pub fn move_left(&mut self) {
        self.caret.col = self.caret.col.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.caret.col < self.len() {
            self.caret.col += 1;
        }
    }

    /// Text to draw. There is no previous frame, so the whole line is always returned.
    pub fn line(&self) -> &str {
        &self.text
    }

    /// Terminal cell `(row, column)` for the hardware cursor.
    pub fn cursor_position(&self) -> (u16, u16) {
        let width: usize = self
            .text
            .chars()
            .take(self.caret.col)
            .map(|ch| ch.width().unwrap_or(0))
            .sum();
        (self.caret.row, width.min(u16::MAX as usize) as u16)
    }

    fn byte_offset(&self, col: usize) -> usize {
        self.text
            .char_indices()
            .nth(col)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{Caret, Query};

    fn assert_caret_in_range(query: &Query) {
        let col = query.caret().col;
        assert!(
            col <= query.len(),
            "caret {col} past end of {:?}",
            query.text()
        );
    }

    #[test]
    fn delete_at_start_is_noop() {
        let mut query = Query::new(Caret::default());
        query.delete();
        assert_eq!(query.text(), "");
        assert_eq!(query.caret(), Caret::new(0, 0));

        query.insert('x');
        query.move_left();
        query.delete();
        assert_eq!(query.text(), "x");
        assert_eq!(query.caret().col, 0);
    }

    #[test]
    fn insert_then_delete_restores_previous_state() {
        let mut query = Query::new(Caret::default());
        for ch in "hello".chars() {
            query.insert(ch);
        }
        query.move_left();
        query.move_left();
        let before_text = query.text().to_string();
        let before_caret = query.caret();

        query.insert('Z');
        assert_eq!(query.text(), "helZlo");
        query.delete();

        assert_eq!(query.text(), before_text);
        assert_eq!(query.caret(), before_caret);
    }

    #[test]
    fn moves_clamp_to_buffer_bounds() {
        let mut query = Query::new(Caret::default());
        query.move_left();
        assert_eq!(query.caret().col, 0);

        query.insert('a');
        query.move_right();
        query.move_right();
        assert_eq!(query.caret().col, 1);
    }

    #[test]
    fn caret_stays_in_range_for_mixed_edits() {
        let mut query = Query::new(Caret::default());
        let script = "ab<<<x>>>>--<y-->z----<<>>";
        for step in script.chars() {
            match step {
                '<' => query.move_left(),
                '>' => query.move_right(),
                '-' => query.delete(),
                ch => query.insert(ch),
            }
            assert_caret_in_range(&query);
        }
    }

    #[test]
    fn row_is_fixed_and_initial_column_is_clamped() {
        let mut query = Query::new(Caret::new(2, 7));
        assert_eq!(query.caret(), Caret::new(2, 0));
        query.insert('q');
        assert_eq!(query.caret().row, 2);
    }

    #[test]
    fn multibyte_characters_edit_by_character() {
        let mut query = Query::new(Caret::default());
        query.insert('é');
        query.insert('漢');
        query.insert('x');
        query.move_left();
        query.delete();
        assert_eq!(query.text(), "éx");
        assert_eq!(query.caret().col, 1);
    }

    #[test]
    fn cursor_position_uses_display_width() {
        let mut query = Query::new(Caret::default());
        query.insert('漢');
        query.insert('a');
        assert_eq!(query.cursor_position(), (0, 3));
        query.move_left();
        assert_eq!(query.cursor_position(), (0, 2));
    }
}
