//! Typed terminal output commands and the buffer they are staged in.
//!
//! Invariant: a surface writes to the terminal only by draining its `OutputGate`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Text drawn at the current cursor position.
    Text(String),
    /// Zero-based cursor addressing.
    MoveTo { row: u16, col: u16 },
    /// Erase the whole screen and home the cursor.
    Clear,

    /// Alternate screen buffer toggles.
    EnterAltScreen,
    LeaveAltScreen,

    /// Make the cursor visible again.
    ShowCursor,
}

impl TerminalCmd {
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text(data.into())
    }

    fn encode_into(&self, out: &mut String) {
        match self {
            TerminalCmd::Text(data) => out.push_str(data),
            TerminalCmd::MoveTo { row, col } => {
                out.push_str(&format!("\x1b[{};{}H", u32::from(*row) + 1, u32::from(*col) + 1));
            }
            TerminalCmd::Clear => out.push_str("\x1b[2J\x1b[H"),
            TerminalCmd::EnterAltScreen => out.push_str("\x1b[?1049h"),
            TerminalCmd::LeaveAltScreen => out.push_str("\x1b[?1049l"),
            TerminalCmd::ShowCursor => out.push_str("\x1b[?25h"),
        }
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// Drain staged commands into one escape-encoded string.
    pub fn take_encoded(&mut self) -> String {
        let mut out = String::new();
        for cmd in self.cmds.drain(..) {
            cmd.encode_into(&mut out);
        }
        out
    }
}
