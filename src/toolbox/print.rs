use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use crossterm::style::{StyledContent, Stylize};

/// User-facing console output. Diagnostics go to the log file instead.
pub struct Printer {
    out: Box<dyn Write>,
    color: bool,
}

impl Printer {
    /// Colored stdout, unless `NO_COLOR` is set or stdout is redirected.
    pub fn stdout() -> Self {
        let color = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self {
            out: Box::new(io::stdout()),
            color,
        }
    }

    pub fn new(out: Box<dyn Write>, color: bool) -> Self {
        Self { out, color }
    }

    pub fn success(&mut self, text: impl Display) {
        self.emit(text, |s| s.green());
    }

    pub fn info(&mut self, text: impl Display) {
        self.emit(text, Stylize::stylize);
    }

    pub fn notice(&mut self, text: impl Display) {
        self.emit(text, |s| s.yellow());
    }

    pub fn warning(&mut self, text: impl Display) {
        self.emit(text, |s| s.yellow().bold());
    }

    pub fn alert(&mut self, text: impl Display) {
        self.emit(text, |s| s.red());
    }

    fn emit(&mut self, text: impl Display, style: impl FnOnce(String) -> StyledContent<String>) {
        let text = text.to_string();
        let written = if self.color {
            writeln!(self.out, "{}", style(text))
        } else {
            writeln!(self.out, "{text}")
        };
        if let Err(err) = written.and_then(|()| self.out.flush()) {
            tracing::warn!("console write failed: {err}");
        }
    }
}
