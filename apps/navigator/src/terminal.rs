use std::io::{self, Write};

use mvp_core::{Content, Surface};
use tracing::warn;

const RULE: &str = "────────────────────────";

pub struct TerminalSurface<W: Write> {
    out: W,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(error = %err, "failed to write to terminal surface");
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear(&mut self) {
        self.write(RULE);
    }

    fn attach(&mut self, content: Content) {
        self.write(&content.to_string());
    }
}
