use anyhow::Result;
use std::io::{self, Write};
use tokio_stream::StreamExt;

use crate::core::event::{NormalizedEvent, ToolCall};
use crate::stream::NormalizedEventStream;

/// Print content as it grows on stdout. Tool calls and errors go to stderr.
pub async fn render_text(mut events: NormalizedEventStream) -> Result<()> {
    let mut printer = TextPrinter::default();
    let stdout = io::stdout();
    let stderr = io::stderr();

    while let Some(event) = events.next().await {
        printer.print(&event, &mut stdout.lock(), &mut stderr.lock())?;
    }

    printer.finish(&mut stdout.lock(), &mut stderr.lock())
}

/// One compact JSON object per event on stdout.
pub async fn render_json(mut events: NormalizedEventStream) -> Result<()> {
    let mut stdout = io::stdout();
    while let Some(event) = events.next().await {
        writeln!(stdout, "{}", serde_json::to_string(&event)?)?;
    }
    Ok(())
}

/// Tracks what has already been printed, since every event repeats the
/// whole answer so far.
#[derive(Debug, Default)]
struct TextPrinter {
    printed: usize,
    tools_seen: usize,
    tools: Vec<ToolCall>,
}

impl TextPrinter {
    fn print(
        &mut self,
        event: &NormalizedEvent,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<()> {
        if let Some(error) = &event.error {
            writeln!(err, "\n\x1b[31;1m[error]\x1b[0m {error}")?;
            return Ok(());
        }

        if let Some(content) = &event.content {
            if let Some(new) = content.get(self.printed..) {
                write!(out, "{new}")?;
                out.flush()?;
            }
            self.printed = content.len();
        }

        for tool in event.tools().iter().skip(self.tools_seen) {
            writeln!(err, "\n\x1b[36;1m[tool: {}]\x1b[0m", tool.name)?;
        }
        self.tools_seen = self.tools_seen.max(event.tools().len());
        if !event.tools().is_empty() {
            self.tools = event.tools().to_vec();
        }
        Ok(())
    }

    /// Arguments are printed once, complete, after the stream ends.
    fn finish(&self, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
        for tool in &self.tools {
            writeln!(err, "\x1b[90m{}({})\x1b[0m", tool.name, tool.args)?;
        }
        writeln!(out)?;
        Ok(())
    }
}
