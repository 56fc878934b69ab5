use crate::record::LogRecord;
use crate::render::format::LineFormatter;
use crate::render::gate::SeverityGate;
use crate::render::palette::color_of;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Writes records to the output sink: a one-cell colored marker identifying
/// the source, then the formatted line.
pub struct LogRenderer<W> {
    sink: W,
    formatter: LineFormatter,
    gate: Box<dyn SeverityGate>,
}

impl<W: Write> LogRenderer<W> {
    pub fn new(sink: W, formatter: LineFormatter, gate: impl SeverityGate + 'static) -> Self {
        Self {
            sink,
            formatter,
            gate: Box::new(gate),
        }
    }

    /// Render one record. Returns `false` when the gate rejected it.
    ///
    /// The sink is flushed before returning so that output never lags behind
    /// the socket loop.
    pub fn render(&mut self, record: &LogRecord, color_id: u64) -> io::Result<bool> {
        if !self.gate.is_handling(record.level) {
            return Ok(false);
        }

        let entry = color_of(color_id);
        if self.formatter.colors() {
            write!(self.sink, "{}", " ".on_color(entry.ansi()))?;
        } else {
            self.sink.write_all(b" ")?;
        }

        self.sink
            .write_all(self.formatter.format(record).as_bytes())?;
        self.sink.flush()?;

        Ok(true)
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}
