use crate::filter::FilterEvaluator;
use crate::net::ConnectionId;
use crate::record::decode;
use crate::render::{LogRenderer, effective_color_id};
use crate::server::ServerError;
use std::io::Write;

/// What became of one received line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Not a valid frame.
    Dropped,
    /// Rejected by the filter expression.
    Filtered,
    /// Below the verbosity threshold.
    Suppressed,
    Rendered,
}

/// Decode, filter, color and render, synchronously, one line at a time.
pub struct RecordPipeline<W> {
    filter: Option<FilterEvaluator>,
    renderer: LogRenderer<W>,
}

impl<W: Write> RecordPipeline<W> {
    pub fn new(filter: Option<FilterEvaluator>, renderer: LogRenderer<W>) -> Self {
        Self { filter, renderer }
    }

    /// Malformed lines are dropped without surfacing anything. Filter and
    /// output failures are returned and end the server.
    pub fn process(
        &mut self,
        connection: ConnectionId,
        raw: &[u8],
    ) -> Result<LineOutcome, ServerError> {
        let Some(record) = decode(raw) else {
            return Ok(LineOutcome::Dropped);
        };

        if let Some(filter) = &self.filter
            && !filter.evaluate(&record)?
        {
            return Ok(LineOutcome::Filtered);
        }

        let color_id = effective_color_id(connection, record.log_id.as_deref());
        if self.renderer.render(&record, color_id)? {
            Ok(LineOutcome::Rendered)
        } else {
            Ok(LineOutcome::Suppressed)
        }
    }

    pub fn sink(&self) -> &W {
        self.renderer.sink()
    }
}
