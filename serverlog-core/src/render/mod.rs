//! Terminal rendering of decoded records.
//!
//! A record reaches the sink as a colored marker (one cell whose background
//! identifies its source, see [`palette`]) followed by the line produced by
//! [`LineFormatter`]. Whether it is written at all is decided by a
//! [`SeverityGate`], usually derived from the console verbosity.

mod format;
mod gate;
pub mod palette;
mod renderer;

#[cfg(test)]
mod tests;

pub use format::{
    DEFAULT_DATE_FORMAT, DEFAULT_FORMAT, LineFormatter, is_valid_date_format, level_style,
};
pub use gate::{SeverityGate, Verbosity, VerbosityGate};
pub use palette::{PALETTE, PaletteEntry, color_of, effective_color_id};
pub use renderer::LogRenderer;
