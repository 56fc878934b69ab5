//! A terminal viewer for log records streamed over sockets.
//!
//! Applications ship records as newline-delimited frames; the server
//! multiplexes every client on one task, decodes each line, applies an
//! optional filter expression and renders the record with a marker colored
//! after its source connection or correlation id.

pub mod cli;
pub mod conf;
pub mod filter;
pub mod logging;
pub mod net;
pub mod record;
pub mod render;
pub mod server;
pub mod ship;
