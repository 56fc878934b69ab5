use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Diagnostics go to stderr; stdout carries the log view itself.
///
/// `RUST_LOG` overrides the default `warn` directive.
pub fn init_normal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

pub fn init_logging() {
    // tokio-console installs its own subscriber.
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        init_console_logging();
    } else {
        init_normal_logging();
    }
}

fn init_console_logging() {
    console_subscriber::init();
}

/// Decides colored output when neither the flags nor the config file do.
pub fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}
