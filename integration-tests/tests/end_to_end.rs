use integration_tests::harness::{TestServer, captured_events};
use owo_colors::OwoColorize;
use pretty_assertions::assert_eq;
use serverlog_core::conf::ViewerConfig;
use serverlog_core::record::{Level, LogRecord};
use serverlog_core::render::{Verbosity, color_of};

fn marker(id: u64) -> String {
    " ".on_color(color_of(id).ansi()).to_string()
}

/// A notice from the first client renders with its channel, message and the
/// first connection's color.
#[test]
fn renders_record_from_single_client() {
    // Arrange
    let server = TestServer::start(ViewerConfig {
        colors: true,
        verbosity: Verbosity::Verbose,
        ..Default::default()
    });
    let mut client = server.connect();

    // Act
    client.send(&LogRecord::new(Level::NOTICE, "app", "hi"));

    // Assert
    let output = server.wait_for_output("hi");
    assert!(output.starts_with(&marker(1)), "unexpected marker in {output:?}");
    assert!(output.contains("app"));
    assert!(output.contains("NOTICE"));
}

#[test]
fn plain_output_with_custom_template() {
    let server = TestServer::start(ViewerConfig {
        format: "%level_name%|%channel%|%message%%context%\n".to_string(),
        ..Default::default()
    });
    let mut client = server.connect();

    client.send(&LogRecord::new(Level::ERROR, "db", "lost {host}").with_context("host", "db-1"));

    let output = server.wait_for_output("lost");
    assert_eq!(output, " ERROR    |db|lost db-1 {\"host\":\"db-1\"}\n");
}

#[test]
fn verbosity_hides_low_levels() {
    // Arrange
    let server = TestServer::start(ViewerConfig {
        format: "%message%\n".to_string(),
        ..Default::default()
    });
    let mut client = server.connect();

    // Act
    client.send(&LogRecord::new(Level::INFO, "app", "chatter"));
    client.send(&LogRecord::new(Level::WARNING, "app", "sentinel"));

    // Assert
    let output = server.wait_for_output("sentinel");
    assert!(!output.contains("chatter"));
}

#[test]
fn startup_and_connections_are_traced() {
    let server = TestServer::start(ViewerConfig {
        format: "%message%\n".to_string(),
        ..Default::default()
    });
    let mut client = server.connect();
    client.send(&LogRecord::new(Level::WARNING, "app", "traced"));
    server.wait_for_output("traced");

    let events = captured_events();
    let events = events.lock().unwrap();
    let listening = events
        .iter()
        .find(|e| e.message == "listening for log records")
        .expect("no startup event");
    assert_eq!(listening.field("protocol"), Some("1"));
    assert!(events.iter().any(|e| e.message == "connection accepted"));
}
