use crate::record::{Level, LogRecord};
use crate::render::{
    DEFAULT_DATE_FORMAT, DEFAULT_FORMAT, LineFormatter, is_valid_date_format, level_style,
};
use chrono::DateTime;
use owo_colors::Style;
use pretty_assertions::assert_eq;

fn record(level: Level, message: &str) -> LogRecord {
    LogRecord::new(level, "app", message)
        .with_datetime(DateTime::parse_from_rfc3339("2024-03-01T12:30:45+00:00").unwrap())
}

fn plain() -> LineFormatter {
    LineFormatter::new(DEFAULT_FORMAT, DEFAULT_DATE_FORMAT, false, false)
}

#[test]
fn default_format_plain() {
    let out = plain().format(&record(Level::WARNING, "hi"));

    assert_eq!(out, "12:30:45 WARNING   [app] hi\n");
}

#[test]
fn context_and_extra_render_inline() {
    let rec = record(Level::INFO, "login")
        .with_context("user", "bob")
        .with_extra("ip", "10.0.0.1");

    let out = plain().format(&rec);

    assert_eq!(
        out,
        "12:30:45 INFO      [app] login {\"user\":\"bob\"} {\"ip\":\"10.0.0.1\"}\n"
    );
}

#[test]
fn multiline_pretty_prints_context() {
    let formatter = LineFormatter::new("%message%%context%", DEFAULT_DATE_FORMAT, false, true);
    let rec = record(Level::DEBUG, "login").with_context("user", "bob");

    assert_eq!(formatter.format(&rec), "login\n{\n  \"user\": \"bob\"\n}");
}

#[test]
fn message_placeholders_take_context_values() {
    let formatter = LineFormatter::new("%message%", DEFAULT_DATE_FORMAT, false, false);
    let rec = record(Level::INFO, "user {user} tried {count} times, {missing} stays")
        .with_context("user", "bob")
        .with_context("count", 3);

    assert_eq!(
        formatter.format(&rec),
        "user bob tried 3 times, {missing} stays"
    );
}

#[test]
fn unknown_placeholders_and_stray_percent_signs_are_kept() {
    let formatter = LineFormatter::new("100% %foo% %channel%", DEFAULT_DATE_FORMAT, false, false);

    assert_eq!(formatter.format(&record(Level::INFO, "x")), "100% %foo% app");
}

#[test]
fn placeholders_inside_the_message_are_not_expanded() {
    let formatter = LineFormatter::new("%message% %channel%", DEFAULT_DATE_FORMAT, false, false);

    assert_eq!(
        formatter.format(&record(Level::INFO, "%channel%")),
        "%channel% app"
    );
}

#[test]
fn custom_date_format() {
    let formatter = LineFormatter::new("%datetime%", "%Y-%m-%d", false, false);

    assert_eq!(formatter.format(&record(Level::INFO, "x")), "2024-03-01");
}

#[test]
fn colored_level_span_and_channel() {
    let formatter = LineFormatter::new(DEFAULT_FORMAT, DEFAULT_DATE_FORMAT, true, false);

    let out = formatter.format(&record(Level::WARNING, "hi"));

    let level = level_style(Level::WARNING).style("WARNING  ").to_string();
    let channel = Style::new().yellow().style("app").to_string();
    assert_eq!(out, format!("12:30:45 {level} [{channel}] hi\n"));
}

#[test]
fn level_styles_follow_severity() {
    assert_eq!(level_style(Level::DEBUG), Style::new().white());
    assert_eq!(level_style(Level::NOTICE), Style::new().blue());
    assert_eq!(level_style(Level::ALERT), Style::new().red());
    assert_eq!(level_style(Level::EMERGENCY), Style::new().white().on_red());
}

#[test]
fn date_format_validation() {
    assert!(is_valid_date_format("%H:%M:%S"));
    assert!(is_valid_date_format("%Y-%m-%dT%H:%M:%S%.3f"));
    assert!(!is_valid_date_format("%Q"));
}
