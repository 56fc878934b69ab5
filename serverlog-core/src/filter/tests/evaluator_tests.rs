use crate::filter::{FilterError, FilterEvaluator};
use crate::record::{Level, LogRecord};

#[test]
fn blank_expression_means_no_filter() {
    assert!(FilterEvaluator::from_config(None).unwrap().is_none());
    assert!(FilterEvaluator::from_config(Some("")).unwrap().is_none());
    assert!(FilterEvaluator::from_config(Some("   ")).unwrap().is_none());
}

#[test]
fn level_threshold_selects_records() {
    let filter = FilterEvaluator::from_config(Some("level > 200"))
        .unwrap()
        .unwrap();

    assert!(filter.evaluate(&LogRecord::new(Level(300), "app", "kept")).unwrap());
    assert!(!filter.evaluate(&LogRecord::new(Level(100), "app", "dropped")).unwrap());
}

#[test]
fn every_record_field_is_a_variable() {
    let filter = FilterEvaluator::compile(
        "level_name == 'ERROR' and channel == 'security' and message contains 'denied' \
         and context.user == 'bob' and extra.ip starts with '10.' \
         and datetime starts with '20' and log_id == 'abc'",
    )
    .unwrap();

    let record = LogRecord::new(Level::ERROR, "security", "access denied")
        .with_context("user", "bob")
        .with_extra("ip", "10.1.2.3")
        .with_log_id("abc");

    assert!(filter.evaluate(&record).unwrap());
}

#[test]
fn missing_log_id_is_null() {
    let filter = FilterEvaluator::compile("log_id == null").unwrap();

    assert!(filter.evaluate(&LogRecord::new(Level::INFO, "app", "x")).unwrap());
}

#[test]
fn syntax_error_is_reported_with_the_expression() {
    let err = FilterEvaluator::compile("level >").unwrap_err();

    assert!(matches!(err, FilterError::Syntax { .. }));
    assert!(err.to_string().contains("\"level >\""));
}

#[test]
fn evaluation_error_is_surfaced() {
    let filter = FilterEvaluator::compile("message > 3").unwrap();

    let err = filter
        .evaluate(&LogRecord::new(Level::INFO, "app", "x"))
        .unwrap_err();

    assert!(matches!(err, FilterError::Evaluation { .. }));
}
