use crate::record::{DecodeError, Level, LogRecord, decode, encode, try_decode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, FixedOffset};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

fn sample() -> LogRecord {
    LogRecord::new(Level::ERROR, "doctrine", "Query failed: {sql}")
        .with_context("sql", "SELECT 1")
        .with_context("attempt", 3)
        .with_extra("request_uri", "/admin")
        .with_datetime(DateTime::parse_from_rfc3339("2024-03-01T12:30:45.123456+02:00").unwrap())
        .with_log_id("5f2b1c")
}

fn frame(payload: serde_json::Value) -> String {
    STANDARD.encode(payload.to_string())
}

#[test]
fn round_trip_preserves_every_field() {
    // Arrange
    let record = sample();

    // Act
    let line = encode(&record).unwrap();
    let decoded = decode(line.as_bytes()).expect("frame should decode");

    // Assert
    assert_eq!(decoded, record);
    assert_eq!(decoded.datetime.offset(), record.datetime.offset());
}

#[test]
fn encoded_frame_carries_level_name() {
    let line = encode(&sample()).unwrap();
    let payload: serde_json::Value =
        serde_json::from_slice(&STANDARD.decode(line).unwrap()).unwrap();

    assert_eq!(payload["level_name"], json!("ERROR"));
    assert_eq!(payload["level"], json!(400));
}

#[test]
fn tolerates_line_terminators() {
    let line = format!("{}\r\n", encode(&sample()).unwrap());

    assert!(decode(line.as_bytes()).is_some());
}

#[test]
fn empty_list_context_is_an_empty_map() {
    let line = frame(json!({
        "level": 200,
        "channel": "app",
        "message": "hi",
        "context": [],
        "extra": [],
        "datetime": "2024-03-01T12:30:45+00:00",
    }));

    let record = decode(line.as_bytes()).unwrap();

    assert!(record.context.is_empty());
    assert!(record.extra.is_empty());
}

#[test]
fn optional_fields_default() {
    let line = frame(json!({"level": 250, "channel": "app", "message": "hi"}));

    let record = decode(line.as_bytes()).unwrap();

    assert_eq!(record.level, Level::NOTICE);
    assert_eq!(record.channel, "app");
    assert_eq!(record.message, "hi");
    assert_eq!(record.log_id, None);
}

#[test]
fn any_integer_level_decodes() {
    for level in [-1, 0, 70000, i64::MAX] {
        let line = frame(json!({"level": level, "channel": "app", "message": "hi"}));

        let record = decode(line.as_bytes()).expect("integer level should decode");

        assert_eq!(record.level, Level(level));
    }
}

#[test]
fn unknown_fields_are_ignored() {
    let line = frame(json!({
        "level": 100,
        "level_name": "DEBUG",
        "channel": "app",
        "message": "hi",
        "formatted": "ignored",
    }));

    assert!(decode(line.as_bytes()).is_some());
}

#[test]
fn empty_line_is_dropped() {
    assert!(matches!(try_decode(b"\n"), Err(DecodeError::Empty)));
    assert!(decode(b"").is_none());
}

#[test]
fn invalid_base64_is_dropped() {
    assert!(matches!(
        try_decode(b"not base64 at all!"),
        Err(DecodeError::Base64(_))
    ));
}

#[test]
fn wrong_payload_shape_is_dropped() {
    let missing_channel = frame(json!({"level": 200, "message": "hi"}));
    let scalar_context = frame(json!({"level": 200, "channel": "a", "message": "m", "context": 5}));
    let not_json = STANDARD.encode("a:3:{i:0;s:1:\"x\";}");

    for line in [missing_channel, scalar_context, not_json] {
        assert!(matches!(
            try_decode(line.as_bytes()),
            Err(DecodeError::Payload(_))
        ));
    }
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("JSON has no NaN or infinity", |f| f.is_finite())
            .prop_map(Value::from),
        "\\PC{0,12}".prop_map(Value::from),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::btree_map("\\PC{0,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn json_map() -> impl Strategy<Value = serde_json::Map<String, Value>> {
    proptest::collection::btree_map("\\PC{0,8}", json_value(), 0..4)
        .prop_map(|map| map.into_iter().collect())
}

fn datetime() -> impl Strategy<Value = DateTime<FixedOffset>> {
    // RFC 3339 offsets carry whole minutes only.
    (0i64..4_102_444_800, 0u32..1_000_000_000, -1439i32..=1439).prop_map(
        |(secs, nanos, offset_minutes)| {
            let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
            DateTime::from_timestamp(secs, nanos)
                .unwrap()
                .with_timezone(&offset)
        },
    )
}

prop_compose! {
    fn log_record()(
        level in any::<i64>(),
        channel in "\\PC{0,16}",
        message in "\\PC{0,64}",
        context in json_map(),
        extra in json_map(),
        datetime in datetime(),
        log_id in proptest::option::of("\\PC{0,16}"),
    ) -> LogRecord {
        LogRecord {
            level: Level(level),
            channel,
            message,
            context,
            extra,
            datetime,
            log_id,
        }
    }
}

proptest! {
    #[test]
    fn any_record_survives_encode_then_decode(record in log_record()) {
        let line = encode(&record).unwrap();

        let decoded = decode(line.as_bytes());

        prop_assert_eq!(decoded.as_ref(), Some(&record));
        let decoded = decoded.unwrap();
        prop_assert_eq!(decoded.datetime.offset(), record.datetime.offset());
    }

    #[test]
    fn floats_in_context_survive_exactly(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let record = LogRecord::new(Level::INFO, "app", "m").with_context("x", f);

        let decoded = decode(encode(&record).unwrap().as_bytes()).unwrap();

        prop_assert_eq!(decoded.context["x"].as_f64(), Some(f));
    }

    #[test]
    fn bytes_outside_the_base64_alphabet_never_decode(mut bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        bytes.insert(0, b'!');
        prop_assert!(decode(&bytes).is_none());
    }

    #[test]
    fn base64_of_non_records_never_decodes(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut payload = vec![b'#'];
        payload.extend(bytes);
        let line = STANDARD.encode(payload);
        prop_assert!(decode(line.as_bytes()).is_none());
    }
}
