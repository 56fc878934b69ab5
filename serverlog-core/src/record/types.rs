use crate::record::Level;
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single log line as shipped by a client.
///
/// Records are transient: decoded per line, handed to the filter and the
/// renderer, then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: Level,
    pub channel: String,
    pub message: String,
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub context: Map<String, Value>,
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub extra: Map<String, Value>,
    #[serde(default = "received_now")]
    pub datetime: DateTime<FixedOffset>,
    /// Correlation id shared by every line of one logical request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_id: Option<String>,
}

impl LogRecord {
    pub fn new(level: Level, channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            channel: channel.into(),
            message: message.into(),
            context: Map::new(),
            extra: Map::new(),
            datetime: received_now(),
            log_id: None,
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn with_datetime(mut self, datetime: DateTime<FixedOffset>) -> Self {
        self.datetime = datetime;
        self
    }

    pub fn with_log_id(mut self, log_id: impl Into<String>) -> Self {
        self.log_id = Some(log_id.into());
        self
    }

    /// The record's fields as the variable environment of a filter expression.
    pub fn variables(&self) -> Map<String, Value> {
        let mut vars = Map::new();
        vars.insert("level".into(), Value::from(self.level.value()));
        vars.insert("level_name".into(), Value::from(self.level.name().into_owned()));
        vars.insert("channel".into(), Value::from(self.channel.clone()));
        vars.insert("message".into(), Value::from(self.message.clone()));
        vars.insert("context".into(), Value::Object(self.context.clone()));
        vars.insert("extra".into(), Value::Object(self.extra.clone()));
        vars.insert("datetime".into(), Value::from(self.datetime.to_rfc3339()));
        vars.insert(
            "log_id".into(),
            self.log_id.clone().map_or(Value::Null, Value::from),
        );
        vars
    }
}

fn received_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Shippers written against PHP arrays send `[]` for an empty map.
fn map_or_empty_list<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Array(items) if items.is_empty() => Ok(Map::new()),
        Value::Null => Ok(Map::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected an object, found {other}"
        ))),
    }
}
