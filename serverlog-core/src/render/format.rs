use crate::record::{Level, LogRecord};
use chrono::format::{Item, StrftimeItems};
use owo_colors::Style;
use serde_json::{Map, Value};

pub const DEFAULT_FORMAT: &str =
    "%datetime% %start_tag%%level_name%%end_tag% [%channel%] %message%%context%%extra%\n";
pub const DEFAULT_DATE_FORMAT: &str = "%H:%M:%S";

/// Renders a record through a `%placeholder%` line template.
///
/// Placeholders: `%datetime%`, `%level_name%`, `%channel%`, `%message%`,
/// `%context%`, `%extra%`, and the `%start_tag%`/`%end_tag%` pair that wraps
/// the span colored after the record's level. Unknown placeholders are kept
/// verbatim.
#[derive(Debug, Clone)]
pub struct LineFormatter {
    format: String,
    date_format: String,
    colors: bool,
    multiline: bool,
}

impl LineFormatter {
    /// `date_format` must already be a valid strftime string, see
    /// [`is_valid_date_format`].
    pub fn new(
        format: impl Into<String>,
        date_format: impl Into<String>,
        colors: bool,
        multiline: bool,
    ) -> Self {
        Self {
            format: format.into(),
            date_format: date_format.into(),
            colors,
            multiline,
        }
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    pub fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.format.len() + record.message.len());
        let mut tagged: Option<String> = None;
        let mut rest = self.format.as_str();

        while let Some(start) = rest.find('%') {
            target(&mut out, &mut tagged).push_str(&rest[..start]);
            let after = &rest[start + 1..];

            let Some(end) = after.find('%') else {
                target(&mut out, &mut tagged).push('%');
                rest = after;
                continue;
            };

            match &after[..end] {
                "start_tag" => {
                    if let Some(open) = tagged.take() {
                        out.push_str(&self.paint(&open, level_style(record.level)));
                    }
                    tagged = Some(String::new());
                }
                "end_tag" => {
                    if let Some(open) = tagged.take() {
                        out.push_str(&self.paint(&open, level_style(record.level)));
                    }
                }
                name => match self.placeholder(name, record) {
                    Some(value) => target(&mut out, &mut tagged).push_str(&value),
                    None => {
                        // Not a placeholder: keep the `%` and rescan from the next one.
                        target(&mut out, &mut tagged).push('%');
                        rest = after;
                        continue;
                    }
                },
            }

            rest = &after[end + 1..];
        }

        target(&mut out, &mut tagged).push_str(rest);
        if let Some(open) = tagged {
            out.push_str(&self.paint(&open, level_style(record.level)));
        }

        out
    }

    fn placeholder(&self, name: &str, record: &LogRecord) -> Option<String> {
        let value = match name {
            "datetime" => record.datetime.format(&self.date_format).to_string(),
            "level_name" => format!("{:<9}", record.level.name()),
            "channel" => self.paint(&record.channel, Style::new().yellow()),
            "message" => self.interpolate(&record.message, &record.context),
            "context" => self.dump(&record.context),
            "extra" => self.dump(&record.extra),
            _ => return None,
        };

        Some(value)
    }

    /// Replace `{key}` in the message with the matching context value.
    fn interpolate(&self, message: &str, context: &Map<String, Value>) -> String {
        if context.is_empty() || !message.contains('{') {
            return message.to_string();
        }

        let mut out = String::with_capacity(message.len());
        let mut rest = message;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let replacement = after.find('}').and_then(|close| {
                let value = context.get(&after[..close])?;
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((close, text))
            });

            match replacement {
                Some((close, text)) => {
                    out.push_str(&self.paint(&text, Style::new().yellow()));
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    fn dump(&self, data: &Map<String, Value>) -> String {
        if data.is_empty() {
            return String::new();
        }

        let value = Value::Object(data.clone());
        if self.multiline {
            format!(
                "\n{}",
                serde_json::to_string_pretty(&value).unwrap_or_default()
            )
        } else {
            format!(" {value}")
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.colors {
            style.style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn target<'a>(out: &'a mut String, tagged: &'a mut Option<String>) -> &'a mut String {
    match tagged {
        Some(open) => open,
        None => out,
    }
}

pub fn level_style(level: Level) -> Style {
    match level {
        l if l >= Level::EMERGENCY => Style::new().white().on_red(),
        l if l >= Level::CRITICAL => Style::new().red(),
        l if l >= Level::ERROR => Style::new().yellow(),
        l if l >= Level::WARNING => Style::new().cyan(),
        l if l >= Level::NOTICE => Style::new().blue(),
        l if l >= Level::INFO => Style::new().green(),
        _ => Style::new().white(),
    }
}

/// chrono panics while rendering an invalid strftime string, so templates are
/// checked once when the configuration is resolved.
pub fn is_valid_date_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}
