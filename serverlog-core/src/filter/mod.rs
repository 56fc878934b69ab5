#[cfg(feature = "filter")]
pub mod expr;

#[cfg(all(test, feature = "filter"))]
mod tests;

use crate::record::LogRecord;
use thiserror::Error;

/// Variables a filter expression may reference, one per record field.
pub const FILTER_VARIABLES: [&str; 8] = [
    "level",
    "level_name",
    "channel",
    "message",
    "context",
    "extra",
    "datetime",
    "log_id",
];

#[derive(Debug, Error)]
pub enum FilterError {
    #[error(
        "filtering needs the expression engine, which this build does not include (enable the `filter` feature)"
    )]
    EngineUnavailable,

    #[cfg(feature = "filter")]
    #[error("invalid filter expression \"{expression}\": {source}")]
    Syntax {
        expression: String,
        #[source]
        source: expr::ParseError,
    },

    #[cfg(feature = "filter")]
    #[error("filter \"{expression}\" failed on a record: {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: expr::EvalError,
    },
}

/// Boolean predicate over records, built from the user's `--filter`.
#[derive(Debug)]
pub struct FilterEvaluator {
    expression: String,
    #[cfg(feature = "filter")]
    program: expr::Program,
    #[cfg(not(feature = "filter"))]
    unavailable: std::convert::Infallible,
}

impl FilterEvaluator {
    /// `None` for a missing or blank expression: every record passes.
    pub fn from_config(expression: Option<&str>) -> Result<Option<Self>, FilterError> {
        match expression.map(str::trim) {
            Some(expression) if !expression.is_empty() => Self::compile(expression).map(Some),
            _ => Ok(None),
        }
    }

    #[cfg(feature = "filter")]
    pub fn compile(expression: &str) -> Result<Self, FilterError> {
        let program = expr::Program::compile(expression, &FILTER_VARIABLES).map_err(|source| {
            FilterError::Syntax {
                expression: expression.to_string(),
                source,
            }
        })?;

        Ok(Self {
            expression: expression.to_string(),
            program,
        })
    }

    #[cfg(not(feature = "filter"))]
    pub fn compile(_expression: &str) -> Result<Self, FilterError> {
        Err(FilterError::EngineUnavailable)
    }

    /// An evaluation error means the expression does not fit the data it
    /// filters; callers treat it as fatal.
    #[cfg(feature = "filter")]
    pub fn evaluate(&self, record: &LogRecord) -> Result<bool, FilterError> {
        self.program
            .test(&record.variables())
            .map_err(|source| FilterError::Evaluation {
                expression: self.expression.clone(),
                source,
            })
    }

    #[cfg(not(feature = "filter"))]
    pub fn evaluate(&self, _record: &LogRecord) -> Result<bool, FilterError> {
        match self.unavailable {}
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}
