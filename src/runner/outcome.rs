//! Task outcomes
//!
//! Task bodies may return loosely shaped values: nothing, a boolean, a JSON value
//! carrying a `status` field, or any other payload. Everything is normalized into
//! [`Outcome`] at the task boundary by [`IntoOutcome`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Final status of a single task within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Ok,
    Skip,
    Error,
}

impl TaskStatus {
    /// Wire name of this status
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Ok => "ok",
            TaskStatus::Skip => "skip",
            TaskStatus::Error => "error",
        }
    }

    /// Parse a status name, returning `None` for anything unrecognized
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ok" => Some(TaskStatus::Ok),
            "skip" => Some(TaskStatus::Skip),
            "error" => Some(TaskStatus::Error),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized result of invoking a task body
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Success, with an optional payload
    Ok(Option<Value>),

    /// The task decided not to do its work
    Skip(Option<String>),

    /// The task failed with a message
    Error(String),
}

impl Outcome {
    pub fn ok() -> Self {
        Outcome::Ok(None)
    }

    pub fn with_value(value: impl Into<Value>) -> Self {
        Outcome::Ok(Some(value.into()))
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Outcome::Skip(Some(reason.into()))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Outcome::Error(message.into())
    }

    pub fn status(&self) -> TaskStatus {
        match self {
            Outcome::Ok(_) => TaskStatus::Ok,
            Outcome::Skip(_) => TaskStatus::Skip,
            Outcome::Error(_) => TaskStatus::Error,
        }
    }
}

/// Conversion from whatever a task body returns into an [`Outcome`]
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Outcome::Ok(None)
    }
}

/// `true` is a plain success; `false` is kept as a payload rather than read as failure.
impl IntoOutcome for bool {
    fn into_outcome(self) -> Outcome {
        if self {
            Outcome::Ok(None)
        } else {
            Outcome::Ok(Some(Value::Bool(false)))
        }
    }
}

impl IntoOutcome for Value {
    fn into_outcome(self) -> Outcome {
        normalize_value(self)
    }
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Outcome {
        Outcome::Ok(Some(Value::String(self)))
    }
}

impl IntoOutcome for &str {
    fn into_outcome(self) -> Outcome {
        Outcome::Ok(Some(Value::String(self.to_string())))
    }
}

macro_rules! number_outcome {
    ($($ty:ty),*) => {
        $(
            impl IntoOutcome for $ty {
                fn into_outcome(self) -> Outcome {
                    Outcome::Ok(Some(Value::from(self)))
                }
            }
        )*
    };
}

number_outcome!(i32, i64, u32, u64, usize, f64);

impl<T: IntoOutcome> IntoOutcome for Option<T> {
    fn into_outcome(self) -> Outcome {
        match self {
            Some(value) => value.into_outcome(),
            None => Outcome::Ok(None),
        }
    }
}

/// An `Err` from a task body becomes an error outcome carrying its message.
impl<T: IntoOutcome, E: fmt::Display> IntoOutcome for Result<T, E> {
    fn into_outcome(self) -> Outcome {
        match self {
            Ok(value) => value.into_outcome(),
            Err(e) => Outcome::Error(e.to_string()),
        }
    }
}

/// Map a JSON value onto an outcome.
///
/// Objects with a `status` field are structured results: `skip` reads `reason`,
/// `error` reads `error`, and `ok` (or any unrecognized status) keeps `result` as
/// the payload, or the remaining fields when there is no `result`. Every other
/// value is a success with the value as payload.
pub fn normalize_value(value: Value) -> Outcome {
    match value {
        Value::Null | Value::Bool(true) => Outcome::Ok(None),
        Value::Object(mut map) if map.contains_key("status") => {
            let status = map
                .get("status")
                .and_then(Value::as_str)
                .and_then(TaskStatus::parse)
                .unwrap_or(TaskStatus::Ok);
            match status {
                TaskStatus::Skip => Outcome::Skip(string_field(&map, "reason")),
                TaskStatus::Error => Outcome::Error(
                    string_field(&map, "error")
                        .unwrap_or_else(|| "task reported an error".to_string()),
                ),
                TaskStatus::Ok => match map.remove("result") {
                    Some(result) => Outcome::Ok(Some(result)),
                    None => {
                        map.remove("status");
                        Outcome::Ok((!map.is_empty()).then_some(Value::Object(map)))
                    }
                },
            }
        }
        other => Outcome::Ok(Some(other)),
    }
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Conversion from a condition's return value into "should this task run"
pub trait IntoCondition {
    fn into_condition(self) -> Result<bool, String>;
}

impl IntoCondition for bool {
    fn into_condition(self) -> Result<bool, String> {
        Ok(self)
    }
}

impl<E: fmt::Display> IntoCondition for Result<bool, E> {
    fn into_condition(self) -> Result<bool, String> {
        self.map_err(|e| e.to_string())
    }
}
