//! Core configuration types
//!
//! This module defines the data structures that represent a tasklane.yml configuration file.

use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Project name (optional)
    #[serde(default)]
    pub name: Option<String>,

    /// Task run when none is named on the command line
    #[serde(default)]
    pub default: Option<String>,

    /// Global interpreter to use for commands (e.g., ["sh", "-c"])
    #[serde(default)]
    pub interpreter: Option<Vec<String>>,

    /// Dotenv file loaded into variables, relative to the config file
    #[serde(default)]
    pub dotenv: Option<String>,

    /// Global variables, in file order
    #[serde(default, deserialize_with = "deserialize_vars")]
    pub vars: Vec<(String, String)>,

    /// Tasks, in file order
    #[serde(default, deserialize_with = "deserialize_tasks")]
    pub tasks: Vec<(String, Task)>,
}

impl Config {
    /// Look up a task by name
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

/// A task definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Task {
    /// Description for --list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tasks that must run first
    #[serde(default, alias = "dependencies", skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,

    /// Conditions that must all hold for the task to run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub when: Vec<When>,

    /// Commands to execute
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_commands"
    )]
    pub run: Vec<Command>,

    /// Variable receiving the trimmed stdout of the commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<String>,

    /// Hidden from --list
    #[serde(default)]
    pub private: bool,
}

/// A command to execute
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// Simple string command
    Simple(String),

    /// Complex command with additional options
    Complex(CommandDetail),
}

/// Detailed command specification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandDetail {
    /// The command to execute
    pub exec: String,

    /// What to print when running (defaults to exec)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to suppress the command echo
    #[serde(default)]
    pub quiet: bool,

    /// Working directory for the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// A conditional expression; exactly one field is expected to be set
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct When {
    /// Check if values are equal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equal: Option<WhenComparison>,

    /// Check if values are not equal
    #[serde(rename = "not-equal", skip_serializing_if = "Option::is_none")]
    pub not_equal: Option<WhenComparison>,

    /// Check if a command succeeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Check if a path exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<String>,

    /// Check if environment variable is set
    #[serde(rename = "env-set", skip_serializing_if = "Option::is_none")]
    pub env_set: Option<String>,

    /// Check if environment variable is not set
    #[serde(rename = "env-not-set", skip_serializing_if = "Option::is_none")]
    pub env_not_set: Option<String>,

    /// Check if a variable is set
    #[serde(rename = "var-set", skip_serializing_if = "Option::is_none")]
    pub var_set: Option<String>,

    /// Check if a variable is not set
    #[serde(rename = "var-not-set", skip_serializing_if = "Option::is_none")]
    pub var_not_set: Option<String>,
}

impl When {
    /// Number of condition kinds set on this entry
    pub fn condition_count(&self) -> usize {
        [
            self.equal.is_some(),
            self.not_equal.is_some(),
            self.command.is_some(),
            self.exists.is_some(),
            self.env_set.is_some(),
            self.env_not_set.is_some(),
            self.var_set.is_some(),
            self.var_not_set.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

/// A comparison for when conditions
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhenComparison {
    /// Left-hand side of comparison
    pub left: String,

    /// Right-hand side of comparison
    pub right: String,
}

/// Split a YAML mapping into key/value pairs, keeping the file order
fn mapping_entries<E: serde::de::Error>(
    value: serde_yaml::Value,
) -> Result<Vec<(String, serde_yaml::Value)>, E> {
    use serde_yaml::Value;

    match value {
        Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(key, item)| {
                scalar_to_string(key)
                    .map(|key| (key, item))
                    .ok_or_else(|| E::custom("mapping keys must be scalars"))
            })
            .collect(),
        // Null or not present
        Value::Null => Ok(Vec::new()),
        _ => Err(E::custom("expected a mapping")),
    }
}

fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Deserialize the task mapping, keeping the file order
fn deserialize_tasks<'de, D>(deserializer: D) -> Result<Vec<(String, Task)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_yaml::Value::deserialize(deserializer)?;
    mapping_entries::<D::Error>(value)?
        .into_iter()
        .map(|(name, item)| {
            let task = serde_yaml::from_value(item)
                .map_err(|e| D::Error::custom(format!("task '{}': {}", name, e)))?;
            Ok((name, task))
        })
        .collect()
}

/// Deserialize variables, accepting any scalar as a value
fn deserialize_vars<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_yaml::Value::deserialize(deserializer)?;
    mapping_entries::<D::Error>(value)?
        .into_iter()
        .map(|(name, item)| {
            scalar_to_string(item)
                .map(|v| (name.clone(), v))
                .ok_or_else(|| D::Error::custom(format!("variable '{}' must be a scalar", name)))
        })
        .collect()
}

/// Custom deserializer for commands that handles both single values and arrays
fn deserialize_commands<'de, D>(deserializer: D) -> Result<Vec<Command>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        // Single string or complex command
        Value::String(s) => Ok(vec![Command::Simple(s)]),
        Value::Mapping(_) => {
            let cmd = Command::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![cmd])
        }
        // Array of commands
        Value::Sequence(seq) => {
            let mut cmds = Vec::new();
            for item in seq {
                let cmd = Command::deserialize(item).map_err(D::Error::custom)?;
                cmds.push(cmd);
            }
            Ok(cmds)
        }
        // Null or not present
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string, object, or array")),
    }
}
