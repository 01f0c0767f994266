//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, TasklaneError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["tasklane.yml", "tasklane.yaml"];

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut searched_paths = Vec::new();

    for dir in start_dir.ancestors() {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = dir.join(file_name);
            if config_path.is_file() {
                return Ok(config_path);
            }
            searched_paths.push(config_path.display().to_string());
        }
    }

    Err(ConfigError::NotFound(searched_paths.join(", ")))
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, TasklaneError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, TasklaneError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Parse configuration with automatic file discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf), TasklaneError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_simple_config() {
        let yaml = r#"
tasks:
  hello:
    description: Say hello
    run: echo "hello"
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.tasks.len(), 1);
        assert!(config.task("hello").is_some());
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("tasklane.yml");

        fs::write(&config_path, "tasks: {}\n").unwrap();

        let found = find_config_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_yaml_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("tasklane.yaml");

        fs::write(&config_path, "tasks: {}\n").unwrap();

        let found = find_config_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("tasklane.yml");
        let sub_dir = temp_dir.path().join("subdir");

        fs::create_dir(&sub_dir).unwrap();
        fs::write(&config_path, "tasks: {}\n").unwrap();

        let found = find_config_file_from(sub_dir).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_config_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = find_config_file_from(temp_dir.path().to_path_buf());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_parse_config_with_name_and_default() {
        let yaml = r#"
name: my-app
default: hello
tasks:
  hello:
    run: echo "hello"
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.name, Some("my-app".to_string()));
        assert_eq!(config.default, Some("hello".to_string()));
    }

    #[test]
    fn test_parse_config_with_interpreter() {
        let yaml = r#"
interpreter:
  - bash
  - -c
tasks:
  hello:
    run: echo "hello"
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(
            config.interpreter,
            Some(vec!["bash".to_string(), "-c".to_string()])
        );
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_config("tasks: [unclosed");
        assert!(matches!(result, Err(TasklaneError::Yaml(_))));
    }
}
