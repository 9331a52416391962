//! Configuration Management
//!
//! The run is driven by a YAML file:
//!
//! ```yaml
//! project_id: my-project
//! labels:
//!   env: prod
//!   team: data
//! search_asset_types:
//!   - storage.googleapis.com/Bucket
//! overwrite_existing: false
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::asset::kind::supported_type_tags;
use crate::error::{Error, Result};
use crate::gcp::auth::{get_default_project, validate_project_id};
use crate::labels::LabelSet;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Contents of the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Project to search and label. May come from `--project` or gcloud instead.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Labels to apply to every asset
    #[serde(default)]
    pub labels: LabelSet,
    /// Asset type filter passed to discovery
    #[serde(default = "supported_type_tags")]
    pub search_asset_types: Vec<String>,
    /// Replace existing labels instead of merging into them
    #[serde(default)]
    pub overwrite_existing: bool,
}

/// Validated settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project_id: String,
    pub labels: LabelSet,
    pub search_asset_types: Vec<String>,
    pub overwrite_existing: bool,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(?path, "Loading config from file");
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::Config(format!(
                "Failed to load config file {}: {err}",
                path.display()
            ))
        })?;
        content.parse().map_err(|err| {
            Error::Config(format!(
                "Failed to parse config file {}: {err}",
                path.display()
            ))
        })
    }

    /// Project precedence: CLI > config file > gcloud default
    pub fn effective_project(&self, cli_project: Option<&str>) -> Option<String> {
        cli_project
            .map(str::to_string)
            .or_else(|| self.project_id.clone())
            .or_else(get_default_project)
    }

    /// Check the file's contents once the project is known
    pub fn validate(&self, project_id: &str) -> Result<()> {
        if !validate_project_id(project_id) {
            return Err(Error::Config(format!(
                "'{}' is not a valid project id",
                project_id
            )));
        }
        if self.labels.is_empty() {
            return Err(Error::Config("'labels' must not be empty".to_string()));
        }
        if self.search_asset_types.is_empty() {
            return Err(Error::Config(
                "'search_asset_types' must list at least one type".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the project and validate everything needed for a run
    pub fn resolve(self, cli_project: Option<&str>) -> Result<Settings> {
        let project_id = self.effective_project(cli_project).ok_or_else(|| {
            Error::Config(
                "No GCP project configured. Set project_id, use --project, or set GOOGLE_CLOUD_PROJECT"
                    .to_string(),
            )
        })?;
        self.validate(&project_id)?;

        Ok(Settings {
            project_id,
            labels: self.labels,
            search_asset_types: self.search_asset_types,
            overwrite_existing: self.overwrite_existing,
        })
    }
}

impl FromStr for Config {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_yaml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const FULL: &str = r#"
project_id: demo-project
labels:
  env: prod
  team: data
search_asset_types:
  - storage.googleapis.com/Bucket
overwrite_existing: true
"#;

    #[test]
    fn test_parse_full_config() {
        let config: Config = FULL.parse().unwrap();
        assert_eq!(config.project_id.as_deref(), Some("demo-project"));
        assert_eq!(config.labels.get("env").map(String::as_str), Some("prod"));
        assert_eq!(
            config.search_asset_types,
            vec!["storage.googleapis.com/Bucket".to_string()]
        );
        assert!(config.overwrite_existing);
    }

    #[test]
    fn test_defaults_for_optional_keys() {
        let config: Config = "project_id: demo-project\nlabels: {env: prod}\n"
            .parse()
            .unwrap();
        assert!(!config.overwrite_existing);
        assert_eq!(config.search_asset_types, supported_type_tags());
    }

    #[test]
    fn test_cli_project_wins() {
        let config: Config = FULL.parse().unwrap();
        let settings = config.resolve(Some("cli-project")).unwrap();
        assert_eq!(settings.project_id, "cli-project");
    }

    #[test]
    fn test_empty_labels_rejected() {
        let config: Config = "project_id: demo-project\nlabels: {}\n".parse().unwrap();
        let err = config.resolve(None).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("labels")));
    }

    #[test]
    fn test_invalid_project_rejected() {
        let config: Config = FULL.parse().unwrap();
        assert!(matches!(
            config.resolve(Some("Bad_Project")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.labels.len(), 2);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("Failed to load")));
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"labels: [not, a, map]\n").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("Failed to parse")));
    }
}
