use crate::editor::DEFAULT_VARIABLE_NAME;
use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Language assumed when a request does not name one
    pub default_language: String,
    /// Name proposed for extracted variables
    pub extracted_variable_name: String,
    /// Largest buffer accepted by the refactoring tools (in bytes)
    pub max_code_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_language: "typescript".to_string(),
            extracted_variable_name: DEFAULT_VARIABLE_NAME.to_string(),
            max_code_size: 1024 * 1024, // 1MB
        }
    }
}

impl ServiceConfig {
    /// Read a YAML configuration file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        let content = fs::read_to_string(path)?;
        let config: ServiceConfig = serde_yaml::from_str(&content)?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// `~/.config/abracadabra/config.yaml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("abracadabra").join("config.yaml"))
    }

    /// Load `path` if given, else the default file when it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ServiceError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_language: javascript").unwrap();

        let config = ServiceConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.default_language, "javascript");
        assert_eq!(config.extracted_variable_name, "extracted");
        assert_eq!(config.max_code_size, 1024 * 1024);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_code_size: [not, a, number]").unwrap();

        let err = ServiceConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ServiceError::SerdeYaml(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServiceConfig::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
    }
}
