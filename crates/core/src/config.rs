//! Configuration management for citeline.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config file (.citeline/config.yaml, or the path in `CITELINE_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Default backend location (the RAG service listens here out of the box).
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Route the backend serves answers on.
pub const DEFAULT_ANALYZE_PATH: &str = "/analyze/";

/// The backend allows its model up to two minutes per answer.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (may contain .citeline/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Where answers come from
    pub backend: BackendConfig,

    /// Log level override
    pub log_level: Option<String>,

    /// Log line format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Connection settings for the answer backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL, e.g. "http://127.0.0.1:8000"
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    /// Route appended to the base URL
    #[serde(rename = "analyzePath")]
    pub analyze_path: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            analyze_path: DEFAULT_ANALYZE_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    /// Full URL of the analyze route.
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.analyze_path.trim_start_matches('/')
        )
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::Config(format!(
                "Unknown log format: {}. Supported: text, json",
                other
            ))),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    backend: Option<BackendSection>,
    workspace: Option<WorkspaceSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BackendSection {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
    #[serde(rename = "analyzePath")]
    analyze_path: Option<String>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WorkspaceSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    format: Option<LogFormat>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            backend: BackendConfig::default(),
            log_level: None,
            log_format: LogFormat::Text,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and the environment.
    ///
    /// Environment variables:
    /// - `CITELINE_WORKSPACE`: Override workspace path
    /// - `CITELINE_CONFIG`: Path to config file
    /// - `CITELINE_BACKEND_URL`: Backend base URL
    /// - `CITELINE_TIMEOUT_SECS`: Request timeout
    /// - `CITELINE_LOG_FORMAT`: `text` or `json`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use citeline_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Backend: {}", config.backend.analyze_url());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like [`AppConfig::load`], with the workspace and config file chosen by
    /// the caller (CLI flags) instead of the environment.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("CITELINE_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("CITELINE_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.default_config_path());

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(url) = std::env::var("CITELINE_BACKEND_URL") {
            config.backend.base_url = url;
        }

        if let Ok(timeout) = std::env::var("CITELINE_TIMEOUT_SECS") {
            config.backend.timeout_secs = timeout.parse().map_err(|_| {
                AppError::Config(format!("CITELINE_TIMEOUT_SECS is not a number: {}", timeout))
            })?;
        }

        if let Ok(format) = std::env::var("CITELINE_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        tracing::debug!("Merging config file {:?}", path);

        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        if let Some(backend) = config_file.backend {
            if let Some(url) = backend.base_url {
                result.backend.base_url = url;
            }
            if let Some(path) = backend.analyze_path {
                result.backend.analyze_path = path;
            }
            if let Some(timeout) = backend.timeout_secs {
                result.backend.timeout_secs = timeout;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over the environment and the config file.
    pub fn with_overrides(
        mut self,
        backend_url: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(url) = backend_url {
            self.backend.base_url = url;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .citeline directory.
    pub fn citeline_dir(&self) -> PathBuf {
        self.workspace.join(".citeline")
    }

    fn default_config_path(&self) -> PathBuf {
        self.citeline_dir().join("config.yaml")
    }

    /// Validate the backend settings.
    pub fn validate(&self) -> AppResult<()> {
        let url = self.backend.base_url.trim();

        if url.is_empty() {
            return Err(AppError::Config("Backend URL is empty".to_string()));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "Backend URL must start with http:// or https://: {}",
                url
            )));
        }

        if self.backend.timeout_secs == 0 {
            return Err(AppError::Config(
                "Backend timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.backend.timeout_secs, 120);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_analyze_url_joins_slashes() {
        let mut backend = BackendConfig::default();
        assert_eq!(backend.analyze_url(), "http://127.0.0.1:8000/analyze/");

        backend.base_url = "https://rag.example.org/".to_string();
        backend.analyze_path = "analyze/".to_string();
        assert_eq!(backend.analyze_url(), "https://rag.example.org/analyze/");
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            Some("http://10.0.0.5:9000".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(config.backend.base_url, "http://10.0.0.5:9000");
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_explicit_level_survives_verbose() {
        let config =
            AppConfig::default().with_overrides(None, Some("trace".to_string()), true, false);
        assert_eq!(config.log_level, Some("trace".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "backend:\n  baseUrl: http://192.168.10.50:8000\n  timeoutSecs: 30\nlogging:\n  level: debug\n  color: false\n  format: json\n",
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(merged.backend.base_url, "http://192.168.10.50:8000");
        assert_eq!(merged.backend.analyze_path, "/analyze/");
        assert_eq!(merged.backend.timeout_secs, 30);
        assert_eq!(merged.log_level, Some("debug".to_string()));
        assert_eq!(merged.log_format, LogFormat::Json);
        assert!(merged.no_color);
    }

    #[test]
    fn test_merge_yaml_rejects_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "backend: [unclosed").unwrap();

        let err = AppConfig::default().merge_yaml(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_load_with_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yaml");
        std::fs::write(&path, "backend:\n  analyzePath: /v2/analyze/\n").unwrap();

        let config = AppConfig::load_with(Some(temp.path().to_path_buf()), Some(path)).unwrap();
        assert_eq!(config.backend.analyze_path, "/v2/analyze/");
    }

    #[test]
    fn test_load_with_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");

        let err = AppConfig::load_with(Some(temp.path().to_path_buf()), Some(missing)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.backend.base_url = "ftp://example.org".to_string();
        assert!(config.validate().is_err());

        config.backend.base_url = "http://localhost:8000".to_string();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
