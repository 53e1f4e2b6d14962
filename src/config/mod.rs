//! Configuration management.
//!
//! Settings come from a TOML file, then environment variables, then CLI
//! flags, each layer overriding the previous one.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ENGRAM_CONFIG_PATH";

/// Main configuration for engram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngramConfig {
    /// Backend connection settings.
    pub api: ApiSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// View behavior.
    pub ui: UiSettings,
    /// Graph layout tuning.
    pub layout: LayoutSettings,
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Cortex base URL.
    pub base_url: String,
    /// Request timeout in milliseconds (0 disables).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 disables).
    pub connect_timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: crate::client::HttpCortexClient::DEFAULT_BASE_URL.to_string(),
            timeout_ms: 120_000,
            connect_timeout_ms: 3_000,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `engram=debug`.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// What Home does with a clear analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapturePolicy {
    /// Save immediately.
    #[default]
    Auto,
    /// Hold the draft until the user confirms.
    Confirm,
}

impl FromStr for CapturePolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "confirm" => Ok(Self::Confirm),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown capture policy '{other}' (expected auto or confirm)"
            ))),
        }
    }
}

/// `[ui]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Recent memories kept on Home.
    pub recent_limit: usize,
    /// Auto-save or confirm.
    pub capture_policy: CapturePolicy,
    /// Lifetime of the settings "Saved" notice.
    pub saved_notice_ms: u64,
    /// Lifetime of reindex/reset success notices.
    pub action_notice_ms: u64,
    /// Lifetime of the graph delete notice.
    pub delete_notice_ms: u64,
    /// Snippet preview length in Recall.
    pub snippet_chars: usize,
    /// Default canvas width in cells.
    pub canvas_width: usize,
    /// Default canvas height in cells.
    pub canvas_height: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            recent_limit: 3,
            capture_policy: CapturePolicy::Auto,
            saved_notice_ms: 2_000,
            action_notice_ms: 5_000,
            delete_notice_ms: 3_000,
            snippet_chars: 120,
            canvas_width: 80,
            canvas_height: 24,
        }
    }
}

/// `[layout]` section.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Simulation steps per layout.
    pub iterations: usize,
    /// Preferred link length in world units.
    pub target_distance: f64,
    /// Spacing below which nodes push each other apart.
    pub min_separation: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            iterations: 400,
            target_distance: 120.0,
            min_separation: 90.0,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// `[api]`
    pub api: Option<ApiSettings>,
    /// `[logging]`
    pub logging: Option<LoggingSettings>,
    /// `[ui]`
    pub ui: Option<UiSettings>,
    /// `[layout]`
    pub layout: Option<LayoutSettings>,
}

impl EngramConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid config TOML.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/engram/` on macOS)
    /// 2. XDG config dir (`~/.config/engram/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("engram").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("engram")
                .join("config.toml"),
        ];
        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                },
            }
        }

        Self::default()
    }

    /// Resolves the config file and applies environment overrides.
    ///
    /// An explicit path (from `--config`) wins over `ENGRAM_CONFIG_PATH`,
    /// which wins over the default locations. Explicit paths must load.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> crate::Result<Self> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::load_default(),
        };
        Ok(config.with_env_overrides())
    }

    fn from_config_file(file: ConfigFile) -> Self {
        Self {
            api: file.api.unwrap_or_default(),
            logging: file.logging.unwrap_or_default(),
            ui: file.ui.unwrap_or_default(),
            layout: file.layout.unwrap_or_default(),
        }
    }

    /// Applies `ENGRAM_*` environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    #[must_use]
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("ENGRAM_API_URL") {
            self.api.base_url = url;
        }
        if let Some(ms) = lookup("ENGRAM_TIMEOUT_MS").and_then(|v| parse_millis("ENGRAM_TIMEOUT_MS", &v)) {
            self.api.timeout_ms = ms;
        }
        if let Some(ms) = lookup("ENGRAM_CONNECT_TIMEOUT_MS")
            .and_then(|v| parse_millis("ENGRAM_CONNECT_TIMEOUT_MS", &v))
        {
            self.api.connect_timeout_ms = ms;
        }
        if let Some(level) = lookup("ENGRAM_LOG") {
            self.logging.level = Some(level);
        }
        if let Some(format) = lookup("ENGRAM_LOG_FORMAT") {
            self.logging.format = Some(format);
        }
        if let Some(file) = lookup("ENGRAM_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }

        self
    }

    /// Sets the backend base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    /// Sets the capture policy.
    #[must_use]
    pub const fn with_capture_policy(mut self, policy: CapturePolicy) -> Self {
        self.ui.capture_policy = policy;
        self
    }
}

fn parse_millis(key: &str, raw: &str) -> Option<u64> {
    match raw.trim().parse() {
        Ok(ms) => Some(ms),
        Err(e) => {
            tracing::warn!(key, value = raw, error = %e, "Ignoring non-numeric timeout");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngramConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.ui.recent_limit, 3);
        assert_eq!(config.ui.capture_policy, CapturePolicy::Auto);
        assert_eq!(config.ui.saved_notice_ms, 2_000);
        assert_eq!(config.ui.action_notice_ms, 5_000);
    }

    #[test]
    fn test_partial_file_keeps_section_defaults() {
        let config = EngramConfig::from_toml(
            r#"
            [api]
            base_url = "http://cortex.lan:9000"

            [ui]
            capture_policy = "confirm"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://cortex.lan:9000");
        assert_eq!(config.api.timeout_ms, 120_000);
        assert_eq!(config.ui.capture_policy, CapturePolicy::Confirm);
        assert_eq!(config.ui.recent_limit, 3);
        assert_eq!(config.layout, LayoutSettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\niterations = 50\n\n[logging]\nformat = \"json\"").unwrap();

        let config = EngramConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.layout.iterations, 50);
        assert_eq!(config.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngramConfig::load_from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::OperationFailed { .. }));
    }

    #[test]
    fn test_invalid_toml_fails() {
        assert!(EngramConfig::from_toml("[api\nbase_url = 1").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ENGRAM_API_URL", "http://10.0.0.2:8000"),
            ("ENGRAM_TIMEOUT_MS", "5000"),
            ("ENGRAM_CONNECT_TIMEOUT_MS", "soon"),
            ("ENGRAM_LOG", "engram=debug"),
            ("ENGRAM_LOG_FILE", ""),
        ]);
        let config =
            EngramConfig::default().apply_env(|k| env.get(k).map(|v| (*v).to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.api.timeout_ms, 5_000);
        assert_eq!(config.api.connect_timeout_ms, 3_000);
        assert_eq!(config.logging.level.as_deref(), Some("engram=debug"));
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_capture_policy_parse() {
        assert_eq!("Confirm".parse::<CapturePolicy>().unwrap(), CapturePolicy::Confirm);
        assert!("sometimes".parse::<CapturePolicy>().is_err());
    }
}
