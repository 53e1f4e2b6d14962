//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown log format '{other}' (expected pretty or json)"
            ))),
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub directive: String,
    /// Output format.
    pub format: LogFormat,
    /// Optional log file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directive: "warn".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging config from file/env settings.
    ///
    /// `verbose` raises the default level to `debug` but never overrides an
    /// explicit level.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Self {
        let directive = settings
            .level
            .clone()
            .unwrap_or_else(|| if verbose { "debug" } else { "warn" }.to_string());
        let format = settings
            .format
            .as_deref()
            .map_or(Ok(LogFormat::Pretty), LogFormat::from_str)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to pretty log format");
                LogFormat::Pretty
            });

        Self {
            directive,
            format,
            file: settings.file.clone(),
        }
    }

    /// Builds the event filter, falling back to `warn` on a bad directive.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.directive).unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None, false, "warn"; "quiet default")]
    #[test_case(None, true, "debug"; "verbose default")]
    #[test_case(Some("engram=trace"), true, "engram=trace"; "explicit level wins")]
    fn test_directive(level: Option<&str>, verbose: bool, expected: &str) {
        let settings = LoggingSettings {
            level: level.map(str::to_string),
            ..LoggingSettings::default()
        };
        assert_eq!(LoggingConfig::from_settings(&settings, verbose).directive, expected);
    }

    #[test]
    fn test_format_parse() {
        let settings = LoggingSettings {
            format: Some("JSON".to_string()),
            ..LoggingSettings::default()
        };
        assert_eq!(LoggingConfig::from_settings(&settings, false).format, LogFormat::Json);

        let settings = LoggingSettings {
            format: Some("xml".to_string()),
            ..LoggingSettings::default()
        };
        assert_eq!(LoggingConfig::from_settings(&settings, false).format, LogFormat::Pretty);
    }
}
