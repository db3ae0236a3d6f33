//! Log output configuration, chosen once at process start.

use tracing::Level;

use crate::EnvSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub format: LogFormat,
    pub level: Level,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: Level::DEBUG,
        }
    }
}

impl LogSettings {
    /// Reads `FORMATTER_TYPE` (`JSON` or `TEXT`) and `LOG_LEVEL`.
    /// Unknown values fall back to text output at debug level.
    pub fn from_env(env: &EnvSnapshot) -> Self {
        let format = match env.get("FORMATTER_TYPE") {
            Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let level = env
            .get("LOG_LEVEL")
            .and_then(parse_level)
            .unwrap_or(Level::DEBUG);

        Self { format, level }
    }
}

fn parse_level(raw: &str) -> Option<Level> {
    match raw.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" | "fatal" | "panic" => Some(Level::ERROR),
        _ => None,
    }
}

/// Installs the global subscriber. Lambda adds its own timestamps, so none are printed.
pub fn init_tracing(settings: LogSettings) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(settings.level)
        .with_target(false)
        .without_time();

    match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let settings = LogSettings::from_env(&EnvSnapshot::default());
        assert_eq!(settings, LogSettings::default());
    }

    #[test]
    fn test_json_format_and_level() {
        let env = EnvSnapshot::from_pairs([("FORMATTER_TYPE", "JSON"), ("LOG_LEVEL", "warning")]);
        let settings = LogSettings::from_env(&env);

        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(settings.level, Level::WARN);
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let env = EnvSnapshot::from_pairs([("FORMATTER_TYPE", "xml"), ("LOG_LEVEL", "loud")]);
        let settings = LogSettings::from_env(&env);

        assert_eq!(settings.format, LogFormat::Text);
        assert_eq!(settings.level, Level::DEBUG);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("INFO"), Some(Level::INFO));
        assert_eq!(parse_level("fatal"), Some(Level::ERROR));
        assert_eq!(parse_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_level(""), None);
    }
}
