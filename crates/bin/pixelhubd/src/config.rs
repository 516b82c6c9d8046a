//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `pixelhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use pixelhub_adapter_mqtt::MqttConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Evaluation scheduler settings.
    pub engine: EngineConfig,
    /// MQTT bridge settings.
    pub mqtt: MqttSection,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Rule engine scheduler configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Milliseconds between evaluation passes.
    pub evaluation_interval_ms: u64,
}

/// MQTT bridge toggle plus the bridge's own settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MqttSection {
    /// Whether to start the MQTT bridge at all.
    pub enabled: bool,
    /// Connection and topic settings, flattened into `[mqtt]`.
    #[serde(flatten)]
    pub bridge: MqttConfig,
}

impl Config {
    /// Load configuration from `pixelhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// a value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("pixelhub.toml")?;
        config.apply_overrides(&|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply environment-variable overrides through an injected lookup.
    ///
    /// A malformed override is a hard error rather than a silent
    /// fallback: this runs before logging is initialised, so a skipped
    /// value would be invisible.
    fn apply_overrides(
        &mut self,
        var: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("PIXELHUB_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("PIXELHUB_PORT") {
            self.server.port = val.parse().map_err(|_| {
                ConfigError::Validation(format!("PIXELHUB_PORT must be a port number, got `{val}`"))
            })?;
        }
        if let Some(val) = var("PIXELHUB_BIND") {
            let malformed =
                || ConfigError::Validation(format!("PIXELHUB_BIND must be `host:port`, got `{val}`"));
            let (host, port) = val.rsplit_once(':').ok_or_else(&malformed)?;
            self.server.port = port.parse().map_err(|_| malformed())?;
            self.server.host = host.to_string();
        }
        if let Some(val) = var("PIXELHUB_MQTT_HOST") {
            self.mqtt.bridge.broker_host = val;
        }
        if let Some(val) = var("PIXELHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.engine.evaluation_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "evaluation_interval_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the evaluation interval as a [`std::time::Duration`].
    #[must_use]
    pub fn evaluation_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.engine.evaluation_interval_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "pixelhubd=info,pixelhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            evaluation_interval_ms: 2_000,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
