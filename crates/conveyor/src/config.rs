use crate::error::{ConveyorError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CONVEYOR_CONF";

/// Root configuration for conveyor.
///
/// Loaded from a JSON file whose path is given by `CONVEYOR_CONF`. All
/// fields use sensible defaults if not specified.
///
/// # Examples
///
/// ```
/// use conveyor::config::ConveyorConfig;
///
/// let json = r#"{
///     "warehouse": { "uri": "https://warehouse.example.org/api/v1/" },
///     "schedule": { "packages": { "minutes": 5 } }
/// }"#;
///
/// let config: ConveyorConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.warehouse.uri, "https://warehouse.example.org/api/v1/");
/// assert_eq!(config.logging.filter, "info");
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConveyorConfig {
    #[serde(default)]
    pub warehouse: WarehouseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl ConveyorConfig {
    /// Loads the file named by `CONVEYOR_CONF`, or defaults when it is unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => {
                tracing::debug!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Loads configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content).map_err(|source| ConveyorError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

/// Location of the warehouse API that converted payloads point at.
///
/// # Defaults
///
/// - `uri`: `"http://localhost:8000/api/v1/"`
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    #[serde(default = "default_warehouse_uri")]
    pub uri: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            uri: default_warehouse_uri(),
        }
    }
}

impl WarehouseConfig {
    /// Resource URI of a project. The name is percent-encoded as one path segment.
    pub fn project_uri(&self, name: &str) -> String {
        format!(
            "{}/projects/{}/",
            self.uri.trim_end_matches('/'),
            urlencoding::encode(name)
        )
    }

    /// Resource URI of one version of a project.
    pub fn version_uri(&self, name: &str, version: &str) -> String {
        format!(
            "{}versions/{}/",
            self.project_uri(name),
            urlencoding::encode(version)
        )
    }
}

/// Log filtering used when `RUST_LOG` is not set.
///
/// # Defaults
///
/// - `filter`: `"info"`
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Intervals for the external sync scheduler.
///
/// No job is scheduled when `packages` is absent.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub packages: Option<IntervalConfig>,
}

impl ScheduleConfig {
    /// Interval of the package sync job, if one is configured.
    pub fn packages_interval(&self) -> Option<Duration> {
        self.packages.as_ref().map(IntervalConfig::as_duration)
    }
}

/// An interval expressed as a sum of units.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub struct IntervalConfig {
    #[serde(default)]
    pub weeks: u64,
    #[serde(default)]
    pub days: u64,
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

impl IntervalConfig {
    pub const fn as_duration(&self) -> Duration {
        let days = self.weeks * 7 + self.days;
        let hours = days * 24 + self.hours;
        let minutes = hours * 60 + self.minutes;
        Duration::from_secs(minutes * 60 + self.seconds)
    }
}

fn default_warehouse_uri() -> String {
    "http://localhost:8000/api/v1/".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}
