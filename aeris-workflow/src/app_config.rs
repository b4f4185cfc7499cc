use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowConfig {
    /// Bookings starting within this many hours are due for a check.
    #[serde(default = "default_look_ahead_hours")]
    pub look_ahead_hours: i64,
    /// Bookings processed concurrently per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Upper bound on each external call so one hung dependency cannot
    /// stall a batch.
    #[serde(default = "default_call_timeout_seconds")]
    pub call_timeout_seconds: u64,
    /// Testing mode: overrides a safe evaluation with synthetic hazards to
    /// exercise the unsafe path.
    #[serde(default)]
    pub force_conflict: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: i64,
    #[serde(default = "default_runway_heading")]
    pub runway_heading: f64,
}

fn default_look_ahead_hours() -> i64 {
    24
}

fn default_batch_size() -> usize {
    5
}

fn default_call_timeout_seconds() -> u64 {
    15
}

fn default_cache_ttl_seconds() -> i64 {
    300
}

fn default_runway_heading() -> f64 {
    360.0
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            look_ahead_hours: default_look_ahead_hours(),
            batch_size: default_batch_size(),
            call_timeout_seconds: default_call_timeout_seconds(),
            force_conflict: false,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: default_cache_ttl_seconds(),
            runway_heading: default_runway_heading(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default").required(false))
            // Add in the current environment file, default 'development'
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `AERIS__WORKFLOW__BATCH_SIZE=10`
            .add_source(config::Environment::with_prefix("AERIS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
