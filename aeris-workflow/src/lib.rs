pub mod app_config;
pub mod orchestrator;

pub use app_config::{Config, WeatherConfig, WorkflowConfig};
pub use orchestrator::{WorkflowError, WorkflowOrchestrator};

use aeris_domain::WeatherProvider;
use aeris_weather::{CachingProvider, MemoryWeatherCache};
use chrono::Duration;
use std::sync::Arc;

/// Wires the configured TTL cache in front of a raw weather provider, so a
/// batch of bookings at the same field shares one fetch.
pub fn cached_weather<P: WeatherProvider>(
    inner: P,
    config: &WeatherConfig,
) -> CachingProvider<P> {
    let cache = MemoryWeatherCache::new(Duration::seconds(config.cache_ttl_seconds));
    CachingProvider::new(inner, Arc::new(cache))
}
