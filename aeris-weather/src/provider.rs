use aeris_domain::{WeatherObservation, WeatherProvider};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Cache seam owned by the weather collaborator. Injected rather than
/// ambient so tests control hits and expiry deterministically.
pub trait WeatherCache: Send + Sync {
    fn get(&self, key: &str) -> Option<WeatherObservation>;
    fn put(&self, key: &str, observation: WeatherObservation);
    fn expire(&self, key: &str);
}

/// Wraps a raw provider with a short-TTL cache keyed on rounded
/// coordinates, so a batch hitting the same field reuses one fetch.
pub struct CachingProvider<P> {
    inner: P,
    cache: Arc<dyn WeatherCache>,
}

impl<P> CachingProvider<P> {
    pub fn new(inner: P, cache: Arc<dyn WeatherCache>) -> Self {
        Self { inner, cache }
    }

    /// Two decimal places groups observations to roughly a kilometre.
    fn cache_key(latitude: f64, longitude: f64) -> String {
        format!("{:.2}:{:.2}", latitude, longitude)
    }
}

#[async_trait]
impl<P: WeatherProvider> WeatherProvider for CachingProvider<P> {
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherObservation, Box<dyn Error + Send + Sync>> {
        let key = Self::cache_key(latitude, longitude);
        if let Some(observation) = self.cache.get(&key) {
            debug!(key = %key, "weather cache hit");
            return Ok(observation);
        }
        let observation = self.inner.fetch(latitude, longitude).await?;
        self.cache.put(&key, observation.clone());
        debug!(key = %key, "weather cache filled");
        Ok(observation)
    }
}

/// In-process TTL cache. Entries expire lazily on read.
pub struct MemoryWeatherCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (DateTime<Utc>, WeatherObservation)>>,
}

impl MemoryWeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl WeatherCache for MemoryWeatherCache {
    fn get(&self, key: &str) -> Option<WeatherObservation> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((stored_at, observation)) if *stored_at + self.ttl > Utc::now() => {
                Some(observation.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: &str, observation: WeatherObservation) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), (Utc::now(), observation));
    }

    fn expire(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}
