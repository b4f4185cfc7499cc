pub mod evaluator;
pub mod minimums;
pub mod provider;

pub use evaluator::{evaluate, evaluate_with_runway, EvaluationError, DEFAULT_RUNWAY_HEADING};
pub use minimums::minimums_for;
pub use provider::{CachingProvider, MemoryWeatherCache, WeatherCache};
