//! Fetcher implementations.
//!
//! - `HttpFetcher` - Direct HTTP transport over reqwest
//! - `RateLimitedFetcher` - Wrapper that adds a global rate cap
//! - `PoliteFetcher` - Politeness delay, User-Agent rotation and retries

pub mod http;
pub mod polite;
pub mod rate_limited;

pub use http::HttpFetcher;
pub use polite::{Pause, PauseKind, PoliteFetcher, Sleeper, TokioSleeper};
pub use rate_limited::RateLimitedFetcher;

use std::sync::Arc;

use crate::traits::fetcher::Fetcher;
use crate::types::config::ScraperConfig;

/// Production transport stack for a scraper configuration.
pub fn http_stack(config: &ScraperConfig) -> Arc<dyn Fetcher> {
    let http = HttpFetcher::new();
    match config.requests_per_second {
        Some(rps) => Arc::new(RateLimitedFetcher::new(http, rps)),
        None => Arc::new(http),
    }
}
