//! Retrying, header-rotating fetch wrapper used by the scraper.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchRequest, FetchedPage, Fetcher};
use crate::types::config::ScraperConfig;

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Why the fetcher is pausing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    /// Random delay before every attempt
    Politeness,
    /// Exponential delay after a failed attempt
    Backoff,
}

/// A pause the fetcher asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    pub kind: PauseKind,
    pub duration: Duration,
}

/// Source of delays, injectable so retry timing can be observed in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn pause(&self, pause: Pause);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn pause(&self, pause: Pause) {
        if !pause.duration.is_zero() {
            tokio::time::sleep(pause.duration).await;
        }
    }
}

/// Fetcher with politeness delay, User-Agent rotation and bounded retries.
///
/// Unlike the raw [`Fetcher`] contract, a non-2xx status is a failure here and
/// is retried like a transport error.
#[derive(Clone)]
pub struct PoliteFetcher {
    inner: Arc<dyn Fetcher>,
    sleeper: Arc<dyn Sleeper>,
    config: ScraperConfig,
}

impl PoliteFetcher {
    pub fn new(inner: Arc<dyn Fetcher>, config: ScraperConfig) -> Self {
        Self {
            inner,
            sleeper: Arc::new(TokioSleeper),
            config,
        }
    }

    /// Replace the sleeper (tests record pauses instead of waiting).
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// GET a page, retrying up to `max_retries` attempts.
    pub async fn get(&self, url: &str) -> FetchResult<FetchedPage> {
        let attempts = self.config.max_retries.max(1);

        for attempt in 0..attempts {
            self.sleeper
                .pause(Pause {
                    kind: PauseKind::Politeness,
                    duration: self.politeness_delay(),
                })
                .await;

            let request = self.request(url, self.config.fetch_timeout());
            match self.attempt(&request).await {
                Ok(page) => return Ok(page),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        error = %e,
                        "Fetch attempt failed"
                    );
                    if attempt + 1 < attempts {
                        self.sleeper
                            .pause(Pause {
                                kind: PauseKind::Backoff,
                                duration: self.backoff_delay(attempt),
                            })
                            .await;
                    }
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts,
        })
    }

    /// Single short attempt with no delay, used to test whether a guessed
    /// domain answers at all.
    pub async fn probe(&self, url: &str) -> FetchResult<FetchedPage> {
        let request = self.request(url, self.config.probe_timeout());
        let result = self.attempt(&request).await;
        debug!(url = %url, ok = result.is_ok(), "Probe finished");
        result
    }

    async fn attempt(&self, request: &FetchRequest) -> FetchResult<FetchedPage> {
        let page = self.inner.fetch(request).await?;
        if page.is_success() {
            Ok(page)
        } else {
            Err(FetchError::Status {
                url: request.url.clone(),
                status: page.status,
            })
        }
    }

    fn request(&self, url: &str, timeout: Duration) -> FetchRequest {
        let mut request = FetchRequest::new(url)
            .with_timeout(timeout)
            .with_header("Accept", ACCEPT)
            .with_header("Accept-Language", ACCEPT_LANGUAGE);
        if let Some(agent) = self.pick_user_agent() {
            request = request.with_header("User-Agent", agent);
        }
        request
    }

    fn pick_user_agent(&self) -> Option<&str> {
        let agents = &self.config.user_agents;
        if agents.is_empty() {
            None
        } else {
            Some(agents[fastrand::usize(..agents.len())].as_str())
        }
    }

    fn politeness_delay(&self) -> Duration {
        let (min, max) = self.config.politeness_delay_ms;
        Duration::from_millis(fastrand::u64(min..=max.max(min)))
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponential = self
            .config
            .backoff_base_ms
            .saturating_mul(1u64 << attempt.min(16));
        let jitter = fastrand::u64(0..=self.config.backoff_jitter_ms);
        Duration::from_millis(exponential.saturating_add(jitter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFetcher, RecordingSleeper};

    fn fetcher(mock: Arc<MockFetcher>, sleeper: Arc<RecordingSleeper>) -> PoliteFetcher {
        PoliteFetcher::new(mock, ScraperConfig::default().without_delays()).with_sleeper(sleeper)
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt_after_two_backoffs() {
        let mock = Arc::new(
            MockFetcher::new()
                .fail_times("https://meril.com", 2)
                .with_page("https://meril.com", "<html>Meril</html>"),
        );
        let sleeper = Arc::new(RecordingSleeper::new());
        let polite = fetcher(mock.clone(), sleeper.clone());

        let page = polite.get("https://meril.com").await.unwrap();

        assert_eq!(page.body, "<html>Meril</html>");
        assert_eq!(mock.call_count("https://meril.com"), 3);
        assert_eq!(sleeper.count(PauseKind::Backoff), 2);
        assert_eq!(sleeper.count(PauseKind::Politeness), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let mock = Arc::new(MockFetcher::new().with_status("https://down.example", 503));
        let sleeper = Arc::new(RecordingSleeper::new());
        let polite = fetcher(mock.clone(), sleeper.clone());

        let err = polite.get("https://down.example").await.unwrap_err();

        assert!(matches!(err, FetchError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(mock.call_count("https://down.example"), 3);
        assert_eq!(sleeper.count(PauseKind::Backoff), 2);
    }

    #[tokio::test]
    async fn test_sends_rotated_headers() {
        let mock = Arc::new(MockFetcher::new().with_page("https://acme.com", "ok"));
        let polite = fetcher(mock.clone(), Arc::new(RecordingSleeper::new()));

        polite.get("https://acme.com").await.unwrap();

        let request = &mock.requests()[0];
        assert!(request.header("user-agent").unwrap().starts_with("Mozilla/5.0"));
        assert_eq!(request.header("Accept-Language"), Some(ACCEPT_LANGUAGE));
    }

    #[tokio::test]
    async fn test_probe_is_single_attempt_without_pauses() {
        let mock = Arc::new(MockFetcher::new().with_status("https://www.acme.in", 404));
        let sleeper = Arc::new(RecordingSleeper::new());
        let polite = fetcher(mock.clone(), sleeper.clone());

        let err = polite.probe("https://www.acme.in").await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(mock.call_count("https://www.acme.in"), 1);
        assert!(sleeper.pauses().is_empty());
        assert_eq!(mock.requests()[0].timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let config = ScraperConfig::default().with_backoff(1000, 0);
        let polite = PoliteFetcher::new(Arc::new(MockFetcher::new()), config);

        assert_eq!(polite.backoff_delay(0), Duration::from_millis(1000));
        assert_eq!(polite.backoff_delay(1), Duration::from_millis(2000));
        assert_eq!(polite.backoff_delay(2), Duration::from_millis(4000));
    }
}
