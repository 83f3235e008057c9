use anyhow::{Context, Result};
use dotenvy::dotenv;
use placement_knowledge::ScraperConfig;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite URL; an in-memory store is used when unset
    pub database_url: Option<String>,
    pub max_retries: u32,
    pub requests_per_second: Option<u32>,
    pub fetch_timeout_secs: u64,
    /// Politeness delay range in milliseconds
    pub politeness_ms: (u64, u64),
    pub validate_identity: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = ScraperConfig::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            max_retries: parsed("SCRAPER_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
            requests_per_second: parsed("SCRAPER_REQUESTS_PER_SECOND")?,
            fetch_timeout_secs: parsed("SCRAPER_FETCH_TIMEOUT_SECS")?
                .unwrap_or(defaults.fetch_timeout_secs),
            politeness_ms: match env::var("SCRAPER_POLITENESS_MS") {
                Ok(raw) => parse_range(&raw)
                    .context("SCRAPER_POLITENESS_MS must be `<ms>` or `<min>-<max>`")?,
                Err(_) => defaults.politeness_delay_ms,
            },
            validate_identity: parsed("SCRAPER_VALIDATE_IDENTITY")?
                .unwrap_or(defaults.validate_identity),
        })
    }

    /// Scraper configuration with the environment overrides applied.
    pub fn scraper_config(&self) -> ScraperConfig {
        let mut config = ScraperConfig::default()
            .with_max_retries(self.max_retries)
            .with_fetch_timeout(self.fetch_timeout_secs)
            .with_politeness_delay(self.politeness_ms.0, self.politeness_ms.1)
            .with_identity_validation(self.validate_identity);
        if let Some(rps) = self.requests_per_second {
            config = config.with_requests_per_second(rps);
        }
        config
    }
}

/// Optional variable parsed as `T`.
fn parsed<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(None),
    }
}

/// `"1500"` or `"1000-3000"`.
fn parse_range(raw: &str) -> Result<(u64, u64)> {
    let raw = raw.trim();
    match raw.split_once('-') {
        Some((min, max)) => Ok((min.trim().parse()?, max.trim().parse()?)),
        None => {
            let ms = raw.parse()?;
            Ok((ms, ms))
        }
    }
}
