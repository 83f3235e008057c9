//! Configuration types for scraping and query handling.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Place names used to recognize location text on company pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gazetteer {
    /// City names, matched case-insensitively as whole words.
    #[serde(deserialize_with = "lowercase_names")]
    pub cities: Vec<String>,

    /// Country names and abbreviations, only used for address blocks.
    #[serde(default, deserialize_with = "lowercase_names")]
    pub countries: Vec<String>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self {
            cities: [
                "vapi", "mumbai", "delhi", "bangalore", "bengaluru", "pune", "hyderabad",
                "chennai", "kolkata", "gurgaon", "gurugram", "noida", "ahmedabad",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            countries: ["india", "usa", "uk"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Gazetteer {
    pub fn new(cities: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            cities: normalize_names(cities.into_iter().map(Into::into)),
            countries: vec![],
        }
    }

    pub fn with_countries(mut self, countries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.countries = normalize_names(countries.into_iter().map(Into::into));
        self
    }

    /// Whether `text` mentions any city as a whole word.
    pub fn mentions_city(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.cities.iter().any(|c| contains_word(&lower, c))
    }

    /// Whether `text` mentions any city or country as a whole word.
    pub fn mentions_place(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.mentions_city(&lower) || self.countries.iter().any(|c| contains_word(&lower, c))
    }

    /// Regex alternation over the city names, escaped.
    pub fn city_alternation(&self) -> String {
        self.cities
            .iter()
            .map(|c| regex::escape(c))
            .collect::<Vec<_>>()
            .join("|")
    }
}

fn normalize_names(names: impl Iterator<Item = String>) -> Vec<String> {
    names
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}

fn lowercase_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(normalize_names(names.into_iter()))
}

/// Whether `needle` occurs in `haystack` with no letter or digit on either
/// side.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Configuration for the multi-source scraper and its fetch layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Attempts per fetch before giving up. Default: 3.
    pub max_retries: u32,

    /// Base backoff delay; doubled each attempt. Default: 1000ms.
    pub backoff_base_ms: u64,

    /// Upper bound of random jitter added to each backoff. Default: 1000ms.
    pub backoff_jitter_ms: u64,

    /// Random pause before every attempt, `(min, max)` in milliseconds.
    ///
    /// Default: (1000, 3000).
    pub politeness_delay_ms: (u64, u64),

    /// Timeout for regular fetches. Default: 30s.
    pub fetch_timeout_secs: u64,

    /// Timeout for single-shot domain probes. Default: 5s.
    pub probe_timeout_secs: u64,

    /// Optional global request rate cap.
    pub requests_per_second: Option<u32>,

    /// Pool of User-Agent strings rotated per attempt.
    pub user_agents: Vec<String>,

    /// Search provider endpoint; the URL-encoded query is appended.
    pub search_endpoint: String,

    /// Canonical sites of well-known companies, keyed by lower-cased name.
    pub well_known_sites: Vec<(String, String)>,

    /// Domains never accepted as an official website.
    pub excluded_domains: Vec<String>,

    /// Place names for location extraction.
    pub gazetteer: Gazetteer,

    /// Check that discovered sites actually belong to the company.
    ///
    /// Default: true.
    pub validate_identity: bool,

    /// Consult review, interview-experience and job-board sites.
    ///
    /// Default: true.
    pub secondary_sources: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 1000,
            backoff_jitter_ms: 1000,
            politeness_delay_ms: (1000, 3000),
            fetch_timeout_secs: 30,
            probe_timeout_secs: 5,
            requests_per_second: None,
            user_agents: default_user_agents(),
            search_endpoint: "https://html.duckduckgo.com/html/?q=".to_string(),
            well_known_sites: default_well_known_sites(),
            excluded_domains: [
                "linkedin.com",
                "facebook.com",
                "twitter.com",
                "x.com",
                "instagram.com",
                "wikipedia.org",
                "glassdoor.com",
                "indeed.com",
                "naukri.com",
                "ambitionbox.com",
                "crunchbase.com",
                "youtube.com",
                "reddit.com",
                "duckduckgo.com",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            gazetteer: Gazetteer::default(),
            validate_identity: true,
            secondary_sources: true,
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set attempts per fetch.
    pub fn with_max_retries(mut self, attempts: u32) -> Self {
        self.max_retries = attempts.max(1);
        self
    }

    /// Set backoff base and jitter.
    pub fn with_backoff(mut self, base_ms: u64, jitter_ms: u64) -> Self {
        self.backoff_base_ms = base_ms;
        self.backoff_jitter_ms = jitter_ms;
        self
    }

    /// Set the politeness delay range.
    pub fn with_politeness_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.politeness_delay_ms = (min_ms.min(max_ms), min_ms.max(max_ms));
        self
    }

    /// Set the regular fetch timeout.
    pub fn with_fetch_timeout(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Cap the global request rate.
    pub fn with_requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Use a different search provider endpoint.
    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }

    /// Replace the gazetteer.
    pub fn with_gazetteer(mut self, gazetteer: Gazetteer) -> Self {
        self.gazetteer = gazetteer;
        self
    }

    /// Toggle identity validation of discovered sites.
    pub fn with_identity_validation(mut self, enabled: bool) -> Self {
        self.validate_identity = enabled;
        self
    }

    /// Toggle secondary sources.
    pub fn with_secondary_sources(mut self, enabled: bool) -> Self {
        self.secondary_sources = enabled;
        self
    }

    /// Configuration with every pause set to zero, for tests and batch jobs.
    pub fn without_delays(mut self) -> Self {
        self.backoff_base_ms = 0;
        self.backoff_jitter_ms = 0;
        self.politeness_delay_ms = (0, 0);
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Canonical site for a well-known company, if any.
    pub fn well_known_site(&self, company_name: &str) -> Option<&str> {
        let key = company_name.trim().to_lowercase();
        self.well_known_sites
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, url)| url.as_str())
    }

    /// Whether a URL points at an excluded (non-official) domain.
    pub fn is_excluded(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        self.excluded_domains.iter().any(|d| lower.contains(d.as_str()))
    }
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_well_known_sites() -> Vec<(String, String)> {
    [
        ("google", "https://www.google.com"),
        ("microsoft", "https://www.microsoft.com"),
        ("amazon", "https://www.amazon.com"),
        ("apple", "https://www.apple.com"),
        ("meta", "https://www.meta.com"),
        ("tcs", "https://www.tcs.com"),
        ("infosys", "https://www.infosys.com"),
        ("wipro", "https://www.wipro.com"),
        ("accenture", "https://www.accenture.com"),
    ]
    .iter()
    .map(|(name, url)| (name.to_string(), url.to_string()))
    .collect()
}

/// Configuration for the query pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Classifier confidence above which a similar past answer is reused.
    ///
    /// Default: 0.5.
    pub chat_reuse_confidence: f32,

    /// How many recent chat entries are searched for a reusable answer.
    ///
    /// Default: 10.
    pub chat_history_window: usize,

    /// Maximum registry entries scanned during name resolution.
    ///
    /// Default: 100.
    pub registry_scan_limit: usize,

    /// Maximum records scanned by the content fallback search.
    ///
    /// Default: 20.
    pub content_search_limit: usize,

    /// Record every handled message in the chat log.
    ///
    /// Default: true.
    pub record_chat_logs: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chat_reuse_confidence: 0.5,
            chat_history_window: 10,
            registry_scan_limit: 100,
            content_search_limit: 20,
            record_chat_logs: true,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_reuse_confidence(mut self, threshold: f32) -> Self {
        self.chat_reuse_confidence = threshold;
        self
    }

    pub fn without_chat_logs(mut self) -> Self {
        self.record_chat_logs = false;
        self
    }
}
