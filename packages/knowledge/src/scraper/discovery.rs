//! Official website discovery.
//!
//! Well-known table first, then search-engine results, then guessed domains.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use url::Url;

use super::{html, validate};
use crate::fetchers::PoliteFetcher;
use crate::traits::fetcher::FetchedPage;
use crate::types::config::ScraperConfig;

/// Result links read from one search page.
const MAX_SEARCH_LINKS: usize = 20;

/// Candidates examined per search query.
const MAX_CANDIDATES_PER_QUERY: usize = 5;

/// Base for resolving the search provider's relative redirect links.
const SEARCH_REDIRECT_BASE: &str = "https://duckduckgo.com/";

/// A website believed to be the company's own.
#[derive(Debug, Clone)]
pub struct Discovered {
    pub url: String,
    /// The page as fetched during discovery, reused by extraction.
    pub page: Option<FetchedPage>,
}

impl Discovered {
    fn unfetched(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            page: None,
        }
    }
}

/// Search queries issued for a company, in order.
pub fn search_queries(company_name: &str) -> Vec<String> {
    vec![
        format!("{company_name} official website"),
        format!("{company_name} company careers"),
        format!("{company_name} website"),
    ]
}

/// Lower-cased name with spaces and punctuation removed.
fn compact_name(company_name: &str) -> String {
    company_name
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | ','))
        .collect()
}

/// Domains tried directly when search finds nothing.
pub fn guessed_urls(company_name: &str) -> Vec<String> {
    let slug = compact_name(company_name);
    if slug.is_empty() {
        return vec![];
    }
    vec![
        format!("https://www.{slug}.com"),
        format!("https://{slug}.com"),
        format!("https://www.{slug}.in"),
        format!("https://{slug}.in"),
        format!("https://www.{slug}.co.in"),
    ]
}

/// Coarse check that a URL's domain carries the company's name.
pub fn domain_matches(url: &str, company_name: &str) -> bool {
    let Some(host) = html::host(url) else {
        return false;
    };
    let compact: String = compact_name(company_name)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    if compact.is_empty() {
        return false;
    }

    let prefix: String = compact.chars().take(5).collect();
    let stem: String = compact.chars().take(3).collect();
    host.contains(&prefix)
        || host.starts_with(&stem)
        || validate::significant_words(company_name)
            .iter()
            .any(|w| host.contains(w.as_str()))
}

/// Destination of a search result link, unwrapping redirect links.
fn result_target(href: &str) -> Option<String> {
    if href.contains("uddg=") {
        let base = Url::parse(SEARCH_REDIRECT_BASE).ok()?;
        let redirect = base.join(href).ok()?;
        return redirect
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned());
    }
    href.starts_with("http").then(|| href.to_string())
}

/// Candidate official sites from a search results page.
///
/// Excluded domains are dropped and each host is kept once.
pub fn search_results(page_html: &str, config: &ScraperConfig) -> Vec<String> {
    let document = html::parse(page_html);
    let mut hosts = HashSet::new();
    html::links(&document, None)
        .into_iter()
        .take(MAX_SEARCH_LINKS)
        .filter_map(|link| result_target(&link.href))
        .filter(|target| !config.is_excluded(target))
        .filter(|target| match html::host(target) {
            Some(host) => hosts.insert(host),
            None => false,
        })
        .collect()
}

/// Find the company's official website.
pub async fn discover(fetcher: &PoliteFetcher, company_name: &str) -> Option<Discovered> {
    let config = fetcher.config();

    if let Some(url) = config.well_known_site(company_name) {
        info!(company = %company_name, url = %url, "Using well-known website");
        return Some(Discovered::unfetched(url));
    }

    let mut fallback: Option<String> = None;
    for query in search_queries(company_name) {
        let search_url = format!("{}{}", config.search_endpoint, urlencoding::encode(&query));
        let page = match fetcher.get(&search_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(company = %company_name, query = %query, error = %e, "Website search failed");
                continue;
            }
        };

        let candidates = search_results(&page.body, config);
        debug!(company = %company_name, query = %query, candidates = candidates.len(), "Search results");

        for candidate in candidates.into_iter().take(MAX_CANDIDATES_PER_QUERY) {
            let coarse = domain_matches(&candidate, company_name);
            if !config.validate_identity {
                if coarse {
                    info!(company = %company_name, url = %candidate, "Accepted search result by domain");
                    return Some(Discovered::unfetched(candidate));
                }
                continue;
            }

            match fetcher.get(&candidate).await {
                Ok(page) if validate::is_company_page(&page.body, company_name) => {
                    info!(company = %company_name, url = %candidate, "Validated search result");
                    return Some(Discovered {
                        url: candidate,
                        page: Some(page),
                    });
                }
                Ok(_) => debug!(url = %candidate, "Search result failed identity validation"),
                Err(e) => debug!(url = %candidate, error = %e, "Search result unreachable"),
            }

            if coarse && fallback.is_none() {
                fallback = Some(candidate);
            }
        }
    }

    if let Some(url) = fallback {
        info!(company = %company_name, url = %url, "Falling back to domain-matched search result");
        return Some(Discovered::unfetched(url));
    }

    for guess in guessed_urls(company_name) {
        let Ok(page) = fetcher.probe(&guess).await else {
            continue;
        };
        if !config.validate_identity || validate::is_company_page(&page.body, company_name) {
            info!(company = %company_name, url = %guess, "Accepted guessed domain");
            return Some(Discovered {
                url: guess,
                page: Some(page),
            });
        }
        debug!(url = %guess, "Guessed domain failed identity validation");
    }

    warn!(company = %company_name, "No official website found");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFetcher, RecordingSleeper};
    use std::sync::Arc;

    fn polite(mock: &Arc<MockFetcher>, config: ScraperConfig) -> PoliteFetcher {
        PoliteFetcher::new(mock.clone(), config.without_delays())
            .with_sleeper(Arc::new(RecordingSleeper::new()))
    }

    const SEARCH_PAGE: &str = r#"<html><body>
        <a href="https://in.linkedin.com/company/meril">LinkedIn</a>
        <a href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.merillife.com%2F&rut=abc">Meril</a>
        <a href="https://www.merillife.com/about">About Meril</a>
        <a href="https://news.example.org/meril-story">News</a>
        <a href="/settings">Settings</a>
    </body></html>"#;

    #[test]
    fn test_search_results_unwrap_filter_and_dedup() {
        let results = search_results(SEARCH_PAGE, &ScraperConfig::default());
        assert_eq!(
            results,
            vec!["https://www.merillife.com/", "https://news.example.org/meril-story"]
        );
    }

    #[test]
    fn test_domain_matches() {
        assert!(domain_matches("https://www.merillife.com/", "Meril"));
        assert!(domain_matches("https://www.tcs.com", "TCS"));
        assert!(domain_matches("https://tataconsultancy.example", "Tata Consultancy Services"));
        assert!(!domain_matches("https://news.example.org/meril", "Meril"));
    }

    #[test]
    fn test_guessed_urls() {
        assert_eq!(
            guessed_urls("Acme Corp."),
            vec![
                "https://www.acmecorp.com",
                "https://acmecorp.com",
                "https://www.acmecorp.in",
                "https://acmecorp.in",
                "https://www.acmecorp.co.in",
            ]
        );
        assert!(guessed_urls(" ., ").is_empty());
    }

    #[tokio::test]
    async fn test_well_known_site_skips_network() {
        let mock = Arc::new(MockFetcher::new());
        let found = discover(&polite(&mock, ScraperConfig::default()), "TCS")
            .await
            .unwrap();
        assert_eq!(found.url, "https://www.tcs.com");
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_search_result_is_validated() {
        let mock = Arc::new(
            MockFetcher::new()
                .with_page(
                    "https://html.duckduckgo.com/html/?q=Meril%20official%20website",
                    SEARCH_PAGE,
                )
                .with_page(
                    "https://www.merillife.com/",
                    "<html><head><title>Meril Life Sciences</title></head></html>",
                ),
        );
        let found = discover(&polite(&mock, ScraperConfig::default()), "Meril")
            .await
            .unwrap();
        assert_eq!(found.url, "https://www.merillife.com/");
        assert!(found.page.is_some());
        assert!(!mock.was_requested("linkedin"));
    }

    #[tokio::test]
    async fn test_unvalidated_search_accepts_domain_match() {
        let mock = Arc::new(MockFetcher::new().with_page(
            "https://html.duckduckgo.com/html/?q=Meril%20official%20website",
            SEARCH_PAGE,
        ));
        let config = ScraperConfig::default().with_identity_validation(false);
        let found = discover(&polite(&mock, config), "Meril").await.unwrap();
        assert_eq!(found.url, "https://www.merillife.com/");
        assert!(found.page.is_none());
    }

    #[tokio::test]
    async fn test_guessed_domain_after_empty_search() {
        let mock = Arc::new(
            MockFetcher::new()
                .with_page("https://www.acme.com", "<title>Parked domain</title>")
                .with_page("https://acme.com", "<title>Acme | Home</title>"),
        );
        let found = discover(&polite(&mock, ScraperConfig::default()), "Acme")
            .await
            .unwrap();
        assert_eq!(found.url, "https://acme.com");
        assert_eq!(mock.call_count("https://www.acme.com"), 1);
    }

    #[tokio::test]
    async fn test_nothing_found() {
        let mock = Arc::new(MockFetcher::new());
        let config = ScraperConfig::default().with_max_retries(1);
        assert!(discover(&polite(&mock, config), "Nowhere Ltd").await.is_none());
        assert_eq!(mock.requests().len(), 3 + 5);
    }
}
