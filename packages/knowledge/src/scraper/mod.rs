//! Multi-source company scraper.
//!
//! Sources are consulted one after another and each yields a typed
//! [`SourceOutcome`]. A failed fetch costs that source its fields and nothing
//! more; [`merge::merge`] folds whatever was found into one record.
//!
//! ```text
//! official site (seed URL or discovery) ─┐
//! encyclopedia (short description only) ─┤
//! review site ───────────────────────────┼─▶ merge ─▶ ScrapedFields
//! interview-experience site ─────────────┤
//! job board ─────────────────────────────┘
//! ```

pub mod discovery;
pub mod html;
pub mod location;
pub mod merge;
pub mod official;
pub mod sources;
pub mod validate;

pub use discovery::Discovered;
pub use merge::{Source, SourceOutcome};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::collections::KnowledgeStore;
use crate::error::StoreError;
use crate::fetchers::{self, PoliteFetcher};
use crate::pipeline::quality::{self, Rejection, MIN_DESCRIPTION_LEN};
use crate::types::config::ScraperConfig;
use crate::types::record::{CompanyKnowledgeRecord, ScrapedFields};

/// What happened to a scraped record on its way to the store.
#[derive(Debug)]
pub enum StoreOutcome {
    Stored,
    Rejected(Rejection),
    Failed(StoreError),
}

impl StoreOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, StoreOutcome::Stored)
    }
}

/// Result of a scrape followed by a gated write.
#[derive(Debug)]
pub struct ScrapeReport {
    pub fields: ScrapedFields,
    pub outcome: StoreOutcome,
}

/// Scrapes company facts from the web.
#[derive(Clone)]
pub struct MultiSourceScraper {
    fetcher: PoliteFetcher,
}

impl MultiSourceScraper {
    pub fn new(fetcher: PoliteFetcher) -> Self {
        Self { fetcher }
    }

    /// Scraper over the production HTTP stack.
    pub fn from_config(config: ScraperConfig) -> Self {
        let transport = fetchers::http_stack(&config);
        Self::new(PoliteFetcher::new(transport, config))
    }

    pub fn config(&self) -> &ScraperConfig {
        self.fetcher.config()
    }

    /// Scrape every source and merge the results.
    ///
    /// Never fails: when every source fails the fields are simply empty.
    pub async fn scrape(&self, company_name: &str, seed_url: Option<&str>) -> ScrapedFields {
        let outcomes = self.scrape_sources(company_name, seed_url).await;
        let found = outcomes.iter().filter(|o| o.is_found()).count();
        let fields = merge::merge(outcomes);
        info!(
            company = %company_name,
            sources_found = found,
            has_description = !fields.description.is_empty(),
            skills = fields.skills.len(),
            "Scrape finished"
        );
        fields
    }

    /// Consult each source in turn.
    pub async fn scrape_sources(
        &self,
        company_name: &str,
        seed_url: Option<&str>,
    ) -> Vec<SourceOutcome> {
        let mut outcomes = Vec::new();

        let official = self.official(company_name, seed_url).await;
        let description_len = official
            .fields()
            .map_or(0, |f| f.description.chars().count());
        outcomes.push(official);

        if description_len < MIN_DESCRIPTION_LEN {
            outcomes.push(self.secondary(Source::Encyclopedia, company_name).await);
        }

        if self.config().secondary_sources {
            for source in Source::SECONDARY {
                outcomes.push(self.secondary(source, company_name).await);
            }
        }

        outcomes
    }

    /// Scrape, gate and persist one company.
    pub async fn scrape_and_store(
        &self,
        knowledge: &KnowledgeStore,
        company_name: &str,
        seed_url: Option<&str>,
    ) -> ScrapeReport {
        let fields = self.scrape(company_name, seed_url).await;

        let outcome = match quality::check_description(&fields.description) {
            Err(rejection) => {
                warn!(company = %company_name, reason = %rejection, "Scraped record rejected");
                StoreOutcome::Rejected(rejection)
            }
            Ok(()) => {
                let record = CompanyKnowledgeRecord::from_scraped(company_name, &fields, Utc::now());
                match knowledge.upsert(&record).await {
                    Ok(()) => {
                        info!(company = %company_name, "Scraped record stored");
                        StoreOutcome::Stored
                    }
                    Err(e) => {
                        warn!(company = %company_name, error = %e, "Failed to store scraped record");
                        StoreOutcome::Failed(e)
                    }
                }
            }
        };

        ScrapeReport { fields, outcome }
    }

    async fn official(&self, company_name: &str, seed_url: Option<&str>) -> SourceOutcome {
        let site = match seed_url.map(str::trim).filter(|s| !s.is_empty()) {
            Some(seed) => Some(Discovered {
                url: with_scheme(seed),
                page: None,
            }),
            None => discovery::discover(&self.fetcher, company_name).await,
        };
        let Some(site) = site else {
            return SourceOutcome::failed(Source::Official, "no official website found");
        };

        let page = match site.page {
            Some(page) => page,
            None => match self.fetcher.get(&site.url).await {
                Ok(page) => page,
                Err(e) => return SourceOutcome::failed(Source::Official, e.to_string()),
            },
        };

        let extracted = official::extract(&site.url, &page.body, &self.config().gazetteer);
        let mut fields = extracted.fields;
        if fields.location.is_empty() {
            if let Some(found) = self.contact_location(&extracted.contact_links).await {
                fields.location = found;
            }
        }

        debug!(company = %company_name, url = %site.url, "Official site scraped");
        SourceOutcome::found(Source::Official, fields)
    }

    /// Location from linked contact pages, in link order.
    async fn contact_location(&self, links: &[String]) -> Option<String> {
        for link in links {
            match self.fetcher.get(link).await {
                Ok(page) => {
                    if let Some(found) = location::from_contact_page(&page.body) {
                        debug!(url = %link, location = %found, "Location found on contact page");
                        return Some(found);
                    }
                }
                Err(e) => debug!(url = %link, error = %e, "Contact page unavailable"),
            }
        }
        None
    }

    /// Fetch the first URL of `source` that loads and parse it.
    async fn secondary(&self, source: Source, company_name: &str) -> SourceOutcome {
        let mut last_error = String::from("no URL for source");
        for url in sources::urls(source, company_name) {
            match self.fetcher.get(&url).await {
                Ok(page) => {
                    let fields = sources::parse(source, &page.body);
                    debug!(source = %source, url = %url, empty = fields.is_empty(), "Source scraped");
                    return SourceOutcome::found(source, fields);
                }
                Err(e) => last_error = e.to_string(),
            }
        }
        SourceOutcome::failed(source, last_error)
    }
}

/// Registry URLs are often stored without a scheme.
fn with_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use crate::testing::{MockFetcher, RecordingSleeper};
    use std::sync::Arc;

    fn scraper(mock: &Arc<MockFetcher>, config: ScraperConfig) -> MultiSourceScraper {
        let fetcher = PoliteFetcher::new(mock.clone(), config.without_delays().with_max_retries(1))
            .with_sleeper(Arc::new(RecordingSleeper::new()));
        MultiSourceScraper::new(fetcher)
    }

    const ACME_HOME: &str = r#"<html><head><title>Acme Industries</title>
        <meta name="description" content="Acme Industries builds precision industrial robots for automotive and electronics plants.">
        </head><body>
        <p>Our engineers work with Python and Docker every day.</p>
        <a href="/contact">Contact</a>
        </body></html>"#;

    #[test]
    fn test_with_scheme() {
        assert_eq!(with_scheme("www.acme.com"), "https://www.acme.com");
        assert_eq!(with_scheme("http://acme.com"), "http://acme.com");
    }

    #[tokio::test]
    async fn test_seed_url_sources_and_contact_page() {
        let mock = Arc::new(
            MockFetcher::new()
                .with_page("https://www.acme.com", ACME_HOME)
                .with_page(
                    "https://www.acme.com/contact",
                    r#"<div class="office-location">Plot 7, MIDC, Pune</div>"#,
                )
                .with_page(
                    "https://www.ambitionbox.com/reviews/acme",
                    r#"<div class="salary-card">Average 5.5 LPA</div>"#,
                ),
        );
        let scraper = scraper(&mock, ScraperConfig::default());

        let outcomes = scraper.scrape_sources("Acme", Some("www.acme.com")).await;
        let sources: Vec<Source> = outcomes.iter().map(SourceOutcome::source).collect();
        assert_eq!(
            sources,
            vec![
                Source::Official,
                Source::ReviewSite,
                Source::InterviewSite,
                Source::JobBoard,
            ]
        );
        assert!(outcomes[0].is_found());
        assert!(outcomes[1].is_found());
        assert!(!outcomes[2].is_found());
        assert!(!mock.was_requested("html.duckduckgo.com"));
        assert!(!mock.was_requested("wikipedia"));

        let fields = merge::merge(outcomes);
        assert!(fields.description.starts_with("Acme Industries builds"));
        assert_eq!(fields.skills, vec!["Python", "Docker"]);
        assert_eq!(fields.location, "Plot 7, MIDC, Pune");
        assert_eq!(fields.salary, "5.5 LPA");
        assert_eq!(fields.source_url, "https://www.acme.com");
    }

    #[tokio::test]
    async fn test_encyclopedia_consulted_for_short_description() {
        let lead = "Acme Industries is a manufacturer of industrial robots founded in 1990 \
                    and headquartered in Pune, with plants across Maharashtra.";
        let mock = Arc::new(
            MockFetcher::new()
                .with_page("https://www.acme.com", "<title>Acme</title><p>Hi.</p>")
                .with_page(
                    "https://en.wikipedia.org/wiki/Acme",
                    format!(r#"<div class="mw-parser-output"><p>{lead}</p></div>"#),
                ),
        );
        let config = ScraperConfig::default().with_secondary_sources(false);
        let fields = scraper(&mock, config).scrape("Acme", Some("https://www.acme.com")).await;
        assert_eq!(fields.description, lead);
    }

    #[tokio::test]
    async fn test_every_source_failing_yields_empty_fields() {
        let mock = Arc::new(MockFetcher::new());
        let fields = scraper(&mock, ScraperConfig::default())
            .scrape("Nowhere Ltd", None)
            .await;
        assert!(fields.is_empty());
    }

    #[tokio::test]
    async fn test_scrape_and_store_gates_writes() {
        let store = Arc::new(MemoryStore::new());
        let knowledge = KnowledgeStore::new(store.clone());

        let mock = Arc::new(MockFetcher::new().with_page("https://www.acme.com", ACME_HOME));
        let config = ScraperConfig::default().with_secondary_sources(false);
        let report = scraper(&mock, config.clone())
            .scrape_and_store(&knowledge, "Acme", Some("https://www.acme.com"))
            .await;
        assert!(report.outcome.is_stored());
        let stored = knowledge.find("Acme").await.unwrap().unwrap();
        assert_eq!(stored.skills, vec!["Python", "Docker"]);

        let mock = Arc::new(MockFetcher::new());
        let report = scraper(&mock, config)
            .scrape_and_store(&knowledge, "Nowhere Ltd", None)
            .await;
        assert!(matches!(
            report.outcome,
            StoreOutcome::Rejected(Rejection::MissingDescription)
        ));
        assert!(knowledge.find("Nowhere Ltd").await.unwrap().is_none());
    }
}
