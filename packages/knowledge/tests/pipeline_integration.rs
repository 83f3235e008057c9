//! Integration tests for the query pipeline.
//!
//! Every test drives `QueryOrchestrator::handle` end to end against an
//! in-memory store and scripted web pages.

use std::sync::Arc;

use placement_knowledge::{
    testing::{FailingStore, MockFetcher, RecordingSleeper},
    CompanyKnowledgeRecord, Intent, MemoryStore, MultiSourceScraper, PipelineConfig,
    PoliteFetcher, QueryOrchestrator, ResponseSource, ScraperConfig,
};

/// Helper to build a pipeline over scripted pages.
fn pipeline(store: Arc<MemoryStore>, mock: Arc<MockFetcher>) -> QueryOrchestrator {
    let config = ScraperConfig::default().without_delays();
    let fetcher =
        PoliteFetcher::new(mock, config).with_sleeper(Arc::new(RecordingSleeper::new()));
    QueryOrchestrator::new(store, MultiSourceScraper::new(fetcher))
}

fn meril() -> CompanyKnowledgeRecord {
    CompanyKnowledgeRecord::new("Meril")
        .with_description(
            "Meril Life Sciences designs and manufactures medical devices for \
             cardiology, orthopaedics and diagnostics.",
        )
        .with_eligibility("CGPA 7.0+, no active backlogs")
        .with_location("Vapi, Gujarat")
}

#[tokio::test]
async fn test_rejected_scrape_still_answers() {
    let store = Arc::new(MemoryStore::new());
    let mock = Arc::new(MockFetcher::new().with_page(
        "https://www.tcs.com",
        "<html><head><title>TCS</title></head>\
         <body><p>Careers in Java and Python.</p></body></html>",
    ));
    let pipeline = pipeline(store, mock.clone());

    let answer = pipeline.handle("student-1", "what skills does TCS need?").await;

    assert_eq!(answer.source, ResponseSource::Scraped);
    assert_eq!(answer.intent, Intent::Skills);
    assert_eq!(answer.company_name.as_deref(), Some("TCS"));
    assert!(!answer.response.trim().is_empty());
    assert!(answer.response.contains("Java"));

    let data = answer.data.expect("scraped answers carry data");
    assert_eq!(data.description, "Details about TCS are still being collected.");

    // Empty description fails the quality gate: nothing is stored.
    assert!(pipeline.knowledge().find("TCS").await.unwrap().is_none());
    assert!(mock.was_requested("en.wikipedia.org/wiki/TCS"));
}

#[tokio::test]
async fn test_complete_record_answers_from_knowledge_base() {
    let store = Arc::new(MemoryStore::new());
    let mock = Arc::new(MockFetcher::new());
    let pipeline = pipeline(store, mock.clone());
    pipeline.knowledge().upsert(&meril()).await.unwrap();

    let answer = pipeline.handle("student-1", "Meril eligibility").await;

    assert_eq!(answer.source, ResponseSource::KnowledgeBase);
    assert_eq!(answer.intent, Intent::Eligibility);
    assert_eq!(answer.company_name.as_deref(), Some("Meril"));
    assert!(answer.response.contains("CGPA 7.0+, no active backlogs"));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_incomplete_record_is_refreshed_and_merged() {
    let store = Arc::new(MemoryStore::new());
    let mock = Arc::new(MockFetcher::new().with_page(
        "https://www.merillife.com",
        r#"<html><head><title>Meril Life Sciences</title>
           <meta name="description" content="Meril is a global medical device company building stents, valves and orthopaedic implants.">
           </head><body><p>Our software teams use Python and SQL.</p></body></html>"#,
    ));
    let pipeline = pipeline(store, mock);
    pipeline.knowledge().upsert(&meril()).await.unwrap();
    pipeline
        .registry()
        .register("Meril", Some("https://www.merillife.com"))
        .await
        .unwrap();

    let answer = pipeline.handle("student-1", "Meril skills").await;

    assert_eq!(answer.source, ResponseSource::Scraped);
    assert!(answer.response.contains("Python"));

    let stored = pipeline.knowledge().find("Meril").await.unwrap().unwrap();
    assert_eq!(stored.skills, vec!["Python", "SQL"]);
    assert_eq!(stored.eligibility, "CGPA 7.0+, no active backlogs");
    assert_eq!(stored.source_url, "https://www.merillife.com");
}

#[tokio::test]
async fn test_registry_exact_match_seeds_scrape() {
    let store = Arc::new(MemoryStore::new());
    let mock = Arc::new(MockFetcher::new().with_page(
        "https://deloitte.example",
        r#"<html><head><title>Deloitte</title>
           <meta name="description" content="Deloitte provides audit, consulting, tax and advisory services to clients worldwide.">
           </head><body></body></html>"#,
    ));
    let pipeline = pipeline(store, mock.clone());
    pipeline
        .registry()
        .register("Deloitte", Some("deloitte.example"))
        .await
        .unwrap();

    let first = pipeline.handle("student-2", "deloitte").await;
    assert_eq!(first.source, ResponseSource::Scraped);
    assert_eq!(first.company_name.as_deref(), Some("Deloitte"));
    assert!(!mock.was_requested("duckduckgo"));

    let second = pipeline.handle("student-2", "deloitte").await;
    assert_eq!(second.source, ResponseSource::KnowledgeBase);
    assert!(second.response.contains("audit, consulting"));
}

#[tokio::test]
async fn test_similar_past_answer_is_reused() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(store, Arc::new(MockFetcher::new()))
        .with_config(PipelineConfig::default().with_chat_reuse_confidence(0.0));
    pipeline.knowledge().upsert(&meril()).await.unwrap();

    let first = pipeline.handle("student-3", "Meril eligibility").await;
    let second = pipeline.handle("student-3", "Meril eligibility criteria").await;

    assert_eq!(second.source, ResponseSource::KnowledgeBase);
    assert_eq!(second.response, first.response);

    let history = pipeline.chat_logs().history("student-3", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message, "Meril eligibility");
}

#[tokio::test]
async fn test_store_failure_becomes_error_response() {
    let fetcher = PoliteFetcher::new(
        Arc::new(MockFetcher::new()),
        ScraperConfig::default().without_delays(),
    )
    .with_sleeper(Arc::new(RecordingSleeper::new()));
    let pipeline = QueryOrchestrator::new(Arc::new(FailingStore), MultiSourceScraper::new(fetcher));

    let answer = pipeline.handle("student-4", "Meril eligibility").await;

    assert_eq!(answer.source, ResponseSource::Error);
    assert_eq!(answer.intent, Intent::Eligibility);
    assert_eq!(answer.response, placement_knowledge::pipeline::APOLOGY);
}

#[tokio::test]
async fn test_general_questions_without_company() {
    let pipeline = pipeline(Arc::new(MemoryStore::new()), Arc::new(MockFetcher::new()));

    let answer = pipeline.handle("student-5", "hi").await;
    assert_eq!(answer.source, ResponseSource::Ai);
    assert_eq!(answer.intent, Intent::Greeting);
    assert!(answer.company_name.is_none());
}
