//! Field extraction from a company's official website.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;
use url::Url;

use super::html;
use super::location;
use crate::types::config::Gazetteer;
use crate::types::record::{truncate_chars, ScrapedFields};

/// Meta descriptions shorter than this are ignored.
const MIN_META_DESCRIPTION_LEN: usize = 50;

/// Text blocks shorter than this are not treated as a description.
const MIN_BLOCK_DESCRIPTION_LEN: usize = 100;

/// Selectors for "about" blocks, most specific first.
const ABOUT_SELECTORS: &[&str] = &[
    ".about-section",
    ".company-description",
    r#"section[class*="about"]"#,
    r#"div[class*="about"]"#,
    r#"p[class*="description"]"#,
    r#"div[id*="about"]"#,
];

/// Paragraphs considered for the body fallback.
const FALLBACK_PARAGRAPHS: usize = 5;

/// Paragraphs joined into a fallback description.
const FALLBACK_JOINED: usize = 2;

/// Process sections read per page.
const MAX_PROCESS_SECTIONS: usize = 3;

/// Characters kept from each process section.
const PROCESS_SECTION_LEN: usize = 300;

const PROCESS_KEYWORDS: &[&str] = &[
    "interview process",
    "hiring process",
    "selection process",
    "round",
];

/// Skill vocabulary recognized on official sites, with display names.
pub const OFFICIAL_SKILLS: &[(&str, &str)] = &[
    ("python", "Python"),
    ("java", "Java"),
    ("javascript", "Javascript"),
    ("react", "React"),
    ("angular", "Angular"),
    ("vue", "Vue"),
    ("node.js", "Node.js"),
    ("flask", "Flask"),
    ("django", "Django"),
    ("spring", "Spring"),
    ("sql", "SQL"),
    ("mongodb", "Mongodb"),
    ("postgresql", "Postgresql"),
    ("aws", "AWS"),
    ("azure", "Azure"),
    ("gcp", "GCP"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("git", "Git"),
    ("data structures", "Data Structures"),
    ("algorithms", "Algorithms"),
    ("machine learning", "Machine Learning"),
    ("ai", "AI"),
];

lazy_static! {
    static ref ELIGIBILITY_PATTERNS: Vec<Regex> = [
        r"(?i)eligibility[:\s]+([^.\n]+)",
        r"(?i)qualification[:\s]+([^.\n]+)",
        r"(?i)cgpa[:\s]+([0-9.]+)",
        r"(?i)percentage[:\s]+([0-9.]+)",
        r"(?i)education[:\s]+([^.\n]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref SALARY_PATTERNS: Vec<Regex> = [
        r"(?i)(\d+\.?\d*)\s*(lpa|lakhs|lakh)\b",
        r"(?i)salary[:\s]+([^.\n]+)",
        r"(?i)package[:\s]+([^.\n]+)",
        r"(?i)ctc[:\s]+([^.\n]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref PROCESS_TEXT: Regex =
        Regex::new(r"(?i)(?:interview|hiring|selection)\s+process[:\s]+([^\n]+)").unwrap();

    static ref PROCESS_CLASS: Regex =
        Regex::new(r"(?i)process|interview|hiring|selection").unwrap();
}

/// Compile a word-bounded, case-insensitive pattern for a skill keyword.
fn skill_pattern(keyword: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword))).ok()
}

/// Skills from `vocabulary` mentioned in `text`, in vocabulary order.
pub fn find_skills(text: &str, vocabulary: &[(&str, &str)]) -> Vec<String> {
    vocabulary
        .iter()
        .filter(|(keyword, _)| skill_pattern(keyword).map_or(false, |re| re.is_match(text)))
        .map(|(_, display)| display.to_string())
        .collect()
}

/// First pattern whose capture group 1 is non-empty.
pub fn first_capture(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// First pattern match, taken whole.
pub fn first_match(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.find(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Everything read from one official page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfficialPage {
    pub fields: ScrapedFields,
    /// Links to contact/about pages, consulted when no location was found.
    pub contact_links: Vec<String>,
}

/// Extract fields from an official page.
pub fn extract(page_url: &str, page_html: &str, gazetteer: &Gazetteer) -> OfficialPage {
    let document = html::parse(page_html);
    let text = html::visible_text(&document);
    let base = Url::parse(page_url).ok();

    let mut fields = ScrapedFields {
        source_url: page_url.to_string(),
        description: description(&document).unwrap_or_default(),
        skills: find_skills(&text, OFFICIAL_SKILLS),
        eligibility: first_capture(&text, &ELIGIBILITY_PATTERNS).unwrap_or_default(),
        salary: first_match(&text, &SALARY_PATTERNS).unwrap_or_default(),
        process: process(&document, &text).unwrap_or_default(),
        location: location::locate(&document, &text, gazetteer).unwrap_or_default(),
    };
    fields.normalize();

    let contact_links = if fields.location.is_empty() {
        location::contact_links(&document, base.as_ref())
    } else {
        vec![]
    };

    OfficialPage {
        fields,
        contact_links,
    }
}

/// Description from meta tags, "about" blocks, then early paragraphs.
fn description(document: &Html) -> Option<String> {
    let meta = [
        r#"meta[name="description"]"#,
        r#"meta[property="og:description"]"#,
    ];
    for selector in meta {
        if let Some(content) = html::meta_content(document, selector) {
            if content.chars().count() > MIN_META_DESCRIPTION_LEN {
                return Some(content);
            }
        }
    }

    for selector in ABOUT_SELECTORS {
        if let Some(text) = html::first_text(document, selector) {
            if text.chars().count() > MIN_BLOCK_DESCRIPTION_LEN {
                return Some(text);
            }
        }
    }

    let container = if html::select_first(document, "main").is_some() {
        "main p"
    } else {
        "body p"
    };
    let paragraphs: Vec<String> = html::select_all(document, container)
        .iter()
        .take(FALLBACK_PARAGRAPHS)
        .map(html::element_text)
        .filter(|t| t.chars().count() > MIN_BLOCK_DESCRIPTION_LEN)
        .take(FALLBACK_JOINED)
        .collect();
    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join(" "))
    }
}

/// Interview-process text from dedicated sections, else from running text.
fn process(document: &Html, text: &str) -> Option<String> {
    let sections: Vec<String> = html::elements_with_class(document, &["div", "section"], &PROCESS_CLASS)
        .iter()
        .take(MAX_PROCESS_SECTIONS)
        .map(html::element_text)
        .filter(|t| {
            let lower = t.to_lowercase();
            PROCESS_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(|t| truncate_chars(&t, PROCESS_SECTION_LEN))
        .collect();
    if !sections.is_empty() {
        return Some(sections.join(" | "));
    }

    first_capture(text, std::slice::from_ref(&*PROCESS_TEXT))
}
