//! Secondary sources: review aggregator, interview-experience site, job
//! board, and the encyclopedia used as a description fallback.
//!
//! Each source builds its URLs from the company name and parses a fetched
//! page synchronously into partial fields.

use lazy_static::lazy_static;
use regex::Regex;

use super::html;
use super::merge::Source;
use super::official::find_skills;
use crate::types::record::{truncate_chars, ScrapedFields};

/// Longest process excerpt taken from a secondary source.
const MAX_PROCESS_LEN: usize = 500;

/// Characters kept from each interview-experience article.
const ARTICLE_EXCERPT_LEN: usize = 300;

/// Articles read from the interview-experience site.
const MAX_ARTICLES: usize = 3;

/// Job cards read from the job board.
const MAX_JOB_CARDS: usize = 5;

/// Encyclopedia paragraphs shorter than this are skipped.
const MIN_PARAGRAPH_LEN: usize = 100;

/// Longest description taken from the encyclopedia.
const MAX_ENCYCLOPEDIA_LEN: usize = 500;

pub const INTERVIEW_SITE_SKILLS: &[(&str, &str)] = &[
    ("python", "Python"),
    ("java", "Java"),
    ("javascript", "Javascript"),
    ("react", "React"),
    ("angular", "Angular"),
    ("sql", "SQL"),
    ("data structures", "Data Structures"),
    ("algorithms", "Algorithms"),
    ("system design", "System Design"),
];

pub const JOB_BOARD_SKILLS: &[(&str, &str)] = &[
    ("python", "Python"),
    ("java", "Java"),
    ("javascript", "Javascript"),
    ("react", "React"),
    ("angular", "Angular"),
    ("sql", "SQL"),
    ("aws", "AWS"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("machine learning", "Machine Learning"),
];

lazy_static! {
    static ref REVIEW_PROCESS_CLASS: Regex = Regex::new(r"(?i)interview-process|process").unwrap();
    static ref REVIEW_SALARY_CLASS: Regex = Regex::new(r"(?i)salary|compensation").unwrap();
    static ref JOB_CARD_CLASS: Regex = Regex::new(r"(?i)job|listing").unwrap();
    static ref LAKH_AMOUNT: Regex = Regex::new(r"(?i)(\d+\.?\d*)\s*(?:lpa|lakhs|lakh)\b").unwrap();
}

/// Lower-cased, dash-joined company name used in site paths.
pub fn path_slug(company_name: &str) -> String {
    let dashed = company_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    urlencoding::encode(&dashed).into_owned()
}

/// URLs tried for a source, in order; the first page that loads is parsed.
pub fn urls(source: Source, company_name: &str) -> Vec<String> {
    let slug = path_slug(company_name);
    match source {
        Source::ReviewSite => vec![format!("https://www.ambitionbox.com/reviews/{slug}")],
        Source::InterviewSite => vec![
            format!("https://www.geeksforgeeks.org/{slug}-interview-experience/"),
            format!("https://www.geeksforgeeks.org/tag/{slug}/"),
        ],
        Source::JobBoard => vec![format!("https://www.naukri.com/{slug}-jobs")],
        Source::Encyclopedia => vec![encyclopedia_url(company_name)],
        Source::Official => vec![],
    }
}

/// Encyclopedia article URL: words joined by underscores, case kept.
pub fn encyclopedia_url(company_name: &str) -> String {
    let title = company_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!(
        "https://en.wikipedia.org/wiki/{}",
        urlencoding::encode(&title)
    )
}

/// Parse a fetched page for `source`.
pub fn parse(source: Source, page_html: &str) -> ScrapedFields {
    match source {
        Source::ReviewSite => parse_review_site(page_html),
        Source::InterviewSite => parse_interview_site(page_html),
        Source::JobBoard => parse_job_board(page_html),
        Source::Encyclopedia => parse_encyclopedia(page_html),
        Source::Official => ScrapedFields::default(),
    }
}

/// "12 LPA" style salary from the first lakh amount in `text`.
fn lakh_salary(text: &str) -> Option<String> {
    LAKH_AMOUNT
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|amount| format!("{} LPA", amount.as_str()))
}

pub fn parse_review_site(page_html: &str) -> ScrapedFields {
    let document = html::parse(page_html);
    let mut fields = ScrapedFields::default();

    if let Some(block) = html::elements_with_class(&document, &["div"], &REVIEW_PROCESS_CLASS)
        .first()
    {
        fields.process = truncate_chars(&html::element_text(block), MAX_PROCESS_LEN);
    }

    fields.salary = html::elements_with_class(&document, &["div"], &REVIEW_SALARY_CLASS)
        .iter()
        .find_map(|block| lakh_salary(&html::element_text(block)))
        .unwrap_or_default();

    fields
}

pub fn parse_interview_site(page_html: &str) -> ScrapedFields {
    let document = html::parse(page_html);

    let excerpts: Vec<String> = html::select_all(&document, "article")
        .iter()
        .take(MAX_ARTICLES)
        .map(html::element_text)
        .filter(|text| {
            let lower = text.to_lowercase();
            lower.contains("round") || lower.contains("interview")
        })
        .map(|text| truncate_chars(&text, ARTICLE_EXCERPT_LEN))
        .collect();

    ScrapedFields {
        process: truncate_chars(&excerpts.join(" | "), MAX_PROCESS_LEN),
        skills: find_skills(&html::visible_text(&document), INTERVIEW_SITE_SKILLS),
        ..Default::default()
    }
}

pub fn parse_job_board(page_html: &str) -> ScrapedFields {
    let document = html::parse(page_html);
    let cards: Vec<String> = html::elements_with_class(&document, &["div"], &JOB_CARD_CLASS)
        .iter()
        .take(MAX_JOB_CARDS)
        .map(html::element_text)
        .collect();

    let mut fields = ScrapedFields::default();
    for card in &cards {
        fields.skills.extend(find_skills(card, JOB_BOARD_SKILLS));
        if fields.salary.is_empty() {
            fields.salary = lakh_salary(card).unwrap_or_default();
        }
    }
    fields.normalize();
    fields
}

pub fn parse_encyclopedia(page_html: &str) -> ScrapedFields {
    let document = html::parse(page_html);
    let description = html::select_all(&document, "div.mw-parser-output p")
        .iter()
        .map(html::element_text)
        .find(|text| {
            text.chars().count() > MIN_PARAGRAPH_LEN && !text.starts_with("Coordinates")
        })
        .map(|text| truncate_chars(&text, MAX_ENCYCLOPEDIA_LEN))
        .unwrap_or_default();

    ScrapedFields {
        description,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            urls(Source::ReviewSite, "Tata Consultancy Services"),
            vec!["https://www.ambitionbox.com/reviews/tata-consultancy-services"]
        );
        assert_eq!(
            urls(Source::InterviewSite, "TCS"),
            vec![
                "https://www.geeksforgeeks.org/tcs-interview-experience/",
                "https://www.geeksforgeeks.org/tag/tcs/",
            ]
        );
        assert_eq!(
            urls(Source::JobBoard, "Meril"),
            vec!["https://www.naukri.com/meril-jobs"]
        );
        assert_eq!(
            encyclopedia_url("Meril Life Sciences"),
            "https://en.wikipedia.org/wiki/Meril_Life_Sciences"
        );
    }

    #[test]
    fn test_review_site() {
        let page = r#"<body>
            <div class="interview-process-card">Aptitude test followed by two rounds.</div>
            <div class="salary-band">Freshers earn around 3.6 lakhs per annum</div>
        </body>"#;
        let fields = parse_review_site(page);
        assert_eq!(fields.process, "Aptitude test followed by two rounds.");
        assert_eq!(fields.salary, "3.6 LPA");
    }

    #[test]
    fn test_interview_site() {
        let page = r#"<body>
            <article>Round 1 was online. Questions on data structures and SQL.</article>
            <article>Campus life blog post.</article>
            <article>Interview had a system design discussion in Java.</article>
        </body>"#;
        let fields = parse_interview_site(page);
        assert_eq!(
            fields.process,
            "Round 1 was online. Questions on data structures and SQL. | \
             Interview had a system design discussion in Java."
        );
        assert_eq!(
            fields.skills,
            vec!["Java", "SQL", "Data Structures", "System Design"]
        );
    }

    #[test]
    fn test_job_board() {
        let page = r#"<body>
            <div class="jobTuple">Python developer, AWS, 6-8 LPA</div>
            <div class="jobTuple">Java backend engineer with Docker, 10 LPA</div>
        </body>"#;
        let fields = parse_job_board(page);
        assert_eq!(fields.skills, vec!["Python", "AWS", "Java", "Docker"]);
        assert_eq!(fields.salary, "8 LPA");
    }

    #[test]
    fn test_encyclopedia_skips_coordinates() {
        let lead = "Meril Life Sciences is an Indian medical device company headquartered \
                    in Vapi, Gujarat, manufacturing stents, valves and orthopaedic implants.";
        let page = format!(
            r#"<div class="mw-parser-output">
                <p>Coordinates: 20.37°N 72.90°E and some more words to pass the length check easily enough here</p>
                <p>{lead}</p>
            </div>"#
        );
        assert_eq!(parse_encyclopedia(&page).description, lead);
        assert!(parse_encyclopedia("<p>Nothing here</p>").description.is_empty());
    }
}
