//! Company identity validation for discovered websites.

use super::html;

/// Words shorter than this carry no identity signal ("the", "inc", "ltd").
const MIN_SIGNIFICANT_LEN: usize = 4;

/// How much page text is searched for the company's words.
const CONTENT_PREVIEW_CHARS: usize = 2000;

/// Share of significant words that must appear in the page text.
const CONTENT_MATCH_RATIO: f32 = 0.6;

/// Which signal accepted the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMatch {
    Title,
    SiteName,
    Content,
}

/// Lower-cased words of a company name long enough to identify it.
pub fn significant_words(company_name: &str) -> Vec<String> {
    company_name
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_SIGNIFICANT_LEN)
        .map(str::to_string)
        .collect()
}

/// Name check used for titles and site names: the whole name, or a
/// majority of its significant words.
fn names_company(text: &str, company_lower: &str, words: &[String]) -> bool {
    let text = text.to_lowercase();
    if text.contains(company_lower) {
        return true;
    }
    if words.is_empty() {
        return false;
    }
    let hits = words.iter().filter(|w| text.contains(w.as_str())).count();
    hits * 2 > words.len()
}

/// Check that a fetched page belongs to `company_name`.
pub fn identify(page_html: &str, company_name: &str) -> Option<IdentityMatch> {
    let company_lower = company_name.trim().to_lowercase();
    if company_lower.is_empty() {
        return None;
    }
    let words = significant_words(company_name);
    let document = html::parse(page_html);

    if let Some(title) = html::title(&document) {
        if names_company(&title, &company_lower, &words) {
            return Some(IdentityMatch::Title);
        }
    }

    if let Some(site_name) = html::meta_content(&document, r#"meta[property="og:site_name"]"#) {
        if names_company(&site_name, &company_lower, &words) {
            return Some(IdentityMatch::SiteName);
        }
    }

    if words.is_empty() {
        return None;
    }
    let preview: String = html::visible_text(&document)
        .to_lowercase()
        .chars()
        .take(CONTENT_PREVIEW_CHARS)
        .collect();
    let hits = words.iter().filter(|w| preview.contains(w.as_str())).count();
    if hits as f32 >= words.len() as f32 * CONTENT_MATCH_RATIO {
        return Some(IdentityMatch::Content);
    }

    None
}

/// Whether a page belongs to `company_name`.
pub fn is_company_page(page_html: &str, company_name: &str) -> bool {
    identify(page_html, company_name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_words() {
        assert_eq!(
            significant_words("Tata Consultancy Services Ltd"),
            vec!["tata", "consultancy", "services"]
        );
        assert!(significant_words("TCS").is_empty());
    }

    #[test]
    fn test_title_with_full_name() {
        let page = "<html><head><title>TCS | Home</title></head></html>";
        assert_eq!(identify(page, "TCS"), Some(IdentityMatch::Title));
    }

    #[test]
    fn test_title_needs_majority_of_words() {
        let page = "<title>Tata Steel</title>";
        assert_eq!(identify(page, "Tata Consultancy Services"), None);

        let page = "<title>Consultancy Services from Tata</title>";
        assert_eq!(
            identify(page, "Tata Consultancy Services"),
            Some(IdentityMatch::Title)
        );
    }

    #[test]
    fn test_site_name_fallback() {
        let page = r#"<html><head><title>Welcome</title>
            <meta property="og:site_name" content="Meril Life Sciences"></head></html>"#;
        assert_eq!(identify(page, "Meril"), Some(IdentityMatch::SiteName));
    }

    #[test]
    fn test_content_fallback() {
        let page = "<html><head><title>Home</title></head>\
            <body><p>Meril builds medical devices for life sciences.</p></body></html>";
        assert_eq!(
            identify(page, "Meril Life Sciences"),
            Some(IdentityMatch::Content)
        );
    }

    #[test]
    fn test_unrelated_page_is_rejected() {
        let page = "<html><head><title>Domain for sale</title></head>\
            <body><p>This domain may be for sale.</p></body></html>";
        assert!(!is_company_page(page, "Meril Life Sciences"));
        assert!(!is_company_page(page, "TCS"));
    }
}
