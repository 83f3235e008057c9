//! Small helpers over parsed HTML.
//!
//! `scraper::Html` is not `Send`, so documents are parsed, queried and
//! dropped inside synchronous functions; only owned strings cross an await.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text is never shown to a reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub fn parse(html: &str) -> Html {
    Html::parse_document(html)
}

/// Collapse all whitespace runs to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An element's text with whitespace collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// First element matching a CSS selector.
pub fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Every element matching a CSS selector, in document order.
pub fn select_all<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => vec![],
    }
}

/// Text of the first element matching a selector, if non-empty.
pub fn first_text(document: &Html, selector: &str) -> Option<String> {
    select_first(document, selector)
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
}

/// Page title.
pub fn title(document: &Html) -> Option<String> {
    first_text(document, "title")
}

/// `content` attribute of the first matching `<meta>` element.
pub fn meta_content(document: &Html, selector: &str) -> Option<String> {
    select_first(document, selector)
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Elements with one of `tags` whose `class` attribute matches `pattern`.
pub fn elements_with_class<'a>(
    document: &'a Html,
    tags: &[&str],
    pattern: &Regex,
) -> Vec<ElementRef<'a>> {
    select_all(document, &tags.join(", "))
        .into_iter()
        .filter(|el| {
            el.value()
                .attr("class")
                .map_or(false, |class| pattern.is_match(class))
        })
        .collect()
}

/// Visible text of the page, one line per text node.
///
/// Script, style and template contents are skipped.
pub fn visible_text(document: &Html) -> String {
    let mut lines = Vec::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let line = collapse_whitespace(text);
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// A hyperlink resolved against the page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// All `<a href>` links, resolved against `base` when relative.
pub fn links(document: &Html, base: Option<&Url>) -> Vec<Link> {
    select_all(document, "a[href]")
        .into_iter()
        .filter_map(|el| {
            let raw = el.value().attr("href")?.trim();
            let href = match base {
                Some(base) => base.join(raw).ok()?.to_string(),
                None => raw.to_string(),
            };
            Some(Link {
                href,
                text: element_text(&el),
            })
        })
        .collect()
}

/// Host of a URL without a leading `www.`.
pub fn host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.trim_start_matches("www.").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head>
            <title> Acme Corp | Home </title>
            <meta name="description" content="  Acme builds rockets.  ">
            <style>.hero { color: red; }</style>
          </head>
          <body>
            <div class="about-us">We make   things.</div>
            <script>var tracking = "do not read";</script>
            <a href="/contact">Contact us</a>
            <a href="https://other.example/page">Elsewhere</a>
          </body>
        </html>
    "#;

    #[test]
    fn test_title_and_meta() {
        let doc = parse(PAGE);
        assert_eq!(title(&doc).as_deref(), Some("Acme Corp | Home"));
        assert_eq!(
            meta_content(&doc, r#"meta[name="description"]"#).as_deref(),
            Some("Acme builds rockets.")
        );
        assert_eq!(meta_content(&doc, r#"meta[name="keywords"]"#), None);
    }

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let text = visible_text(&parse(PAGE));
        assert!(text.contains("We make things."));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_links_resolve_relative_hrefs() {
        let base = Url::parse("https://www.acme.com/index.html").unwrap();
        let found = links(&parse(PAGE), Some(&base));
        assert_eq!(found[0].href, "https://www.acme.com/contact");
        assert_eq!(found[0].text, "Contact us");
        assert_eq!(found[1].href, "https://other.example/page");
    }

    #[test]
    fn test_elements_with_class() {
        let doc = parse(PAGE);
        let pattern = Regex::new("(?i)about").unwrap();
        let found = elements_with_class(&doc, &["div", "section"], &pattern);
        assert_eq!(found.len(), 1);
        assert_eq!(element_text(&found[0]), "We make things.");
    }

    #[test]
    fn test_host_strips_www() {
        assert_eq!(host("https://www.TCS.com/careers").as_deref(), Some("tcs.com"));
        assert_eq!(host("not a url"), None);
    }
}
