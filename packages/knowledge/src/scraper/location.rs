//! Headquarters location extraction.
//!
//! Strategies run in order and the first plausible answer wins: JSON-LD
//! address objects, address-like blocks, a text scan against the gazetteer,
//! location meta tags. A linked contact page is the caller's last resort.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use url::Url;

use super::html;
use crate::types::config::Gazetteer;

/// Shortest plausible location (exclusive).
const MIN_LEN: usize = 3;

/// Longest plausible location (exclusive).
const MAX_LEN: usize = 200;

/// Matches examined per address selector.
const BLOCKS_PER_SELECTOR: usize = 3;

/// Contact pages crawled at most.
pub const MAX_CONTACT_LINKS: usize = 3;

const ADDRESS_SELECTORS: &[&str] = &[
    ".address",
    ".location",
    ".contact",
    ".headquarters",
    r#"[class*="address"]"#,
    r#"[class*="location"]"#,
    r#"[class*="contact"]"#,
    r#"[id*="address"]"#,
    r#"[id*="location"]"#,
    r#"[id*="contact"]"#,
    "address",
];

/// JSON-LD keys that may carry an address.
const JSON_LD_KEYS: &[&str] = &["address", "location", "headquarters"];

/// Capitalized words on one line.
const CAPITALIZED_PLACE: &str = r"[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*";

lazy_static! {
    static ref LOCATED_IN: Regex =
        Regex::new(&format!(r"(?i:located\s+in)\s+({})", CAPITALIZED_PLACE)).unwrap();

    static ref HEADQUARTERS: Regex =
        Regex::new(&format!(r"(?i:headquarters)[:\s]+({})", CAPITALIZED_PLACE)).unwrap();

    static ref LOCATION_META: Regex = Regex::new(r"(?i)location|address|city").unwrap();

    static ref CONTACT_HREF: Regex = Regex::new(r"(?i)contact|about|location|address").unwrap();

    static ref CONTACT_CLASS: Regex = Regex::new(r"(?i)location|address|city").unwrap();
}

fn plausible(text: &str) -> Option<String> {
    let text = text.trim().trim_end_matches(|c: char| c == ',' || c == '.').trim();
    let len = text.chars().count();
    (len > MIN_LEN && len < MAX_LEN).then(|| text.to_string())
}

/// Location from the page, trying each strategy in order.
pub fn locate(document: &Html, text: &str, gazetteer: &Gazetteer) -> Option<String> {
    from_json_ld(document)
        .or_else(|| from_address_blocks(document, gazetteer))
        .or_else(|| from_text(text, gazetteer))
        .or_else(|| from_meta(document))
}

/// Address from JSON-LD structured data.
pub fn from_json_ld(document: &Html) -> Option<String> {
    html::select_all(document, r#"script[type="application/ld+json"]"#)
        .iter()
        .filter_map(|script| {
            let raw = script.text().collect::<String>();
            serde_json::from_str::<Value>(&raw).ok()
        })
        .find_map(|value| address_in(&value))
}

fn address_in(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.iter().find_map(address_in),
        Value::Object(map) => {
            if let Some(graph) = map.get("@graph") {
                if let Some(found) = address_in(graph) {
                    return Some(found);
                }
            }
            JSON_LD_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(address_value)
        }
        _ => None,
    }
}

fn address_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => plausible(s),
        Value::Object(map) => {
            if let Some(nested) = map.get("address") {
                if let Some(found) = address_value(nested) {
                    return Some(found);
                }
            }
            let parts: Vec<String> = ["addressLocality", "addressRegion", "addressCountry"]
                .iter()
                .filter_map(|key| match map.get(*key)? {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Object(country) => country
                        .get("name")
                        .and_then(Value::as_str)
                        .map(|s| s.trim().to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect();
            plausible(&parts.join(", "))
        }
        Value::Array(items) => items.iter().find_map(address_value),
        _ => None,
    }
}

/// Line of an address/contact block that names a known place.
pub fn from_address_blocks(document: &Html, gazetteer: &Gazetteer) -> Option<String> {
    for selector in ADDRESS_SELECTORS {
        for block in html::select_all(document, selector)
            .iter()
            .take(BLOCKS_PER_SELECTOR)
        {
            let found = block
                .text()
                .map(html::collapse_whitespace)
                .filter(|line| gazetteer.mentions_place(line))
                .find_map(|line| plausible(&line));
            if found.is_some() {
                return found;
            }
        }
    }
    None
}

/// Location phrases in running text.
pub fn from_text(text: &str, gazetteer: &Gazetteer) -> Option<String> {
    let mut patterns: Vec<Regex> = vec![LOCATED_IN.clone(), HEADQUARTERS.clone()];
    if !gazetteer.cities.is_empty() {
        let cities = gazetteer.city_alternation();
        for pattern in [
            format!(r"(?i)address[:\s]+([^.\n]*(?:{cities})[^.\n]*)"),
            format!(r"(?i)office[:\s]+([^.\n]*(?:{cities})[^.\n]*)"),
            format!(r"(?i)((?:{cities})[^.\n]*)"),
        ] {
            if let Ok(re) = Regex::new(&pattern) {
                patterns.push(re);
            }
        }
    }

    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| plausible(m.as_str()))
    })
}

/// Content of a `<meta>` tag named like a location.
pub fn from_meta(document: &Html) -> Option<String> {
    html::select_all(document, "meta[name][content]")
        .iter()
        .filter(|el| {
            el.value()
                .attr("name")
                .map_or(false, |name| LOCATION_META.is_match(name))
        })
        .filter_map(|el| el.value().attr("content"))
        .find_map(plausible)
}

/// Links to pages likely to carry an address.
pub fn contact_links(document: &Html, base: Option<&Url>) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for link in html::links(document, base) {
        if found.len() >= MAX_CONTACT_LINKS {
            break;
        }
        if CONTACT_HREF.is_match(&link.href) && !found.contains(&link.href) {
            found.push(link.href);
        }
    }
    found
}

/// Location from a contact page: an element classed like an address.
pub fn from_contact_page(page_html: &str) -> Option<String> {
    let document = html::parse(page_html);
    html::elements_with_class(&document, &["div", "p", "span"], &CONTACT_CLASS)
        .iter()
        .map(html::element_text)
        .find_map(|text| plausible(&text))
}
