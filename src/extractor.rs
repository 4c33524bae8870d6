use crate::outcome::Outcome;
use crate::preprocess::SanitizedDocument;
use regex::Regex;
use scraper::Selector;
use serde::Serialize;

/// Where a candidate URL was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlOrigin {
    Href,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateUrl {
    pub url: String,
    pub origin: UrlOrigin,
}

impl CandidateUrl {
    fn new(url: &str, origin: UrlOrigin) -> Self {
        Self {
            url: url.to_string(),
            origin,
        }
    }
}

/// Pulls raw URL strings out of a sanitized document or plain text.
///
/// Nothing is deduplicated or validated here.
pub struct CandidateExtractor {
    url_regex: Regex,
    anchor_selector: Selector,
}

impl Default for CandidateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateExtractor {
    pub fn new() -> Self {
        Self {
            url_regex: Regex::new(
                r"https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_+.~#?&/=]*)",
            )
            .expect("URL pattern must compile"),
            anchor_selector: Selector::parse("a[href]").expect("anchor selector must parse"),
        }
    }

    /// Href candidates first, then visible-text candidates. A body that could
    /// not be parsed as markup is scanned as text only.
    pub fn extract(&self, document: &Outcome<SanitizedDocument>) -> Vec<CandidateUrl> {
        match document {
            Outcome::Parsed(document) => {
                let mut candidates = self.extract_hrefs(document);
                candidates.extend(self.scan_text(&document.visible_text()));
                candidates
            }
            Outcome::Fallback(raw) => self.scan_text(raw),
        }
    }

    pub fn extract_hrefs(&self, document: &SanitizedDocument) -> Vec<CandidateUrl> {
        document
            .html()
            .select(&self.anchor_selector)
            .filter_map(|anchor| anchor.value().attr("href"))
            .map(|href| CandidateUrl::new(href, UrlOrigin::Href))
            .collect()
    }

    pub fn scan_text(&self, text: &str) -> Vec<CandidateUrl> {
        self.url_regex
            .find_iter(text)
            .map(|m| CandidateUrl::new(m.as_str(), UrlOrigin::Text))
            .collect()
    }
}
