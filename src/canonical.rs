use crate::config::EngineConfig;
use crate::outcome::Outcome;
use std::collections::HashSet;
use url::{form_urlencoded, Url};

/// Strips tracking parameters and normalizes the URL string.
pub struct Canonicalizer {
    tracking_params: HashSet<String>,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Canonicalizer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tracking_params: config.tracking_params.iter().cloned().collect(),
        }
    }

    pub fn canonicalize(&self, url: &str) -> String {
        let outcome = self.clean(url);
        if outcome.is_fallback() {
            log::debug!("Leaving unparseable URL as-is: {}", url);
        }
        outcome.into_inner()
    }

    /// `Fallback` holds the trimmed input when it does not parse as a URL.
    pub fn clean(&self, url: &str) -> Outcome<String> {
        let trimmed = trim_trailing_paren(url.trim());

        let Ok(mut parsed) = Url::parse(trimmed) else {
            return Outcome::Fallback(trimmed.to_string());
        };

        if parsed.query().is_some() {
            let total = parsed.query_pairs().count();
            let kept: Vec<(String, String)> = parsed
                .query_pairs()
                .filter(|(key, _)| !self.tracking_params.contains(&**key))
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect();

            if kept.is_empty() {
                parsed.set_query(None);
            } else if kept.len() < total {
                let query = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&kept)
                    .finish();
                parsed.set_query(Some(&query));
            }
        }

        Outcome::Parsed(parsed.to_string())
    }
}

/// Drop one trailing `)` picked up by the text scan from prose like
/// "(see https://example.com/a)". Balanced parentheses inside the URL stay.
fn trim_trailing_paren(url: &str) -> &str {
    match url.strip_suffix(')') {
        Some(stripped) if url.matches(')').count() > url.matches('(').count() => stripped,
        _ => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_tracking_params() {
        let canonicalizer = Canonicalizer::default();
        assert_eq!(
            canonicalizer.canonicalize("https://example.com/page?utm_source=newsletter&id=5"),
            "https://example.com/page?id=5"
        );
        assert_eq!(
            canonicalizer.canonicalize(
                "https://example.com/x?utm_campaign=a&utm_medium=email&inf_ctx=abc"
            ),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_preserves_order_and_fragment() {
        let canonicalizer = Canonicalizer::default();
        assert_eq!(
            canonicalizer.canonicalize("https://example.com/?b=2&utm_term=x&a=1#section"),
            "https://example.com/?b=2&a=1#section"
        );
    }

    #[test]
    fn test_idempotent() {
        let canonicalizer = Canonicalizer::default();
        for url in [
            "https://example.com/page?q=hello+world&utm_source=x",
            "https://Example.COM/a/b?x=%2F&y=1",
            "https://en.example.org/wiki/Thing_(disambiguation)",
            "http://bit.ly/abc123",
            "https://example.com/?flag",
        ] {
            let once = canonicalizer.canonicalize(url);
            assert_eq!(canonicalizer.canonicalize(&once), once, "input: {url}");
        }
    }

    #[test]
    fn test_query_untouched_without_tracking_params() {
        let canonicalizer = Canonicalizer::default();
        assert_eq!(
            canonicalizer.canonicalize("https://a.example.com/x?flag"),
            "https://a.example.com/x?flag"
        );
        assert_eq!(
            canonicalizer.canonicalize("https://a.example.com/s?q=a%20b&lang=en"),
            "https://a.example.com/s?q=a%20b&lang=en"
        );
        // Re-encoded once a pair is removed
        assert_eq!(
            canonicalizer.canonicalize("https://a.example.com/x?flag&utm_source=x"),
            "https://a.example.com/x?flag="
        );
    }

    #[test]
    fn test_trailing_paren_artifact() {
        let canonicalizer = Canonicalizer::default();
        assert_eq!(
            canonicalizer.canonicalize("https://example.com/path)"),
            "https://example.com/path"
        );
        assert_eq!(
            canonicalizer.canonicalize("https://en.example.org/wiki/Thing_(x)"),
            "https://en.example.org/wiki/Thing_(x)"
        );
    }

    #[test]
    fn test_unparseable_input_unchanged() {
        let canonicalizer = Canonicalizer::default();
        let outcome = canonicalizer.clean("not a url?utm_source=x");

        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_inner(), "not a url?utm_source=x");
    }

    #[test]
    fn test_tracking_params_are_configurable() {
        let config = EngineConfig {
            tracking_params: vec!["ref".to_string()],
            ..Default::default()
        };
        let canonicalizer = Canonicalizer::new(&config);

        assert_eq!(
            canonicalizer.canonicalize("https://example.com/?ref=mail&utm_source=x"),
            "https://example.com/?utm_source=x"
        );
    }
}
