use super::{FeatureExtractor, FeatureVector};

const SHORTENER_MARKERS: [&str; 2] = ["bit.ly", "tinyurl"];
const IP_URL_PREFIXES: [&str; 2] = ["http://1", "http://192"];
const LONG_TEXT_CHARS: usize = 200;

/// Cheap 0/1 flags over the raw text: IP-address links, very long text and
/// known shorteners.
pub struct UrlTextFeatures;

impl FeatureExtractor for UrlTextFeatures {
    fn extract(&self, text: &str) -> FeatureVector {
        let flag = |hit: bool| if hit { 1.0 } else { 0.0 };

        let mut vector = FeatureVector::new(self.name());
        vector.push(
            "has_ip",
            flag(IP_URL_PREFIXES.iter().any(|p| text.contains(p))),
        );
        vector.push("len_long", flag(text.chars().count() > LONG_TEXT_CHARS));
        vector.push(
            "is_shortener",
            flag(SHORTENER_MARKERS.iter().any(|s| text.contains(s))),
        );
        vector
    }

    fn name(&self) -> &str {
        "url_text"
    }
}
