use crate::config::EngineConfig;
use crate::outcome::Outcome;
use scraper::{Html, Selector};

const MARKUP_MARKERS: [&str; 2] = ["<html", "<!doctype html"];

/// Element tree of an email body with every noise element detached.
pub struct SanitizedDocument {
    html: Html,
}

impl SanitizedDocument {
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Text a reader would see, one space between text runs.
    pub fn visible_text(&self) -> String {
        self.html
            .root_element()
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serialized markup of the sanitized tree.
    pub fn to_html(&self) -> String {
        self.html.html()
    }
}

pub struct Preprocessor {
    noise_selectors: Vec<Selector>,
    decode_quoted_printable: bool,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Preprocessor {
    pub fn new(config: &EngineConfig) -> Self {
        let noise_selectors = config
            .noise_tags
            .iter()
            .filter_map(|tag| match Selector::parse(tag) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    log::warn!("Ignoring invalid noise tag '{}': {:?}", tag, e);
                    None
                }
            })
            .collect();

        Self {
            noise_selectors,
            decode_quoted_printable: config.decode_quoted_printable,
        }
    }

    /// Build the sanitized tree for `body`.
    ///
    /// Returns `Fallback` carrying the (decoded) body when it holds no markup
    /// at all; callers then scan it as plain text.
    pub fn preprocess(&self, body: &str) -> Outcome<SanitizedDocument> {
        let decoded = self.decode(body);
        let markup = trim_to_markup(&decoded);

        if !markup.contains('<') {
            log::debug!("No markup found in body, treating it as plain text");
            return Outcome::Fallback(markup.to_string());
        }

        Outcome::Parsed(self.sanitize(markup))
    }

    /// Parse `markup` as-is and detach every noise element.
    pub fn sanitize(&self, markup: &str) -> SanitizedDocument {
        let mut html = Html::parse_document(markup);
        let noise_ids: Vec<_> = self
            .noise_selectors
            .iter()
            .flat_map(|selector| html.select(selector).map(|element| element.id()))
            .collect();

        for id in &noise_ids {
            if let Some(mut node) = html.tree.get_mut(*id) {
                node.detach();
            }
        }

        if !noise_ids.is_empty() {
            log::debug!("Removed {} noise elements", noise_ids.len());
        }

        SanitizedDocument { html }
    }

    fn decode(&self, body: &str) -> String {
        if !self.decode_quoted_printable {
            return body.to_string();
        }

        match quoted_printable::decode(body.as_bytes(), quoted_printable::ParseMode::Robust) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).to_string(),
            Err(e) => {
                log::debug!("Quoted-printable decoding failed, using raw body: {}", e);
                body.to_string()
            }
        }
    }
}

/// Drop any transport junk in front of the first `<html` or `<!doctype html`
/// marker. Bodies without either marker are returned unchanged.
pub fn trim_to_markup(body: &str) -> &str {
    // ASCII lowercasing keeps byte offsets aligned with `body`
    let lower = body.to_ascii_lowercase();
    MARKUP_MARKERS
        .iter()
        .filter_map(|marker| lower.find(marker))
        .min()
        .map_or(body, |start| &body[start..])
}
