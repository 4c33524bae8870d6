use super::{FeatureExtractor, FeatureVector};
use crate::preprocess::Preprocessor;
use scraper::{Html, Selector};

const HIDDEN_STYLES: [&str; 2] = ["display:none", "visibility:hidden"];

/// Counts of active and hidden content in an HTML body.
///
/// Scripts, iframes and forms are counted before noise removal; `num_links`
/// counts `http` occurrences after it.
pub struct MarkupFeatures {
    preprocessor: Preprocessor,
    script: Selector,
    iframe: Selector,
    form: Selector,
}

impl Default for MarkupFeatures {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupFeatures {
    pub fn new() -> Self {
        Self {
            preprocessor: Preprocessor::default(),
            script: Selector::parse("script").expect("script selector must parse"),
            iframe: Selector::parse("iframe").expect("iframe selector must parse"),
            form: Selector::parse("form").expect("form selector must parse"),
        }
    }

    fn count_parsed(&self, text: &str, vector: &mut FeatureVector) {
        let html = Html::parse_document(text);
        vector.push("num_script", html.select(&self.script).count() as f64);
        vector.push("num_iframe", html.select(&self.iframe).count() as f64);
        vector.push("num_forms", html.select(&self.form).count() as f64);
        vector.push("num_hidden", count_hidden(text) as f64);

        let sanitized = self.preprocessor.sanitize(text).to_html();
        vector.push("num_links", sanitized.matches("http").count() as f64);
    }

    fn count_raw(&self, text: &str, vector: &mut FeatureVector) {
        vector.push("num_script", text.matches("<script>").count() as f64);
        vector.push("num_iframe", text.matches("<iframe").count() as f64);
        vector.push("num_forms", text.matches("<form").count() as f64);
        vector.push("num_hidden", count_hidden(text) as f64);
        vector.push("num_links", text.matches("http").count() as f64);
    }
}

fn count_hidden(text: &str) -> usize {
    HIDDEN_STYLES
        .iter()
        .map(|style| text.matches(style).count())
        .sum()
}

impl FeatureExtractor for MarkupFeatures {
    fn extract(&self, text: &str) -> FeatureVector {
        let mut vector = FeatureVector::new(self.name());
        if text.contains('<') {
            self.count_parsed(text, &mut vector);
        } else {
            self.count_raw(text, &mut vector);
        }
        vector
    }

    fn name(&self) -> &str {
        "markup"
    }
}
