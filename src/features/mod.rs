pub mod markup;
pub mod url_text;

use serde::Serialize;

/// Named numeric features produced by one extractor, in a fixed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub extractor: String,
    pub features: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn new(extractor: &str) -> Self {
        Self {
            extractor: extractor.to_string(),
            features: Vec::new(),
        }
    }

    pub fn push(&mut self, name: &str, value: f64) {
        self.features.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.features
            .iter()
            .find(|(feature, _)| feature == name)
            .map(|(_, value)| *value)
    }

    #[cfg(test)]
    pub(crate) fn values(&self) -> Vec<f64> {
        self.features.iter().map(|(_, value)| *value).collect()
    }
}

pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, text: &str) -> FeatureVector;
    fn name(&self) -> &str;
}

/// Runs every registered extractor over the same text.
pub struct FeatureEngine {
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureEngine {
    pub fn new() -> Self {
        Self {
            extractors: vec![
                Box::new(markup::MarkupFeatures::new()),
                Box::new(url_text::UrlTextFeatures),
            ],
        }
    }

    pub fn with_extractors(extractors: Vec<Box<dyn FeatureExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn analyze(&self, text: &str) -> Vec<FeatureVector> {
        self.extractors
            .iter()
            .map(|extractor| {
                let vector = extractor.extract(text);
                log::debug!("{} features: {:?}", extractor.name(), vector.features);
                vector
            })
            .collect()
    }
}
