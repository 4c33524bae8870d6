use crate::classifier::{Classifier, Prediction};
use crate::config::EngineConfig;
use crate::engine::UrlEngine;
use crate::features::{FeatureEngine, FeatureVector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailRequest {
    pub subject: String,
    pub body: String,
    pub sender: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailAnalysis {
    pub subject: String,
    pub urls: Vec<String>,
    pub features: Vec<FeatureVector>,
    pub prediction: Option<Prediction>,
}

/// Service-side composition of URL extraction, feature counts and an
/// optional classifier.
pub struct EmailAnalyzer {
    engine: UrlEngine,
    features: FeatureEngine,
    classifier: Option<Box<dyn Classifier>>,
}

impl Default for EmailAnalyzer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl EmailAnalyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            engine: UrlEngine::new(config),
            features: FeatureEngine::new(),
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn engine(&self) -> &UrlEngine {
        &self.engine
    }

    pub fn analyze(&self, request: &EmailRequest) -> EmailAnalysis {
        let urls = self.engine.extract_urls(&request.body);

        log::info!("Analyzing email: {}", request.subject);
        log::info!("URLs found in body ({}):", urls.len());
        for (i, url) in urls.iter().enumerate() {
            log::info!("  {}. {}", i + 1, url);
        }

        // The classifier sees the raw text, not the extracted URLs
        let text = format!("{} {}", request.body, request.subject);
        let features = self.features.analyze(&text);
        let prediction = self
            .classifier
            .as_ref()
            .and_then(|classifier| self.classify(classifier.as_ref(), &text));

        EmailAnalysis {
            subject: request.subject.clone(),
            urls,
            features,
            prediction,
        }
    }

    fn classify(&self, classifier: &dyn Classifier, text: &str) -> Option<Prediction> {
        match classifier.phishing_probability(text) {
            Ok(probability) if (0.0..=1.0).contains(&probability) => {
                Some(Prediction::from_probability(probability))
            }
            Ok(probability) => {
                log::warn!("Classifier returned out-of-range probability {}", probability);
                None
            }
            Err(e) => {
                log::warn!("Classifier failed, returning URLs only: {}", e);
                None
            }
        }
    }
}
