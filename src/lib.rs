pub mod analysis;
pub mod canonical;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod extractor;
pub mod features;
pub mod filter;
pub mod outcome;
pub mod preprocess;
pub mod unwrap;

pub use analysis::{EmailAnalysis, EmailAnalyzer, EmailRequest};
pub use classifier::{Classifier, Prediction, RiskLevel};
pub use config::{EngineConfig, WrapperRule};
pub use engine::UrlEngine;
pub use extractor::{CandidateUrl, UrlOrigin};
pub use outcome::Outcome;
