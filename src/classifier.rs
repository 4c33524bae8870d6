use serde::{Deserialize, Serialize};

/// A trained phishing model living outside this crate.
///
/// It receives the raw email text and returns the probability that the
/// email is phishing.
pub trait Classifier: Send + Sync {
    fn phishing_probability(&self, text: &str) -> anyhow::Result<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Dangerous,
}

impl RiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        match probability {
            p if p > 0.8 => RiskLevel::Dangerous,
            p if p > 0.4 => RiskLevel::Suspicious,
            _ => RiskLevel::Safe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub is_phishing: bool,
    pub confidence: f64,
    pub risk_level: RiskLevel,
}

impl Prediction {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            is_phishing: probability > 0.5,
            confidence: probability,
            risk_level: RiskLevel::from_probability(probability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_probability(0.4), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_probability(0.41), RiskLevel::Suspicious);
        assert_eq!(RiskLevel::from_probability(0.8), RiskLevel::Suspicious);
        assert_eq!(RiskLevel::from_probability(0.81), RiskLevel::Dangerous);
    }

    #[test]
    fn test_prediction() {
        let prediction = Prediction::from_probability(0.45);
        assert!(!prediction.is_phishing);
        assert_eq!(prediction.risk_level, RiskLevel::Suspicious);

        let prediction = Prediction::from_probability(0.9);
        assert!(prediction.is_phishing);
        assert_eq!(prediction.confidence, 0.9);
        assert_eq!(prediction.risk_level, RiskLevel::Dangerous);
    }
}
