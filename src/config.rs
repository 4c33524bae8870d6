use serde::{Deserialize, Serialize};
use std::path::Path;

/// Static configuration surface for the URL engine.
///
/// Every table can be overridden from YAML; keys missing from the file keep
/// their built-in values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub wrapper_rules: Vec<WrapperRule>,
    pub tracking_params: Vec<String>,
    pub ignored_domains: Vec<String>,
    pub ignored_extensions: Vec<String>,
    pub noise_tags: Vec<String>,
    pub max_depth: usize,
    pub decode_quoted_printable: bool,
}

/// A redirector that carries its real destination in a query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperRule {
    /// Substring identifying the wrapper host, e.g. `safelinks.protection.outlook.com`
    pub domain_marker: String,
    pub query_param: String,
}

impl WrapperRule {
    pub fn new(domain_marker: &str, query_param: &str) -> Self {
        Self {
            domain_marker: domain_marker.to_string(),
            query_param: query_param.to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            wrapper_rules: vec![
                // Microsoft SafeLinks
                WrapperRule::new("safelinks.protection.outlook.com", "url"),
                // Inflection.io click tracking
                WrapperRule::new("tracking.inflection.io", "redirect"),
            ],
            tracking_params: strings(&[
                "inf_ver",
                "inf_ctx",
                "utm_source",
                "utm_medium",
                "utm_campaign",
                "utm_term",
                "utm_content",
            ]),
            ignored_domains: strings(&[
                "w3.org",
                "xml.org",
                "schemas.microsoft.com",
                "purl.org",
                "xmlns.com",
                "fonts.googleapis.com",
                "fonts.gstatic.com",
            ]),
            ignored_extensions: strings(&[
                ".png", ".jpg", ".jpeg", ".gif", ".svg", ".css", ".js", ".woff", ".woff2", ".ico",
            ]),
            noise_tags: strings(&[
                "script", "style", "meta", "noscript", "link", "object", "embed",
            ]),
            max_depth: 5,
            decode_quoted_printable: false,
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: EngineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` if it exists, otherwise fall back to the built-in tables.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let config = Self::from_file(path)?;
            log::info!("Loaded configuration from: {}", path.display());
            Ok(config)
        } else {
            log::warn!(
                "Configuration file '{}' not found, using default configuration",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_depth == 0 {
            return Err(anyhow::anyhow!("max_depth must be at least 1"));
        }

        for (i, rule) in self.wrapper_rules.iter().enumerate() {
            if rule.domain_marker.trim().is_empty() {
                return Err(anyhow::anyhow!("Wrapper rule {} has an empty domain_marker", i + 1));
            }
            if rule.query_param.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "Wrapper rule {} ({}) has an empty query_param",
                    i + 1,
                    rule.domain_marker
                ));
            }
        }

        if let Some(ext) = self.ignored_extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(anyhow::anyhow!(
                "Ignored extension '{}' must start with '.'",
                ext
            ));
        }

        if self.ignored_domains.iter().any(|d| d.trim().is_empty()) {
            return Err(anyhow::anyhow!("Ignored domains must not be empty strings"));
        }

        Ok(())
    }
}
