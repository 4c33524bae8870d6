use crate::config::EngineConfig;
use std::fmt;
use url::Url;

/// Why a canonical URL was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    IgnoredDomain(String),
    IgnoredExtension(String),
    /// No scheme or no host, e.g. `mailto:` links, fragments or relative paths.
    Malformed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::IgnoredDomain(domain) => write!(f, "ignored domain {domain}"),
            Rejection::IgnoredExtension(ext) => write!(f, "ignored extension {ext}"),
            Rejection::Malformed => write!(f, "not an absolute URL with a host"),
        }
    }
}

/// Drops shared infrastructure hosts, static assets and anything that is not
/// an absolute URL.
pub struct UrlFilter {
    ignored_domains: Vec<String>,
    ignored_extensions: Vec<String>,
}

impl Default for UrlFilter {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl UrlFilter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ignored_domains: config.ignored_domains.clone(),
            ignored_extensions: config
                .ignored_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    pub fn check(&self, url: &str) -> Result<(), Rejection> {
        if let Some(domain) = self
            .ignored_domains
            .iter()
            .find(|domain| url.contains(domain.as_str()))
        {
            return Err(Rejection::IgnoredDomain(domain.clone()));
        }

        let parsed = Url::parse(url).map_err(|_| Rejection::Malformed)?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(Rejection::Malformed);
        }

        let path = parsed.path().to_lowercase();
        if let Some(ext) = self
            .ignored_extensions
            .iter()
            .find(|ext| path.ends_with(ext.as_str()))
        {
            return Err(Rejection::IgnoredExtension(ext.clone()));
        }

        Ok(())
    }
}
