use crate::config::{EngineConfig, WrapperRule};
use crate::outcome::Outcome;
use url::{ParseError, Url};

/// Why the unwrap loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// No wrapper marker occurs in the current URL.
    NoRuleMatched,
    /// A marker matched but its query parameter is missing or empty.
    ParamAbsent,
    /// The current URL could not be parsed.
    ParseFailed,
    /// `max_depth` transitions were made and a wrapper marker still matches.
    DepthExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapTrace {
    pub url: String,
    pub transitions: usize,
    pub halt: HaltReason,
}

/// Rewrites redirector URLs to the destination embedded in their query.
///
/// Purely syntactic: nothing is fetched. Each call makes at most `max_depth`
/// transitions.
pub struct Unwrapper {
    rules: Vec<WrapperRule>,
    max_depth: usize,
}

impl Default for Unwrapper {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Unwrapper {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rules: config.wrapper_rules.clone(),
            max_depth: config.max_depth,
        }
    }

    pub fn unwrap(&self, url: &str) -> String {
        self.unwrap_traced(url).url
    }

    pub fn unwrap_traced(&self, url: &str) -> UnwrapTrace {
        let mut current = url.to_string();

        for transitions in 0..self.max_depth {
            let stop = |url: String, halt| UnwrapTrace {
                url,
                transitions,
                halt,
            };

            let Some(rule) = self.matching_rule(&current) else {
                return stop(current, HaltReason::NoRuleMatched);
            };

            match first_query_value(&current, &rule.query_param) {
                Outcome::Parsed(Some(target)) => {
                    log::debug!(
                        "Unwrapped {} via {}: {} -> {}",
                        rule.query_param,
                        rule.domain_marker,
                        current,
                        target
                    );
                    current = target;
                }
                Outcome::Parsed(None) => return stop(current, HaltReason::ParamAbsent),
                Outcome::Fallback(_) => return stop(current, HaltReason::ParseFailed),
            }
        }

        let halt = if self.matching_rule(&current).is_some() {
            log::debug!(
                "Unwrap depth {} exhausted, keeping {}",
                self.max_depth,
                current
            );
            HaltReason::DepthExhausted
        } else {
            HaltReason::NoRuleMatched
        };

        UnwrapTrace {
            url: current,
            transitions: self.max_depth,
            halt,
        }
    }

    fn matching_rule(&self, url: &str) -> Option<&WrapperRule> {
        self.rules
            .iter()
            .find(|rule| url.contains(rule.domain_marker.as_str()))
    }
}

/// First non-empty value of `param` in the query of `url`.
///
/// Scheme-less wrapper links such as `//host/?url=..` or `/path?url=..` are
/// resolved against a placeholder base so their query can still be read.
fn first_query_value(url: &str, param: &str) -> Outcome<Option<String>> {
    let parsed = match Url::parse(url) {
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(PLACEHOLDER_BASE).and_then(|base| base.join(url))
        }
        other => other,
    };

    match parsed {
        Ok(parsed) => Outcome::Parsed(
            parsed
                .query_pairs()
                .find(|(key, value)| key == param && !value.is_empty())
                .map(|(_, value)| value.into_owned()),
        ),
        Err(e) => {
            log::debug!("Cannot parse wrapper URL {}: {}", url, e);
            Outcome::Fallback(url.to_string())
        }
    }
}

const PLACEHOLDER_BASE: &str = "https://wrapper.invalid/";

#[cfg(test)]
mod tests {
    use super::*;
    use url::form_urlencoded::byte_serialize;

    fn safelink(target: &str) -> String {
        format!(
            "https://nam02.safelinks.protection.outlook.com/?url={}&data=05%7C01&reserved=0",
            byte_serialize(target.as_bytes()).collect::<String>()
        )
    }

    fn inflection(target: &str) -> String {
        format!(
            "https://tracking.inflection.io/click?redirect={}&inf_ver=2",
            byte_serialize(target.as_bytes()).collect::<String>()
        )
    }

    #[test]
    fn test_unwrap_safelinks() {
        let unwrapper = Unwrapper::default();
        let trace = unwrapper.unwrap_traced(
            "https://safelinks.protection.outlook.com/?url=https%3A%2F%2Fevil.example.com%2Flogin&data=x",
        );

        assert_eq!(trace.url, "https://evil.example.com/login");
        assert_eq!(trace.transitions, 1);
        assert_eq!(trace.halt, HaltReason::NoRuleMatched);
    }

    #[test]
    fn test_unwrap_nested_wrappers() {
        let unwrapper = Unwrapper::default();
        let url = safelink(&inflection("https://shop.example.com/deal?id=7"));

        let trace = unwrapper.unwrap_traced(&url);
        assert_eq!(trace.url, "https://shop.example.com/deal?id=7");
        assert_eq!(trace.transitions, 2);
    }

    #[test]
    fn test_unwrapped_url_is_left_alone() {
        let unwrapper = Unwrapper::default();
        let trace = unwrapper.unwrap_traced("https://example.com/page");

        assert_eq!(trace.url, "https://example.com/page");
        assert_eq!(trace.transitions, 0);
        assert_eq!(trace.halt, HaltReason::NoRuleMatched);
    }

    #[test]
    fn test_missing_param_halts() {
        let unwrapper = Unwrapper::default();
        let url = "https://safelinks.protection.outlook.com/?data=x";
        let trace = unwrapper.unwrap_traced(url);

        assert_eq!(trace.url, url);
        assert_eq!(trace.halt, HaltReason::ParamAbsent);

        let trace = unwrapper.unwrap_traced("https://safelinks.protection.outlook.com/?url=");
        assert_eq!(trace.halt, HaltReason::ParamAbsent);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // The SafeLinks rule comes first and has no `url` param here, so the
        // inflection rule is never tried in this iteration.
        let unwrapper = Unwrapper::default();
        let url = "https://safelinks.protection.outlook.com/tracking.inflection.io?redirect=https%3A%2F%2Fx.example.com";
        let trace = unwrapper.unwrap_traced(url);

        assert_eq!(trace.url, url);
        assert_eq!(trace.halt, HaltReason::ParamAbsent);
    }

    #[test]
    fn test_scheme_less_wrapper_is_unwrapped() {
        let unwrapper = Unwrapper::default();

        let trace = unwrapper.unwrap_traced(
            "//nam02.safelinks.protection.outlook.com/?url=https%3A%2F%2Fevil.example.com%2Flogin&data=x",
        );
        assert_eq!(trace.url, "https://evil.example.com/login");
        assert_eq!(trace.transitions, 1);
        assert_eq!(trace.halt, HaltReason::NoRuleMatched);

        assert_eq!(
            unwrapper.unwrap("/relative/safelinks.protection.outlook.com?url=https%3A%2F%2Fx.example.com"),
            "https://x.example.com"
        );
    }

    #[test]
    fn test_unparseable_url_halts_unchanged() {
        let unwrapper = Unwrapper::default();
        let url = "https://[safelinks.protection.outlook.com]/?url=https%3A%2F%2Fx.example.com";
        let trace = unwrapper.unwrap_traced(url);

        assert_eq!(trace.url, url);
        assert_eq!(trace.transitions, 0);
        assert_eq!(trace.halt, HaltReason::ParseFailed);
    }

    #[test]
    fn test_depth_bound() {
        let unwrapper = Unwrapper::default();
        let mut url = "https://final.example.com/".to_string();
        for _ in 0..8 {
            url = safelink(&url);
        }

        let trace = unwrapper.unwrap_traced(&url);
        assert_eq!(trace.transitions, 5);
        assert_eq!(trace.halt, HaltReason::DepthExhausted);
        assert!(trace.url.contains("safelinks.protection.outlook.com"));
    }

    #[test]
    fn test_exactly_max_depth_layers_resolves() {
        let unwrapper = Unwrapper::default();
        let mut url = "https://final.example.com/".to_string();
        for _ in 0..5 {
            url = safelink(&url);
        }

        let trace = unwrapper.unwrap_traced(&url);
        assert_eq!(trace.url, "https://final.example.com/");
        assert_eq!(trace.transitions, 5);
        assert_eq!(trace.halt, HaltReason::NoRuleMatched);
    }

    #[test]
    fn test_custom_rules() {
        let config = EngineConfig {
            wrapper_rules: vec![WrapperRule::new("urldefense.example.net", "u")],
            max_depth: 1,
            ..Default::default()
        };
        let unwrapper = Unwrapper::new(&config);

        assert_eq!(
            unwrapper.unwrap("https://urldefense.example.net/v3?u=https%3A%2F%2Fa.example.com%2F"),
            "https://a.example.com/"
        );
        // Default rules are not consulted once overridden
        let url = safelink("https://b.example.com/");
        assert_eq!(unwrapper.unwrap(&url), url);
    }
}
