use crate::canonical::Canonicalizer;
use crate::config::EngineConfig;
use crate::extractor::{CandidateExtractor, CandidateUrl};
use crate::filter::UrlFilter;
use crate::preprocess::Preprocessor;
use crate::unwrap::{HaltReason, Unwrapper};
use std::collections::BTreeSet;

/// URL extraction pipeline: preprocess, extract, unwrap, canonicalize,
/// filter, deduplicate.
///
/// Holds only immutable tables, so one engine can serve any number of
/// threads.
pub struct UrlEngine {
    preprocessor: Preprocessor,
    extractor: CandidateExtractor,
    unwrapper: Unwrapper,
    canonicalizer: Canonicalizer,
    filter: UrlFilter,
}

impl Default for UrlEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl UrlEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            preprocessor: Preprocessor::new(config),
            extractor: CandidateExtractor::new(),
            unwrapper: Unwrapper::new(config),
            canonicalizer: Canonicalizer::new(config),
            filter: UrlFilter::new(config),
        }
    }

    /// Distinct destination URLs a reader could click, sorted ascending.
    pub fn extract_urls(&self, body: &str) -> Vec<String> {
        let candidates = self.candidates(body);
        log::debug!("Found {} candidate URLs", candidates.len());

        candidates
            .iter()
            .filter_map(|candidate| self.resolve(candidate))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn candidates(&self, body: &str) -> Vec<CandidateUrl> {
        let document = self.preprocessor.preprocess(body);
        self.extractor.extract(&document)
    }

    /// Unwrap, canonicalize and filter one candidate. `None` means dropped.
    pub fn resolve(&self, candidate: &CandidateUrl) -> Option<String> {
        let trace = self.unwrapper.unwrap_traced(&candidate.url);
        if trace.halt == HaltReason::DepthExhausted {
            log::debug!(
                "Wrapper chain for {} not fully resolved after {} steps",
                candidate.url,
                trace.transitions
            );
        }

        let canonical = self.canonicalizer.canonicalize(&trace.url);
        match self.filter.check(&canonical) {
            Ok(()) => Some(canonical),
            Err(rejection) => {
                log::debug!(
                    "Dropping {:?} candidate {}: {}",
                    candidate.origin,
                    canonical,
                    rejection
                );
                None
            }
        }
    }
}
