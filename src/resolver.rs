//! Tiered name resolution.
//!
//! Sources are asked in order; the first one that yields candidates decides
//! the outcome. Source failures are logged and treated as "no candidates".

use crate::lookup::{LookupOutcome, LookupSource};
use crate::rate_limit::RateLimiter;
use crate::scorer::{best_candidate, has_parenthetical};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    pub candidates: Vec<String>,
    /// True when `candidates` holds exactly one accepted name.
    pub resolved: bool,
}

impl ResolutionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn resolved(name: String) -> Self {
        Self {
            candidates: vec![name],
            resolved: true,
        }
    }

    pub fn ambiguous(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            resolved: false,
        }
    }

    /// The accepted name, if resolved.
    pub fn name(&self) -> Option<&str> {
        if self.resolved {
            self.candidates.first().map(String::as_str)
        } else {
            None
        }
    }
}

/// Applies the candidate policy to the names a source returned.
///
/// - none: empty, unresolved
/// - one: accepted as is
/// - several with parenthetical qualifiers: best scoring qualifier wins
/// - several without: all returned unresolved, for AI disambiguation
pub fn extract_candidates(candidates: Vec<String>) -> ResolutionResult {
    match candidates.len() {
        0 => ResolutionResult::empty(),
        1 => ResolutionResult {
            candidates,
            resolved: true,
        },
        _ => {
            let best = best_candidate(
                candidates
                    .iter()
                    .map(String::as_str)
                    .filter(|name| has_parenthetical(name)),
            )
            .map(str::to_string);
            match best {
                Some(name) => ResolutionResult::resolved(name),
                None => ResolutionResult::ambiguous(candidates),
            }
        }
    }
}

pub struct NameResolver {
    sources: Vec<Box<dyn LookupSource>>,
    limiter: RateLimiter,
}

impl NameResolver {
    pub fn new(sources: Vec<Box<dyn LookupSource>>, limiter: RateLimiter) -> Self {
        Self { sources, limiter }
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&mut self, tag: &str) -> ResolutionResult {
        for source in &self.sources {
            let outcome = self.limiter.call(|| source.lookup(tag));
            match outcome {
                LookupOutcome::Found(names) if !names.is_empty() => {
                    tracing::debug!(
                        tag = %tag,
                        source = source.name(),
                        count = names.len(),
                        "Candidates found"
                    );
                    return extract_candidates(names);
                }
                LookupOutcome::Found(_) | LookupOutcome::Empty => {
                    tracing::debug!(tag = %tag, source = source.name(), "No candidates");
                }
                LookupOutcome::Failed(err) => {
                    tracing::warn!(
                        tag = %tag,
                        source = source.name(),
                        error = %err,
                        "Lookup failed, treating as no candidates"
                    );
                }
            }
        }
        ResolutionResult::empty()
    }
}
