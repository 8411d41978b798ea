//! Candidate hash normalization and matching.

use crate::hashing::{DigestAlgorithm, FileDigestSet};

/// Outcome of checking a candidate against a digest set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Verification {
    /// No candidate supplied; nothing was compared.
    Skipped,
    NoMatch,
    Matched(DigestAlgorithm),
}

/// Canonical comparison form: uppercase with every whitespace character removed.
pub(crate) fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Compare a candidate against each digest in MD5, SHA1, SHA256 order.
pub(crate) fn verify(candidate: &str, digests: &FileDigestSet) -> Verification {
    if candidate.trim().is_empty() {
        return Verification::Skipped;
    }
    let candidate = normalize(candidate);
    digests
        .iter()
        .find(|(_, digest)| normalize(digest) == candidate)
        .map_or(Verification::NoMatch, |(algorithm, _)| {
            Verification::Matched(algorithm)
        })
}
