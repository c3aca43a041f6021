//! Combination resolution over the active suggestion sets.
//!
//! Resolution order: exact key, then the (space, sunlight, experience)
//! triple, then the canonical default tuple. The triple fallback knowingly
//! discards the time and purpose dimensions; the returned `MatchQuality`
//! makes that visible to callers.

use crate::domain::suggestion::{
    CombinationKey, CombinationProfile, MatchQuality, SuggestionSet,
};
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSuggestions {
    pub set: SuggestionSet,
    pub quality: MatchQuality,
    /// Key derived from the requested profile, not from the matched set.
    pub requested_key: CombinationKey,
}

/// Pure read over `sets`; inactive sets never match.
pub fn resolve(
    sets: &[SuggestionSet],
    profile: &CombinationProfile,
) -> Result<ResolvedSuggestions, DomainError> {
    let requested_key = profile.key();

    if let Some(set) = sets.iter().find(|set| set.matches_key(&requested_key)) {
        return Ok(ResolvedSuggestions {
            set: set.clone(),
            quality: MatchQuality::Exact,
            requested_key,
        });
    }

    if let Some(set) = sets.iter().find(|set| set.matches_triple(profile)) {
        return Ok(ResolvedSuggestions {
            set: set.clone(),
            quality: MatchQuality::Fallback,
            requested_key,
        });
    }

    let default_key = CombinationProfile::canonical_default().key();
    if let Some(set) = sets.iter().find(|set| set.matches_key(&default_key)) {
        return Ok(ResolvedSuggestions {
            set: set.clone(),
            quality: MatchQuality::Default,
            requested_key,
        });
    }

    Err(DomainError::UnknownCombination { key: requested_key.0 })
}
