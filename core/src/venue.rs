use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::keywords::split_phrases;

/// Which rule of the fallback chain accepted a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Containment,
    TokenOverlap,
}

/// Case-folded form used by every tier: NFKC, lowercase, trimmed.
pub fn fold(name: &str) -> String {
    name.nfkc().collect::<String>().to_lowercase().trim().to_string()
}

/// Tokens of a folded name that are long enough to carry meaning.
fn significant_tokens(folded: &str) -> Vec<&str> {
    folded.split_whitespace().filter(|t| t.chars().count() > 3).collect()
}

/// Try exact, containment, then token overlap; first success wins.
pub fn match_tier(candidate: &str, target: &str) -> Option<MatchTier> {
    let cand = fold(candidate);
    let targ = fold(target);
    if cand.is_empty() || targ.is_empty() {
        return None;
    }

    if cand == targ {
        return Some(MatchTier::Exact);
    }
    if cand.contains(&targ) || targ.contains(&cand) {
        return Some(MatchTier::Containment);
    }

    let tokens = significant_tokens(&targ);
    if tokens.is_empty() {
        return None;
    }
    let hits = tokens.iter().filter(|t| cand.contains(*t)).count();
    if hits as f64 >= 0.5 * tokens.len() as f64 {
        Some(MatchTier::TokenOverlap)
    } else {
        None
    }
}

pub fn venue_matches(candidate: &str, target: &str) -> bool {
    match_tier(candidate, target).is_some()
}

/// Ordered allow-list of target venues. Duplicates are kept; they never change a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueList {
    venues: Vec<String>,
}

impl VenueList {
    pub fn new<I, S>(venues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { venues: venues.into_iter().map(Into::into).collect() }
    }

    /// Parse classifier output: comma separated, ASCII or full-width commas.
    pub fn parse(text: &str) -> Self {
        Self { venues: split_phrases(text) }
    }

    pub fn is_empty(&self) -> bool { self.venues.is_empty() }
    pub fn len(&self) -> usize { self.venues.len() }
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.venues.iter().map(String::as_str) }

    /// First target accepting `candidate`, with the tier that accepted it.
    pub fn matching_venue(&self, candidate: &str) -> Option<(&str, MatchTier)> {
        if candidate.trim().is_empty() {
            return None;
        }
        self.venues
            .iter()
            .find_map(|target| match_tier(candidate, target).map(|tier| (target.as_str(), tier)))
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        self.matching_venue(candidate).is_some()
    }
}
