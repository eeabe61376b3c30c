use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::venue::fold;

lazy_static! {
    // extractor output uses either ASCII or full-width commas
    static ref DELIMITER: Regex = Regex::new(r"[,，]").expect("valid regex");
    static ref GENERIC_TERMS: HashSet<&'static str> = {
        let terms: &[&str] = &[
            "machine learning", "deep learning", "artificial intelligence", "computer science",
            "data science", "neural network", "neural networks", "ai", "big data",
        ];
        terms.iter().copied().collect()
    };
}

/// Generic terms are too broad to say anything in a co-occurrence map.
pub fn is_generic_term(phrase: &str) -> bool {
    GENERIC_TERMS.contains(fold(phrase).as_str())
}

/// Split a comma-delimited string into trimmed, non-empty items.
pub fn split_phrases(text: &str) -> Vec<String> {
    DELIMITER
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub max_per_paper: usize,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self { min_tokens: 1, max_tokens: 5, max_per_paper: 6 }
    }
}

/// Keywords for one paper as the extractor handed them over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawKeywords {
    List(Vec<String>),
    Delimited(String),
}

impl Default for RawKeywords {
    fn default() -> Self { RawKeywords::List(Vec::new()) }
}

impl RawKeywords {
    pub fn phrases(&self) -> Vec<String> {
        match self {
            RawKeywords::List(items) => items.clone(),
            RawKeywords::Delimited(text) => split_phrases(text),
        }
    }
}

/// Accepted subset of one paper's phrases, in original order.
///
/// Phrases are trimmed, then dropped when empty, when their whitespace token
/// count falls outside `rules`, or when they are generic terms. At most
/// `rules.max_per_paper` phrases survive.
pub fn normalize_keywords<I, S>(phrases: I, rules: &KeywordRules) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    phrases
        .into_iter()
        .filter_map(|p| {
            let phrase = p.as_ref().trim();
            if phrase.is_empty() {
                return None;
            }
            let tokens = phrase.split_whitespace().count();
            if tokens < rules.min_tokens || tokens > rules.max_tokens {
                tracing::trace!(phrase, tokens, "keyword rejected: token count");
                return None;
            }
            if is_generic_term(phrase) {
                tracing::trace!(phrase, "keyword rejected: generic term");
                return None;
            }
            Some(phrase.to_string())
        })
        .take(rules.max_per_paper)
        .collect()
}
