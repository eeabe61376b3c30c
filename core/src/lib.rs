//! Keyword co-occurrence pipeline for research hot-spot analysis.
//!
//! Paper records come in from an external bibliographic source, get their
//! abstracts rebuilt and their venues checked against an allow-list, and the
//! externally extracted keywords of the surviving papers are folded into a
//! symmetric co-occurrence matrix.

pub mod abstract_text;
pub mod config;
pub mod cooccurrence;
pub mod keywords;
pub mod paper;
pub mod persist;
pub mod pipeline;
pub mod venue;

pub use abstract_text::{reconstruct_abstract, InvertedIndex, MAX_ABSTRACT_POSITIONS};
pub use config::AnalysisConfig;
pub use cooccurrence::{build_cooccurrence, distinct_keywords, CooccurrenceMatrix};
pub use keywords::{normalize_keywords, split_phrases, KeywordRules, RawKeywords};
pub use paper::{PaperKeywords, PaperRecord};
pub use pipeline::{analyze, select_papers, Analysis, AnalysisSummary, Selection, SelectionStats, YearRange};
pub use venue::{match_tier, venue_matches, MatchTier, VenueList};
