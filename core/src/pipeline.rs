use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::cooccurrence::{build_cooccurrence, distinct_keywords, CooccurrenceMatrix};
use crate::keywords::normalize_keywords;
use crate::paper::{PaperKeywords, PaperRecord};
use crate::venue::VenueList;

/// Inclusive publication-year window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            bail!("start year {} is after end year {}", self.start, self.end);
        }
        Ok(())
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionStats {
    pub input: usize,
    pub missing_title: usize,
    pub missing_abstract: usize,
    pub out_of_range: usize,
    pub unmatched_venue: usize,
    pub selected: usize,
}

/// Papers that passed selection, abstracts already rebuilt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub papers: Vec<PaperRecord>,
    pub stats: SelectionStats,
}

/// Pick the working paper set.
///
/// An empty venue list disables venue filtering: without classifier output the
/// analysis still runs over every paper rather than over none.
pub fn select_papers<I>(records: I, venues: &VenueList, years: Option<YearRange>) -> Selection
where
    I: IntoIterator<Item = PaperRecord>,
{
    let mut stats = SelectionStats::default();
    let mut papers = Vec::new();

    for mut record in records {
        stats.input += 1;
        if record.title.trim().is_empty() {
            tracing::debug!(id = %record.id, "skipping paper without title");
            stats.missing_title += 1;
            continue;
        }
        if let Some(range) = years {
            if !range.contains(record.publication_year) {
                tracing::debug!(id = %record.id, year = record.publication_year, "skipping paper outside year range");
                stats.out_of_range += 1;
                continue;
            }
        }
        if !venues.is_empty() {
            match venues.matching_venue(&record.venue) {
                Some((target, tier)) => {
                    tracing::trace!(id = %record.id, venue = %record.venue, matched = target, ?tier, "venue accepted");
                }
                None => {
                    tracing::debug!(id = %record.id, venue = %record.venue, "skipping paper from unlisted venue");
                    stats.unmatched_venue += 1;
                    continue;
                }
            }
        }
        let text = record.resolved_abstract();
        if text.trim().is_empty() {
            tracing::debug!(id = %record.id, "skipping paper without abstract");
            stats.missing_abstract += 1;
            continue;
        }
        record.abstract_text = text;
        record.abstract_inverted_index = None;
        papers.push(record);
    }

    stats.selected = papers.len();
    tracing::info!(input = stats.input, selected = stats.selected, "paper selection complete");
    Selection { papers, stats }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Keyword lists handed in, one per paper.
    pub paper_count: usize,
    /// Papers left with at least one keyword after normalization.
    pub contributing_papers: usize,
    pub distinct_keywords: usize,
    pub vocabulary_size: usize,
    pub total_pairs: u64,
    /// True when the vocabulary was cut down to the configured maximum.
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub matrix: CooccurrenceMatrix,
    pub summary: AnalysisSummary,
}

/// Normalize each paper's keywords and aggregate the survivors.
pub fn analyze(papers: &[PaperKeywords], config: &AnalysisConfig) -> Analysis {
    let lists: Vec<Vec<String>> = papers
        .iter()
        .filter_map(|paper| {
            let accepted = normalize_keywords(paper.keywords.phrases(), &config.keyword_rules);
            if accepted.is_empty() {
                tracing::debug!(id = %paper.id, "paper yielded no usable keywords, skipping");
                None
            } else {
                Some(accepted)
            }
        })
        .collect();

    let distinct = distinct_keywords(&lists);
    let matrix = build_cooccurrence(&lists, config.max_keywords);
    let summary = AnalysisSummary {
        paper_count: papers.len(),
        contributing_papers: lists.len(),
        distinct_keywords: distinct,
        vocabulary_size: matrix.len(),
        total_pairs: matrix.total_pairs(),
        truncated: distinct > matrix.len(),
    };

    if summary.truncated {
        tracing::info!(distinct, kept = matrix.len(), "keeping only the most frequent keywords");
    }
    if matrix.is_empty() {
        tracing::warn!("no co-occurrence data to visualize");
    }
    Analysis { matrix, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::RawKeywords;

    fn paper(id: &str, title: &str, venue: &str, year: i32) -> PaperRecord {
        PaperRecord {
            id: id.into(),
            title: title.into(),
            abstract_text: "some abstract".into(),
            venue: venue.into(),
            publication_year: year,
            abstract_inverted_index: None,
        }
    }

    #[test]
    fn year_range_rejects_inverted_bounds() {
        assert!(YearRange::new(2024, 2020).is_err());
        let r = YearRange::new(2020, 2020).unwrap();
        assert!(r.contains(2020));
        assert!(!r.contains(2021));
    }

    #[test]
    fn selection_applies_every_filter() {
        let records = vec![
            paper("1", "Kept", "Nature Physics", 2021),
            paper("2", "", "Nature Physics", 2021),
            paper("3", "Old", "Nature Physics", 2010),
            paper("4", "Elsewhere", "Journal of Foo", 2021),
            PaperRecord { abstract_text: String::new(), ..paper("5", "No abstract", "Nature", 2021) },
        ];
        let venues = VenueList::new(["Nature"]);
        let sel = select_papers(records, &venues, Some(YearRange { start: 2015, end: 2024 }));
        assert_eq!(sel.papers.len(), 1);
        assert_eq!(sel.papers[0].id, "1");
        assert_eq!(
            sel.stats,
            SelectionStats {
                input: 5,
                missing_title: 1,
                missing_abstract: 1,
                out_of_range: 1,
                unmatched_venue: 1,
                selected: 1,
            }
        );
    }

    #[test]
    fn empty_venue_list_keeps_all_venues() {
        let records = vec![paper("1", "A", "", 2020), paper("2", "B", "Journal of Foo", 2020)];
        let sel = select_papers(records, &VenueList::default(), None);
        assert_eq!(sel.stats.selected, 2);
    }

    #[test]
    fn analyze_skips_papers_without_keywords() {
        let papers = vec![
            PaperKeywords { id: "1".into(), keywords: RawKeywords::Delimited("qubits, surface code".into()) },
            PaperKeywords { id: "2".into(), keywords: RawKeywords::List(vec!["Deep Learning".into()]) },
            PaperKeywords { id: "3".into(), keywords: RawKeywords::List(vec!["qubits".into(), "decoders".into()]) },
        ];
        let analysis = analyze(&papers, &AnalysisConfig::default());
        assert_eq!(analysis.summary.paper_count, 3);
        assert_eq!(analysis.summary.contributing_papers, 2);
        assert_eq!(analysis.summary.distinct_keywords, 3);
        assert_eq!(analysis.summary.total_pairs, 2);
        assert!(!analysis.summary.truncated);
        assert_eq!(analysis.matrix.count("qubits", "surface code"), 1);
    }

    #[test]
    fn analyze_reports_truncation() {
        let papers = vec![PaperKeywords {
            id: "1".into(),
            keywords: RawKeywords::List(vec!["a".into(), "b".into(), "c".into()]),
        }];
        let config = AnalysisConfig { max_keywords: 2, ..Default::default() };
        let analysis = analyze(&papers, &config);
        assert!(analysis.summary.truncated);
        assert_eq!(analysis.summary.vocabulary_size, 2);
    }
}
