use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Symmetric keyword pair counts, rows and columns labeled alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooccurrenceMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<u32>>,
}

impl CooccurrenceMatrix {
    pub fn len(&self) -> usize { self.labels.len() }
    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.counts.get(i).and_then(|row| row.get(j)).copied().unwrap_or(0)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    /// Count for a pair of labels; 0 when either is outside the vocabulary.
    pub fn count(&self, a: &str, b: &str) -> u32 {
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) => self.get(i, j),
            _ => 0,
        }
    }

    /// Every co-occurring pair appears twice in the matrix; this counts it once.
    pub fn total_pairs(&self) -> u64 {
        let sum: u64 = self.counts.iter().flatten().map(|&c| c as u64).sum();
        sum / 2
    }
}

/// Per-keyword paper counts in first-seen order.
fn paper_frequencies<S: AsRef<str>>(lists: &[Vec<S>]) -> Vec<(&str, u32)> {
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut freq: Vec<(&str, u32)> = Vec::new();
    for list in lists {
        let mut seen_in_paper: HashSet<&str> = HashSet::new();
        for kw in list {
            let kw = kw.as_ref();
            if !seen_in_paper.insert(kw) {
                continue;
            }
            let idx = *slot.entry(kw).or_insert_with(|| {
                freq.push((kw, 0));
                freq.len() - 1
            });
            freq[idx].1 += 1;
        }
    }
    freq
}

/// Number of distinct keywords across all lists.
pub fn distinct_keywords<S: AsRef<str>>(lists: &[Vec<S>]) -> usize {
    lists.iter().flatten().map(|kw| kw.as_ref()).collect::<HashSet<&str>>().len()
}

/// Build the co-occurrence matrix over the `max_keywords` most frequent keywords.
///
/// Frequency is the number of papers mentioning a keyword. Ties keep the order
/// in which keywords were first seen. The selected vocabulary is then sorted
/// alphabetically for row/column order. Within a paper each distinct pair of
/// selected keywords adds one to both symmetric cells.
pub fn build_cooccurrence<S: AsRef<str>>(lists: &[Vec<S>], max_keywords: usize) -> CooccurrenceMatrix {
    let mut ranked = paper_frequencies(lists);
    // stable: equal frequencies keep first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut labels: Vec<String> = ranked.into_iter().take(max_keywords).map(|(kw, _)| kw.to_string()).collect();
    labels.sort();
    if labels.is_empty() {
        return CooccurrenceMatrix::default();
    }

    let index: HashMap<&str, usize> = labels.iter().enumerate().map(|(i, l)| (l.as_str(), i)).collect();
    let n = labels.len();
    let mut counts = vec![vec![0u32; n]; n];

    for list in lists {
        let mut ids: Vec<usize> = list.iter().filter_map(|kw| index.get(kw.as_ref()).copied()).collect();
        ids.sort_unstable();
        ids.dedup();
        for (pos, &a) in ids.iter().enumerate() {
            for &b in &ids[pos + 1..] {
                counts[a][b] += 1;
                counts[b][a] += 1;
            }
        }
    }

    tracing::debug!(vocabulary = n, papers = lists.len(), "built co-occurrence matrix");
    CooccurrenceMatrix { labels, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter().map(|l| l.iter().map(|s| s.to_string()).collect()).collect()
    }

    #[test]
    fn three_paper_example() {
        let m = build_cooccurrence(&lists(&[&["A", "B"], &["B", "C"], &["A", "B", "C"]]), 10);
        assert_eq!(m.labels, vec!["A", "B", "C"]);
        assert_eq!(m.counts, vec![vec![0, 2, 1], vec![2, 0, 2], vec![1, 2, 0]]);
        assert_eq!(m.total_pairs(), 5);
    }

    #[test]
    fn duplicate_keyword_in_paper_counts_once() {
        let m = build_cooccurrence(&lists(&[&["x", "y", "x", "y"]]), 10);
        assert_eq!(m.count("x", "y"), 1);
        assert_eq!(m.count("y", "x"), 1);
        assert_eq!(m.count("x", "x"), 0);
    }

    #[test]
    fn frequency_is_paper_count_not_occurrences() {
        // "rare" appears three times in one paper, "common" once in each of two papers
        let m = build_cooccurrence(
            &lists(&[&["rare", "rare", "rare", "zeta"], &["common", "zeta"], &["common", "zeta"]]),
            2,
        );
        assert_eq!(m.labels, vec!["common", "zeta"]);
        assert_eq!(m.count("common", "zeta"), 2);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let m = build_cooccurrence(&lists(&[&["delta", "alpha"], &["charlie", "bravo"]]), 2);
        assert_eq!(m.labels, vec!["alpha", "delta"]);
    }

    #[test]
    fn empty_input_gives_empty_matrix() {
        let m = build_cooccurrence::<String>(&[], 10);
        assert!(m.is_empty());
        assert_eq!(m.total_pairs(), 0);
        let zero_k = build_cooccurrence(&lists(&[&["a", "b"]]), 0);
        assert!(zero_k.is_empty());
    }

    #[test]
    fn distinct_keywords_spans_all_papers() {
        assert_eq!(distinct_keywords(&lists(&[&["a", "b"], &["b", "c", "c"]])), 3);
    }
}
