use std::collections::BTreeMap;

/// Abstract encoding used by bibliographic APIs: word -> positions it occupies.
pub type InvertedIndex = BTreeMap<String, Vec<usize>>;

/// Upper bound (exclusive) on positions placed into a reconstructed abstract.
pub const MAX_ABSTRACT_POSITIONS: usize = 100_000;

/// Rebuild linear text from `(word, positions)` pairs.
///
/// Positions that no word claims stay as empty tokens, so gaps show up as
/// extra spaces. When two words claim the same position the one yielded later
/// by the iterator wins. Positions `>= MAX_ABSTRACT_POSITIONS` are dropped.
pub fn reconstruct_abstract<I, W, P>(index: I) -> String
where
    I: IntoIterator<Item = (W, P)>,
    W: AsRef<str>,
    P: AsRef<[usize]>,
{
    let entries: Vec<(W, P)> = index.into_iter().collect();
    if entries.is_empty() {
        return String::new();
    }

    let in_range = |pos: &usize| *pos < MAX_ABSTRACT_POSITIONS;
    let max_position = entries
        .iter()
        .filter_map(|(_, positions)| positions.as_ref().iter().copied().filter(in_range).max())
        .max()
        .unwrap_or(0);

    let mut slots: Vec<&str> = vec![""; max_position + 1];
    let mut dropped = 0usize;
    for (word, positions) in &entries {
        for &pos in positions.as_ref() {
            match slots.get_mut(pos) {
                Some(slot) => *slot = word.as_ref(),
                None => dropped += 1,
            }
        }
    }
    if dropped > 0 {
        tracing::warn!(dropped, limit = MAX_ABSTRACT_POSITIONS, "ignoring out-of-range abstract positions");
    }
    slots.join(" ")
}
