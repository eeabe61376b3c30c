use hotspot_core::persist::{load_keyword_lists, load_papers, load_report, load_venues, save_report, Report};
use hotspot_core::{
    analyze, build_cooccurrence, normalize_keywords, reconstruct_abstract, select_papers, venue_matches,
    AnalysisConfig, InvertedIndex, KeywordRules, YearRange,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn reconstruction_round_trips_text_without_repeats() {
    let text = "decoding surface codes with tensor network contraction";
    let index: InvertedIndex = text
        .split(' ')
        .enumerate()
        .map(|(pos, word)| (word.to_string(), vec![pos]))
        .collect();
    assert_eq!(reconstruct_abstract(&index), text);
}

#[test]
fn venue_examples() {
    assert!(venue_matches("Nature Communications", "Nature Communications"));
    assert!(venue_matches("Nat Commun (Nature Communications Journal)", "Nature Communications"));
    assert!(venue_matches(
        "IEEE Transactions on Pattern Analysis and Machine Intelligence",
        "Pattern Analysis Machine Intelligence"
    ));
    assert!(!venue_matches("Journal of Foo", "Nature"));
}

#[test]
fn matrix_is_symmetric_with_zero_diagonal() {
    let lists: Vec<Vec<&str>> = vec![
        vec!["qubits", "surface code", "decoders"],
        vec!["decoders", "qubits"],
        vec!["surface code", "lattice surgery", "qubits"],
        vec!["lattice surgery"],
    ];
    let m = build_cooccurrence(&lists, 10);
    for i in 0..m.len() {
        assert_eq!(m.get(i, i), 0);
        for j in 0..m.len() {
            assert_eq!(m.get(i, j), m.get(j, i));
        }
    }
    let mut sorted = m.labels.clone();
    sorted.sort();
    assert_eq!(m.labels, sorted);
}

#[test]
fn repeated_builds_are_identical() {
    let lists = vec![vec!["b", "a", "c"], vec!["c", "d"], vec!["a", "d", "b"]];
    assert_eq!(build_cooccurrence(&lists, 3), build_cooccurrence(&lists, 3));
}

#[test]
fn truncation_keeps_most_frequent_by_paper_count() {
    let lists = vec![vec!["a", "b", "c"], vec!["a", "b"], vec!["a", "d"]];
    let m = build_cooccurrence(&lists, 2);
    assert_eq!(m.labels, vec!["a", "b"]);
    assert_eq!(m.count("a", "b"), 2);
    assert_eq!(m.count("a", "c"), 0);
}

#[test]
fn normalizer_example() {
    let out = normalize_keywords(
        ["Machine Learning", "Quantum Error Correction", "a b c d e f g"],
        &KeywordRules::default(),
    );
    assert_eq!(out, vec!["Quantum Error Correction"]);
}

#[test]
fn end_to_end_from_files() {
    let dir = tempdir().unwrap();
    let papers_path = dir.path().join("papers.jsonl");
    fs::write(
        &papers_path,
        concat!(
            r#"{"id":"W1","title":"Surface codes","journal":"Nature Physics","publication_year":2022,"abstract_inverted_index":{"codes":[1],"surface":[0]}}"#,
            "\n\n",
            r#"{"id":"W2","title":"Elsewhere","journal":"Journal of Foo","publication_year":2022,"abstract":"text"}"#,
            "\n",
        ),
    )
    .unwrap();
    let venues_path = dir.path().join("venues.txt");
    fs::write(&venues_path, "# classifier output\nNature, Science\n\nPhysical Review Letters\n").unwrap();

    let venues = load_venues(&venues_path).unwrap();
    assert_eq!(venues.len(), 3);
    let selection = select_papers(load_papers(&papers_path).unwrap(), &venues, Some(YearRange::new(2020, 2024).unwrap()));
    assert_eq!(selection.papers.len(), 1);
    assert_eq!(selection.papers[0].abstract_text, "surface codes");

    let kw_dir = dir.path().join("keywords");
    fs::create_dir_all(&kw_dir).unwrap();
    fs::write(
        kw_dir.join("batch.json"),
        r#"[{"id":"W1","keywords":"qubits，surface code, deep learning"},{"id":"W3","keywords":["qubits","decoders"]}]"#,
    )
    .unwrap();
    fs::write(kw_dir.join("ignored.txt"), "not json").unwrap();

    let keyword_lists = load_keyword_lists(&kw_dir).unwrap();
    assert_eq!(keyword_lists.len(), 2);
    let analysis = analyze(&keyword_lists, &AnalysisConfig::default());
    assert_eq!(analysis.matrix.labels, vec!["decoders", "qubits", "surface code"]);
    assert_eq!(analysis.summary.total_pairs, 2);

    let report_path = dir.path().join("out/report.json");
    save_report(&report_path, &Report::new(analysis.clone())).unwrap();
    let loaded = load_report(&report_path).unwrap();
    assert_eq!(loaded.matrix, analysis.matrix);
    assert_eq!(loaded.summary, analysis.summary);
}

#[test]
fn empty_input_degrades_to_empty_matrix() {
    let analysis = analyze(&[], &AnalysisConfig::default());
    assert!(analysis.matrix.is_empty());
    assert_eq!(analysis.summary.total_pairs, 0);
}
