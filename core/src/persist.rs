use crate::keywords::split_phrases;
use crate::pipeline::{Analysis, AnalysisSummary};
use crate::{CooccurrenceMatrix, PaperKeywords, PaperRecord, VenueList};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use walkdir::WalkDir;

/// What the heatmap renderer and summary view read.
#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub created_at: String,
    pub version: u32,
    pub summary: AnalysisSummary,
    pub matrix: CooccurrenceMatrix,
}

impl Report {
    pub fn new(analysis: Analysis) -> Self {
        let created_at = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
        Self { created_at, version: 1, summary: analysis.summary, matrix: analysis.matrix }
    }
}

/// `.json`/`.jsonl` files under `input`, or `input` itself when it is a file.
fn input_files(input: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn read_jsonl<T: DeserializeOwned>(file: &Path, out: &mut Vec<T>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let item = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed record", file.display(), lineno + 1))?;
        out.push(item);
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(file: &Path, out: &mut Vec<T>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("{}: invalid JSON", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                out.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => out.push(serde_json::from_value(json)?),
        _ => tracing::warn!(file = %file.display(), "ignoring JSON that is neither object nor array"),
    }
    Ok(())
}

/// Load records from a JSON array, a single object, JSONL, or a directory of those.
pub fn load_records<T: DeserializeOwned>(input: &Path) -> Result<Vec<T>> {
    let files = input_files(input);
    if files.is_empty() {
        anyhow::bail!("no JSON input found at {}", input.display());
    }
    let mut out = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut out)?;
        } else {
            read_json(&file, &mut out)?;
        }
    }
    tracing::info!(records = out.len(), input = %input.display(), "loaded input records");
    Ok(out)
}

pub fn load_papers(input: &Path) -> Result<Vec<PaperRecord>> {
    load_records(input)
}

pub fn load_keyword_lists(input: &Path) -> Result<Vec<PaperKeywords>> {
    load_records(input)
}

/// One venue per line or comma separated; blank lines and `#` comments skipped.
pub fn load_venues(path: &Path) -> Result<VenueList> {
    let mut text = String::new();
    File::open(path)
        .with_context(|| format!("cannot open venue list {}", path.display()))?
        .read_to_string(&mut text)?;
    let venues: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .flat_map(split_phrases)
        .collect();
    Ok(VenueList::new(venues))
}

pub fn save_report(path: &Path, report: &Report) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let mut f = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let json = serde_json::to_string_pretty(report)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_report(path: &Path) -> Result<Report> {
    let mut f = File::open(path)?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}

/// Write papers as JSONL, one record per line.
pub fn save_papers(path: &Path, papers: &[PaperRecord]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let mut out = BufWriter::new(File::create(path).with_context(|| format!("cannot create {}", path.display()))?);
    for paper in papers {
        serde_json::to_writer(&mut out, paper)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
