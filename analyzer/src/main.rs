use anyhow::Result;
use clap::{Parser, Subcommand};
use hotspot_core::persist::{load_keyword_lists, load_papers, load_venues, save_papers, save_report, Report};
use hotspot_core::{analyze, select_papers, AnalysisConfig, VenueList, YearRange};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "analyzer")]
#[command(about = "Select papers and build keyword co-occurrence matrices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter paper records by title, abstract, year and venue allow-list
    Select {
        /// Paper records (JSON/JSONL file or directory)
        #[arg(long)]
        papers: PathBuf,
        /// Venue allow-list file; without it every venue is accepted
        #[arg(long)]
        venues: Option<PathBuf>,
        #[arg(long, requires = "end_year")]
        start_year: Option<i32>,
        #[arg(long, requires = "start_year")]
        end_year: Option<i32>,
        /// Output JSONL of selected papers
        #[arg(long)]
        output: PathBuf,
    },
    /// Normalize per-paper keywords and build the co-occurrence matrix
    Matrix {
        /// Keyword lists (JSON/JSONL file or directory)
        #[arg(long)]
        keywords: PathBuf,
        /// JSON analysis config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Vocabulary cap; overrides the config file and HOTSPOT_MAX_KEYWORDS
        #[arg(long)]
        max_keywords: Option<usize>,
        /// Output report path
        #[arg(long)]
        output: PathBuf,
    },
    /// Print abstracts rebuilt from inverted indexes
    Reconstruct {
        #[arg(long)]
        papers: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Select { papers, venues, start_year, end_year, output } => {
            let years = match (start_year, end_year) {
                (Some(start), Some(end)) => Some(YearRange::new(start, end)?),
                _ => None,
            };
            run_select(&papers, venues.as_deref(), years, &output)
        }
        Commands::Matrix { keywords, config, max_keywords, output } => {
            let config = resolve_config(config.as_deref(), max_keywords)?;
            run_matrix(&keywords, &config, &output)
        }
        Commands::Reconstruct { papers } => run_reconstruct(&papers),
    }
}

/// Config file, then HOTSPOT_MAX_KEYWORDS, then the command-line flag.
fn resolve_config(path: Option<&Path>, max_keywords: Option<usize>) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(p) => AnalysisConfig::load(p)?,
        None => AnalysisConfig::default(),
    };
    if let Ok(val) = std::env::var("HOTSPOT_MAX_KEYWORDS") {
        match val.trim().parse() {
            Ok(n) => config.max_keywords = n,
            Err(_) => tracing::warn!(value = %val, "ignoring unparsable HOTSPOT_MAX_KEYWORDS"),
        }
    }
    if let Some(n) = max_keywords {
        config.max_keywords = n;
    }
    config.validate()?;
    Ok(config)
}

fn run_select(papers: &Path, venues: Option<&Path>, years: Option<YearRange>, output: &Path) -> Result<()> {
    let venues = match venues {
        Some(p) => load_venues(p)?,
        None => VenueList::default(),
    };
    if venues.is_empty() {
        tracing::warn!("no target venues given, venue filtering disabled");
    }
    let records = load_papers(papers)?;
    let selection = select_papers(records, &venues, years);
    save_papers(output, &selection.papers)?;
    tracing::info!(
        selected = selection.stats.selected,
        missing_title = selection.stats.missing_title,
        missing_abstract = selection.stats.missing_abstract,
        out_of_range = selection.stats.out_of_range,
        unmatched_venue = selection.stats.unmatched_venue,
        output = %output.display(),
        "selection written"
    );
    Ok(())
}

fn run_matrix(keywords: &Path, config: &AnalysisConfig, output: &Path) -> Result<()> {
    let lists = load_keyword_lists(keywords)?;
    let analysis = analyze(&lists, config);
    let s = analysis.summary;
    save_report(output, &Report::new(analysis))?;
    tracing::info!(
        papers = s.paper_count,
        contributing = s.contributing_papers,
        vocabulary = s.vocabulary_size,
        total_pairs = s.total_pairs,
        output = %output.display(),
        "co-occurrence report written"
    );
    Ok(())
}

fn run_reconstruct(papers: &Path) -> Result<()> {
    for record in load_papers(papers)? {
        println!("{}\t{}", record.id, record.resolved_abstract());
    }
    Ok(())
}
