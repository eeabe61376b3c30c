use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::keywords::KeywordRules;
use crate::pipeline::YearRange;

pub const DEFAULT_MAX_KEYWORDS: usize = 30;

/// Tunables for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Vocabulary cap for the co-occurrence matrix.
    pub max_keywords: usize,
    pub keyword_rules: KeywordRules,
    pub years: Option<YearRange>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { max_keywords: DEFAULT_MAX_KEYWORDS, keyword_rules: KeywordRules::default(), years: None }
    }
}

impl AnalysisConfig {
    /// Read a JSON config file; missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_keywords == 0 {
            bail!("max_keywords must be at least 1");
        }
        let rules = &self.keyword_rules;
        if rules.min_tokens == 0 || rules.min_tokens > rules.max_tokens {
            bail!("keyword token bounds [{}, {}] are invalid", rules.min_tokens, rules.max_tokens);
        }
        if let Some(years) = &self.years {
            years.validate()?;
        }
        Ok(())
    }
}
