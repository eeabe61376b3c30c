use serde::{Deserialize, Serialize};

use crate::abstract_text::{reconstruct_abstract, InvertedIndex};
use crate::keywords::RawKeywords;

/// One publication as delivered by the bibliographic source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract", alias = "abstract_text")]
    pub abstract_text: String,
    #[serde(default, alias = "journal")]
    pub venue: String,
    #[serde(default, alias = "year")]
    pub publication_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_inverted_index: Option<InvertedIndex>,
}

impl PaperRecord {
    /// Plain abstract if present, otherwise the text rebuilt from the inverted index.
    pub fn resolved_abstract(&self) -> String {
        if !self.abstract_text.trim().is_empty() {
            return self.abstract_text.clone();
        }
        self.abstract_inverted_index
            .as_ref()
            .map(|index| reconstruct_abstract(index))
            .unwrap_or_default()
    }
}

/// Keywords an external extractor produced for one paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperKeywords {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub keywords: RawKeywords,
}
