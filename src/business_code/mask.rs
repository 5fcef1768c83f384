//! Business code masks.
//!
//! A mask is free text with these tokens:
//! `{TYPE}` entity prefix, `YYYY` year, `MM` month, `DD` day, and one run of `N`
//! characters marking the zero-padded sequence. The last `N` run wins, so literal
//! text before it may contain the letter.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

pub const DEFAULT_MASK: &str = "{TYPE}-YYYYMM-NNNNN";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    #[error("mask `{0}` has no sequence placeholder (a run of `N`)")]
    MissingSequence(String),
}

/// A mask with every date token substituted, split around the sequence placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMask {
    /// Text before the sequence. Codes sharing it share a counter.
    pub prefix: String,
    pub width: usize,
    pub suffix: String,
}

impl RenderedMask {
    pub fn render(mask: &str, type_prefix: &str, date: NaiveDate) -> Result<Self, MaskError> {
        let text = mask
            .replace("{TYPE}", type_prefix)
            .replace("YYYY", &format!("{:04}", date.year()))
            .replace("MM", &format!("{:02}", date.month()))
            .replace("DD", &format!("{:02}", date.day()));

        let end = text
            .rfind('N')
            .ok_or_else(|| MaskError::MissingSequence(mask.to_string()))?;
        let start = text[..end]
            .rfind(|c: char| c != 'N')
            .map(|i| i + 1)
            .unwrap_or(0);

        Ok(Self {
            prefix: text[..start].to_string(),
            width: end + 1 - start,
            suffix: text[end + 1..].to_string(),
        })
    }

    pub fn format(&self, sequence: i64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            sequence,
            self.suffix,
            width = self.width
        )
    }
}
