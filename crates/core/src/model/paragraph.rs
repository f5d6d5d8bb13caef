use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParagraphError {
    #[error("paragraph cannot be empty")]
    Empty,

    #[error("paragraph contains no sentences")]
    NoSentences,
}

//
// ─── PARAGRAPH ─────────────────────────────────────────────────────────────────
//

/// A Vietnamese source paragraph split into practice sentences.
///
/// A sentence is a maximal run of non-terminator characters followed by any
/// run of terminators (`.`, `?`, `!`). Terminators and inter-sentence
/// whitespace stay inside the segments, so joining the segments of a
/// paragraph that opens with a sentence restores its text exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    text: String,
    sentences: Vec<String>,
}

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^.?!]+[.?!]*").expect("sentence pattern is valid"))
}

impl Paragraph {
    /// Parse a paragraph into its ordered sentence list.
    ///
    /// # Errors
    ///
    /// Returns `ParagraphError::Empty` for blank input and
    /// `ParagraphError::NoSentences` when segmentation yields nothing.
    pub fn parse(text: impl Into<String>) -> Result<Self, ParagraphError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ParagraphError::Empty);
        }

        let sentences: Vec<String> = sentence_pattern()
            .find_iter(&text)
            .map(|m| m.as_str().to_owned())
            .collect();
        if sentences.is_empty() {
            return Err(ParagraphError::NoSentences);
        }

        Ok(Self { text, sentences })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    /// Number of sentences; always at least one.
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    #[must_use]
    pub fn into_sentences(self) -> Vec<String> {
        self.sentences
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
