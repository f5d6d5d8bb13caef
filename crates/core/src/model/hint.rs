use serde::{Deserialize, Serialize};

/// A vocabulary hint: an English word paired with its Vietnamese meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintItem {
    pub english_word: String,
    pub vietnamese_meaning: String,
}

impl HintItem {
    #[must_use]
    pub fn new(english_word: impl Into<String>, vietnamese_meaning: impl Into<String>) -> Self {
        Self {
            english_word: english_word.into(),
            vietnamese_meaning: vietnamese_meaning.into(),
        }
    }
}
