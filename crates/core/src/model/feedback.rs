use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error("accuracy score {score} is out of range (0-100)")]
    ScoreOutOfRange { score: u16 },
}

/// One mistake flagged by the tutor: a category label (grammar, vocabulary,
/// sentence structure, ...) plus a short explanation in Vietnamese.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorItem {
    pub category: String,
    pub explanation: String,
}

impl ErrorItem {
    #[must_use]
    pub fn new(category: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            explanation: explanation.into(),
        }
    }
}

/// Grading result for a single translated sentence.
///
/// Immutable once built; the practice history stores one per checked
/// sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    correct_translation: String,
    accuracy_score: u8,
    errors: Vec<ErrorItem>,
    general_feedback: String,
}

impl Feedback {
    /// Build a validated feedback record.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::ScoreOutOfRange` when `accuracy_score`
    /// exceeds 100.
    pub fn new(
        correct_translation: impl Into<String>,
        accuracy_score: u16,
        errors: Vec<ErrorItem>,
        general_feedback: impl Into<String>,
    ) -> Result<Self, FeedbackError> {
        if accuracy_score > 100 {
            return Err(FeedbackError::ScoreOutOfRange {
                score: accuracy_score,
            });
        }

        Ok(Self {
            correct_translation: correct_translation.into(),
            accuracy_score: accuracy_score as u8,
            errors,
            general_feedback: general_feedback.into(),
        })
    }

    /// The idiomatic reference translation.
    #[must_use]
    pub fn correct_translation(&self) -> &str {
        &self.correct_translation
    }

    /// Accuracy score in `0..=100`.
    #[must_use]
    pub fn accuracy_score(&self) -> u8 {
        self.accuracy_score
    }

    /// Flagged mistakes, most important first.
    #[must_use]
    pub fn errors(&self) -> &[ErrorItem] {
        &self.errors
    }

    /// Encouraging overall comment.
    #[must_use]
    pub fn general_feedback(&self) -> &str {
        &self.general_feedback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_scores() {
        assert!(Feedback::new("ok", 0, Vec::new(), "good").is_ok());
        assert!(Feedback::new("ok", 100, Vec::new(), "good").is_ok());
    }

    #[test]
    fn rejects_score_above_100() {
        let err = Feedback::new("ok", 101, Vec::new(), "good").unwrap_err();
        assert_eq!(err, FeedbackError::ScoreOutOfRange { score: 101 });
    }

    #[test]
    fn keeps_errors_in_order() {
        let feedback = Feedback::new(
            "I went to school yesterday.",
            72,
            vec![
                ErrorItem::new("Ngữ pháp", "thiếu thì quá khứ của 'go'"),
                ErrorItem::new("Từ vựng", "'school' phù hợp hơn 'academy'"),
            ],
            "Cố gắng tốt!",
        )
        .unwrap();

        assert_eq!(feedback.errors().len(), 2);
        assert_eq!(feedback.errors()[0].category, "Ngữ pháp");
        assert_eq!(feedback.accuracy_score(), 72);
    }
}
