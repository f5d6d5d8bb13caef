//! Shared error types for the services crate.

use thiserror::Error;

use mastery_core::model::{FeedbackError, ParagraphError};

/// Caller input rejected before any tutor request is attempted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("topic cannot be empty")]
    EmptyTopic,

    #[error("translation cannot be empty")]
    EmptyTranslation,

    #[error(transparent)]
    Paragraph(#[from] ParagraphError),
}

/// The tutor returned text that does not satisfy the expected shape.
///
/// Parse failures are retried like any other failure; they only surface
/// once the retry budget is spent.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error("hint list is empty")]
    EmptyHints,
}

/// Errors emitted by `TutorService` and its provider.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("AI tutor is not configured")]
    Disabled,

    #[error("prompt input is empty")]
    EmptyInput,

    #[error("tutor request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("tutor returned an empty response")]
    EmptyResponse,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors emitted by `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("no practice session is active")]
    NoSession,

    #[error("practice is already completed")]
    AlreadyCompleted,

    #[error("practice is not completed yet")]
    NotCompleted,

    #[error("hints are unavailable once feedback is recorded")]
    HintUnavailable,
}

impl PracticeError {
    /// Short Vietnamese message suitable for direct display.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            PracticeError::Validation(ValidationError::EmptyTopic) => "Vui lòng nhập chủ đề.",
            PracticeError::Validation(ValidationError::EmptyTranslation) => {
                "Vui lòng nhập bản dịch của bạn."
            }
            PracticeError::Validation(ValidationError::Paragraph(_)) => {
                "Đoạn văn không hợp lệ hoặc không chứa câu nào."
            }
            PracticeError::Generation(_) => "Không thể nhận phản hồi. Vui lòng thử lại.",
            PracticeError::NoSession | PracticeError::NotCompleted => {
                "Chưa có phiên luyện tập."
            }
            PracticeError::AlreadyCompleted => "Phiên luyện tập đã kết thúc.",
            PracticeError::HintUnavailable => "Gợi ý không còn khả dụng cho câu này.",
        }
    }
}
