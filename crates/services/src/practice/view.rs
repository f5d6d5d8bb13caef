use super::session::PracticeSession;

/// Presentation-agnostic row for the paragraph panel.
///
/// This is intentionally **not** a UI view-model:
/// - no markup or styling
/// - no localization assumptions
///
/// Checked sentences before the current one expose their corrected
/// translation so a consumer can render the paragraph progressively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceListItem {
    pub index: usize,
    pub text: String,
    pub is_current: bool,
    pub corrected: Option<String>,
}

impl SentenceListItem {
    /// Build the rows for every sentence in the session.
    #[must_use]
    pub fn from_session(session: &PracticeSession) -> Vec<Self> {
        session
            .sentences()
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let corrected = (index < session.current_index())
                    .then(|| session.feedback_for(index))
                    .flatten()
                    .map(|feedback| feedback.correct_translation().to_owned());
                Self {
                    index,
                    text: text.clone(),
                    is_current: index == session.current_index(),
                    corrected,
                }
            })
            .collect()
    }
}
