use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use mastery_core::model::{Feedback, HintItem, Paragraph};

use super::progress::PracticeProgress;
use crate::error::PracticeError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Outcome of advancing past the current sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeStep {
    /// Moved to the next sentence.
    Next,
    /// The last sentence was left behind; the session is complete.
    Completed,
}

/// In-memory state for one practice run over a segmented paragraph.
///
/// Pure and synchronous: the flow service supplies feedback and hints,
/// this type only enforces the transition rules. The current index stays
/// within `[0, sentence_count - 1]`, and the history only ever holds
/// indices up to the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeSession {
    paragraph: Paragraph,
    current: usize,
    translation: String,
    feedback: Option<Feedback>,
    hints: Option<Vec<HintItem>>,
    history: BTreeMap<usize, Feedback>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl PracticeSession {
    /// Start a session over an already-segmented paragraph.
    ///
    /// `started_at` should come from the flow service clock to keep time
    /// deterministic.
    #[must_use]
    pub fn new(paragraph: Paragraph, started_at: DateTime<Utc>) -> Self {
        Self {
            paragraph,
            current: 0,
            translation: String::new(),
            feedback: None,
            hints: None,
            history: BTreeMap::new(),
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn paragraph(&self) -> &Paragraph {
        &self.paragraph
    }

    #[must_use]
    pub fn sentences(&self) -> &[String] {
        self.paragraph.sentences()
    }

    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.paragraph.sentence_count()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The sentence being translated right now.
    #[must_use]
    pub fn current_sentence(&self) -> &str {
        // `current` is clamped to the last index for the whole session.
        &self.sentences()[self.current]
    }

    #[must_use]
    pub fn is_last_sentence(&self) -> bool {
        self.current == self.sentence_count() - 1
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    /// Feedback for the current sentence, once checked.
    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Vocabulary hints for the current sentence, if requested.
    #[must_use]
    pub fn hints(&self) -> Option<&[HintItem]> {
        self.hints.as_deref()
    }

    /// Feedback history keyed by sentence index.
    #[must_use]
    pub fn history(&self) -> &BTreeMap<usize, Feedback> {
        &self.history
    }

    #[must_use]
    pub fn feedback_for(&self, index: usize) -> Option<&Feedback> {
        self.history.get(&index)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns a summary of the current practice progress.
    #[must_use]
    pub fn progress(&self) -> PracticeProgress {
        PracticeProgress {
            total: self.sentence_count(),
            position: self.current + 1,
            checked: self.history.len(),
            is_complete: self.is_complete(),
        }
    }

    /// Update the in-progress translation text.
    pub fn set_translation(&mut self, text: impl Into<String>) {
        self.translation = text.into();
    }

    /// Record grading for the current sentence.
    ///
    /// Stores the feedback in the history under the current index, makes
    /// it current, and drops any pending hint.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::AlreadyCompleted` when the session is done.
    pub fn record_feedback(&mut self, feedback: Feedback) -> Result<&Feedback, PracticeError> {
        if self.is_complete() {
            return Err(PracticeError::AlreadyCompleted);
        }

        self.history.insert(self.current, feedback.clone());
        self.hints = None;
        Ok(self.feedback.insert(feedback))
    }

    /// Record vocabulary hints for the current sentence.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::HintUnavailable` once the current sentence
    /// already has feedback, `PracticeError::AlreadyCompleted` when the
    /// session is done.
    pub fn record_hints(&mut self, hints: Vec<HintItem>) -> Result<&[HintItem], PracticeError> {
        if self.is_complete() {
            return Err(PracticeError::AlreadyCompleted);
        }
        if self.feedback.is_some() {
            return Err(PracticeError::HintUnavailable);
        }

        Ok(self.hints.insert(hints).as_slice())
    }

    /// Move to the next sentence, or mark the session complete at the end.
    ///
    /// Per-sentence state (translation, feedback, hints) resets; the
    /// history keeps every recorded feedback.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::AlreadyCompleted` if called again after the
    /// session completed.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<PracticeStep, PracticeError> {
        if self.is_complete() {
            return Err(PracticeError::AlreadyCompleted);
        }

        if self.is_last_sentence() {
            self.completed_at = Some(now);
            return Ok(PracticeStep::Completed);
        }

        self.current += 1;
        self.translation.clear();
        self.feedback = None;
        self.hints = None;
        Ok(PracticeStep::Next)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use mastery_core::model::ErrorItem;
    use mastery_core::time::fixed_now;

    fn build_session(text: &str) -> PracticeSession {
        PracticeSession::new(Paragraph::parse(text).unwrap(), fixed_now())
    }

    fn build_feedback(score: u16) -> Feedback {
        Feedback::new(
            "I like the beach.",
            score,
            vec![ErrorItem::new("Ngữ pháp", "thiếu mạo từ 'the'")],
            "Khá tốt!",
        )
        .unwrap()
    }

    #[test]
    fn starts_at_the_first_sentence() {
        let session = build_session("Một. Hai. Ba.");
        assert_eq!(session.sentence_count(), 3);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_sentence(), "Một.");
        assert!(session.history().is_empty());
        assert!(!session.is_complete());
    }

    #[test]
    fn feedback_lands_in_history_at_the_current_index() {
        let mut session = build_session("Một. Hai.");
        let feedback = build_feedback(80);

        session.record_feedback(feedback.clone()).unwrap();

        assert_eq!(session.feedback(), Some(&feedback));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.feedback_for(0), Some(&feedback));
        assert_eq!(session.feedback_for(1), None);
    }

    #[test]
    fn feedback_clears_a_pending_hint() {
        let mut session = build_session("Một. Hai.");
        session
            .record_hints(vec![HintItem::new("one", "một")])
            .unwrap();
        assert!(session.hints().is_some());

        session.record_feedback(build_feedback(90)).unwrap();
        assert!(session.hints().is_none());
    }

    #[test]
    fn hints_are_rejected_once_feedback_exists() {
        let mut session = build_session("Một. Hai.");
        session.record_feedback(build_feedback(70)).unwrap();

        let err = session
            .record_hints(vec![HintItem::new("two", "hai")])
            .unwrap_err();
        assert!(matches!(err, PracticeError::HintUnavailable));
    }

    #[test]
    fn advance_resets_sentence_state_but_keeps_history() {
        let mut session = build_session("Một. Hai. Ba.");
        session.set_translation("One.");
        session.record_feedback(build_feedback(85)).unwrap();

        let step = session.advance(fixed_now()).unwrap();

        assert_eq!(step, PracticeStep::Next);
        assert_eq!(session.current_index(), 1);
        assert!(session.translation().is_empty());
        assert!(session.feedback().is_none());
        assert!(session.hints().is_none());
        assert_eq!(session.history().len(), 1);
        assert!(session.feedback_for(0).is_some());
    }

    #[test]
    fn advancing_past_the_last_sentence_completes() {
        let mut session = build_session("Một. Hai.");
        session.advance(fixed_now()).unwrap();
        assert!(session.is_last_sentence());

        let step = session.advance(fixed_now()).unwrap();
        assert_eq!(step, PracticeStep::Completed);
        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));

        let err = session.advance(fixed_now()).unwrap_err();
        assert!(matches!(err, PracticeError::AlreadyCompleted));
    }

    #[test]
    fn progress_counts_checked_sentences() {
        let mut session = build_session("Một. Hai. Ba.");
        session.record_feedback(build_feedback(50)).unwrap();
        session.advance(fixed_now()).unwrap();

        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.position, 2);
        assert_eq!(progress.checked, 1);
        assert!(!progress.is_complete);
    }

    #[test]
    fn single_sentence_paragraph_completes_on_first_advance() {
        let mut session = build_session("Chỉ một câu");
        assert!(session.is_last_sentence());

        let step = session.advance(fixed_now()).unwrap();
        assert_eq!(step, PracticeStep::Completed);
    }
}
