use mastery_core::Clock;
use mastery_core::model::{Feedback, HintItem, Paragraph};

use super::session::{PracticeSession, PracticeStep};
use crate::ai::TutorService;
use crate::error::{PracticeError, ValidationError};

/// Externally visible phase of the practice flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeView {
    Setup,
    Practice,
    Completed,
}

enum FlowState {
    Setup,
    Practice(PracticeSession),
    Completed(PracticeSession),
}

/// Owns the practice state machine and drives the tutor on its behalf.
///
/// Operations take `&mut self`, so at most one tutor request is in flight
/// per session, and a failed operation leaves the state exactly as it was.
pub struct PracticeService {
    clock: Clock,
    tutor: TutorService,
    state: FlowState,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock, tutor: TutorService) -> Self {
        Self {
            clock,
            tutor,
            state: FlowState::Setup,
        }
    }

    #[must_use]
    pub fn view(&self) -> PracticeView {
        match self.state {
            FlowState::Setup => PracticeView::Setup,
            FlowState::Practice(_) => PracticeView::Practice,
            FlowState::Completed(_) => PracticeView::Completed,
        }
    }

    /// The active (or just-completed) session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&PracticeSession> {
        match &self.state {
            FlowState::Setup => None,
            FlowState::Practice(session) | FlowState::Completed(session) => Some(session),
        }
    }

    /// Segment `paragraph` and enter practice; any previous session is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the paragraph is blank or yields no
    /// sentences; the state is untouched.
    pub fn start_practice(&mut self, paragraph: &str) -> Result<(), PracticeError> {
        let paragraph = Paragraph::parse(paragraph).map_err(ValidationError::from)?;
        self.state = FlowState::Practice(PracticeSession::new(paragraph, self.clock.now()));
        Ok(())
    }

    /// Generate a paragraph about `topic` and start practicing it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank topic, or the generation
    /// failure; the state is untouched on failure.
    pub async fn start_with_topic(&mut self, topic: &str) -> Result<(), PracticeError> {
        if topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic.into());
        }

        let paragraph = self.tutor.generate_paragraph(topic).await?;
        self.start_practice(&paragraph)
    }

    /// Update the in-progress translation text.
    ///
    /// # Errors
    ///
    /// Returns `NoSession`/`AlreadyCompleted` outside of practice.
    pub fn set_translation(&mut self, text: &str) -> Result<(), PracticeError> {
        let session = self.practicing_mut()?;
        session.set_translation(text);
        Ok(())
    }

    /// Grade `translation` against the current sentence.
    ///
    /// On success the feedback lands in the history under the current
    /// index and any pending hint is dropped.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank input and the generation
    /// failure otherwise; neither mutates the session.
    pub async fn check_translation(
        &mut self,
        translation: &str,
    ) -> Result<&Feedback, PracticeError> {
        if translation.trim().is_empty() {
            return Err(ValidationError::EmptyTranslation.into());
        }

        let session = match &mut self.state {
            FlowState::Practice(session) => session,
            FlowState::Setup => return Err(PracticeError::NoSession),
            FlowState::Completed(_) => return Err(PracticeError::AlreadyCompleted),
        };

        let feedback = self
            .tutor
            .feedback_for_sentence(session.current_sentence(), translation)
            .await?;

        session.set_translation(translation);
        Ok(session.record_feedback(feedback)?)
    }

    /// Fetch vocabulary hints for the current sentence.
    ///
    /// # Errors
    ///
    /// Returns `HintUnavailable` once the sentence has feedback, or the
    /// generation failure; neither mutates the session.
    pub async fn request_hint(&mut self) -> Result<&[HintItem], PracticeError> {
        let session = match &mut self.state {
            FlowState::Practice(session) => session,
            FlowState::Setup => return Err(PracticeError::NoSession),
            FlowState::Completed(_) => return Err(PracticeError::AlreadyCompleted),
        };
        if session.feedback().is_some() {
            return Err(PracticeError::HintUnavailable);
        }

        let hints = self
            .tutor
            .hints_for_sentence(session.current_sentence())
            .await?;
        Ok(session.record_hints(hints)?)
    }

    /// Step past the current sentence; at the last sentence the flow moves
    /// to `Completed` while keeping the session readable.
    ///
    /// # Errors
    ///
    /// Returns `NoSession`/`AlreadyCompleted` outside of practice.
    pub fn advance(&mut self) -> Result<PracticeView, PracticeError> {
        match std::mem::replace(&mut self.state, FlowState::Setup) {
            FlowState::Practice(mut session) => match session.advance(self.clock.now()) {
                Ok(PracticeStep::Next) => {
                    self.state = FlowState::Practice(session);
                    Ok(PracticeView::Practice)
                }
                Ok(PracticeStep::Completed) => {
                    self.state = FlowState::Completed(session);
                    Ok(PracticeView::Completed)
                }
                Err(err) => {
                    self.state = FlowState::Practice(session);
                    Err(err)
                }
            },
            FlowState::Setup => Err(PracticeError::NoSession),
            FlowState::Completed(session) => {
                self.state = FlowState::Completed(session);
                Err(PracticeError::AlreadyCompleted)
            }
        }
    }

    /// Conclude a completed session and return to setup.
    ///
    /// # Errors
    ///
    /// Returns `NoSession` when nothing is active and `NotCompleted` while
    /// practice is still running.
    pub fn finish(&mut self) -> Result<(), PracticeError> {
        match self.state {
            FlowState::Completed(_) => {
                self.state = FlowState::Setup;
                Ok(())
            }
            FlowState::Practice(_) => Err(PracticeError::NotCompleted),
            FlowState::Setup => Err(PracticeError::NoSession),
        }
    }

    /// Drop any session and return to setup.
    pub fn reset(&mut self) {
        self.state = FlowState::Setup;
    }

    fn practicing_mut(&mut self) -> Result<&mut PracticeSession, PracticeError> {
        match &mut self.state {
            FlowState::Practice(session) => Ok(session),
            FlowState::Setup => Err(PracticeError::NoSession),
            FlowState::Completed(_) => Err(PracticeError::AlreadyCompleted),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
