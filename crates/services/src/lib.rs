#![forbid(unsafe_code)]

pub mod ai;
pub mod error;
pub mod practice;
pub mod prefs;
pub mod retry;

pub use mastery_core::Clock;

pub use ai::{
    GeminiConfig, GeminiProvider, GenerationProvider, GenerationRequest, InMemoryProvider,
    ResponseSchema, TutorService,
};
pub use error::{GenerationError, ParseError, PracticeError, ValidationError};
pub use practice::{
    PracticeProgress, PracticeService, PracticeSession, PracticeStep, PracticeView,
    SentenceListItem,
};
pub use prefs::{InMemoryThemeStore, Theme, ThemeStore};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
