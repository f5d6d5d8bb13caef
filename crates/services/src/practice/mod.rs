mod progress;
mod session;
mod view;
mod workflow;

// Public API of the practice subsystem.
pub use crate::error::PracticeError;
pub use progress::PracticeProgress;
pub use session::{PracticeSession, PracticeStep};
pub use view::SentenceListItem;
pub use workflow::{PracticeService, PracticeView};
