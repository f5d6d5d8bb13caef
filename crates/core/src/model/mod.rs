mod feedback;
mod hint;
mod paragraph;

pub use feedback::{ErrorItem, Feedback, FeedbackError};
pub use hint::HintItem;
pub use paragraph::{Paragraph, ParagraphError};
