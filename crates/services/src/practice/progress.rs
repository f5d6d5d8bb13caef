/// Aggregated view of practice progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeProgress {
    /// Total number of sentences in the paragraph.
    pub total: usize,
    /// 1-based position of the current sentence.
    pub position: usize,
    /// Number of sentences with recorded feedback.
    pub checked: usize,
    pub is_complete: bool,
}
