/// Aggregated view of exam progress, useful for the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub cursor: usize,
    /// The cursor sits on the final question; drives "Next" vs "Submit".
    pub is_last: bool,
}
