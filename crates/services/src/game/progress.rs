/// Aggregated view of quiz progress, useful for rendering a progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
