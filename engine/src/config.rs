/// Tunables for retrieval and summarization.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Sentences must score strictly above this to count as an answer.
    pub relevance_threshold: f64,
    pub max_answers: usize,
    /// Fraction of the sentences that goes into a summary, before clamping.
    pub summary_ratio: f64,
    pub min_summary: usize,
    pub max_summary: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: 0.3,
            max_answers: 10,
            summary_ratio: 0.1,
            min_summary: 3,
            max_summary: 10,
        }
    }
}
