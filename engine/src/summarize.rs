use crate::config::EngineConfig;
use crate::tokenizer::{normalize, split_sentences};
use std::collections::HashMap;

/// Result of extractive summarization.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// Selected sentences in source order.
    Sentences(Vec<String>),
    /// The text had no sentences to pick from.
    NoContent,
}

impl Summary {
    pub fn sentences(&self) -> &[String] {
        match self {
            Summary::Sentences(s) => s,
            Summary::NoContent => &[],
        }
    }
}

/// Number of sentences a summary of `sentence_count` sentences asks for.
///
/// The request may exceed `sentence_count`; selection then takes everything.
/// `max_summary` wins when it is configured below `min_summary`.
pub fn summary_length(sentence_count: usize, config: &EngineConfig) -> usize {
    let wanted = (sentence_count as f64 * config.summary_ratio).floor() as usize;
    wanted.max(config.min_summary).min(config.max_summary)
}

/// Pick the sentences whose words are most frequent across the whole text.
pub fn summarize(text: &str, config: &EngineConfig) -> Summary {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return Summary::NoContent;
    }

    let mut freq: HashMap<String, u64> = HashMap::new();
    for token in normalize(text) {
        *freq.entry(token).or_insert(0) += 1;
    }

    let mut scored: Vec<(usize, u64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let score: u64 = normalize(s).iter().map(|t| freq.get(t).copied().unwrap_or(0)).sum();
            (i, score)
        })
        .collect();
    // stable: equal scores keep source order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(summary_length(sentences.len(), config));

    // Duplicate sentences resolve to their first occurrence.
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (i, s) in sentences.iter().enumerate() {
        first_seen.entry(*s).or_insert(i);
    }
    let mut picked: Vec<&str> = scored.into_iter().map(|(i, _)| sentences[i]).collect();
    picked.sort_by_key(|s| first_seen[s]);

    tracing::debug!(sentences = sentences.len(), selected = picked.len(), "summarized text");
    Summary::Sentences(picked.into_iter().map(str::to_string).collect())
}
