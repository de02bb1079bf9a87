use crate::config::EngineConfig;
use crate::index::Corpus;
use crate::vector::{cosine_similarity, vectorize};
use rayon::prelude::*;
use serde::Serialize;

/// Text shown when no sentence is relevant enough.
pub const NOT_FOUND: &str = "Sorry, I couldn't find relevant information.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub sentence: String,
    pub score: f64,
}

impl Answer {
    pub fn not_found() -> Self {
        Self { sentence: NOT_FOUND.to_string(), score: 0.0 }
    }
}

/// Outcome of ranking a corpus against a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// Relevant sentences, best first, capped at `max_answers`. Never empty.
    Ranked(Vec<Answer>),
    NoMatch,
    NoCorpus,
}

impl Retrieval {
    /// Displayable answers: the ranked list, or the single "not found" sentinel.
    pub fn into_answers(self) -> Vec<Answer> {
        match self {
            Retrieval::Ranked(answers) => answers,
            Retrieval::NoMatch | Retrieval::NoCorpus => vec![Answer::not_found()],
        }
    }

    pub fn is_found(&self) -> bool { matches!(self, Retrieval::Ranked(_)) }
}

/// Rank every corpus sentence by cosine similarity to `question`.
///
/// Sentences are scored in parallel; order is restored before the stable sort, so equal
/// scores keep their corpus order.
pub fn retrieve(corpus: &Corpus, question: &str, config: &EngineConfig) -> Retrieval {
    if corpus.is_empty() {
        return Retrieval::NoCorpus;
    }
    let idf = corpus.idf();
    let q_vec = vectorize(question, idf);
    let scores: Vec<f64> = corpus
        .sentences()
        .par_iter()
        .map(|sentence| cosine_similarity(&vectorize(sentence, idf), &q_vec))
        .collect();

    let mut kept: Vec<Answer> = corpus
        .sentences()
        .iter()
        .zip(scores)
        .filter(|(_, score)| *score > config.relevance_threshold)
        .map(|(sentence, score)| Answer { sentence: sentence.clone(), score })
        .collect();
    tracing::debug!(terms = q_vec.len(), hits = kept.len(), "scored corpus");

    if kept.is_empty() {
        return Retrieval::NoMatch;
    }
    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept.truncate(config.max_answers);
    Retrieval::Ranked(kept)
}

/// Incremental disclosure over one question's answers. Lives with the caller, not the engine.
#[derive(Debug, Clone, Default)]
pub struct AnswerCursor {
    answers: Vec<Answer>,
    shown: usize,
}

impl AnswerCursor {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self { answers, shown: 0 }
    }

    /// The first answer; marks it as shown.
    pub fn first(&mut self) -> Option<Answer> {
        let first = self.answers.first().cloned();
        if first.is_some() {
            self.shown = 1;
        }
        first
    }

    pub fn has_more(&self) -> bool { self.shown < self.answers.len() }

    pub fn next_answer(&mut self) -> Option<Answer> {
        let next = self.answers.get(self.shown).cloned()?;
        self.shown += 1;
        Some(next)
    }

    pub fn shown(&self) -> usize { self.shown }

    pub fn len(&self) -> usize { self.answers.len() }

    pub fn is_empty(&self) -> bool { self.answers.is_empty() }
}
