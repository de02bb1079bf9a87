use crate::config::EngineConfig;
use crate::index::Corpus;
use crate::retrieve::{retrieve, Answer, AnswerCursor, Retrieval};
use crate::summarize::{summarize, Summary};
use parking_lot::RwLock;
use std::sync::Arc;

/// Counts reported after a corpus load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusStats {
    pub sentences: usize,
    pub terms: usize,
}

/// Question answering and summarization over the most recently loaded corpus.
///
/// The corpus and its IDF table are swapped as one `Arc`; readers work on a snapshot and
/// never see a table from a different load than the sentences.
pub struct Engine {
    config: EngineConfig,
    corpus: RwLock<Arc<Corpus>>,
}

impl Default for Engine {
    fn default() -> Self { Self::new() }
}

impl Engine {
    pub fn new() -> Self { Self::with_config(EngineConfig::default()) }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, corpus: RwLock::new(Arc::new(Corpus::empty())) }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Replace the corpus wholesale. The new statistics are built before the lock is taken.
    pub fn load_corpus(&self, text: &str) -> CorpusStats {
        let corpus = Arc::new(Corpus::build(text));
        let stats = CorpusStats { sentences: corpus.sentences().len(), terms: corpus.idf().len() };
        *self.corpus.write() = corpus;
        tracing::info!(sentences = stats.sentences, terms = stats.terms, "corpus loaded");
        stats
    }

    pub fn snapshot(&self) -> Arc<Corpus> { self.corpus.read().clone() }

    pub fn retrieve(&self, question: &str) -> Retrieval {
        retrieve(&self.snapshot(), question, &self.config)
    }

    pub fn summarize_all(&self) -> Summary {
        summarize(self.snapshot().text(), &self.config)
    }

    /// Summarize caller-selected text, e.g. the concatenation of chosen pages.
    pub fn summarize_subset(&self, selected: &str) -> Summary {
        summarize(selected, &self.config)
    }
}

/// What a question produced for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Found(Answer),
    /// Nothing cleared the relevance threshold; carries the "not found" sentinel.
    NoMatch(Answer),
    NoCorpus,
}

/// One user's conversation: the shared engine plus this user's answer cursor.
pub struct Session {
    engine: Arc<Engine>,
    cursor: AnswerCursor,
}

impl Session {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine, cursor: AnswerCursor::default() }
    }

    /// Ask a new question; the first answer is returned and the rest are queued.
    pub fn ask_question(&mut self, question: &str) -> Reply {
        let retrieval = self.engine.retrieve(question);
        tracing::info!(found = retrieval.is_found(), "question answered");
        match retrieval {
            Retrieval::NoCorpus => {
                self.cursor = AnswerCursor::default();
                Reply::NoCorpus
            }
            Retrieval::NoMatch => {
                self.cursor = AnswerCursor::new(vec![Answer::not_found()]);
                Reply::NoMatch(self.cursor.first().unwrap_or_else(Answer::not_found))
            }
            Retrieval::Ranked(answers) => {
                self.cursor = AnswerCursor::new(answers);
                match self.cursor.first() {
                    Some(answer) => Reply::Found(answer),
                    None => Reply::NoMatch(Answer::not_found()),
                }
            }
        }
    }

    pub fn has_more(&self) -> bool { self.cursor.has_more() }

    pub fn next_answer(&mut self) -> Option<Answer> { self.cursor.next_answer() }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Tokio is an async runtime. Rayon provides data parallelism. \
                        Tokio schedules async tasks on worker threads. Serde serializes data.";

    #[test]
    fn load_replaces_corpus_wholesale() {
        let engine = Engine::new();
        let first = engine.load_corpus(TEXT);
        assert_eq!(first.sentences, 4);
        let second = engine.load_corpus("Only one sentence here.");
        assert_eq!(second.sentences, 1);
        assert_eq!(engine.snapshot().sentences().len(), 1);
        assert_eq!(engine.snapshot().idf().sentence_count(), 1);
    }

    #[test]
    fn old_snapshot_survives_reload() {
        let engine = Engine::new();
        engine.load_corpus(TEXT);
        let old = engine.snapshot();
        engine.load_corpus("Something else entirely.");
        assert_eq!(old.sentences().len(), 4);
        assert_eq!(old.idf().sentence_count(), 4);
    }

    #[test]
    fn session_pages_through_answers() {
        let engine = Arc::new(Engine::new());
        engine.load_corpus(TEXT);
        let mut session = Session::new(engine);
        let reply = session.ask_question("async tokio tasks");
        let first = match reply {
            Reply::Found(a) => a,
            other => panic!("expected an answer, got {other:?}"),
        };
        assert!(first.sentence.contains("Tokio"));
        let mut seen = 1;
        while session.has_more() {
            let next = session.next_answer().unwrap();
            assert!(next.score <= first.score);
            seen += 1;
        }
        assert_eq!(seen, 2);
        assert_eq!(session.next_answer(), None);
    }

    #[test]
    fn session_without_corpus() {
        let mut session = Session::new(Arc::new(Engine::new()));
        assert_eq!(session.ask_question("anything"), Reply::NoCorpus);
        assert!(!session.has_more());
    }

    #[test]
    fn no_match_is_a_displayable_reply() {
        let engine = Arc::new(Engine::new());
        engine.load_corpus(TEXT);
        let mut session = Session::new(engine);
        assert_eq!(session.ask_question("volcanic geology"), Reply::NoMatch(Answer::not_found()));
        assert!(!session.has_more());
    }

    #[test]
    fn summaries_of_empty_engine() {
        let engine = Engine::new();
        assert_eq!(engine.summarize_all(), Summary::NoContent);
        assert_eq!(engine.summarize_subset("  "), Summary::NoContent);
    }
}
