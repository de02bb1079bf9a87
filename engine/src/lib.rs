//! Sentence-level question answering and extractive summarization over a plain-text corpus.

pub mod config;
pub mod engine;
pub mod index;
pub mod pages;
pub mod present;
pub mod retrieve;
pub mod summarize;
pub mod tokenizer;
pub mod vector;

pub use config::EngineConfig;
pub use engine::{CorpusStats, Engine, Reply, Session};
pub use index::{Corpus, IdfTable};
pub use pages::{load_pages, PageMap};
pub use retrieve::{retrieve, Answer, AnswerCursor, Retrieval, NOT_FOUND};
pub use summarize::{summarize, summary_length, Summary};
pub use vector::{cosine_similarity, vectorize, TermVector};
