use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::present::highlight;
use engine::{load_pages, Engine, PageMap, Reply, Session, Summary};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use std::path::Path;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "qa")]
#[command(about = "Ask questions about plain-text documents and summarize them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question from the text
    Ask {
        /// Input path (a text file, or a directory of .txt/.md pages)
        #[arg(long)]
        input: String,
        /// Question to answer
        #[arg(long)]
        question: String,
        /// Print every ranked answer instead of only the best one
        #[arg(long, default_value_t = false)]
        all: bool,
        /// Emit JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print an extractive summary
    Summarize {
        /// Input path (a text file, or a directory of .txt/.md pages)
        #[arg(long)]
        input: String,
        /// Only summarize these pages (zero-based, comma-separated)
        #[arg(long, value_delimiter = ',')]
        pages: Option<Vec<usize>>,
        /// Emit JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct AnswerOut {
    sentence: String,
    score: f64,
    page: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SummaryOut {
    sentences: Vec<String>,
    pages: Vec<usize>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { input, question, all, json } => {
            let (engine, pages) = load(Path::new(&input))?;
            let answers = ask(engine, &pages, &question, all);
            if json {
                println!("{}", serde_json::to_string_pretty(&answers)?);
            } else if answers.is_empty() {
                println!("No text found in {input}.");
            } else {
                for a in &answers {
                    let page = a.page.map(|p| format!(" [page {}]", p + 1)).unwrap_or_default();
                    println!("{:.3}{page}  {}", a.score, highlight(&a.sentence, &question));
                }
            }
            Ok(())
        }
        Commands::Summarize { input, pages: selected, json } => {
            let (engine, pages) = load(Path::new(&input))?;
            match summarize(&engine, &pages, selected.as_deref()) {
                Some(out) if json => println!("{}", serde_json::to_string_pretty(&out)?),
                Some(out) => {
                    for s in &out.sentences {
                        println!("- {s}");
                    }
                }
                None if selected.is_some() => println!("No pages selected."),
                None => println!("No content available for summarization."),
            }
            Ok(())
        }
    }
}

fn load(input: &Path) -> Result<(Arc<Engine>, PageMap)> {
    let pages = PageMap::new(load_pages(input)?);
    let engine = Arc::new(Engine::new());
    let stats = engine.load_corpus(&pages.corpus_text());
    tracing::info!(pages = pages.len(), sentences = stats.sentences, terms = stats.terms, "loaded input");
    Ok((engine, pages))
}

/// Ranked answers for a question; the first only unless `all`. Empty when there is no text.
fn ask(engine: Arc<Engine>, pages: &PageMap, question: &str, all: bool) -> Vec<AnswerOut> {
    let mut session = Session::new(engine);
    let first = match session.ask_question(question) {
        Reply::Found(a) | Reply::NoMatch(a) => a,
        Reply::NoCorpus => return Vec::new(),
    };
    let mut answers = vec![first];
    while all && session.has_more() {
        match session.next_answer() {
            Some(a) => answers.push(a),
            None => break,
        }
    }
    answers
        .into_iter()
        .map(|a| AnswerOut { page: pages.locate(&a.sentence), sentence: a.sentence, score: a.score })
        .collect()
}

fn summarize(engine: &Engine, pages: &PageMap, selected: Option<&[usize]>) -> Option<SummaryOut> {
    let summary = match selected {
        Some(indices) => {
            let text = pages.selection_text(indices);
            if text.trim().is_empty() {
                return None;
            }
            engine.summarize_subset(&text)
        }
        None => engine.summarize_all(),
    };
    match summary {
        Summary::Sentences(sentences) => {
            let hit_pages = pages.locate_all(&sentences);
            Some(SummaryOut { sentences, pages: hit_pages })
        }
        Summary::NoContent => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::NOT_FOUND;
    use std::fs;

    fn book() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("01.txt"),
            "Glaciers carve valleys over millennia. Glaciers move slowly downhill.",
        )
        .unwrap();
        fs::write(
            dir.path().join("02.txt"),
            "Volcanoes erupt molten rock. Lava cools into basalt. Volcanoes shape islands.",
        )
        .unwrap();
        dir
    }

    #[test]
    fn answers_point_at_their_page() {
        let dir = book();
        let (engine, pages) = load(dir.path()).unwrap();
        let answers = ask(engine, &pages, "how do volcanoes erupt", true);
        assert!(!answers.is_empty());
        assert_eq!(answers[0].sentence, "Volcanoes erupt molten rock.");
        assert_eq!(answers[0].page, Some(1));
    }

    #[test]
    fn unknown_topic_returns_sentinel() {
        let dir = book();
        let (engine, pages) = load(dir.path()).unwrap();
        let answers = ask(engine, &pages, "stock prices", false);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].sentence, NOT_FOUND);
        assert_eq!(answers[0].page, None);
    }

    #[test]
    fn summarizes_selected_pages_only() {
        let dir = book();
        let (engine, pages) = load(dir.path()).unwrap();
        let out = summarize(&engine, &pages, Some(&[0][..])).unwrap();
        assert_eq!(out.sentences.len(), 2);
        assert_eq!(out.pages, vec![0]);
        assert!(summarize(&engine, &pages, Some(&[7][..])).is_none());
    }

    #[test]
    fn summarizes_everything_by_default() {
        let dir = book();
        let (engine, pages) = load(dir.path()).unwrap();
        let out = summarize(&engine, &pages, None).unwrap();
        assert_eq!(out.sentences.len(), 3);
        assert_eq!(out.pages, vec![0, 1]);
    }
}
