use crate::tokenizer::{normalize, split_sentences};
use std::collections::{HashMap, HashSet};

/// Inverse document frequencies over the sentences of one corpus.
///
/// Every sentence counts as a document. Built in one pass and never patched; a new corpus
/// gets a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfTable {
    weights: HashMap<String, f64>,
    sentence_count: usize,
}

impl IdfTable {
    pub fn build<S: AsRef<str>>(sentences: &[S]) -> Self {
        let mut df: HashMap<String, u32> = HashMap::new();
        for sentence in sentences {
            let distinct: HashSet<String> = normalize(sentence.as_ref()).into_iter().collect();
            for term in distinct {
                *df.entry(term).or_insert(0) += 1;
            }
        }
        let n = sentences.len() as f64;
        let weights = df
            .into_iter()
            .map(|(term, df_t)| (term, (n / df_t as f64).ln()))
            .collect();
        Self { weights, sentence_count: sentences.len() }
    }

    pub fn sentence_count(&self) -> usize { self.sentence_count }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    pub fn get(&self, term: &str) -> Option<f64> { self.weights.get(term).copied() }

    /// IDF of `term`, treating a term never seen in the corpus as if it occurred in one sentence.
    /// `None` when the corpus has no sentences.
    pub fn weight(&self, term: &str) -> Option<f64> {
        if self.sentence_count == 0 {
            return None;
        }
        Some(self.get(term).unwrap_or_else(|| (self.sentence_count as f64).ln()))
    }
}

/// One ingested corpus: the raw text, its sentence inventory and the IDF table derived from it.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    text: String,
    sentences: Vec<String>,
    idf: IdfTable,
}

impl Corpus {
    pub fn build(text: &str) -> Self {
        let sentences: Vec<String> = split_sentences(text).into_iter().map(str::to_string).collect();
        let idf = IdfTable::build(&sentences);
        Self { text: text.to_string(), sentences, idf }
    }

    pub fn empty() -> Self { Self::default() }

    pub fn text(&self) -> &str { &self.text }

    pub fn sentences(&self) -> &[String] { &self.sentences }

    pub fn idf(&self) -> &IdfTable { &self.idf }

    pub fn is_empty(&self) -> bool { self.sentences.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idf_of_shared_and_unique_terms() {
        let idf = IdfTable::build(&["Rust compiles fast.", "Rust has traits."]);
        assert_eq!(idf.sentence_count(), 2);
        assert_eq!(idf.get("rust"), Some(0.0));
        let traits = idf.get("trait").unwrap();
        assert!((traits - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn repeated_term_in_one_sentence_counts_once() {
        let idf = IdfTable::build(&["data data data.", "other words."]);
        assert!((idf.get("data").unwrap() - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn unseen_term_falls_back_to_single_occurrence() {
        let idf = IdfTable::build(&["one.", "two.", "three.", "four."]);
        assert!((idf.weight("missing").unwrap() - 4f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn empty_corpus_has_no_weights() {
        let corpus = Corpus::build("   ");
        assert!(corpus.is_empty());
        assert!(corpus.idf().is_empty());
        assert_eq!(corpus.idf().weight("anything"), None);
    }

    #[test]
    fn corpus_keeps_verbatim_sentences() {
        let corpus = Corpus::build("Alpha beta. Gamma delta!");
        assert_eq!(corpus.sentences(), &["Alpha beta.".to_string(), "Gamma delta!".to_string()]);
        assert_eq!(corpus.idf().sentence_count(), 2);
    }
}
