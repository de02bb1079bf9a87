use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").expect("valid regex");
    static ref SUFFIX: Regex = Regex::new(r"(?:ing|ed|ly|es|s)$").expect("valid regex");
    static ref BOUNDARY: Regex = Regex::new(r"[.!?]\s+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","an","the","and","or","of","to","in","on","at","for","with",
            "without","is","are","was","were","be","been","being","this","that",
            "these","those","it","its","as","by","from","but","if","then",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Strip one trailing `ing`, `ed`, `ly`, `es` or `s`.
///
/// There is no minimum stem length: `"sing"` becomes `"s"` and `"is"` would become `"i"`.
pub fn stem(token: &str) -> String {
    SUFFIX.replace(token, "").into_owned()
}

/// Normalize text into scoring tokens: NFKC, lowercase, word runs, stopword removal, suffix stemming.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(stem)
        .collect()
}

/// Split text after every `.`, `!` or `?` that is followed by whitespace.
///
/// The terminal punctuation stays with its sentence, the separating whitespace is dropped,
/// and blank segments are skipped. Returned slices are verbatim substrings of `text`.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in BOUNDARY.find_iter(text) {
        // the punctuation mark is a single ASCII byte
        let end = m.start() + 1;
        push_sentence(&mut sentences, &text[start..end]);
        start = m.end();
    }
    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence<'a>(out: &mut Vec<&'a str>, piece: &'a str) {
    if !piece.trim().is_empty() {
        out.push(piece);
    }
}
