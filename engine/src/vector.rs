use crate::index::IdfTable;
use crate::tokenizer::normalize;
use std::collections::BTreeMap;

/// Sparse term -> weight mapping. Ordered so that sums over it are reproducible.
pub type TermVector = BTreeMap<String, f64>;

/// Raw term counts of a token stream.
pub fn term_frequencies(tokens: Vec<String>) -> BTreeMap<String, u32> {
    let mut tf = BTreeMap::new();
    for token in tokens {
        *tf.entry(token).or_insert(0) += 1;
    }
    tf
}

/// TF x IDF vector of `text` against the current corpus table.
///
/// Returns an empty vector when the table comes from an empty corpus.
pub fn vectorize(text: &str, idf: &IdfTable) -> TermVector {
    if idf.sentence_count() == 0 {
        return TermVector::new();
    }
    term_frequencies(normalize(text))
        .into_iter()
        .filter_map(|(term, tf)| {
            let w = idf.weight(&term)?;
            Some((term, tf as f64 * w))
        })
        .collect()
}

pub fn magnitude(v: &TermVector) -> f64 {
    v.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Cosine of the angle between two term vectors; 0.0 when either has no magnitude.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let (ma, mb) = (magnitude(a), magnitude(b));
    if ma == 0.0 || mb == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    let score = dot / (ma * mb);
    if score.is_finite() { score } else { 0.0 }
}
