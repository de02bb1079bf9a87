use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Leading characters of a sentence that must appear on a page for it to match.
pub const MATCH_PREFIX_CHARS: usize = 30;

/// Pages of the loaded source text, used to map engine output back to where it came from.
#[derive(Debug, Clone, Default)]
pub struct PageMap {
    pages: Vec<String>,
    lowered: Vec<String>,
}

impl PageMap {
    pub fn new(pages: Vec<String>) -> Self {
        let lowered = pages.iter().map(|p| p.to_lowercase()).collect();
        Self { pages, lowered }
    }

    pub fn len(&self) -> usize { self.pages.len() }

    pub fn is_empty(&self) -> bool { self.pages.is_empty() }

    pub fn page(&self, index: usize) -> Option<&str> { self.pages.get(index).map(String::as_str) }

    /// All pages joined by a single space: the text handed to the engine.
    pub fn corpus_text(&self) -> String { self.pages.join(" ") }

    /// First page containing the sentence's leading characters, case-insensitively.
    pub fn locate(&self, sentence: &str) -> Option<usize> {
        let needle = prefix(sentence);
        self.lowered.iter().position(|page| page.contains(&needle))
    }

    /// Every page holding any of the sentences, ascending and without duplicates.
    pub fn locate_all<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<usize> {
        let mut hits: Vec<usize> = sentences
            .iter()
            .flat_map(|s| {
                let needle = prefix(s.as_ref());
                self.lowered
                    .iter()
                    .enumerate()
                    .filter(move |(_, page)| page.contains(&needle))
                    .map(|(i, _)| i)
            })
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    /// Text of the selected pages in page order, each followed by a space.
    /// Out-of-range indices are ignored.
    pub fn selection_text(&self, indices: &[usize]) -> String {
        let mut selected = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if indices.contains(&i) {
                selected.push_str(page);
                selected.push(' ');
            }
        }
        selected
    }
}

fn prefix(sentence: &str) -> String {
    sentence.chars().take(MATCH_PREFIX_CHARS).collect::<String>().to_lowercase()
}

/// Read pages from a file (one page) or a directory (each `.txt`/`.md` file, sorted by path).
pub fn load_pages(path: &Path) -> Result<Vec<String>> {
    if path.is_file() {
        return Ok(vec![fs::read_to_string(path)?]);
    }
    if !path.is_dir() {
        bail!("no such file or directory: {}", path.display());
    }
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() {
            if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                if matches!(ext, "txt" | "md") {
                    files.push(p.to_path_buf());
                }
            }
        }
    }
    files.sort();
    let mut pages = Vec::with_capacity(files.len());
    for file in files {
        pages.push(fs::read_to_string(&file)?);
    }
    tracing::debug!(pages = pages.len(), path = %path.display(), "loaded pages");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> PageMap {
        PageMap::new(vec![
            "Chapter one introduces the borrow checker and lifetimes.".into(),
            "Chapter two covers traits. The borrow checker returns here.".into(),
            "Appendix.".into(),
        ])
    }

    #[test]
    fn corpus_text_joins_with_space() {
        assert_eq!(PageMap::new(vec!["A.".into(), "B.".into()]).corpus_text(), "A. B.");
    }

    #[test]
    fn locates_first_page_by_prefix() {
        let m = map();
        assert_eq!(m.locate("CHAPTER TWO covers traits."), Some(1));
        assert_eq!(m.locate("Nowhere to be found."), None);
    }

    #[test]
    fn long_sentences_match_on_prefix_only() {
        let m = map();
        assert_eq!(m.locate("Chapter one introduces the borrow checker and then diverges"), Some(0));
    }

    #[test]
    fn locate_all_collects_every_page() {
        let m = map();
        assert_eq!(m.locate_all(&["The borrow checker", "Appendix."]), vec![0, 1, 2]);
    }

    #[test]
    fn selection_is_in_page_order() {
        let m = map();
        assert_eq!(m.selection_text(&[2, 0, 9]), format!("{} Appendix. ", m.page(0).unwrap()));
        assert!(m.selection_text(&[]).trim().is_empty());
    }

    #[test]
    fn loads_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "Second page.").unwrap();
        fs::write(dir.path().join("a.txt"), "First page.").unwrap();
        fs::write(dir.path().join("skip.bin"), "ignored").unwrap();
        let pages = load_pages(dir.path()).unwrap();
        assert_eq!(pages, vec!["First page.".to_string(), "Second page.".to_string()]);
        assert!(load_pages(&dir.path().join("missing")).is_err());
    }
}
