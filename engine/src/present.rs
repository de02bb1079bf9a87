use regex::{Captures, RegexBuilder};

/// Wrap case-insensitive occurrences of the whole question in a highlight span.
pub fn highlight(sentence: &str, question: &str) -> String {
    if question.trim().is_empty() {
        return sentence.to_string();
    }
    match RegexBuilder::new(&regex::escape(question)).case_insensitive(true).build() {
        Ok(pat) => pat
            .replace_all(sentence, |caps: &Captures| format!("<span class=\"highlight\">{}</span>", &caps[0]))
            .into_owned(),
        Err(_) => sentence.to_string(),
    }
}

/// Render summary sentences as an HTML list.
pub fn summary_html<S: AsRef<str>>(sentences: &[S]) -> String {
    let mut html = String::from("<ul>");
    for s in sentences {
        html.push_str("<li>");
        html.push_str(s.as_ref());
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}
