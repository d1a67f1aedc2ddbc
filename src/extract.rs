//! Derived views over a parsed doc2json document.
//!
//! Both functions are pure and total: they never fail, whatever shape the
//! input has. Missing fields become placeholders or are skipped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NO_TITLE: &str = "No title available";
pub const NO_AUTHORS: &str = "No authors available";
pub const NO_ABSTRACT: &str = "No abstract available";

/// Title, authors and abstract of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "Title")]
    pub title: String,
    /// `first last` per author, joined with `", "`.
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Abstract")]
    pub abstract_text: String,
}

impl Metadata {
    /// Render as YAML front matter for the Markdown artifact.
    pub fn to_front_matter(&self) -> String {
        let mut yaml = String::from("---\n");
        yaml.push_str(&format!("title: \"{}\"\n", escape_yaml(&self.title)));
        yaml.push_str(&format!("authors: \"{}\"\n", escape_yaml(&self.authors)));
        yaml.push_str(&format!(
            "abstract: \"{}\"\n",
            escape_yaml(&self.abstract_text)
        ));
        yaml.push_str("---\n\n");
        yaml
    }
}

/// Escape for a double-quoted YAML scalar. Control characters other than
/// the named ones are written as `\uXXXX`.
fn escape_yaml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Pull title, authors and abstract out of a parsed document.
///
/// An `abstract` given as a list of `{text}` paragraphs (the S2ORC shape) is
/// joined like body text.
pub fn extract_metadata(doc: &Value) -> Metadata {
    let title = doc
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(NO_TITLE)
        .to_string();

    let authors = match doc.get("authors").and_then(Value::as_array) {
        Some(list) => format_authors(list),
        None => NO_AUTHORS.to_string(),
    };

    let abstract_text = match doc.get("abstract") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(paragraphs)) => join_segments(paragraphs),
        _ => NO_ABSTRACT.to_string(),
    };

    Metadata {
        title,
        authors,
        abstract_text,
    }
}

/// `first last` for each author, comma separated.
fn format_authors(authors: &[Value]) -> String {
    authors
        .iter()
        .map(|author| {
            let first = author.get("first").and_then(Value::as_str).unwrap_or("");
            let last = author.get("last").and_then(Value::as_str).unwrap_or("");
            format!("{first} {last}").trim().to_string()
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Join every `pdf_parse.body_text[*].text` with a blank line.
///
/// Segments without a `text` string are skipped; no empty paragraph is left
/// in their place.
pub fn extract_main_text(doc: &Value) -> String {
    doc.get("pdf_parse")
        .and_then(|p| p.get("body_text"))
        .and_then(Value::as_array)
        .map(|segments| join_segments(segments))
        .unwrap_or_default()
}

fn join_segments(segments: &[Value]) -> String {
    segments
        .iter()
        .filter_map(|s| s.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n\n")
}
