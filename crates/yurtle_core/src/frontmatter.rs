//! Extraction of the `---` delimited header block from a document.

use regex::Regex;
use std::sync::OnceLock;

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n|\z)")
            .expect("header pattern is valid")
    })
}

/// The notation a header block is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Turtle triples.
    Turtle,
    /// YAML key-value pairs.
    KeyValue,
}

/// A document split into its header block and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    /// Text between the delimiter lines, without the delimiters.
    pub header: &'a str,
    /// Everything after the closing delimiter line, byte for byte.
    pub body: &'a str,
}

impl Header<'_> {
    /// Detects the header notation. Turtle headers start with a directive
    /// or an IRI; anything else is read as key-value.
    pub fn kind(&self) -> HeaderKind {
        let trimmed = self.header.trim_start();
        let turtle = ["@prefix", "@base", "<", "PREFIX", "BASE"]
            .iter()
            .any(|start| trimmed.starts_with(start));
        if turtle {
            HeaderKind::Turtle
        } else {
            HeaderKind::KeyValue
        }
    }
}

/// Splits a document into header and body.
///
/// Returns `None` when the text does not open with a `---` line followed by
/// a closing `---` line.
///
/// # Examples
///
/// ```
/// use yurtle_core::split_header;
///
/// let doc = "---\ntitle: A\n---\n# A\n";
/// let header = split_header(doc).unwrap();
/// assert_eq!(header.header, "title: A");
/// assert_eq!(header.body, "# A\n");
/// assert!(split_header("# no header\n").is_none());
/// ```
pub fn split_header(text: &str) -> Option<Header<'_>> {
    let caps = header_pattern().captures(text)?;
    let whole = caps.get(0)?;
    Some(Header {
        header: caps.get(1).map_or("", |m| m.as_str()),
        body: &text[whole.end()..],
    })
}
