//! Document codec: turns file text into triples and back.

use crate::frontmatter::{split_header, HeaderKind};
use crate::keyvalue::KeyValueHeader;
use crate::namespaces::{RDF_TYPE, YURTLE};
use crate::term::{Term, Triple};
use crate::turtle::{parse_turtle, render_turtle, TurtleError, UnwritableTerm};
use std::path::Path;
use thiserror::Error;

/// A document decoded by a [`DocumentCodec`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Triples from the header, without provenance.
    pub triples: Vec<Triple>,
    /// The subject the file owns, if the header names one.
    pub subject: Option<Term>,
    /// Everything after the header block, byte for byte.
    pub body: String,
    /// Notation of the header, or `None` when there was no header.
    pub header_kind: Option<HeaderKind>,
}

/// Why a document could not be decoded or encoded.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("turtle header: {0}")]
    Turtle(#[from] TurtleError),

    #[error("key-value header: {0}")]
    KeyValue(#[from] serde_yaml::Error),

    #[error(transparent)]
    Unwritable(#[from] UnwritableTerm),
}

/// Converts between document text and triples.
///
/// The store only talks to documents through this trait.
pub trait DocumentCodec {
    /// Decodes a document. `location` is the file's path; codecs may use
    /// it to name subjects and scope blank nodes.
    fn parse(&self, text: &str, location: &Path) -> Result<ParsedDocument, CodecError>;

    /// Encodes the triples of `subject` together with a preserved body.
    ///
    /// Fails rather than produce text that [`parse`](Self::parse) would
    /// reject.
    fn render(&self, subject: &Term, triples: &[Triple], body: &str) -> Result<String, CodecError>;
}

/// The Yurtle document format: Markdown with a Turtle or YAML header.
#[derive(Debug, Clone, Copy, Default)]
pub struct YurtleCodec;

/// Subject for documents whose header does not name one: `urn:doc:{stem}`.
pub fn document_subject(location: &Path) -> Option<Term> {
    location
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| Term::iri(format!("urn:doc:{}", stem)))
}

/// Scope for blank node labels: a short digest of the path.
fn blank_scope(location: &Path) -> String {
    let digest = blake3::hash(location.to_string_lossy().as_bytes());
    hex::encode(&digest.as_bytes()[..4])
}

impl DocumentCodec for YurtleCodec {
    fn parse(&self, text: &str, location: &Path) -> Result<ParsedDocument, CodecError> {
        let Some(header) = split_header(text) else {
            return Ok(ParsedDocument {
                body: text.to_string(),
                ..Default::default()
            });
        };

        let kind = header.kind();
        let (triples, subject) = match kind {
            HeaderKind::Turtle => {
                let parsed = parse_turtle(header.header, &blank_scope(location))?;
                match parsed.first_iri_subject().cloned() {
                    Some(subject) => (parsed.triples, Some(subject)),
                    None => {
                        let mut triples = parsed.triples;
                        let subject = document_subject(location);
                        if let Some(s) = &subject {
                            triples.push(Triple::new(
                                s.clone(),
                                Term::iri(RDF_TYPE),
                                YURTLE.term("Document"),
                            ));
                        }
                        (triples, subject)
                    }
                }
            }
            HeaderKind::KeyValue => {
                let kv = KeyValueHeader::parse(header.header)?;
                if kv.is_empty() {
                    (Vec::new(), None)
                } else {
                    let subject = document_subject(location)
                        .or_else(|| kv.id().map(|id| Term::iri(format!("urn:{}", id))))
                        .unwrap_or_else(|| Term::iri("urn:unknown"));
                    (kv.to_triples(&subject), Some(subject))
                }
            }
        };

        Ok(ParsedDocument {
            triples,
            subject,
            body: header.body.to_string(),
            header_kind: Some(kind),
        })
    }

    fn render(
        &self,
        subject: &Term,
        triples: &[Triple],
        body: &str,
    ) -> Result<String, CodecError> {
        let owned: Vec<Triple> = triples
            .iter()
            .filter(|t| &t.subject == subject)
            .cloned()
            .collect();
        let header = render_turtle(&owned)?;
        Ok(format!("---\n{}\n---\n{}", header.trim_end(), body))
    }
}
