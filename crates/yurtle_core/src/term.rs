//! RDF terms, triples and wildcard triple patterns.

use crate::namespaces::{XSD_BOOLEAN, XSD_DECIMAL, XSD_INTEGER, XSD_STRING};
use std::fmt;

/// A literal value: lexical form plus either a datatype IRI or a language
/// tag.
///
/// Plain strings carry neither. A datatype of `xsd:string` is normalized to
/// the plain form so both spellings compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical: String,
    datatype: Option<String>,
    language: Option<String>,
}

impl Literal {
    /// A plain string literal.
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// A typed literal.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self {
            lexical: lexical.into(),
            datatype: (datatype != XSD_STRING).then_some(datatype),
            language: None,
        }
    }

    /// A language-tagged string. Tags are compared case-insensitively, so
    /// they are stored lowercased.
    pub fn lang(lexical: impl Into<String>, tag: &str) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: Some(tag.to_ascii_lowercase()),
        }
    }

    /// An `xsd:integer` literal.
    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), XSD_INTEGER)
    }

    /// An `xsd:boolean` literal.
    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), XSD_BOOLEAN)
    }

    /// An `xsd:decimal` literal. Whole numbers keep a `.0` suffix.
    pub fn decimal(value: f64) -> Self {
        let mut lexical = value.to_string();
        if value.is_finite() && !lexical.contains('.') && !lexical.contains('e') {
            lexical.push_str(".0");
        }
        Self::typed(lexical, XSD_DECIMAL)
    }

    /// The lexical form.
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// The datatype IRI, if any.
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// The language tag, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// A node in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank node identifier (without the `_:` prefix).
    Blank(String),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// An IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// A blank node term.
    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank(id.into())
    }

    /// A plain string literal term.
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self::Literal(Literal::plain(lexical))
    }

    /// Returns the IRI if this is an IRI term.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the literal if this is a literal term.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

/// Escapes a string for a double-quoted N-Triples/Turtle literal.
pub(crate) fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_string(&self.lexical))?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{}>", dt)
        } else {
            Ok(())
        }
    }
}

/// N-Triples rendering.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::Blank(id) => write!(f, "_:{}", id),
            Self::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

/// A subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// A triple pattern where each position is either fixed or a wildcard
/// (`None`).
///
/// # Examples
///
/// ```
/// use yurtle_core::{Term, Triple, TriplePattern};
///
/// let t = Triple::new(
///     Term::iri("urn:task:1"),
///     Term::iri("https://yurtle.dev/schema/title"),
///     Term::plain("One"),
/// );
/// assert!(TriplePattern::any().matches(&t));
/// assert!(TriplePattern::any().with_subject(Term::iri("urn:task:1")).matches(&t));
/// assert!(!TriplePattern::any().with_object(Term::plain("Two")).matches(&t));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
}

impl TriplePattern {
    /// A pattern matching every triple.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(subject: Option<Term>, predicate: Option<Term>, object: Option<Term>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    pub fn with_subject(mut self, subject: Term) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: Term) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: Term) -> Self {
        self.object = Some(object);
        self
    }

    /// Returns true if every fixed position equals the triple's term.
    pub fn matches(&self, triple: &Triple) -> bool {
        fn slot(pattern: &Option<Term>, term: &Term) -> bool {
            pattern.as_ref().map_or(true, |p| p == term)
        }
        slot(&self.subject, &triple.subject)
            && slot(&self.predicate, &triple.predicate)
            && slot(&self.object, &triple.object)
    }
}

impl From<&Triple> for TriplePattern {
    fn from(t: &Triple) -> Self {
        Self::new(
            Some(t.subject.clone()),
            Some(t.predicate.clone()),
            Some(t.object.clone()),
        )
    }
}
