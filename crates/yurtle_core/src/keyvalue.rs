//! YAML key-value headers.
//!
//! A key-value header is a YAML mapping. Each key maps to a fixed predicate
//! (see [`predicate_for_key`]) and each value is coerced to a term by a
//! closed rule set (see [`Coercion`]).

use crate::namespaces::{BEING, PM, RDF_TYPE, XSD_INTEGER, YURTLE};
use crate::term::{Literal, Term, Triple};
use crate::turtle::check_iri;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;

/// Key characters that cannot appear in an IRI, plus `%` itself.
const KEY_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

fn scheme_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\A[A-Za-z][A-Za-z0-9+.\-]*:\S").expect("scheme pattern is valid")
    })
}

/// Returns the predicate a header key maps to.
///
/// Unknown keys fall back to `yurtle:{key}`, percent-encoding characters
/// an IRI cannot hold.
///
/// # Examples
///
/// ```
/// use yurtle_core::{namespaces::PM, predicate_for_key};
///
/// assert_eq!(predicate_for_key("assigned_to"), PM.term("assignedTo"));
/// assert_eq!(
///     predicate_for_key("due date").as_iri(),
///     Some("https://yurtle.dev/schema/due%20date")
/// );
/// ```
pub fn predicate_for_key(key: &str) -> Term {
    match key {
        "type" => Term::iri(RDF_TYPE),
        "title" => YURTLE.term("title"),
        "status" => PM.term("status"),
        "priority" => PM.term("priority"),
        "assignee" | "assigned_to" => PM.term("assignedTo"),
        "created" => YURTLE.term("created"),
        "updated" => YURTLE.term("updated"),
        "tags" => YURTLE.term("tag"),
        "labels" => YURTLE.term("label"),
        "methodology" => PM.term("methodology"),
        "domain" => BEING.term("domain"),
        "name" => YURTLE.term("name"),
        "description" => YURTLE.term("description"),
        other => YURTLE.term(&utf8_percent_encode(other, KEY_ENCODE).to_string()),
    }
}

/// How a single YAML scalar becomes an object term.
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    /// `null`; no triple is produced.
    Skip,
    /// `xsd:boolean`.
    Boolean(bool),
    /// `xsd:integer`, kept as its lexical form so large unsigned values
    /// survive.
    Integer(String),
    /// `xsd:decimal`.
    Decimal(f64),
    /// Strings that start with a URI scheme and are writable IRIs.
    Iri(String),
    /// Everything else, including nested mappings rendered as YAML text.
    Plain(String),
}

impl Coercion {
    /// Classifies a YAML value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Skip,
            Value::Bool(b) => Self::Boolean(*b),
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Self::Integer(n.to_string())
                } else {
                    Self::Decimal(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => {
                if scheme_pattern().is_match(s) && check_iri(s).is_ok() {
                    Self::Iri(s.clone())
                } else {
                    Self::Plain(s.clone())
                }
            }
            Value::Tagged(tagged) => Self::of(&tagged.value),
            Value::Sequence(_) | Value::Mapping(_) => Self::Plain(yaml_text(value)),
        }
    }

    /// The object term, or `None` for [`Coercion::Skip`].
    pub fn into_term(self) -> Option<Term> {
        match self {
            Self::Skip => None,
            Self::Boolean(b) => Some(Literal::boolean(b).into()),
            Self::Integer(lexical) => Some(Literal::typed(lexical, XSD_INTEGER).into()),
            Self::Decimal(f) => Some(Literal::decimal(f).into()),
            Self::Iri(iri) => Some(Term::Iri(iri)),
            Self::Plain(s) => Some(Term::plain(s)),
        }
    }
}

fn yaml_text(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}

fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A parsed key-value header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValueHeader {
    /// Key/value pairs in document order. Empty when the header holds no
    /// data.
    pub entries: Vec<(String, Value)>,
}

impl KeyValueHeader {
    /// Parses YAML header text. An empty or `null` document yields no
    /// entries; any other non-mapping document is an error.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        let value: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(text)?
        };
        let mapping = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(m) => m,
            other => {
                use serde::de::Error as _;
                return Err(serde_yaml::Error::custom(format!(
                    "expected a mapping, found {}",
                    kind_name(&other)
                )));
            }
        };
        let entries = mapping
            .into_iter()
            .filter_map(|(k, v)| key_text(&k).map(|k| (k, v)))
            .collect();
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `id` entry, if it is a scalar.
    pub fn id(&self) -> Option<String> {
        self.entries.iter().find(|(k, _)| k == "id").and_then(|(_, v)| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Expands the entries into triples about `subject`. Sequences produce
    /// one triple per item.
    pub fn to_triples(&self, subject: &Term) -> Vec<Triple> {
        let mut triples = Vec::new();
        for (key, value) in &self.entries {
            let predicate = predicate_for_key(key);
            let items: Vec<&Value> = match value {
                Value::Sequence(seq) => seq.iter().collect(),
                single => vec![single],
            };
            for item in items {
                if let Some(object) = Coercion::of(item).into_term() {
                    let triple = Triple::new(subject.clone(), predicate.clone(), object);
                    if !triples.contains(&triple) {
                        triples.push(triple);
                    }
                }
            }
        }
        triples
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
