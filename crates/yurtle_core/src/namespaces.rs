//! Standard namespaces for Yurtle documents.

use crate::term::Term;

/// An IRI prefix that local names are appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace(&'static str);

impl Namespace {
    /// Creates a namespace from its base IRI.
    pub const fn new(base: &'static str) -> Self {
        Self(base)
    }

    /// Returns the base IRI.
    pub fn base(&self) -> &'static str {
        self.0
    }

    /// Returns the full IRI for a local name.
    pub fn iri(&self, local: &str) -> String {
        format!("{}{}", self.0, local)
    }

    /// Returns an IRI term for a local name.
    pub fn term(&self, local: &str) -> Term {
        Term::iri(self.iri(local))
    }
}

/// Core Yurtle schema.
pub const YURTLE: Namespace = Namespace::new("https://yurtle.dev/schema/");
/// Project management.
pub const PM: Namespace = Namespace::new("https://yurtle.dev/pm/");
/// Beings and agents.
pub const BEING: Namespace = Namespace::new("https://yurtle.dev/being/");
/// Voyages and journeys.
pub const VOYAGE: Namespace = Namespace::new("https://yurtle.dev/voyage/");
/// Knowledge and learning.
pub const KNOWLEDGE: Namespace = Namespace::new("https://yurtle.dev/knowledge/");
/// Source-file provenance. Reserved for the store.
pub const PROVENANCE: Namespace = Namespace::new("https://yurtle.dev/provenance/");
/// RDF vocabulary.
pub const RDF: Namespace = Namespace::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#");
/// RDF Schema vocabulary.
pub const RDFS: Namespace = Namespace::new("http://www.w3.org/2000/01/rdf-schema#");
/// XML Schema datatypes.
pub const XSD: Namespace = Namespace::new("http://www.w3.org/2001/XMLSchema#");

/// The provenance predicate linking a subject to the file that defines it.
pub const DEFINED_IN: &str = "https://yurtle.dev/provenance/definedIn";

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// XSD datatype IRIs used by literal coercion and the writer.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

/// Prefixes bound in every parsed header and offered to the writer.
///
/// Ordered by prefix so the writer emits a stable prefix block.
pub const STANDARD_PREFIXES: &[(&str, Namespace)] = &[
    ("being", BEING),
    ("knowledge", KNOWLEDGE),
    ("pm", PM),
    ("prov", PROVENANCE),
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("voyage", VOYAGE),
    ("xsd", XSD),
    ("yurtle", YURTLE),
];

/// Returns the provenance predicate as a term.
pub fn defined_in() -> Term {
    Term::iri(DEFINED_IN)
}
