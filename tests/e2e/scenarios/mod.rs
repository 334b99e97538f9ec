mod auto_flush;
mod happy_path;
mod read_failures;

use yurtle_core::namespaces::{PM, YURTLE};
use yurtle_core::Term;

fn task(id: &str) -> Term {
    Term::iri(format!("urn:task:{}", id))
}

fn title() -> Term {
    YURTLE.term("title")
}

fn status() -> Term {
    PM.term("status")
}
