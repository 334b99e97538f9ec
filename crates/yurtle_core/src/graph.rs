//! In-memory triple cache with subject and object indexes.

use crate::term::{Term, Triple, TriplePattern};
use std::collections::{BTreeMap, BTreeSet};

/// A set of triples.
///
/// Triples are kept in a sorted set (so iteration order is deterministic) with
/// two secondary indexes: forward (subject → predicate/object pairs) and
/// backward (object → subject/predicate pairs). Pattern lookups use whichever
/// index the fixed positions allow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleCache {
    triples: BTreeSet<Triple>,
    /// Forward edges: subject -> {(predicate, object)}
    forward: BTreeMap<Term, BTreeSet<(Term, Term)>>,
    /// Backward edges: object -> {(subject, predicate)}
    backward: BTreeMap<Term, BTreeSet<(Term, Term)>>,
}

impl TripleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Inserts a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        self.forward
            .entry(triple.subject.clone())
            .or_default()
            .insert((triple.predicate.clone(), triple.object.clone()));
        self.backward
            .entry(triple.object.clone())
            .or_default()
            .insert((triple.subject.clone(), triple.predicate.clone()));
        self.triples.insert(triple)
    }

    /// Removes a triple. Returns false if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.remove(triple) {
            return false;
        }
        if let Some(pairs) = self.forward.get_mut(&triple.subject) {
            pairs.remove(&(triple.predicate.clone(), triple.object.clone()));
            if pairs.is_empty() {
                self.forward.remove(&triple.subject);
            }
        }
        if let Some(pairs) = self.backward.get_mut(&triple.object) {
            pairs.remove(&(triple.subject.clone(), triple.predicate.clone()));
            if pairs.is_empty() {
                self.backward.remove(&triple.object);
            }
        }
        true
    }

    /// Iterates over all triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Returns every triple matching the pattern, in sorted order.
    pub fn matching(&self, pattern: &TriplePattern) -> Vec<Triple> {
        if let Some(subject) = &pattern.subject {
            return self
                .forward
                .get(subject)
                .into_iter()
                .flatten()
                .map(|(p, o)| Triple::new(subject.clone(), p.clone(), o.clone()))
                .filter(|t| pattern.matches(t))
                .collect();
        }

        if let Some(object) = &pattern.object {
            let mut found: Vec<Triple> = self
                .backward
                .get(object)
                .into_iter()
                .flatten()
                .map(|(s, p)| Triple::new(s.clone(), p.clone(), object.clone()))
                .filter(|t| pattern.matches(t))
                .collect();
            found.sort();
            return found;
        }

        self.triples
            .iter()
            .filter(|t| pattern.matches(t))
            .cloned()
            .collect()
    }

    /// Returns the subjects of triples with the given predicate and object.
    pub fn subjects(&self, predicate: &Term, object: &Term) -> Vec<Term> {
        self.backward
            .get(object)
            .into_iter()
            .flatten()
            .filter(|(_, p)| p == predicate)
            .map(|(s, _)| s.clone())
            .collect()
    }

    /// Returns the objects of triples with the given subject and predicate.
    pub fn objects(&self, subject: &Term, predicate: &Term) -> Vec<Term> {
        self.forward
            .get(subject)
            .into_iter()
            .flatten()
            .filter(|(p, _)| p == predicate)
            .map(|(_, o)| o.clone())
            .collect()
    }

    /// Returns all (predicate, object) pairs for a subject.
    pub fn predicate_objects(&self, subject: &Term) -> Vec<(Term, Term)> {
        self.forward
            .get(subject)
            .map(|pairs| pairs.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Removes every triple with the given subject. Returns how many were
    /// removed.
    pub fn remove_subject(&mut self, subject: &Term) -> usize {
        let pairs = self.predicate_objects(subject);
        pairs
            .into_iter()
            .filter(|(p, o)| self.remove(&Triple::new(subject.clone(), p.clone(), o.clone())))
            .count()
    }

    pub fn clear(&mut self) {
        self.triples.clear();
        self.forward.clear();
        self.backward.clear();
    }
}

impl Extend<Triple> for TripleCache {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for TripleCache {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut cache = Self::new();
        cache.extend(iter);
        cache
    }
}
