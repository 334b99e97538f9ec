//! A Turtle subset: parser and writer for document headers.
//!
//! Supported: `@prefix`/`PREFIX`, `@base`/`BASE`, IRIs, prefixed names, the
//! `a` keyword, `;` and `,` lists, labelled blank nodes, `[ ... ]` property
//! lists, short and long strings with the standard escapes, language tags,
//! `^^` datatypes, numbers and booleans. Collections (`( ... )`) are
//! rejected.
//!
//! The standard Yurtle prefixes are pre-bound; a header may redeclare them.

use crate::namespaces::{
    RDF_TYPE, STANDARD_PREFIXES, XSD_BOOLEAN, XSD_DECIMAL, XSD_DOUBLE, XSD_INTEGER,
};
use crate::term::{escape_string, Literal, Term, Triple};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// A syntax error with its 1-based position in the header text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurtleError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for TurtleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for TurtleError {}

/// A term that has no Turtle spelling this module can read back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot write {term}: {reason}")]
pub struct UnwritableTerm {
    pub term: String,
    pub reason: String,
}

impl UnwritableTerm {
    fn new(term: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self {
            term: term.to_string(),
            reason: reason.into(),
        }
    }
}

/// Characters an `<...>` IRI reference may not contain.
fn is_forbidden_in_iri(c: char) -> bool {
    c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

/// True if `iri` starts with a scheme: letters, digits, `+ - .` up to `:`.
fn has_scheme(iri: &str) -> bool {
    match iri.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().map_or(false, |c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Checks that `iri` is absolute and can be written between `<` and `>`.
///
/// # Examples
///
/// ```
/// use yurtle_core::check_iri;
///
/// assert!(check_iri("urn:task:1").is_ok());
/// assert!(check_iri("https://yurtle.dev/schema/due date").is_err());
/// assert!(check_iri("relative/path").is_err());
/// ```
pub fn check_iri(iri: &str) -> Result<(), UnwritableTerm> {
    if let Some(c) = iri.chars().find(|&c| is_forbidden_in_iri(c)) {
        return Err(UnwritableTerm::new(
            format!("<{}>", iri),
            format!("character {:?} is not allowed in an IRI", c),
        ));
    }
    if !has_scheme(iri) {
        return Err(UnwritableTerm::new(format!("<{}>", iri), "IRI has no scheme"));
    }
    Ok(())
}

fn check_blank_label(label: &str) -> Result<(), UnwritableTerm> {
    let valid = label.chars().next().map_or(false, |c| c.is_alphanumeric() || c == '_')
        && label.chars().all(|c| is_name_char(c) || c == '%')
        && !label.ends_with('.');
    if valid {
        Ok(())
    } else {
        Err(UnwritableTerm::new(format!("_:{}", label), "invalid blank node label"))
    }
}

fn check_language(tag: &str) -> Result<(), UnwritableTerm> {
    let valid = !tag.is_empty()
        && !tag.starts_with('-')
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(UnwritableTerm::new(format!("@{}", tag), "invalid language tag"))
    }
}

/// Checks that every term of a triple can be written and read back.
pub fn check_triple(triple: &Triple) -> Result<(), UnwritableTerm> {
    match &triple.subject {
        Term::Literal(_) => {
            return Err(UnwritableTerm::new(&triple.subject, "a literal cannot be a subject"))
        }
        term => check_term(term)?,
    }
    match &triple.predicate {
        Term::Iri(iri) => check_iri(iri)?,
        other => return Err(UnwritableTerm::new(other, "a predicate must be an IRI")),
    }
    check_term(&triple.object)
}

fn check_term(term: &Term) -> Result<(), UnwritableTerm> {
    match term {
        Term::Iri(iri) => check_iri(iri),
        Term::Blank(label) => check_blank_label(label),
        Term::Literal(lit) => {
            if let Some(tag) = lit.language() {
                check_language(tag)?;
            }
            match lit.datatype() {
                Some(dt) => check_iri(dt),
                None => Ok(()),
            }
        }
    }
}

/// Result of parsing a Turtle header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTurtle {
    /// Distinct triples in document order.
    pub triples: Vec<Triple>,
}

impl ParsedTurtle {
    /// The subject of the first triple whose subject is an IRI.
    pub fn first_iri_subject(&self) -> Option<&Term> {
        self.triples
            .iter()
            .map(|t| &t.subject)
            .find(|s| s.is_iri())
    }
}

/// Parses Turtle text.
///
/// Blank node labels are qualified with `blank_scope` so that `_:b0` in two
/// different documents does not collide in a shared cache. Labels that
/// already carry the scope are left as they are, which keeps a
/// write-then-read cycle stable.
///
/// # Examples
///
/// ```
/// use yurtle_core::{parse_turtle, Term};
///
/// let parsed = parse_turtle(
///     "<urn:task:1> a yurtle:WorkItem ;\n    yurtle:title \"One\" .",
///     "",
/// )
/// .unwrap();
/// assert_eq!(parsed.triples.len(), 2);
/// assert_eq!(parsed.first_iri_subject(), Some(&Term::iri("urn:task:1")));
/// ```
pub fn parse_turtle(input: &str, blank_scope: &str) -> Result<ParsedTurtle, TurtleError> {
    let mut parser = Parser::new(input, blank_scope);
    parser.parse_document()?;
    Ok(ParsedTurtle {
        triples: parser.triples,
    })
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    prefixes: HashMap<String, String>,
    base: Option<String>,
    blank_scope: &'a str,
    next_anon: usize,
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

impl<'a> Parser<'a> {
    fn new(input: &str, blank_scope: &'a str) -> Self {
        let prefixes = STANDARD_PREFIXES
            .iter()
            .map(|(prefix, ns)| (prefix.to_string(), ns.base().to_string()))
            .collect();
        Self {
            chars: input.chars().collect(),
            pos: 0,
            prefixes,
            base: None,
            blank_scope,
            next_anon: 0,
            triples: Vec::new(),
            seen: HashSet::new(),
        }
    }

    // === Cursor ===

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    /// Case-insensitive keyword followed by whitespace.
    fn at_keyword(&self, keyword: &str) -> bool {
        let len = keyword.chars().count();
        keyword
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i).map(|p| p.to_ascii_uppercase()) == Some(c))
            && self.peek_at(len).map_or(false, char::is_whitespace)
    }

    /// A bare word that is not followed by more name characters.
    fn at_word(&self, word: &str) -> bool {
        let len = word.chars().count();
        self.starts_with(word)
            && !self
                .peek_at(len)
                .map_or(false, |c| is_name_char(c) || c == ':')
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> TurtleError {
        let mut line = 1;
        let mut column = 1;
        for &c in &self.chars[..self.pos.min(self.chars.len())] {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        TurtleError {
            line,
            column,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), TurtleError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn emit(&mut self, subject: &Term, predicate: &Term, object: Term) {
        let triple = Triple::new(subject.clone(), predicate.clone(), object);
        if self.seen.insert(triple.clone()) {
            self.triples.push(triple);
        }
    }

    // === Grammar ===

    fn parse_document(&mut self) -> Result<(), TurtleError> {
        loop {
            self.skip_ws();
            if self.peek().is_none() {
                return Ok(());
            }
            if self.starts_with("@prefix") {
                self.pos += "@prefix".len();
                self.parse_prefix_directive(false)?;
            } else if self.starts_with("@base") {
                self.pos += "@base".len();
                self.parse_base_directive(false)?;
            } else if self.at_keyword("PREFIX") {
                self.pos += "PREFIX".len();
                self.parse_prefix_directive(true)?;
            } else if self.at_keyword("BASE") {
                self.pos += "BASE".len();
                self.parse_base_directive(true)?;
            } else {
                self.parse_statement()?;
            }
        }
    }

    fn parse_prefix_directive(&mut self, sparql: bool) -> Result<(), TurtleError> {
        self.skip_ws();
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == ':' {
                break;
            }
            if !is_name_char(c) {
                return Err(self.error(format!("invalid character '{}' in prefix name", c)));
            }
            name.push(c);
            self.pos += 1;
        }
        self.expect(':')?;
        self.skip_ws();
        let iri = self.read_iriref()?;
        if !sparql {
            self.skip_ws();
            self.expect('.')?;
        }
        self.prefixes.insert(name, iri);
        Ok(())
    }

    fn parse_base_directive(&mut self, sparql: bool) -> Result<(), TurtleError> {
        self.skip_ws();
        let iri = self.read_iriref()?;
        if !sparql {
            self.skip_ws();
            self.expect('.')?;
        }
        self.base = Some(iri);
        Ok(())
    }

    fn parse_statement(&mut self) -> Result<(), TurtleError> {
        if self.peek() == Some('[') {
            let subject = self.parse_blank_property_list()?;
            self.skip_ws();
            if self.peek() != Some('.') {
                self.parse_predicate_object_list(&subject)?;
                self.skip_ws();
            }
            return self.expect('.');
        }

        let subject = self.parse_subject()?;
        self.skip_ws();
        self.parse_predicate_object_list(&subject)?;
        self.skip_ws();
        self.expect('.')
    }

    fn parse_subject(&mut self) -> Result<Term, TurtleError> {
        match self.peek() {
            Some('<') => Ok(Term::Iri(self.read_iriref()?)),
            Some('_') if self.peek_at(1) == Some(':') => self.read_blank_label(),
            Some('(') => Err(self.error("collections are not supported")),
            Some('"') | Some('\'') => Err(self.error("a literal cannot be a subject")),
            _ => Ok(Term::Iri(self.read_prefixed_name()?)),
        }
    }

    fn parse_predicate_object_list(&mut self, subject: &Term) -> Result<(), TurtleError> {
        loop {
            self.skip_ws();
            let predicate = self.parse_verb()?;
            self.parse_object_list(subject, &predicate)?;
            self.skip_ws();
            if self.peek() != Some(';') {
                return Ok(());
            }
            while self.peek() == Some(';') {
                self.pos += 1;
                self.skip_ws();
            }
            if matches!(self.peek(), None | Some('.') | Some(']')) {
                return Ok(());
            }
        }
    }

    fn parse_object_list(&mut self, subject: &Term, predicate: &Term) -> Result<(), TurtleError> {
        loop {
            self.skip_ws();
            let object = self.parse_object()?;
            self.emit(subject, predicate, object);
            self.skip_ws();
            if self.peek() == Some(',') {
                self.pos += 1;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_verb(&mut self) -> Result<Term, TurtleError> {
        if self.at_word("a") {
            self.pos += 1;
            return Ok(Term::iri(RDF_TYPE));
        }
        match self.peek() {
            Some('<') => Ok(Term::Iri(self.read_iriref()?)),
            Some(_) => Ok(Term::Iri(self.read_prefixed_name()?)),
            None => Err(self.error("expected a predicate, found end of input")),
        }
    }

    fn parse_object(&mut self) -> Result<Term, TurtleError> {
        match self.peek() {
            Some('<') => Ok(Term::Iri(self.read_iriref()?)),
            Some('_') if self.peek_at(1) == Some(':') => self.read_blank_label(),
            Some('[') => self.parse_blank_property_list(),
            Some('(') => Err(self.error("collections are not supported")),
            Some('"') | Some('\'') => self.parse_string_literal(),
            Some(c) if c.is_ascii_digit() => self.parse_number(),
            Some('+') | Some('-') | Some('.')
                if self.peek_at(1).map_or(false, |c| c.is_ascii_digit() || c == '.') =>
            {
                self.parse_number()
            }
            Some(_) if self.at_word("true") => {
                self.pos += 4;
                Ok(Literal::boolean(true).into())
            }
            Some(_) if self.at_word("false") => {
                self.pos += 5;
                Ok(Literal::boolean(false).into())
            }
            Some(_) => Ok(Term::Iri(self.read_prefixed_name()?)),
            None => Err(self.error("expected an object, found end of input")),
        }
    }

    fn parse_blank_property_list(&mut self) -> Result<Term, TurtleError> {
        self.expect('[')?;
        let node = self.fresh_blank();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(node);
        }
        self.parse_predicate_object_list(&node)?;
        self.skip_ws();
        self.expect(']')?;
        Ok(node)
    }

    // === Terminals ===

    fn read_iriref(&mut self) -> Result<String, TurtleError> {
        self.expect('<')?;
        let mut iri = String::new();
        loop {
            match self.bump() {
                Some('>') => break,
                Some(c) if is_forbidden_in_iri(c) => {
                    self.pos -= 1;
                    return Err(self.error(format!("invalid character {:?} in IRI", c)));
                }
                Some(c) => iri.push(c),
                None => return Err(self.error("unterminated IRI")),
            }
        }
        self.resolve(iri)
    }

    fn resolve(&self, iri: String) -> Result<String, TurtleError> {
        if has_scheme(&iri) {
            return Ok(iri);
        }
        let Some(base) = &self.base else {
            return Err(self.error(format!("relative IRI <{}> without @base", iri)));
        };
        let base_no_fragment = base.split('#').next().unwrap_or(base);
        if iri.is_empty() {
            return Ok(base_no_fragment.to_string());
        }
        if iri.starts_with('#') {
            return Ok(format!("{}{}", base_no_fragment, iri));
        }
        if iri.starts_with('/') {
            // scheme://authority
            let authority_end = base
                .find("://")
                .and_then(|i| base[i + 3..].find('/').map(|j| i + 3 + j))
                .unwrap_or(base.len());
            return Ok(format!("{}{}", &base[..authority_end], iri));
        }
        let dir_end = base_no_fragment.rfind('/').map_or(0, |i| i + 1);
        Ok(format!("{}{}", &base_no_fragment[..dir_end], iri))
    }

    /// Reads name characters, giving back any trailing dots (they end the
    /// statement rather than the name).
    fn read_name(&mut self, allow_colon: bool) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if is_name_char(c) || c == '%' || (allow_colon && c == ':') {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        while name.ends_with('.') {
            name.pop();
            self.pos -= 1;
        }
        name
    }

    fn read_prefixed_name(&mut self) -> Result<String, TurtleError> {
        let start = self.pos;
        let prefix = self.read_name(false);
        if self.peek() != Some(':') {
            self.pos = start;
            return Err(match self.peek() {
                Some(c) => self.error(format!("unexpected character '{}'", c)),
                None => self.error("unexpected end of input"),
            });
        }
        self.pos += 1;
        let local = self.read_name(true);
        match self.prefixes.get(&prefix) {
            Some(ns) => Ok(format!("{}{}", ns, local)),
            None => {
                self.pos = start;
                Err(self.error(format!("undeclared prefix '{}:'", prefix)))
            }
        }
    }

    fn read_blank_label(&mut self) -> Result<Term, TurtleError> {
        self.pos += 2; // "_:"
        let label = self.read_name(false);
        if label.is_empty() {
            return Err(self.error("empty blank node label"));
        }
        if self.blank_scope.is_empty() || label.starts_with(&format!("{}-", self.blank_scope)) {
            Ok(Term::Blank(label))
        } else {
            Ok(Term::Blank(format!("{}-{}", self.blank_scope, label)))
        }
    }

    fn fresh_blank(&mut self) -> Term {
        let n = self.next_anon;
        self.next_anon += 1;
        if self.blank_scope.is_empty() {
            Term::Blank(format!("anon{}", n))
        } else {
            Term::Blank(format!("{}-anon{}", self.blank_scope, n))
        }
    }

    fn parse_string_literal(&mut self) -> Result<Term, TurtleError> {
        let quote = self.bump().ok_or_else(|| self.error("expected a string"))?;
        let long = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if long {
            self.pos += 2;
        }

        let mut value = String::new();
        loop {
            let c = self
                .bump()
                .ok_or_else(|| self.error("unterminated string literal"))?;
            if c == quote {
                if !long {
                    break;
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2;
                    break;
                }
                value.push(c);
            } else if c == '\\' {
                value.push(self.read_escape()?);
            } else if (c == '\n' || c == '\r') && !long {
                self.pos -= 1;
                return Err(self.error("line break in short string literal"));
            } else {
                value.push(c);
            }
        }

        if self.peek() == Some('@') {
            self.pos += 1;
            let mut tag = String::new();
            while let Some(c) = self.peek() {
                if c.is_ascii_alphanumeric() || c == '-' {
                    tag.push(c);
                    self.pos += 1;
                } else {
                    break;
                }
            }
            if tag.is_empty() {
                return Err(self.error("empty language tag"));
            }
            return Ok(Literal::lang(value, &tag).into());
        }

        if self.starts_with("^^") {
            self.pos += 2;
            let datatype = match self.peek() {
                Some('<') => self.read_iriref()?,
                _ => self.read_prefixed_name()?,
            };
            return Ok(Literal::typed(value, datatype).into());
        }

        Ok(Literal::plain(value).into())
    }

    fn read_escape(&mut self) -> Result<char, TurtleError> {
        let c = self
            .bump()
            .ok_or_else(|| self.error("unterminated escape sequence"))?;
        let simple = match c {
            't' => Some('\t'),
            'b' => Some('\u{8}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            'f' => Some('\u{c}'),
            '"' => Some('"'),
            '\'' => Some('\''),
            '\\' => Some('\\'),
            _ => None,
        };
        if let Some(ch) = simple {
            return Ok(ch);
        }
        let digits = match c {
            'u' => 4,
            'U' => 8,
            _ => return Err(self.error(format!("unknown escape '\\{}'", c))),
        };
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            match self.bump() {
                Some(h) if h.is_ascii_hexdigit() => hex.push(h),
                _ => return Err(self.error("invalid unicode escape")),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid code point U+{}", hex)))
    }

    fn parse_number(&mut self) -> Result<Term, TurtleError> {
        let mut lexical = String::new();
        if let Some(sign @ ('+' | '-')) = self.peek() {
            lexical.push(sign);
            self.pos += 1;
        }
        self.take_digits(&mut lexical);

        let mut datatype = XSD_INTEGER;
        if self.peek() == Some('.') && self.peek_at(1).map_or(false, |c| c.is_ascii_digit()) {
            lexical.push('.');
            self.pos += 1;
            self.take_digits(&mut lexical);
            datatype = XSD_DECIMAL;
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            lexical.push('e');
            self.pos += 1;
            if let Some(sign @ ('+' | '-')) = self.peek() {
                lexical.push(sign);
                self.pos += 1;
            }
            if !self.take_digits(&mut lexical) {
                return Err(self.error("missing exponent digits"));
            }
            datatype = XSD_DOUBLE;
        }

        if !lexical.chars().any(|c| c.is_ascii_digit()) {
            return Err(self.error("invalid number"));
        }
        Ok(Literal::typed(lexical, datatype).into())
    }

    fn take_digits(&mut self, out: &mut String) -> bool {
        let start = out.len();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        out.len() > start
    }
}

// === Writer ===

fn is_valid_local(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(c) if c.is_alphanumeric() || c == '_' => {}
        _ => return false,
    }
    local.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !local.ends_with('.')
}

/// Returns `prefix:local` for IRIs under a standard namespace.
fn compact(iri: &str) -> Option<(&'static str, &str)> {
    STANDARD_PREFIXES.iter().find_map(|(prefix, ns)| {
        iri.strip_prefix(ns.base())
            .filter(|local| is_valid_local(local))
            .map(|local| (*prefix, local))
    })
}

fn write_iri(iri: &str, used: &mut BTreeSet<&'static str>) -> String {
    match compact(iri) {
        Some((prefix, local)) => {
            used.insert(prefix);
            format!("{}:{}", prefix, local)
        }
        None => format!("<{}>", iri),
    }
}

fn is_bare_number(lexical: &str, datatype: &str) -> bool {
    let unsigned = lexical.trim_start_matches(['+', '-']);
    if unsigned.len() + 1 < lexical.len() || unsigned.is_empty() {
        return false;
    }
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    match datatype {
        XSD_INTEGER => digits(unsigned),
        XSD_DECIMAL => match unsigned.split_once('.') {
            Some((int, frac)) => (int.is_empty() || digits(int)) && digits(frac),
            None => false,
        },
        XSD_DOUBLE => match unsigned.split_once(['e', 'E']) {
            Some((mantissa, exp)) => {
                let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
                let mantissa_ok = match mantissa.split_once('.') {
                    Some((int, frac)) => {
                        (int.is_empty() || digits(int))
                            && (frac.is_empty() || digits(frac))
                            && !(int.is_empty() && frac.is_empty())
                    }
                    None => digits(mantissa),
                };
                mantissa_ok && digits(exp)
            }
            None => false,
        },
        _ => false,
    }
}

fn write_term(term: &Term, used: &mut BTreeSet<&'static str>) -> String {
    match term {
        Term::Iri(iri) => write_iri(iri, used),
        Term::Blank(id) => format!("_:{}", id),
        Term::Literal(lit) => {
            let quoted = format!("\"{}\"", escape_string(lit.lexical()));
            if let Some(lang) = lit.language() {
                return format!("{}@{}", quoted, lang);
            }
            match lit.datatype() {
                None => quoted,
                Some(XSD_BOOLEAN) if matches!(lit.lexical(), "true" | "false") => {
                    lit.lexical().to_string()
                }
                Some(dt) if is_bare_number(lit.lexical(), dt) => lit.lexical().to_string(),
                Some(dt) => format!("{}^^{}", quoted, write_iri(dt, used)),
            }
        }
    }
}

/// Renders triples as Turtle, grouped by subject.
///
/// Only the standard prefixes that are actually used are declared.
/// `rdf:type` is written first as `a`; other predicates follow in IRI order.
///
/// # Errors
///
/// Returns [`UnwritableTerm`] if any term could not be parsed back, such as
/// an IRI containing a space. Nothing is rendered in that case.
///
/// # Examples
///
/// ```
/// use yurtle_core::{namespaces::YURTLE, render_turtle, Term, Triple};
///
/// let text = render_turtle(&[Triple::new(
///     Term::iri("urn:task:1"),
///     YURTLE.term("title"),
///     Term::plain("One"),
/// )])
/// .unwrap();
/// assert_eq!(
///     text,
///     "@prefix yurtle: <https://yurtle.dev/schema/> .\n\n<urn:task:1> yurtle:title \"One\" .\n"
/// );
/// ```
pub fn render_turtle(triples: &[Triple]) -> Result<String, UnwritableTerm> {
    for t in triples {
        check_triple(t)?;
    }

    let mut grouped: BTreeMap<&Term, BTreeMap<(bool, &Term), Vec<&Term>>> = BTreeMap::new();
    for t in triples {
        let is_other = t.predicate.as_iri() != Some(RDF_TYPE);
        grouped
            .entry(&t.subject)
            .or_default()
            .entry((is_other, &t.predicate))
            .or_default()
            .push(&t.object);
    }

    let mut used = BTreeSet::new();
    let mut statements = Vec::with_capacity(grouped.len());
    for (subject, predicates) in grouped {
        let subject_text = write_term(subject, &mut used);
        let mut lines = Vec::with_capacity(predicates.len());
        for ((is_other, predicate), mut objects) in predicates {
            objects.sort();
            objects.dedup();
            let predicate_text = if is_other {
                write_term(predicate, &mut used)
            } else {
                "a".to_string()
            };
            let objects_text: Vec<String> =
                objects.iter().map(|o| write_term(o, &mut used)).collect();
            lines.push(format!("{} {}", predicate_text, objects_text.join(", ")));
        }
        statements.push(format!("{} {} .\n", subject_text, lines.join(" ;\n    ")));
    }

    let mut out = String::new();
    for (prefix, ns) in STANDARD_PREFIXES {
        if used.contains(prefix) {
            out.push_str(&format!("@prefix {}: <{}> .\n", prefix, ns.base()));
        }
    }
    if !out.is_empty() && !statements.is_empty() {
        out.push('\n');
    }
    out.push_str(&statements.join("\n"));
    Ok(out)
}
