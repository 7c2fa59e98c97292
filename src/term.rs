use std::fmt;

// ------------- Term -------------
/// One position of an RDF statement: a named resource, an anonymous
/// (blank) node, or a literal value. Named resources and blank nodes
/// identify graph nodes; literals never do.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Uri(String),
    Blank(String),
    Literal(String),
}

impl Term {
    pub fn uri(s: impl Into<String>) -> Self {
        Term::Uri(s.into())
    }
    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }
    pub fn literal(s: impl Into<String>) -> Self {
        Term::Literal(s.into())
    }
    /// The flat string form of the term: the URI, the blank-node label or
    /// the literal text. For URIs and blank nodes this doubles as the
    /// stable node key in the resolver's index and buffer tables.
    pub fn as_str(&self) -> &str {
        match self {
            Term::Uri(s) => s,
            Term::Blank(s) => s,
            Term::Literal(s) => s,
        }
    }
    pub fn is_uri(&self) -> bool {
        matches!(self, Term::Uri(_))
    }
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Uri(s) => write!(f, "<{}>", s),
            Term::Blank(s) => write!(f, "_:{}", s),
            Term::Literal(s) => write!(f, "\"{}\"", s),
        }
    }
}

// ------------- Triple -------------
/// A (subject, predicate, object) statement as delivered by the external
/// syntax parser.
#[derive(Clone, Debug, PartialEq, Eq)]
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
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

// ------------- Meta -------------
/// Source location of a statement, used to annotate entities and errors.
/// The syntax parser pairs exactly one of these with every statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Meta {
    pub line: usize,
}

impl Meta {
    pub fn new(line: usize) -> Self {
        Self { line }
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}", self.line)
    }
}
