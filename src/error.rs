use thiserror::Error;

use crate::term::{Meta, Term};
use crate::vocab::Kind;

/// The terminal errors a parse can end with. Each carries the offending
/// node/property identifiers and, where available, the source location of
/// the statement that triggered it.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Found type {term} which is unknown{}.", loc(.meta))]
    UnknownType { term: String, meta: Option<Meta> },
    #[error("{node} is already set to be type {found} and cannot be changed to type {requested}{}.", loc(.meta))]
    IncompatibleType {
        node: String,
        found: String,
        requested: String,
        meta: Option<Meta>,
    },
    #[error("Property {property} is not supported for {kind}{}.", loc(.meta))]
    PropertyNotSupported {
        property: String,
        kind: String,
        meta: Option<Meta>,
    },
    #[error("Property already defined{}.", loc(.meta))]
    AlreadyDefined { meta: Option<Meta> },
    #[error("Lock poisoned: {0}")]
    Lock(String),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

fn loc(meta: &Option<Meta>) -> String {
    match meta {
        Some(m) => format!(" at {m}"),
        None => String::new(),
    }
}

impl ParseError {
    pub fn unknown_type(term: &Term, meta: Option<Meta>) -> Self {
        Self::UnknownType {
            term: term.to_string(),
            meta,
        }
    }
    pub fn incompatible_type(
        node: &Term,
        found: Kind,
        requested: impl ToString,
        meta: Option<Meta>,
    ) -> Self {
        Self::IncompatibleType {
            node: node.to_string(),
            found: found.to_string(),
            requested: requested.to_string(),
            meta,
        }
    }
    pub fn property_not_supported(property: &str, kind: Kind, meta: Option<Meta>) -> Self {
        Self::PropertyNotSupported {
            property: property.to_owned(),
            kind: kind.to_string(),
            meta,
        }
    }
    pub fn already_defined(meta: Option<Meta>) -> Self {
        Self::AlreadyDefined { meta }
    }
}
