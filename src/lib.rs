//! Spdx-rdf – resolution of SPDX RDF statement streams into typed documents.
//!
//! The crate sits between an RDF syntax parser and code that wants a
//! strongly-typed SPDX document. Its input is a stream of statements
//! (subject–predicate–object [`term::Triple`]s, each paired with a
//! [`term::Meta`] source location); its output is the root
//! [`model::Document`] with everything reachable from it: packages,
//! files, checksums, reviews, licences and licence sets.
//!
//! Statements may arrive in any order. A node can be referenced long
//! before its type assertion shows up, so the resolver buffers statements
//! about untyped nodes and replays them, in arrival order, the moment the
//! node's kind becomes known, whether through an explicit `ns:type`
//! statement or implicitly because another node's property requires the
//! kind. Every node resolves to exactly one kind; the only sanctioned
//! change afterwards is the one-time promotion of a licence set whose
//! connective was not yet known.
//!
//! ## Modules
//! * [`term`] – RDF terms, statements and source locations.
//! * [`vocab`] – The recognized namespaces, type registry and the
//!   kind-compatibility rule.
//! * [`model`] – The document graph value types and their shared handles.
//! * [`resolve`] – The resolution engine and the [`parse`] entry point.
//! * [`source`] – The [`source::TripleSource`] input contract and a
//!   bounded channel pair for producers on a background thread.
//! * [`error`] – The terminal [`ParseError`] variants.
//!
//! ## Quick Start
//! ```
//! use spdx_rdf::term::{Meta, Term, Triple};
//! use spdx_rdf::vocab::{RDF_TYPE, spdx};
//!
//! let doc = Term::uri("http://example.org/doc");
//! let statements = vec![
//!     // Properties may precede the type assertion.
//!     (
//!         Triple::new(doc.clone(), Term::uri(spdx("specVersion")), Term::literal("SPDX-1.2")),
//!         Meta::new(1),
//!     ),
//!     (
//!         Triple::new(doc.clone(), Term::uri(RDF_TYPE), Term::uri(spdx("SpdxDocument"))),
//!         Meta::new(2),
//!     ),
//! ];
//! let resolved = spdx_rdf::parse(statements.into_iter()).unwrap().unwrap();
//! let resolved = resolved.lock().unwrap();
//! assert_eq!(resolved.spec_version.as_ref().unwrap().val, "SPDX-1.2");
//! ```

mod builder;
pub mod error;
pub mod model;
pub mod resolve;
pub mod source;
pub mod term;
pub mod vocab;

pub use error::{ParseError, Result};
pub use model::{AnyLicence, Connective, Document, DocumentRef};
pub use resolve::{Resolver, parse};
pub use source::{StreamProducer, StreamSource, TripleSource, stream};
pub use term::{Meta, Term, Triple};
