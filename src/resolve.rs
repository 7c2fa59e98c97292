//! The resolution engine: an online, single-pass linker that turns an
//! untyped, order-independent triple stream into the typed document graph.
//!
//! The engine owns two tables scoped to one parse: an index from node key
//! to the node's builder (kind + payload handle), and a buffer from node
//! key to the ordered statements seen before the node's kind was known.
//! A node is born the first time it is mentioned; it becomes resolved
//! when a type is established for it, either by an explicit type
//! assertion or implicitly because another node's property requires it to
//! be of some kind. Buffered statements are replayed FIFO exactly once at
//! resolution and never interleave with newly-arriving ones.

use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::sync::{Arc, Mutex};

use seahash::SeaHasher;
use tracing::{debug, trace};

use crate::error::{ParseError, Result};
use crate::model::{
    AnyLicence, ArtifactOf, Checksum, ChecksumRef, Connective, CreationInfo, CreationInfoRef,
    Document, DocumentRef, ExtractedLicence, ExtractedLicenceRef, File, FileRef, Licence,
    LicenceSet, Node, Package, PackageRef, Review, ReviewRef, ValueStr, VerificationCode,
    VerificationCodeRef, guard,
};
use crate::source::TripleSource;
use crate::term::{Meta, Term, Triple};
use crate::vocab::{self, Kind, TypeNeed};

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

/// The in-progress representation of one resolved node: its fixed kind
/// and the handle to its payload. Cloning shares the payload.
#[derive(Clone)]
pub(crate) struct Builder {
    pub kind: Kind,
    pub node: Node,
}

/// A statement held for a node whose kind is not yet known.
struct Pending {
    predicate: Term,
    object: Term,
    meta: Option<Meta>,
}

/// One parse session. Constructed fresh per parse and discarded at the
/// end; no state is shared across parses.
pub struct Resolver {
    index: HashMap<String, Builder, KeyHasher>,
    buffer: HashMap<String, Vec<Pending>, KeyHasher>,
    doc: Option<DocumentRef>,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            index: HashMap::default(),
            buffer: HashMap::default(),
            doc: None,
        }
    }

    /// The root Document seen so far, if any.
    pub fn document(&self) -> Option<DocumentRef> {
        self.doc.as_ref().map(Arc::clone)
    }

    pub fn into_document(self) -> Option<DocumentRef> {
        self.doc
    }

    /// Process one statement. Type assertions resolve the subject's kind;
    /// other statements dispatch to the subject's builder when it exists
    /// and are buffered in arrival order otherwise. Buffering never
    /// errors.
    pub fn process(&mut self, statement: Triple, meta: Option<Meta>) -> Result<()> {
        if statement.predicate.as_str() == vocab::RDF_TYPE {
            return self
                .resolve_type(&statement.subject, &statement.object, meta)
                .map(|_| ());
        }
        if let Some(builder) = self.index.get(statement.subject.as_str()).cloned() {
            return self.apply(&builder, &statement.predicate, &statement.object, meta);
        }
        trace!(subject = %statement.subject, "buffering statement for untyped node");
        self.buffer
            .entry(statement.subject.as_str().to_owned())
            .or_default()
            .push(Pending {
                predicate: statement.predicate,
                object: statement.object,
                meta,
            });
        Ok(())
    }

    /// Establish the type of `node` from an explicit type assertion.
    ///
    /// For an already-resolved node the only sanctioned kind change is
    /// the one-time promotion of an abstract licence set to a conjunctive
    /// or disjunctive one; everything else must pass the compatibility
    /// rule. For a fresh node the registry decides the kind, the builder
    /// is registered, and the node's buffer (if any) is replayed FIFO and
    /// deleted.
    pub(crate) fn resolve_type(
        &mut self,
        node: &Term,
        type_term: &Term,
        meta: Option<Meta>,
    ) -> Result<Node> {
        let need = vocab::type_need(type_term)
            .ok_or_else(|| ParseError::unknown_type(type_term, meta))?;
        if let Some(found) = self.index.get(node.as_str()).cloned() {
            if found.kind.promotable() {
                if let TypeNeed::Exact(
                    to @ (Kind::ConjunctiveLicenceSet | Kind::DisjunctiveLicenceSet),
                ) = need
                {
                    return self.promote(node, &found, to, meta);
                }
            }
            if vocab::compatible(found.kind, need) {
                return Ok(found.node);
            }
            return Err(ParseError::incompatible_type(node, found.kind, need, meta));
        }
        self.materialize(node, need, meta)
    }

    /// Request that `node` satisfies `need`, materializing it (with no
    /// source location) when it has not been resolved yet. Used by
    /// reference-valued properties; enables forward references where the
    /// referencing statement arrives before the referenced node's own
    /// type assertion. No promotion happens on this path.
    fn require(&mut self, node: &Term, need: TypeNeed) -> Result<Node> {
        if let Some(found) = self.index.get(node.as_str()) {
            if vocab::compatible(found.kind, need) {
                return Ok(found.node.clone());
            }
            return Err(ParseError::incompatible_type(node, found.kind, need, None));
        }
        self.materialize(node, need, None)
    }

    /// Construct a fresh builder for `node`, register it, and replay the
    /// node's buffered statements in original order, stopping at the
    /// first failure. The buffer entry is deleted regardless.
    fn materialize(&mut self, node: &Term, need: TypeNeed, meta: Option<Meta>) -> Result<Node> {
        let kind = match need {
            TypeNeed::Exact(kind) => kind,
            // The generic AnyLicence capability is disambiguated by the
            // term's shape: named terms point into the licence list,
            // anonymous ones are extracted licences or licence sets.
            TypeNeed::AnyLicence => match node {
                Term::Blank(label) if label.to_lowercase().starts_with("licenseref") => {
                    Kind::ExtractedLicence
                }
                Term::Blank(_) => Kind::AbstractLicenceSet,
                _ => Kind::Licence,
            },
        };
        debug!(node = %node, kind = %kind, "materializing node");
        let handle = self.construct(kind, node, meta);
        let builder = Builder {
            kind,
            node: handle.clone(),
        };
        self.index.insert(node.as_str().to_owned(), builder.clone());
        if let Some(pending) = self.buffer.remove(node.as_str()) {
            trace!(node = %node, statements = pending.len(), "replaying buffered statements");
            for statement in pending {
                self.apply(&builder, &statement.predicate, &statement.object, statement.meta)?;
            }
        }
        Ok(handle)
    }

    /// One-time licence-set promotion: fill in the connective and rewrite
    /// the indexed kind, preserving the payload handle so parents that
    /// already stored the set observe the promotion.
    fn promote(&mut self, node: &Term, found: &Builder, to: Kind, meta: Option<Meta>) -> Result<Node> {
        let Node::Set(set) = &found.node else {
            return Err(ParseError::Invariant(format!(
                "promotable node {node} does not carry a licence set"
            )));
        };
        {
            let mut payload = guard(set)?;
            payload.connective = Some(match to {
                Kind::ConjunctiveLicenceSet => Connective::Conjunctive,
                _ => Connective::Disjunctive,
            });
            if payload.meta.is_none() {
                payload.meta = meta;
            }
        }
        if let Some(entry) = self.index.get_mut(node.as_str()) {
            entry.kind = to;
        }
        debug!(node = %node, kind = %to, "promoted licence set");
        Ok(found.node.clone())
    }

    /// Build the payload for a fresh node of the given kind.
    fn construct(&mut self, kind: Kind, node: &Term, meta: Option<Meta>) -> Node {
        match kind {
            Kind::Document => {
                let doc: DocumentRef = Arc::new(Mutex::new(Document {
                    meta,
                    ..Default::default()
                }));
                // The first (and only) document node is the parse's root.
                self.doc = Some(Arc::clone(&doc));
                Node::Document(doc)
            }
            Kind::CreationInfo => Node::CreationInfo(Arc::new(Mutex::new(CreationInfo {
                meta,
                ..Default::default()
            }))),
            Kind::Package => Node::Package(Arc::new(Mutex::new(Package {
                meta,
                ..Default::default()
            }))),
            Kind::File => Node::File(Arc::new(Mutex::new(File {
                meta,
                ..Default::default()
            }))),
            Kind::Checksum => Node::Checksum(Arc::new(Mutex::new(Checksum {
                meta,
                ..Default::default()
            }))),
            Kind::VerificationCode => {
                Node::VerificationCode(Arc::new(Mutex::new(VerificationCode {
                    meta,
                    ..Default::default()
                })))
            }
            Kind::Review => Node::Review(Arc::new(Mutex::new(Review {
                meta,
                ..Default::default()
            }))),
            Kind::ArtifactOf => {
                let mut artifact = ArtifactOf {
                    meta,
                    ..Default::default()
                };
                if let Term::Uri(uri) = node {
                    artifact.project_uri = Some(ValueStr::new(uri.clone(), meta));
                }
                Node::ArtifactOf(Arc::new(Mutex::new(artifact)))
            }
            Kind::ExtractedLicence => {
                Node::ExtractedLicence(Arc::new(Mutex::new(ExtractedLicence {
                    meta,
                    ..Default::default()
                })))
            }
            Kind::Licence => Node::Licence(Arc::new(Mutex::new(Licence::from_term(node, meta)))),
            Kind::AbstractLicenceSet => Node::Set(Arc::new(Mutex::new(LicenceSet {
                meta,
                ..Default::default()
            }))),
            Kind::ConjunctiveLicenceSet => Node::Set(Arc::new(Mutex::new(LicenceSet {
                connective: Some(Connective::Conjunctive),
                meta,
                ..Default::default()
            }))),
            Kind::DisjunctiveLicenceSet => Node::Set(Arc::new(Mutex::new(LicenceSet {
                connective: Some(Connective::Disjunctive),
                meta,
                ..Default::default()
            }))),
        }
    }

    // Typed requirement wrappers used by the reference-valued property
    // rules. The payload-shape mismatches are unreachable by construction
    // since the index pairs each kind with its matching handle.

    pub(crate) fn require_creation_info(&mut self, node: &Term) -> Result<CreationInfoRef> {
        match self.require(node, TypeNeed::Exact(Kind::CreationInfo))? {
            Node::CreationInfo(handle) => Ok(handle),
            _ => Err(payload_mismatch(node, Kind::CreationInfo)),
        }
    }

    pub(crate) fn require_package(&mut self, node: &Term) -> Result<PackageRef> {
        match self.require(node, TypeNeed::Exact(Kind::Package))? {
            Node::Package(handle) => Ok(handle),
            _ => Err(payload_mismatch(node, Kind::Package)),
        }
    }

    pub(crate) fn require_file(&mut self, node: &Term) -> Result<FileRef> {
        match self.require(node, TypeNeed::Exact(Kind::File))? {
            Node::File(handle) => Ok(handle),
            _ => Err(payload_mismatch(node, Kind::File)),
        }
    }

    pub(crate) fn require_checksum(&mut self, node: &Term) -> Result<ChecksumRef> {
        match self.require(node, TypeNeed::Exact(Kind::Checksum))? {
            Node::Checksum(handle) => Ok(handle),
            _ => Err(payload_mismatch(node, Kind::Checksum)),
        }
    }

    pub(crate) fn require_verification_code(&mut self, node: &Term) -> Result<VerificationCodeRef> {
        match self.require(node, TypeNeed::Exact(Kind::VerificationCode))? {
            Node::VerificationCode(handle) => Ok(handle),
            _ => Err(payload_mismatch(node, Kind::VerificationCode)),
        }
    }

    pub(crate) fn require_review(&mut self, node: &Term) -> Result<ReviewRef> {
        match self.require(node, TypeNeed::Exact(Kind::Review))? {
            Node::Review(handle) => Ok(handle),
            _ => Err(payload_mismatch(node, Kind::Review)),
        }
    }

    pub(crate) fn require_artifact_of(&mut self, node: &Term) -> Result<crate::model::ArtifactOfRef> {
        match self.require(node, TypeNeed::Exact(Kind::ArtifactOf))? {
            Node::ArtifactOf(handle) => Ok(handle),
            _ => Err(payload_mismatch(node, Kind::ArtifactOf)),
        }
    }

    pub(crate) fn require_extracted(&mut self, node: &Term) -> Result<ExtractedLicenceRef> {
        match self.require(node, TypeNeed::Exact(Kind::ExtractedLicence))? {
            Node::ExtractedLicence(handle) => Ok(handle),
            _ => Err(payload_mismatch(node, Kind::ExtractedLicence)),
        }
    }

    /// Resolve a node against the generic AnyLicence capability. A fresh
    /// anonymous node may come back as a not-yet-disambiguated licence
    /// set, which later promotes in place.
    pub(crate) fn require_any_licence(&mut self, node: &Term) -> Result<AnyLicence> {
        match self.require(node, TypeNeed::AnyLicence)? {
            Node::Licence(handle) => Ok(AnyLicence::Licence(handle)),
            Node::ExtractedLicence(handle) => Ok(AnyLicence::Extracted(handle)),
            Node::Set(handle) => Ok(AnyLicence::Set(handle)),
            _ => Err(ParseError::Invariant(format!(
                "node {node} satisfied the licence capability with a non-licence payload"
            ))),
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

fn payload_mismatch(node: &Term, kind: Kind) -> ParseError {
    ParseError::Invariant(format!(
        "node {node} indexed as {kind} carries a different payload"
    ))
}

/// Parse a complete statement stream into its root Document.
///
/// A single blocking call owning one resolver lifetime. On the first
/// processing error the engine stops resolving but keeps consuming the
/// source to exhaustion, so a channel-backed producer (and its paired
/// location stream) is always drained before its resources are released.
/// `Ok(None)` means the stream ended without ever declaring a document.
pub fn parse<S: TripleSource>(mut source: S) -> Result<Option<DocumentRef>> {
    let mut resolver = Resolver::new();
    let mut first_error = None;
    while let Some((statement, meta)) = source.next_statement() {
        if first_error.is_some() {
            // Keep draining so a blocked producer can finish.
            continue;
        }
        if let Err(e) = resolver.process(statement, Some(meta)) {
            first_error = Some(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(resolver.into_document()),
    }
}
