//! The document graph value types: the entities a triple stream resolves
//! into, and the leaf values their properties carry.
//!
//! Nodes that can be shared by several parents (a File referenced by both
//! its Package and the Document, a licence set referenced before it is
//! disambiguated) are held through `Arc<Mutex<..>>` handles, so every
//! parent observes later property writes and the one-time licence-set
//! promotion. Handles live for the parse session; whatever is reachable
//! from the root Document survives it.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ParseError, Result};
use crate::term::{Meta, Term};
use crate::vocab::LICENCE_LIST_NS;

// ------------- Leaf values -------------
/// A string property value together with the location it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueStr {
    pub val: String,
    pub meta: Option<Meta>,
}

impl ValueStr {
    pub fn new(val: impl Into<String>, meta: Option<Meta>) -> Self {
        Self {
            val: val.into(),
            meta,
        }
    }
}

lazy_static! {
    // "What: Name (email)" with the email part optional.
    static ref CREATOR_REGEX: Regex =
        Regex::new(r"^\s*([^:]+?)\s*:\s*([^(]*?)\s*(?:\((.*)\))?\s*$").unwrap();
}

/// A structured creator value of the form `What: Name (email)`, e.g.
/// `Person: Jane Doe (jane@example.com)` or `Tool: spdx-rdf`. The raw
/// string is kept as-is; the parts are empty when the form does not match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueCreator {
    pub val: String,
    pub what: String,
    pub name: String,
    pub email: String,
    pub meta: Option<Meta>,
}

impl ValueCreator {
    pub fn new(val: impl Into<String>, meta: Option<Meta>) -> Self {
        let val = val.into();
        let (what, name, email) = match CREATOR_REGEX.captures(&val) {
            Some(caps) => (
                caps.get(1).map_or("", |m| m.as_str()).to_owned(),
                caps.get(2).map_or("", |m| m.as_str()).to_owned(),
                caps.get(3).map_or("", |m| m.as_str()).to_owned(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        Self {
            val,
            what,
            name,
            email,
            meta,
        }
    }
}

/// A date property value. The raw string is kept; `time` is present only
/// when the value parses as RFC 3339 (the SPDX `YYYY-MM-DDThh:mm:ssZ`
/// form).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueDate {
    pub val: String,
    pub time: Option<DateTime<Utc>>,
    pub meta: Option<Meta>,
}

impl ValueDate {
    pub fn new(val: impl Into<String>, meta: Option<Meta>) -> Self {
        let val = val.into();
        let time = DateTime::parse_from_rfc3339(&val)
            .ok()
            .map(|t| t.with_timezone(&Utc));
        Self { val, time, meta }
    }
}

// ------------- Entities -------------
#[derive(Debug, Default)]
pub struct Document {
    pub spec_version: Option<ValueStr>,
    pub data_licence: Option<ValueStr>,
    pub comment: Option<ValueStr>,
    pub creation_info: Option<CreationInfoRef>,
    pub packages: Vec<PackageRef>,
    pub files: Vec<FileRef>,
    pub reviews: Vec<ReviewRef>,
    pub extracted_licences: Vec<ExtractedLicenceRef>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Default)]
pub struct CreationInfo {
    pub creators: Vec<ValueCreator>,
    pub comment: Option<ValueStr>,
    pub created: Option<ValueDate>,
    pub licence_list_version: Option<ValueStr>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Default)]
pub struct Package {
    pub name: Option<ValueStr>,
    pub version: Option<ValueStr>,
    pub file_name: Option<ValueStr>,
    pub supplier: Option<ValueCreator>,
    pub originator: Option<ValueCreator>,
    pub download_location: Option<ValueStr>,
    pub verification_code: Option<VerificationCodeRef>,
    pub checksum: Option<ChecksumRef>,
    pub home_page: Option<ValueStr>,
    pub source_info: Option<ValueStr>,
    pub licence_concluded: Option<AnyLicence>,
    pub licence_info_from_files: Vec<AnyLicence>,
    pub licence_declared: Option<AnyLicence>,
    pub licence_comments: Option<ValueStr>,
    pub copyright_text: Option<ValueStr>,
    pub summary: Option<ValueStr>,
    pub description: Option<ValueStr>,
    pub files: Vec<FileRef>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Default)]
pub struct File {
    pub name: Option<ValueStr>,
    pub comment: Option<ValueStr>,
    pub file_type: Option<ValueStr>,
    pub checksum: Option<ChecksumRef>,
    pub copyright_text: Option<ValueStr>,
    pub notice: Option<ValueStr>,
    pub licence_concluded: Option<AnyLicence>,
    pub licence_info_in_file: Vec<AnyLicence>,
    pub licence_comments: Option<ValueStr>,
    pub contributors: Vec<ValueStr>,
    pub dependencies: Vec<FileRef>,
    pub artifact_of: Vec<ArtifactOfRef>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Default)]
pub struct Checksum {
    pub algo: Option<ValueStr>,
    pub value: Option<ValueStr>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Default)]
pub struct VerificationCode {
    pub value: Option<ValueStr>,
    pub excluded_files: Vec<ValueStr>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Default)]
pub struct Review {
    pub reviewer: Option<ValueCreator>,
    pub comment: Option<ValueStr>,
    pub date: Option<ValueDate>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Default)]
pub struct ArtifactOf {
    /// Seeded from the node's own URI when the node is a named term.
    pub project_uri: Option<ValueStr>,
    pub name: Option<ValueStr>,
    pub home_page: Option<ValueStr>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Default)]
pub struct ExtractedLicence {
    pub id: Option<ValueStr>,
    pub names: Vec<ValueStr>,
    pub text: Option<ValueStr>,
    pub comment: Option<ValueStr>,
    pub cross_references: Vec<ValueStr>,
    pub meta: Option<Meta>,
}

/// A reference into the SPDX licence list, constructed directly from its
/// node term minus the licence-list namespace. Accepts no properties.
#[derive(Debug)]
pub struct Licence {
    pub id: ValueStr,
    pub meta: Option<Meta>,
}

impl Licence {
    /// Build a licence reference from the node term that denotes it.
    pub fn from_term(term: &Term, meta: Option<Meta>) -> Self {
        let id = term
            .as_str()
            .strip_prefix(LICENCE_LIST_NS)
            .unwrap_or(term.as_str());
        Self {
            id: ValueStr::new(id, meta),
            meta,
        }
    }
}

/// The connective of a disambiguated licence set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connective {
    Conjunctive,
    Disjunctive,
}

/// A licence set. All three set kinds share this payload: an abstract set
/// has no connective yet; promotion fills it in exactly once, in place,
/// so parents holding the set before promotion observe it.
#[derive(Debug, Default)]
pub struct LicenceSet {
    pub connective: Option<Connective>,
    pub members: Vec<AnyLicence>,
    pub meta: Option<Meta>,
}

// ------------- Handles -------------
pub type DocumentRef = Arc<Mutex<Document>>;
pub type CreationInfoRef = Arc<Mutex<CreationInfo>>;
pub type PackageRef = Arc<Mutex<Package>>;
pub type FileRef = Arc<Mutex<File>>;
pub type ChecksumRef = Arc<Mutex<Checksum>>;
pub type VerificationCodeRef = Arc<Mutex<VerificationCode>>;
pub type ReviewRef = Arc<Mutex<Review>>;
pub type ArtifactOfRef = Arc<Mutex<ArtifactOf>>;
pub type ExtractedLicenceRef = Arc<Mutex<ExtractedLicence>>;
pub type LicenceRef = Arc<Mutex<Licence>>;
pub type LicenceSetRef = Arc<Mutex<LicenceSet>>;

/// A licence-bearing value: whatever a property requiring the AnyLicence
/// capability may hold.
#[derive(Clone, Debug)]
pub enum AnyLicence {
    Licence(LicenceRef),
    Extracted(ExtractedLicenceRef),
    Set(LicenceSetRef),
}

/// Handle to a materialized node, tagged with its payload shape. The
/// resolver keeps one of these per resolved node key; clones share the
/// payload. Abstract, conjunctive and disjunctive sets all use `Set`.
#[derive(Clone, Debug)]
pub enum Node {
    Document(DocumentRef),
    CreationInfo(CreationInfoRef),
    Package(PackageRef),
    File(FileRef),
    Checksum(ChecksumRef),
    VerificationCode(VerificationCodeRef),
    Review(ReviewRef),
    ArtifactOf(ArtifactOfRef),
    ExtractedLicence(ExtractedLicenceRef),
    Licence(LicenceRef),
    Set(LicenceSetRef),
}

/// Lock a payload, mapping poisoning to a parse error. Resolution is
/// single-threaded, so contention cannot occur; poisoning can only follow
/// a panic in a previous dispatch.
pub(crate) fn guard<T>(handle: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    handle
        .lock()
        .map_err(|e| ParseError::Lock(e.to_string()))
}
