//! The fixed vocabulary recognized by the resolver: namespaces, type
//! identifiers and the entity kinds they produce, plus the compatibility
//! rule between an established kind and a requested one. Pure data, no
//! state; the per-kind property tables live with the builders.

use std::fmt;

use crate::term::Term;

// ------------- Namespaces -------------
pub const SPDX_NS: &str = "http://spdx.org/rdf/terms#";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const DOAP_NS: &str = "http://usefulinc.com/ns/doap#";
/// Namespace of the SPDX licence list; stripped from licence references
/// and from the document's dataLicense value.
pub const LICENCE_LIST_NS: &str = "http://spdx.org/licenses/";

/// The type-assertion predicate.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// Literal prefix carried by checksum algorithm values.
pub const CHECKSUM_ALGORITHM_PREFIX: &str = "http://spdx.org/rdf/terms#checksumAlgorithm_";

/// Expand a local name in the SPDX terms namespace.
pub fn spdx(local: &str) -> String {
    format!("{SPDX_NS}{local}")
}

/// Expand a local name in the DOAP namespace.
pub fn doap(local: &str) -> String {
    format!("{DOAP_NS}{local}")
}

/// Shorten a predicate URI to the property name used in the per-kind
/// tables: SPDX terms lose their namespace entirely, well-known foreign
/// namespaces keep a short prefix, anything else stays as-is.
pub fn short_name(uri: &str) -> String {
    if let Some(name) = uri.strip_prefix(SPDX_NS) {
        return name.to_owned();
    }
    if let Some(name) = uri.strip_prefix(RDFS_NS) {
        return format!("rdfs:{name}");
    }
    if let Some(name) = uri.strip_prefix(DOAP_NS) {
        return format!("doap:{name}");
    }
    if let Some(name) = uri.strip_prefix(RDF_NS) {
        return format!("ns:{name}");
    }
    uri.to_owned()
}

// ------------- Kind -------------
/// The closed set of entity kinds a node can resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Document,
    CreationInfo,
    Package,
    File,
    Checksum,
    VerificationCode,
    Review,
    ArtifactOf,
    ExtractedLicence,
    /// A licence from the SPDX licence list, referenced by URI.
    Licence,
    /// A licence set whose connective is not yet known.
    AbstractLicenceSet,
    ConjunctiveLicenceSet,
    DisjunctiveLicenceSet,
}

impl Kind {
    /// Whether a node of this kind may still change kind through the
    /// one-time licence-set promotion. Only the abstract set qualifies;
    /// once promoted (or directly typed) a set is final.
    pub fn promotable(self) -> bool {
        matches!(self, Kind::AbstractLicenceSet)
    }

    /// Whether this kind satisfies the generic AnyLicence capability.
    pub fn satisfies_any_licence(self) -> bool {
        matches!(
            self,
            Kind::Licence
                | Kind::ExtractedLicence
                | Kind::ConjunctiveLicenceSet
                | Kind::DisjunctiveLicenceSet
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Document => "SpdxDocument",
            Kind::CreationInfo => "CreationInfo",
            Kind::Package => "Package",
            Kind::File => "File",
            Kind::Checksum => "Checksum",
            Kind::VerificationCode => "PackageVerificationCode",
            Kind::Review => "Review",
            Kind::ArtifactOf => "doap:Project",
            Kind::ExtractedLicence => "ExtractedLicensingInfo",
            Kind::Licence => "License",
            Kind::AbstractLicenceSet => "AbstractLicenseSet",
            Kind::ConjunctiveLicenceSet => "ConjunctiveLicenseSet",
            Kind::DisjunctiveLicenceSet => "DisjunctiveLicenseSet",
        };
        write!(f, "{}", name)
    }
}

// ------------- TypeNeed -------------
/// What a type assertion or a reference-valued property asks of a node:
/// either one exact kind, or the AnyLicence capability which several
/// kinds satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeNeed {
    Exact(Kind),
    AnyLicence,
}

impl fmt::Display for TypeNeed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeNeed::Exact(kind) => write!(f, "{}", kind),
            TypeNeed::AnyLicence => write!(f, "AnyLicenseInfo"),
        }
    }
}

/// Look a type identifier up in the registry. `None` means the term is
/// outside the closed set and the assertion is an Unknown-Type error.
pub fn type_need(term: &Term) -> Option<TypeNeed> {
    let uri = term.as_str();
    if let Some(name) = uri.strip_prefix(SPDX_NS) {
        let need = match name {
            "SpdxDocument" => TypeNeed::Exact(Kind::Document),
            "CreationInfo" => TypeNeed::Exact(Kind::CreationInfo),
            "Package" => TypeNeed::Exact(Kind::Package),
            "File" => TypeNeed::Exact(Kind::File),
            "Checksum" => TypeNeed::Exact(Kind::Checksum),
            "PackageVerificationCode" => TypeNeed::Exact(Kind::VerificationCode),
            "Review" => TypeNeed::Exact(Kind::Review),
            "ExtractedLicensingInfo" => TypeNeed::Exact(Kind::ExtractedLicence),
            "License" => TypeNeed::Exact(Kind::Licence),
            "ConjunctiveLicenseSet" => TypeNeed::Exact(Kind::ConjunctiveLicenceSet),
            "DisjunctiveLicenseSet" => TypeNeed::Exact(Kind::DisjunctiveLicenceSet),
            "AnyLicenseInfo" => TypeNeed::AnyLicence,
            _ => return None,
        };
        return Some(need);
    }
    if uri == doap("Project") {
        return Some(TypeNeed::Exact(Kind::ArtifactOf));
    }
    None
}

/// The compatibility rule: an established kind satisfies a need when the
/// kinds are equal, or when the need is the AnyLicence capability and the
/// kind is one of the licence-bearing kinds.
pub fn compatible(found: Kind, need: TypeNeed) -> bool {
    match need {
        TypeNeed::Exact(kind) => found == kind,
        TypeNeed::AnyLicence => found.satisfies_any_licence(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names() {
        assert_eq!(short_name(&spdx("specVersion")), "specVersion");
        assert_eq!(
            short_name("http://www.w3.org/2000/01/rdf-schema#comment"),
            "rdfs:comment"
        );
        assert_eq!(short_name(&doap("homepage")), "doap:homepage");
        assert_eq!(short_name(RDF_TYPE), "ns:type");
        assert_eq!(short_name("http://example.org/x"), "http://example.org/x");
    }

    #[test]
    fn registry_lookup() {
        assert_eq!(
            type_need(&Term::uri(spdx("Package"))),
            Some(TypeNeed::Exact(Kind::Package))
        );
        assert_eq!(
            type_need(&Term::uri(spdx("AnyLicenseInfo"))),
            Some(TypeNeed::AnyLicence)
        );
        assert_eq!(
            type_need(&Term::uri(doap("Project"))),
            Some(TypeNeed::Exact(Kind::ArtifactOf))
        );
        assert_eq!(type_need(&Term::uri(spdx("Banana"))), None);
    }

    #[test]
    fn compatibility() {
        assert!(compatible(Kind::Package, TypeNeed::Exact(Kind::Package)));
        assert!(!compatible(Kind::Package, TypeNeed::Exact(Kind::File)));
        assert!(compatible(Kind::Licence, TypeNeed::AnyLicence));
        assert!(compatible(Kind::DisjunctiveLicenceSet, TypeNeed::AnyLicence));
        assert!(!compatible(Kind::AbstractLicenceSet, TypeNeed::AnyLicence));
        assert!(!compatible(Kind::Package, TypeNeed::AnyLicence));
    }

    #[test]
    fn promotability() {
        assert!(Kind::AbstractLicenceSet.promotable());
        assert!(!Kind::ConjunctiveLicenceSet.promotable());
        assert!(!Kind::DisjunctiveLicenceSet.promotable());
        assert!(!Kind::Package.promotable());
    }
}
