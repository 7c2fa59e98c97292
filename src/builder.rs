//! Per-kind property rules: given a resolved node, its builder dispatches
//! each incoming statement on the shortened predicate name and applies
//! the matching update rule. An unmatched name is a terminal
//! Property-Not-Supported error.
//!
//! Three update rule families exist. Literal-valued single properties
//! reject a second write with Already-Defined; list-valued properties
//! append in application order; reference-valued properties resolve the
//! object node against the kind they require before storing the handle.
//! References are resolved before the subject's payload is locked, so a
//! node referencing itself never deadlocks.

use tracing::trace;

use crate::error::{ParseError, Result};
use crate::model::{
    ArtifactOfRef, ChecksumRef, CreationInfoRef, DocumentRef, ExtractedLicenceRef, FileRef,
    LicenceSetRef, Node, PackageRef, ReviewRef, ValueCreator, ValueDate, ValueStr,
    VerificationCodeRef, guard,
};
use crate::resolve::{Builder, Resolver};
use crate::term::{Meta, Term};
use crate::vocab::{self, CHECKSUM_ALGORITHM_PREFIX, Kind, LICENCE_LIST_NS, SPDX_NS};

// ------------- Update rules -------------

/// Set a single-valued string slot, rejecting a second write.
fn set_str(slot: &mut Option<ValueStr>, object: &Term, meta: Option<Meta>) -> Result<()> {
    if slot.is_some() {
        return Err(ParseError::already_defined(meta));
    }
    *slot = Some(ValueStr::new(object.as_str(), meta));
    Ok(())
}

/// Like `set_str`, with a namespace prefix cut off the value first.
fn set_str_cut(
    slot: &mut Option<ValueStr>,
    object: &Term,
    prefix: &str,
    meta: Option<Meta>,
) -> Result<()> {
    if slot.is_some() {
        return Err(ParseError::already_defined(meta));
    }
    let val = object.as_str().strip_prefix(prefix).unwrap_or(object.as_str());
    *slot = Some(ValueStr::new(val, meta));
    Ok(())
}

fn push_str(list: &mut Vec<ValueStr>, object: &Term, meta: Option<Meta>) {
    list.push(ValueStr::new(object.as_str(), meta));
}

fn set_creator(slot: &mut Option<ValueCreator>, object: &Term, meta: Option<Meta>) -> Result<()> {
    if slot.is_some() {
        return Err(ParseError::already_defined(meta));
    }
    *slot = Some(ValueCreator::new(object.as_str(), meta));
    Ok(())
}

fn push_creator(list: &mut Vec<ValueCreator>, object: &Term, meta: Option<Meta>) {
    list.push(ValueCreator::new(object.as_str(), meta));
}

fn set_date(slot: &mut Option<ValueDate>, object: &Term, meta: Option<Meta>) -> Result<()> {
    if slot.is_some() {
        return Err(ParseError::already_defined(meta));
    }
    *slot = Some(ValueDate::new(object.as_str(), meta));
    Ok(())
}

// ------------- Dispatch -------------

impl Resolver {
    /// Apply one non-type statement to a resolved node.
    pub(crate) fn apply(
        &mut self,
        builder: &Builder,
        predicate: &Term,
        object: &Term,
        meta: Option<Meta>,
    ) -> Result<()> {
        let property = vocab::short_name(predicate.as_str());
        trace!(kind = %builder.kind, property = %property, "applying property");
        match &builder.node {
            Node::Document(doc) => self.apply_document(doc, &property, object, meta),
            Node::CreationInfo(info) => apply_creation_info(info, &property, object, meta),
            Node::Package(pkg) => self.apply_package(pkg, &property, object, meta),
            Node::File(file) => self.apply_file(file, &property, object, meta),
            Node::Checksum(checksum) => apply_checksum(checksum, &property, object, meta),
            Node::VerificationCode(code) => apply_verification_code(code, &property, object, meta),
            Node::Review(review) => apply_review(review, &property, object, meta),
            Node::ArtifactOf(artifact) => apply_artifact_of(artifact, &property, object, meta),
            Node::ExtractedLicence(lic) => apply_extracted(lic, &property, object, meta),
            // Licence-list references carry all their data in the node
            // term itself and accept no properties at all.
            Node::Licence(_) => {
                Err(ParseError::property_not_supported(&property, Kind::Licence, meta))
            }
            Node::Set(set) => self.apply_set(set, builder.kind, &property, object, meta),
        }
    }

    fn apply_document(
        &mut self,
        doc: &DocumentRef,
        property: &str,
        object: &Term,
        meta: Option<Meta>,
    ) -> Result<()> {
        match property {
            "specVersion" => set_str(&mut guard(doc)?.spec_version, object, meta),
            "dataLicense" => {
                set_str_cut(&mut guard(doc)?.data_licence, object, LICENCE_LIST_NS, meta)
            }
            "rdfs:comment" => set_str(&mut guard(doc)?.comment, object, meta),
            "creationInfo" => {
                let info = self.require_creation_info(object)?;
                guard(doc)?.creation_info = Some(info);
                Ok(())
            }
            "describesPackage" => {
                let pkg = self.require_package(object)?;
                guard(doc)?.packages.push(pkg);
                Ok(())
            }
            "referencesFile" => {
                let file = self.require_file(object)?;
                guard(doc)?.files.push(file);
                Ok(())
            }
            "reviewed" => {
                let review = self.require_review(object)?;
                guard(doc)?.reviews.push(review);
                Ok(())
            }
            "hasExtractedLicensingInfo" => {
                let lic = self.require_extracted(object)?;
                guard(doc)?.extracted_licences.push(lic);
                Ok(())
            }
            _ => Err(ParseError::property_not_supported(property, Kind::Document, meta)),
        }
    }

    fn apply_package(
        &mut self,
        pkg: &PackageRef,
        property: &str,
        object: &Term,
        meta: Option<Meta>,
    ) -> Result<()> {
        match property {
            "name" => set_str(&mut guard(pkg)?.name, object, meta),
            "versionInfo" => set_str(&mut guard(pkg)?.version, object, meta),
            "packageFileName" => set_str(&mut guard(pkg)?.file_name, object, meta),
            "supplier" => set_creator(&mut guard(pkg)?.supplier, object, meta),
            "originator" => set_creator(&mut guard(pkg)?.originator, object, meta),
            "downloadLocation" => set_str(&mut guard(pkg)?.download_location, object, meta),
            "packageVerificationCode" => {
                let code = self.require_verification_code(object)?;
                guard(pkg)?.verification_code = Some(code);
                Ok(())
            }
            "checksum" => {
                let checksum = self.require_checksum(object)?;
                guard(pkg)?.checksum = Some(checksum);
                Ok(())
            }
            "doap:homepage" => set_str(&mut guard(pkg)?.home_page, object, meta),
            "sourceInfo" => set_str(&mut guard(pkg)?.source_info, object, meta),
            "licenseConcluded" => {
                let lic = self.require_any_licence(object)?;
                guard(pkg)?.licence_concluded = Some(lic);
                Ok(())
            }
            "licenseInfoFromFiles" => {
                let lic = self.require_any_licence(object)?;
                guard(pkg)?.licence_info_from_files.push(lic);
                Ok(())
            }
            "licenseDeclared" => {
                let lic = self.require_any_licence(object)?;
                guard(pkg)?.licence_declared = Some(lic);
                Ok(())
            }
            "licenseComments" => set_str(&mut guard(pkg)?.licence_comments, object, meta),
            "copyrightText" => set_str(&mut guard(pkg)?.copyright_text, object, meta),
            "summary" => set_str(&mut guard(pkg)?.summary, object, meta),
            "description" => set_str(&mut guard(pkg)?.description, object, meta),
            "hasFile" => {
                let file = self.require_file(object)?;
                guard(pkg)?.files.push(file);
                Ok(())
            }
            _ => Err(ParseError::property_not_supported(property, Kind::Package, meta)),
        }
    }

    fn apply_file(
        &mut self,
        file: &FileRef,
        property: &str,
        object: &Term,
        meta: Option<Meta>,
    ) -> Result<()> {
        match property {
            "fileName" => set_str(&mut guard(file)?.name, object, meta),
            "rdfs:comment" => set_str(&mut guard(file)?.comment, object, meta),
            "fileType" => set_str_cut(&mut guard(file)?.file_type, object, SPDX_NS, meta),
            "checksum" => {
                let checksum = self.require_checksum(object)?;
                guard(file)?.checksum = Some(checksum);
                Ok(())
            }
            "copyrightText" => set_str(&mut guard(file)?.copyright_text, object, meta),
            "noticeText" => set_str(&mut guard(file)?.notice, object, meta),
            "licenseConcluded" => {
                let lic = self.require_any_licence(object)?;
                guard(file)?.licence_concluded = Some(lic);
                Ok(())
            }
            "licenseInfoInFile" => {
                let lic = self.require_any_licence(object)?;
                guard(file)?.licence_info_in_file.push(lic);
                Ok(())
            }
            "licenseComments" => set_str(&mut guard(file)?.licence_comments, object, meta),
            "fileContributor" => {
                push_str(&mut guard(file)?.contributors, object, meta);
                Ok(())
            }
            "fileDependency" => {
                // Resolve the dependency first so a file depending on
                // itself takes no nested lock.
                let dep = self.require_file(object)?;
                guard(file)?.dependencies.push(dep);
                Ok(())
            }
            "artifactOf" => {
                let artifact = self.require_artifact_of(object)?;
                guard(file)?.artifact_of.push(artifact);
                Ok(())
            }
            _ => Err(ParseError::property_not_supported(property, Kind::File, meta)),
        }
    }

    fn apply_set(
        &mut self,
        set: &LicenceSetRef,
        kind: Kind,
        property: &str,
        object: &Term,
        meta: Option<Meta>,
    ) -> Result<()> {
        match property {
            "member" => {
                let member = self.require_any_licence(object)?;
                guard(set)?.members.push(member);
                Ok(())
            }
            _ => Err(ParseError::property_not_supported(property, kind, meta)),
        }
    }
}

fn apply_creation_info(
    info: &CreationInfoRef,
    property: &str,
    object: &Term,
    meta: Option<Meta>,
) -> Result<()> {
    match property {
        "creator" => {
            push_creator(&mut guard(info)?.creators, object, meta);
            Ok(())
        }
        "rdfs:comment" => set_str(&mut guard(info)?.comment, object, meta),
        "created" => set_date(&mut guard(info)?.created, object, meta),
        "licenseListVersion" => set_str(&mut guard(info)?.licence_list_version, object, meta),
        _ => Err(ParseError::property_not_supported(property, Kind::CreationInfo, meta)),
    }
}

fn apply_checksum(
    checksum: &ChecksumRef,
    property: &str,
    object: &Term,
    meta: Option<Meta>,
) -> Result<()> {
    match property {
        "algorithm" => {
            let mut payload = guard(checksum)?;
            if payload.algo.is_some() {
                return Err(ParseError::already_defined(meta));
            }
            // Values arrive as checksumAlgorithm_sha1 and the like; keep
            // just the algorithm name, upper-cased.
            let algo = object
                .as_str()
                .strip_prefix(CHECKSUM_ALGORITHM_PREFIX)
                .unwrap_or(object.as_str())
                .to_uppercase();
            payload.algo = Some(ValueStr::new(algo, meta));
            Ok(())
        }
        "checksumValue" => set_str(&mut guard(checksum)?.value, object, meta),
        _ => Err(ParseError::property_not_supported(property, Kind::Checksum, meta)),
    }
}

fn apply_verification_code(
    code: &VerificationCodeRef,
    property: &str,
    object: &Term,
    meta: Option<Meta>,
) -> Result<()> {
    match property {
        "packageVerificationCodeValue" => set_str(&mut guard(code)?.value, object, meta),
        "packageVerificationCodeExcludedFile" => {
            push_str(&mut guard(code)?.excluded_files, object, meta);
            Ok(())
        }
        _ => Err(ParseError::property_not_supported(property, Kind::VerificationCode, meta)),
    }
}

fn apply_review(
    review: &ReviewRef,
    property: &str,
    object: &Term,
    meta: Option<Meta>,
) -> Result<()> {
    match property {
        "reviewer" => set_creator(&mut guard(review)?.reviewer, object, meta),
        "rdfs:comment" => set_str(&mut guard(review)?.comment, object, meta),
        "reviewDate" => set_date(&mut guard(review)?.date, object, meta),
        _ => Err(ParseError::property_not_supported(property, Kind::Review, meta)),
    }
}

fn apply_artifact_of(
    artifact: &ArtifactOfRef,
    property: &str,
    object: &Term,
    meta: Option<Meta>,
) -> Result<()> {
    match property {
        "doap:name" => set_str(&mut guard(artifact)?.name, object, meta),
        "doap:homepage" => set_str(&mut guard(artifact)?.home_page, object, meta),
        _ => Err(ParseError::property_not_supported(property, Kind::ArtifactOf, meta)),
    }
}

fn apply_extracted(
    lic: &ExtractedLicenceRef,
    property: &str,
    object: &Term,
    meta: Option<Meta>,
) -> Result<()> {
    match property {
        "licenseId" => set_str(&mut guard(lic)?.id, object, meta),
        "name" => {
            push_str(&mut guard(lic)?.names, object, meta);
            Ok(())
        }
        "extractedText" => set_str(&mut guard(lic)?.text, object, meta),
        "rdfs:comment" => set_str(&mut guard(lic)?.comment, object, meta),
        "rdfs:seeAlso" => {
            push_str(&mut guard(lic)?.cross_references, object, meta);
            Ok(())
        }
        _ => Err(ParseError::property_not_supported(property, Kind::ExtractedLicence, meta)),
    }
}
