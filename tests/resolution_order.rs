//! Order-independence of the statement stream: properties and references
//! may arrive before the type assertions of the nodes they touch, and the
//! resolved document comes out the same.

use std::sync::Arc;

use spdx_rdf::error::Result;
use spdx_rdf::model::DocumentRef;
use spdx_rdf::term::{Meta, Term, Triple};
use spdx_rdf::vocab::{RDF_TYPE, doap, spdx};

fn stm(subject: &Term, predicate: &str, object: Term) -> Triple {
    Triple::new(subject.clone(), Term::uri(predicate), object)
}

fn typed(subject: &Term, kind: &str) -> Triple {
    stm(subject, RDF_TYPE, Term::uri(spdx(kind)))
}

fn parse(statements: Vec<Triple>) -> Result<Option<DocumentRef>> {
    spdx_rdf::parse(
        statements
            .into_iter()
            .enumerate()
            .map(|(i, s)| (s, Meta::new(i + 1))),
    )
}

#[test]
fn package_name_before_and_after_typing() {
    let doc = Term::uri("http://example.org/doc");
    let pkg = Term::blank("pkg");

    let forward = vec![
        typed(&doc, "SpdxDocument"),
        stm(&doc, &spdx("describesPackage"), pkg.clone()),
        stm(&pkg, &spdx("name"), Term::literal("libfoo")),
    ];
    // The package is named before anything establishes what it is.
    let backward = vec![
        stm(&pkg, &spdx("name"), Term::literal("libfoo")),
        typed(&doc, "SpdxDocument"),
        stm(&doc, &spdx("describesPackage"), pkg.clone()),
    ];

    for statements in [forward, backward] {
        let resolved = parse(statements).unwrap().unwrap();
        let resolved = resolved.lock().unwrap();
        assert_eq!(resolved.packages.len(), 1);
        let package = resolved.packages[0].lock().unwrap();
        assert_eq!(package.name.as_ref().unwrap().val, "libfoo");
    }
}

#[test]
fn checksum_values_either_side_of_type() {
    let doc = Term::uri("http://example.org/doc");
    let pkg = Term::blank("pkg");
    let sum = Term::blank("sum");
    let algorithm = Term::literal(spdx("checksumAlgorithm_sha1"));

    let forward = vec![
        typed(&doc, "SpdxDocument"),
        stm(&doc, &spdx("describesPackage"), pkg.clone()),
        stm(&pkg, &spdx("checksum"), sum.clone()),
        stm(&sum, &spdx("algorithm"), algorithm.clone()),
        stm(&sum, &spdx("checksumValue"), Term::literal("abcd")),
    ];
    let backward = vec![
        stm(&sum, &spdx("algorithm"), algorithm.clone()),
        stm(&sum, &spdx("checksumValue"), Term::literal("abcd")),
        typed(&doc, "SpdxDocument"),
        stm(&doc, &spdx("describesPackage"), pkg.clone()),
        stm(&pkg, &spdx("checksum"), sum.clone()),
    ];

    for statements in [forward, backward] {
        let resolved = parse(statements).unwrap().unwrap();
        let resolved = resolved.lock().unwrap();
        let package = resolved.packages[0].lock().unwrap();
        let checksum = package.checksum.as_ref().unwrap().lock().unwrap();
        assert_eq!(checksum.algo.as_ref().unwrap().val, "SHA1");
        assert_eq!(checksum.value.as_ref().unwrap().val, "abcd");
    }
}

#[test]
fn buffered_statements_replay_in_arrival_order() {
    let doc = Term::uri("http://example.org/doc");
    let file = Term::blank("f");

    let statements = vec![
        stm(&file, &spdx("fileContributor"), Term::literal("alice")),
        stm(&file, &spdx("fileContributor"), Term::literal("bob")),
        stm(&file, &spdx("fileContributor"), Term::literal("carol")),
        typed(&doc, "SpdxDocument"),
        stm(&doc, &spdx("referencesFile"), file.clone()),
    ];

    let resolved = parse(statements).unwrap().unwrap();
    let resolved = resolved.lock().unwrap();
    let file = resolved.files[0].lock().unwrap();
    let contributors: Vec<&str> = file.contributors.iter().map(|c| c.val.as_str()).collect();
    assert_eq!(contributors, vec!["alice", "bob", "carol"]);
}

#[test]
fn shared_file_resolves_to_one_node() {
    let doc = Term::uri("http://example.org/doc");
    let pkg = Term::blank("pkg");
    let file = Term::blank("f");

    let statements = vec![
        typed(&doc, "SpdxDocument"),
        stm(&doc, &spdx("describesPackage"), pkg.clone()),
        stm(&doc, &spdx("referencesFile"), file.clone()),
        stm(&pkg, &spdx("hasFile"), file.clone()),
        stm(&file, &spdx("fileName"), Term::literal("src/main.c")),
        // A file may list itself as a dependency.
        stm(&file, &spdx("fileDependency"), file.clone()),
    ];

    let resolved = parse(statements).unwrap().unwrap();
    let resolved = resolved.lock().unwrap();
    let from_doc = Arc::clone(&resolved.files[0]);
    let package = resolved.packages[0].lock().unwrap();
    assert!(Arc::ptr_eq(&from_doc, &package.files[0]));
    drop(package);
    let file = from_doc.lock().unwrap();
    assert_eq!(file.name.as_ref().unwrap().val, "src/main.c");
    assert!(Arc::ptr_eq(&from_doc, &file.dependencies[0]));
}

#[test]
fn full_document_end_to_end() {
    let doc = Term::uri("http://example.org/doc");
    let info = Term::blank("ci");
    let pkg = Term::blank("pkg");
    let code = Term::blank("vc");
    let review = Term::blank("rev");
    let file = Term::blank("f");
    let project = Term::uri("http://example.org/projects/foo");

    let statements = vec![
        typed(&doc, "SpdxDocument"),
        stm(&doc, &spdx("specVersion"), Term::literal("SPDX-1.2")),
        stm(
            &doc,
            &spdx("dataLicense"),
            Term::uri("http://spdx.org/licenses/CC0-1.0"),
        ),
        stm(&doc, &spdx("creationInfo"), info.clone()),
        stm(
            &info,
            &spdx("creator"),
            Term::literal("Person: Jane Doe (jane@example.com)"),
        ),
        stm(&info, &spdx("creator"), Term::literal("Tool: spdx-rdf")),
        stm(&info, &spdx("created"), Term::literal("2012-02-03T10:00:00Z")),
        stm(&doc, &spdx("describesPackage"), pkg.clone()),
        stm(&pkg, &spdx("name"), Term::literal("libfoo")),
        stm(&pkg, &spdx("versionInfo"), Term::literal("1.4.2")),
        stm(&pkg, &spdx("packageVerificationCode"), code.clone()),
        stm(
            &code,
            &spdx("packageVerificationCodeValue"),
            Term::literal("d6a770ba38583ed4bb"),
        ),
        stm(
            &code,
            &spdx("packageVerificationCodeExcludedFile"),
            Term::literal("./package.spdx"),
        ),
        stm(&pkg, &doap("homepage"), Term::literal("http://foo.example.org")),
        stm(&pkg, &spdx("hasFile"), file.clone()),
        stm(&file, &spdx("fileName"), Term::literal("src/lib.c")),
        stm(&file, &spdx("artifactOf"), project.clone()),
        stm(&project, &doap("name"), Term::literal("foo")),
        stm(&doc, &spdx("reviewed"), review.clone()),
        stm(
            &review,
            &spdx("reviewer"),
            Term::literal("Person: Joe Reviewer"),
        ),
        stm(&review, &spdx("reviewDate"), Term::literal("2012-02-10T09:00:00Z")),
    ];

    let resolved = parse(statements).unwrap().unwrap();
    let resolved = resolved.lock().unwrap();
    assert_eq!(resolved.spec_version.as_ref().unwrap().val, "SPDX-1.2");
    assert_eq!(resolved.data_licence.as_ref().unwrap().val, "CC0-1.0");

    let info = resolved.creation_info.as_ref().unwrap().lock().unwrap();
    assert_eq!(info.creators.len(), 2);
    assert_eq!(info.creators[0].what, "Person");
    assert_eq!(info.creators[0].name, "Jane Doe");
    assert_eq!(info.creators[0].email, "jane@example.com");
    assert!(info.created.as_ref().unwrap().time.is_some());
    drop(info);

    let package = resolved.packages[0].lock().unwrap();
    assert_eq!(package.version.as_ref().unwrap().val, "1.4.2");
    assert_eq!(
        package.home_page.as_ref().unwrap().val,
        "http://foo.example.org"
    );
    let code = package.verification_code.as_ref().unwrap().lock().unwrap();
    assert_eq!(code.value.as_ref().unwrap().val, "d6a770ba38583ed4bb");
    assert_eq!(code.excluded_files.len(), 1);
    drop(code);

    let file = package.files[0].lock().unwrap();
    let artifact = file.artifact_of[0].lock().unwrap();
    // Named project nodes seed their URI into the artifact.
    assert_eq!(
        artifact.project_uri.as_ref().unwrap().val,
        "http://example.org/projects/foo"
    );
    assert_eq!(artifact.name.as_ref().unwrap().val, "foo");
    drop(artifact);
    drop(file);
    drop(package);

    let review = resolved.reviews[0].lock().unwrap();
    assert_eq!(review.reviewer.as_ref().unwrap().name, "Joe Reviewer");
    assert!(review.date.as_ref().unwrap().time.is_some());
}

#[test]
fn empty_stream_yields_no_document() {
    assert!(parse(Vec::new()).unwrap().is_none());
}
