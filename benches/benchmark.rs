use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use spdx_rdf::term::{Meta, Term, Triple};
use spdx_rdf::vocab::{RDF_TYPE, spdx};

fn stm(subject: &Term, predicate: String, object: Term) -> Triple {
    Triple::new(subject.clone(), Term::uri(predicate), object)
}

/// A document describing one package with `files` files, each carrying a
/// checksum. File statements precede the type assertions so roughly half
/// of the stream goes through the buffer and gets replayed.
fn synthetic_document(files: usize) -> Vec<(Triple, Meta)> {
    let doc = Term::uri("http://example.org/doc");
    let pkg = Term::blank("pkg");
    let mut statements = Vec::new();
    for i in 0..files {
        let file = Term::blank(format!("f{i}"));
        let sum = Term::blank(format!("s{i}"));
        statements.push(stm(&file, spdx("fileName"), Term::literal(format!("src/{i}.c"))));
        statements.push(stm(&file, spdx("checksum"), sum.clone()));
        statements.push(stm(
            &sum,
            spdx("algorithm"),
            Term::literal(spdx("checksumAlgorithm_sha1")),
        ));
        statements.push(stm(&sum, spdx("checksumValue"), Term::literal(format!("{i:040x}"))));
        statements.push(stm(&pkg, spdx("hasFile"), file));
    }
    statements.push(stm(&doc, RDF_TYPE.to_owned(), Term::uri(spdx("SpdxDocument"))));
    statements.push(stm(&doc, spdx("specVersion"), Term::literal("SPDX-1.2")));
    statements.push(stm(&doc, spdx("describesPackage"), pkg.clone()));
    statements.push(stm(&pkg, spdx("name"), Term::literal("libfoo")));
    statements
        .into_iter()
        .enumerate()
        .map(|(i, s)| (s, Meta::new(i + 1)))
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    for files in [10usize, 100, 1000] {
        let statements = synthetic_document(files);
        c.bench_function(&format!("resolve {files} files"), |b| {
            b.iter(|| {
                let doc = spdx_rdf::parse(black_box(statements.clone()).into_iter());
                black_box(doc).unwrap()
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
