use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docrw_edit::{apply_snippet, parse_snippet};
use docrw_syntax::TreeSitterGoFrontend;
use std::path::Path;

fn bench_apply(c: &mut Criterion) {
    let frontend = TreeSitterGoFrontend;
    let source = "package mypkg\n\nvar Foo int\nvar Bar string\nvar Baz float64\n";
    let snippet = parse_snippet("// Foo is ...\nvar Foo int\n", &frontend, "mypkg").unwrap();

    c.bench_function("apply_snippet doc insertion", |b| {
        b.iter(|| {
            apply_snippet(
                black_box(source.as_bytes()),
                Path::new("f.go"),
                black_box(&snippet),
                &frontend,
                false,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_apply);
criterion_main!(benches);
