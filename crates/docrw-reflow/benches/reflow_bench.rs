use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docrw_reflow::reflow_block;
use docrw_syntax::PassthroughPrinter;

fn bench_reflow(c: &mut Criterion) {
    let block = "// This is a reasonably long doc comment that exercises the paragraph \
wrapper, a bulleted list, and a numbered list all in one block so the \
packer sees every group kind on every iteration.\n\
//   - first bullet item with enough words to wrap across more than one line\n\
//   - second bullet item\n\
// 1. first numbered step\n\
// 2. second numbered step\n";

    c.bench_function("reflow_block width=80", |b| {
        b.iter(|| reflow_block(black_box(block), 0, 4, 80, &PassthroughPrinter))
    });
}

criterion_group!(benches, bench_reflow);
criterion_main!(benches);
