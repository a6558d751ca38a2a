//! Lexer throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vync_lex::lex;

fn brace_heavy_source() -> String {
    let mut src = String::new();
    for i in 0..200 {
        src.push_str(&format!(
            "fn work{i}() {{\n    var<Int> total = {i};\n    total = total * 2 + 1;\n    return total;\n}}\n"
        ));
    }
    src
}

fn indent_heavy_source() -> String {
    let mut src = String::new();
    for i in 0..200 {
        src.push_str(&format!(
            "fn work{i}()\n  let total = {i}\n  return total + 1\n"
        ));
    }
    src
}

fn bench_lexer(c: &mut Criterion) {
    let braces = brace_heavy_source();
    let indents = indent_heavy_source();

    c.bench_function("lex_brace_mode", |b| {
        b.iter(|| lex(black_box(&braces), "bench.vyn"))
    });
    c.bench_function("lex_indent_mode", |b| {
        b.iter(|| lex(black_box(&indents), "bench.vyn"))
    });
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
