//! Parser throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vync_lex::lex;
use vync_par::parse;

fn expression_heavy_source() -> String {
    let mut src = String::new();
    src.push_str("fn crunch() -> Int {\n");
    for i in 0..100 {
        src.push_str(&format!(
            "    var<Int> v{i} = (a{i} + b{i} * c{i}) << 2 | mask & ~flag{i};\n"
        ));
    }
    src.push_str("    return v0;\n}\n");
    src
}

fn declaration_heavy_source() -> String {
    let mut src = String::new();
    for i in 0..60 {
        src.push_str(&format!(
            "struct Node{i} {{ key: Int value: Str next: Node{i}* }}\nfn get{i}(n: Node{i}*) -> Str {{ unsafe {{ return at(loc(n)); }} }}\n"
        ));
    }
    src
}

fn bench_parser(c: &mut Criterion) {
    let exprs = expression_heavy_source();
    let decls = declaration_heavy_source();

    c.bench_function("parse_expression_heavy", |b| {
        b.iter(|| {
            let tokens = lex(black_box(&exprs), "bench.vyn");
            parse(tokens, "bench.vyn").expect("benchmark source parses")
        })
    });
    c.bench_function("parse_declaration_heavy", |b| {
        b.iter(|| {
            let tokens = lex(black_box(&decls), "bench.vyn");
            parse(tokens, "bench.vyn").expect("benchmark source parses")
        })
    });
}

criterion_group!(benches, bench_parser);
criterion_main!(benches);
