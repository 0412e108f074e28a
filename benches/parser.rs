//! Parser microbenchmarks over [`ecma5::syntax::parser::parse_program`].
//!
//! There's no public cursor/token-stream seam to split lexing out from
//! parsing, so this benchmarks the combined lex-and-parse pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecma5::syntax::parser::parse_program;

static EXPRESSION: &str = r#"
1 + 1 + 1 + 1 + 1 + 1 / 1 + 1 + 1 * 1 + 1 + 1 + 1;
"#;

static FOR_LOOP: &str = r#"
(function () {
    let b = "hello";
    for (let a = 10; a < 100; a += 5) {
        if (a < 50) {
            b += "world";
        }
    }
    return b;
})();
"#;

fn expression_parser(c: &mut Criterion) {
    c.bench_function("Expression (Parser)", move |b| {
        b.iter(|| parse_program(black_box(EXPRESSION)).unwrap())
    });
}

fn for_loop_parser(c: &mut Criterion) {
    c.bench_function("For loop (Parser)", move |b| {
        b.iter(|| parse_program(black_box(FOR_LOOP)).unwrap())
    });
}

criterion_group!(benches, expression_parser, for_loop_parser);
criterion_main!(benches);
