//! A small "hello world" source run through each pipeline stage in turn —
//! lexer, parser, full execution — isolating one tiny script's cost at
//! each stage.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecma5::syntax::lexer::Lexer;
use ecma5::syntax::parser::parse_program;
use ecma5::{Context, EsVersion, Heap};

static SRC: &str = "let foo = 'hello world!'; foo;";

fn hello_world_lexer(c: &mut Criterion) {
    c.bench_function("Hello World (Lexer)", move |b| {
        b.iter(|| Lexer::new(black_box(SRC)).tokenize())
    });
}

fn hello_world_parser(c: &mut Criterion) {
    c.bench_function("Hello World (Parser)", move |b| {
        b.iter(|| parse_program(black_box(SRC)).unwrap())
    });
}

fn hello_world(c: &mut Criterion) {
    c.bench_function("Hello World (Execution)", move |b| {
        b.iter(|| {
            let mut heap = Heap::new(1 << 20);
            let mut ctx = Context::new(&mut heap, EsVersion::Es5);
            ecma5::eval(&mut ctx, black_box(SRC)).expect("hello world benchmark script should run without error")
        })
    });
}

criterion_group!(benches, hello_world, hello_world_lexer, hello_world_parser);
criterion_main!(benches);
