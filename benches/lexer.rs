//! Lexer microbenchmarks over [`ecma5::syntax::lexer::Lexer`].

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecma5::syntax::lexer::Lexer;

static EXPRESSION: &str = r#"
1 + 1 + 1 + 1 + 1 + 1 / 1 + 1 + 1 * 1 + 1 + 1 + 1;
"#;

static HELLO_WORLD: &str = "let foo = 'hello world!'; foo;";

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

fn expression_lexer(c: &mut Criterion) {
    c.bench_function("Expression (Lexer)", move |b| {
        b.iter(|| Lexer::new(black_box(EXPRESSION)).tokenize())
    });
}

fn hello_world_lexer(c: &mut Criterion) {
    c.bench_function("Hello World (Lexer)", move |b| {
        b.iter(|| Lexer::new(black_box(HELLO_WORLD)).tokenize())
    });
}

fn for_loop_lexer(c: &mut Criterion) {
    c.bench_function("For loop (Lexer)", move |b| {
        b.iter(|| Lexer::new(black_box(FOR_LOOP)).tokenize())
    });
}

criterion_group!(lexer, expression_lexer, hello_world_lexer, for_loop_lexer);
criterion_main!(lexer);
