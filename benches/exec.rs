//! End-to-end execution microbenchmarks over [`ecma5::eval`], each creating
//! a fresh [`ecma5::Heap`]/[`ecma5::Context`] pair per iteration.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecma5::{Context, EsVersion, Heap};

fn run(src: &str) {
    let mut heap = Heap::new(1 << 20);
    let mut ctx = Context::new(&mut heap, EsVersion::Es5);
    ecma5::eval(&mut ctx, src).expect("benchmark script should run without error");
}

fn create_context(c: &mut Criterion) {
    c.bench_function("Create Context", move |b| {
        b.iter(|| {
            let mut heap = Heap::new(1 << 20);
            Context::new(&mut heap, EsVersion::Es5);
        })
    });
}

static FOR_LOOP: &str = r#"
(function () {
    let a = 10;
    let b = "hello";
    for (;;) {
        a += 5;
        if (a < 50) {
            b += "world";
        }
        if (a > 100) {
            break;
        }
    }
    return b;
})();
"#;

fn for_loop_execution(c: &mut Criterion) {
    c.bench_function("For loop (Execution)", move |b| b.iter(|| run(black_box(FOR_LOOP))));
}

static OBJECT_CREATION: &str = r#"
(function () {
    let test = {
        my_prop: "hello",
        another: 65,
    };
    return test;
})();
"#;

fn object_creation(c: &mut Criterion) {
    c.bench_function("Object creation (Execution)", move |b| b.iter(|| run(black_box(OBJECT_CREATION))));
}

static FIBONACCI: &str = r#"
(function () {
    let num = 12;
    function fib(n) {
        if (n <= 1) return 1;
        return fib(n - 1) + fib(n - 2);
    }
    return fib(num);
})();
"#;

fn fibonacci(c: &mut Criterion) {
    c.bench_function("Fibonacci (Execution)", move |b| b.iter(|| run(black_box(FIBONACCI))));
}

criterion_group!(benches, create_context, for_loop_execution, object_creation, fibonacci);
criterion_main!(benches);
