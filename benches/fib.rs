//! Standalone fibonacci microbenchmark, split out from `benches/exec.rs`
//! for quick recursive-call-path profiling.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecma5::{Context, EsVersion, Heap};

static SRC: &str = r#"
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
    c.bench_function("fibonacci (Execution)", move |b| {
        b.iter(|| {
            let mut heap = Heap::new(1 << 20);
            let mut ctx = Context::new(&mut heap, EsVersion::Es5);
            ecma5::eval(&mut ctx, black_box(SRC)).expect("fib benchmark script should run without error")
        })
    });
}

criterion_group!(benches, fibonacci);
criterion_main!(benches);
