//! A few evaluator-level smoke tests exercising whole-program behavior that
//! doesn't fit neatly into any single `#[cfg(test)]` module.

use ecma5::{Context, EsVersion, Heap};

fn run(src: &str) -> Result<ecma5::Value, ecma5::EngineError> {
    let mut heap = Heap::new(1 << 20);
    let mut ctx = Context::new(&mut heap, EsVersion::Es5);
    ecma5::eval(&mut ctx, src)
}

#[test]
fn break_to_unresolved_label_is_an_error() {
    let source = r#"
while (false) {
  break nonexistent;
}
"#;
    assert!(run(source).is_err());
}

#[test]
fn fibonacci_runs_to_completion() {
    let source = r#"
(function () {
    function fib(n) {
        if (n <= 1) return n;
        return fib(n - 1) + fib(n - 2);
    }
    return fib(10);
})();
"#;
    let mut heap = Heap::new(1 << 20);
    let mut ctx = Context::new(&mut heap, EsVersion::Es5);
    let result = ecma5::eval(&mut ctx, source).expect("script should evaluate");
    let n = ctx.to_number(result).expect("result should be numeric");
    assert_eq!(n, 55.0);
}

#[test]
fn labelled_break_unwinds_to_its_own_label() {
    let source = r#"
(function () {
    let total = 0;
    outer: for (let i = 0; i < 5; i++) {
        for (let j = 0; j < 5; j++) {
            if (j === 2) {
                break outer;
            }
            total += 1;
        }
    }
    return total;
})();
"#;
    let mut heap = Heap::new(1 << 20);
    let mut ctx = Context::new(&mut heap, EsVersion::Es5);
    let result = ecma5::eval(&mut ctx, source).expect("script should evaluate");
    let n = ctx.to_number(result).expect("result should be numeric");
    assert_eq!(n, 2.0);
}
