//! Stack growth for deeply nested snippets.
//!
//! The parser and the interpreter both recurse once per nesting level of an
//! expression. Snippets are caller-supplied, so a pathological input such as
//! ten thousand nested parentheses must not overflow the caller's thread.

/// Remaining stack below which more is allocated before recursing (128 KiB).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2 MiB).
#[cfg(not(target_arch = "wasm32"))]
const GROWTH: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// Wrap every recursive parse/eval step:
///
/// ```text
/// fn eval_expr(&mut self, id: ExprId) -> EvalResult {
///     ensure_sufficient_stack(|| self.eval_expr_inner(id))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_recursion_does_not_overflow() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }

        assert_eq!(depth(200_000), 200_000);
    }

    #[test]
    fn test_passes_result_through() {
        let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("boom"));
        assert_eq!(result, Err("boom"));
    }
}
