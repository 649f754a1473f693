use crate::error::{ErrorKind, ParseError};

/// Tracks current recursion depth against a fixed ceiling, the same job
/// `apollo-parser`'s `LimitTracker` does for its own recursive-descent
/// productions. Every grammar production that recurses into itself (an
/// expression nested in parens, a subquery, a CASE arm) wraps its body in an
/// `enter()` call and holds the returned guard for the duration of that
/// production.
#[derive(Debug)]
struct DepthGuardInner {
    current: u32,
    max: u32,
    /// Once tripped, stays tripped for the life of the parser: a single
    /// breach already means the input is rejected, so there is no value in
    /// re-checking depth after the first failure, only in not double
    /// counting it.
    breached: bool,
}

/// Backed by `Rc<RefCell<..>>` so a [`DepthGuard`] can hold its own handle to
/// the stack instead of borrowing it, which would otherwise tie the guard's
/// lifetime to the whole `Parser` and make it impossible to call any other
/// `&mut self` method while the guard is alive.
#[derive(Debug, Clone)]
pub struct DepthGuardStack {
    inner: std::rc::Rc<std::cell::RefCell<DepthGuardInner>>,
}

impl DepthGuardStack {
    pub fn new(max: u32) -> Self {
        Self {
            inner: std::rc::Rc::new(std::cell::RefCell::new(DepthGuardInner {
                current: 0,
                max,
                breached: false,
            })),
        }
    }

    /// Enter one level of recursion. Returns a guard that restores the
    /// previous depth on drop, including on the error path via `?`.
    pub fn enter(&self) -> Result<DepthGuard, ErrorKind> {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.breached || inner.current >= inner.max {
                inner.breached = true;
                return Err(ErrorKind::DepthExceeded);
            }
            inner.current += 1;
        }
        Ok(DepthGuard {
            stack: self.clone(),
        })
    }

    pub fn current_depth(&self) -> u32 {
        self.inner.borrow().current
    }

    pub fn has_breached(&self) -> bool {
        self.inner.borrow().breached
    }
}

/// RAII handle for one level of recursion. Decrements the depth counter on
/// drop regardless of how the enclosing production returns.
#[derive(Debug)]
pub struct DepthGuard {
    stack: DepthGuardStack,
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        let mut inner = self.stack.inner.borrow_mut();
        inner.current = inner.current.saturating_sub(1);
    }
}

pub(crate) fn depth_exceeded(line: u32, column: u32, byte_offset: u32, source: &str) -> ParseError {
    ParseError::new(
        ErrorKind::DepthExceeded,
        line,
        column,
        byte_offset,
        "expression or statement nesting exceeded the configured recursion limit",
        source,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_enters_restore_depth_on_drop() {
        let mut stack = DepthGuardStack::new(4);
        {
            let _a = stack.enter().unwrap();
            assert_eq!(stack.current_depth(), 1);
            {
                let _b = stack.enter().unwrap();
                assert_eq!(stack.current_depth(), 2);
            }
            assert_eq!(stack.current_depth(), 1);
        }
        assert_eq!(stack.current_depth(), 0);
    }

    #[test]
    fn breaching_limit_is_sticky() {
        let mut stack = DepthGuardStack::new(1);
        let guard = stack.enter().unwrap();
        let err = stack.enter().unwrap_err();
        assert_eq!(err, ErrorKind::DepthExceeded);
        assert!(stack.has_breached());
        drop(guard);
        // Still breached even though depth dropped back to 0.
        assert!(stack.enter().is_err());
    }
}
