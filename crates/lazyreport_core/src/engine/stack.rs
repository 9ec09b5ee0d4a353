//! Evaluation stack of in-progress computations.

use crate::error::{ReportError, ReportResult};
use std::cell::RefCell;

/// Chain of fields currently being computed, innermost last.
#[derive(Debug, Default)]
pub struct EvaluationStack {
    frames: RefCell<Vec<String>>,
}

impl EvaluationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `field` and returns a guard that pops it when dropped.
    ///
    /// # Errors
    /// - `CyclicDependency` when `field` is already on the stack. Nothing is
    ///   pushed in that case.
    pub fn enter(&self, field: &str) -> ReportResult<StackFrame<'_>> {
        let mut frames = self.frames.borrow_mut();
        if frames.iter().any(|frame| frame == field) {
            let mut stack = frames.clone();
            stack.push(field.to_string());
            return Err(ReportError::CyclicDependency {
                field: field.to_string(),
                stack,
            });
        }
        let index = frames.len();
        frames.push(field.to_string());
        Ok(StackFrame { stack: self, index })
    }

    /// Field currently being computed.
    pub fn top(&self) -> Option<String> {
        self.frames.borrow().last().cloned()
    }

    #[cfg(test)]
    pub fn contains(&self, field: &str) -> bool {
        self.frames.borrow().iter().any(|frame| frame == field)
    }

    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }

    #[cfg(test)]
    /// Copy of the stack, outermost first.
    pub fn frames(&self) -> Vec<String> {
        self.frames.borrow().clone()
    }
}

/// Scoped membership of one field on the evaluation stack.
///
/// Truncates the stack back to its own position on drop, so an error
/// returned from a derivation cannot leave a stale frame behind.
#[derive(Debug)]
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct StackFrame<'a> {
    stack: &'a EvaluationStack,
    index: usize,
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        // Why: truncating instead of popping keeps frames of outer fields intact
        // even if guards are released out of order.
        self.stack.frames.borrow_mut().truncate(self.index);
    }
}

#[cfg(test)]
mod tests {
    use super::EvaluationStack;
    use crate::error::ReportError;

    #[test]
    fn frames_pop_in_reverse_order() {
        let stack = EvaluationStack::new();
        {
            let _outer = stack.enter("A").expect("enter A");
            {
                let _inner = stack.enter("B").expect("enter B");
                assert_eq!(stack.top().as_deref(), Some("B"));
                assert_eq!(stack.depth(), 2);
            }
            assert_eq!(stack.top().as_deref(), Some("A"));
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn rejects_reentry_and_keeps_stack_intact() {
        let stack = EvaluationStack::new();
        let _a = stack.enter("A").expect("enter A");
        let _b = stack.enter("B").expect("enter B");

        let err = stack.enter("A").expect_err("re-entering A must fail");
        assert_eq!(
            err,
            ReportError::CyclicDependency {
                field: "A".to_string(),
                stack: vec!["A".to_string(), "B".to_string(), "A".to_string()],
            }
        );
        assert_eq!(stack.frames(), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn out_of_order_release_never_removes_outer_frames() {
        let stack = EvaluationStack::new();
        let outer = stack.enter("A").expect("enter A");
        let middle = stack.enter("B").expect("enter B");
        let inner = stack.enter("C").expect("enter C");

        drop(middle);
        assert_eq!(stack.frames(), vec!["A".to_string()]);

        drop(inner);
        assert_eq!(stack.frames(), vec!["A".to_string()]);

        drop(outer);
        assert!(stack.is_empty());
    }

    #[test]
    fn guard_pops_on_early_return() {
        fn fails_inside(stack: &EvaluationStack) -> Result<(), ReportError> {
            let _frame = stack.enter("A")?;
            Err(ReportError::derivation("A", "boom"))
        }

        let stack = EvaluationStack::new();
        fails_inside(&stack).expect_err("inner failure should surface");
        assert!(stack.is_empty());
        assert!(!stack.contains("A"));
    }
}
