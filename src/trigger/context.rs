//! Deadline and cancellation signals for a single invocation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{Result, TriggerError};

/// Caller-provided limits checked between units of work.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    deadline: Option<Instant>,
    cancelled: Option<Arc<AtomicBool>>,
}

impl InvocationContext {
    /// A context that never expires and cannot be cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Observe `flag`; storing `true` cancels the invocation at its next check.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    /// Fail if the invocation was cancelled or ran past its deadline.
    pub fn check(&self) -> Result<()> {
        if self
            .cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
        {
            return Err(TriggerError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(TriggerError::DeadlineExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_context_always_passes() {
        assert!(InvocationContext::background().check().is_ok());
    }

    #[test]
    fn cancel_flag_is_observed() {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = InvocationContext::background().with_cancel_flag(Arc::clone(&flag));
        assert!(ctx.check().is_ok());
        flag.store(true, Ordering::Release);
        assert!(matches!(ctx.check(), Err(TriggerError::Cancelled)));
    }

    #[test]
    fn elapsed_deadline_fails() {
        let ctx = InvocationContext::background().with_deadline(Instant::now());
        assert!(matches!(ctx.check(), Err(TriggerError::DeadlineExceeded)));

        let ctx = InvocationContext::background().with_timeout(Duration::from_secs(3600));
        assert!(ctx.check().is_ok());
    }
}
