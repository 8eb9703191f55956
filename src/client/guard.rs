use std::sync::atomic::{AtomicBool, Ordering};

/// In-progress flag for one logical operation. A second request while one
/// is outstanding is turned away; the outstanding one is left alone.
#[derive(Debug, Default)]
pub struct RequestGuard {
    busy: AtomicBool,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Option<InFlight<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight { guard: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Clears the flag when dropped, whatever the request outcome.
#[derive(Debug)]
pub struct InFlight<'a> {
    guard: &'a RequestGuard,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::RequestGuard;

    #[test]
    fn second_begin_is_refused_until_release() {
        let guard = RequestGuard::new();
        let first = guard.try_begin();
        assert!(first.is_some());
        assert!(guard.is_busy());
        assert!(guard.try_begin().is_none());
        drop(first);
        assert!(!guard.is_busy());
        assert!(guard.try_begin().is_some());
    }
}
