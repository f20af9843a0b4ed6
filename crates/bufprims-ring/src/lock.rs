//! Scoped critical sections.
//!
//! The buffers in this workspace have no internal locking. When one is
//! shared between execution contexts (an interrupt handler filling a ring
//! that a task drains, say) the caller brackets each access window with a
//! [`Lock`] implementation. [`NoopLock`] is the default for strictly
//! single-threaded use.

/// Paired enter/exit operations around a buffer access window.
pub trait Lock {
    fn lock(&self);
    fn unlock(&self);
}

/// A lock that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLock;

impl Lock for NoopLock {
    #[inline]
    fn lock(&self) {}

    #[inline]
    fn unlock(&self) {}
}

/// Holds `L` locked for as long as the guard lives.
#[must_use = "the section is released as soon as the guard is dropped"]
pub struct ContextLock<'a, L: Lock + ?Sized> {
    lock: &'a L,
}

impl<'a, L: Lock + ?Sized> ContextLock<'a, L> {
    /// Enter the section.
    pub fn new(lock: &'a L) -> Self {
        lock.lock();
        Self { lock }
    }
}

impl<L: Lock + ?Sized> Drop for ContextLock<'_, L> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

/// Run `f` inside a section guarded by `lock`.
pub fn critical<L: Lock + ?Sized, R>(lock: &L, f: impl FnOnce() -> R) -> R {
    let _guard = ContextLock::new(lock);
    f()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct CountingLock {
        depth: Cell<i32>,
        entries: Cell<u32>,
    }

    impl Lock for CountingLock {
        fn lock(&self) {
            self.depth.set(self.depth.get() + 1);
            self.entries.set(self.entries.get() + 1);
        }

        fn unlock(&self) {
            self.depth.set(self.depth.get() - 1);
        }
    }

    #[test]
    fn guard_pairs_lock_and_unlock() {
        let lock = CountingLock::default();
        {
            let _guard = ContextLock::new(&lock);
            assert_eq!(lock.depth.get(), 1);
        }
        assert_eq!(lock.depth.get(), 0);
        assert_eq!(lock.entries.get(), 1);
    }

    #[test]
    fn critical_returns_closure_value() {
        let lock = CountingLock::default();
        let value = critical(&lock, || {
            assert_eq!(lock.depth.get(), 1);
            42
        });
        assert_eq!(value, 42);
        assert_eq!(lock.depth.get(), 0);
    }

    #[test]
    fn unlocks_on_unwind() {
        let lock = CountingLock::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            critical(&lock, || panic!("boom"));
        }));
        assert!(result.is_err());
        assert_eq!(lock.depth.get(), 0);
    }

    #[test]
    fn noop_lock_is_usable_as_dyn() {
        let lock: &dyn Lock = &NoopLock;
        assert_eq!(critical(lock, || 7), 7);
    }
}
