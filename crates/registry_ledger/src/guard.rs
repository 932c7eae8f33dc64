//! Per-registry call serialization with same-thread re-entry detection.

use crate::errors::RegistryError;
use core::cell::Cell;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// Lock held for the whole of one mutating operation.
///
/// Other threads block on the mutex. The owning thread re-acquires it (the mutex is
/// re-entrant), sees the in-flight flag and is turned away with [`RegistryError::Reentrant`].
pub struct CallGuard<'a> {
    slot: ReentrantMutexGuard<'a, Cell<bool>>,
}

impl<'a> CallGuard<'a> {
    pub fn enter(lock: &'a ReentrantMutex<Cell<bool>>) -> Result<Self, RegistryError> {
        let slot = lock.lock();
        if slot.replace(true) {
            return Err(RegistryError::Reentrant);
        }
        Ok(Self { slot })
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.slot.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_entry_rejected_and_flag_cleared() {
        let lock = ReentrantMutex::new(Cell::new(false));
        {
            let _outer = CallGuard::enter(&lock).unwrap();
            assert!(matches!(CallGuard::enter(&lock), Err(RegistryError::Reentrant)));
            // the failed attempt must not clear the outer flag
            assert!(matches!(CallGuard::enter(&lock), Err(RegistryError::Reentrant)));
        }
        assert!(CallGuard::enter(&lock).is_ok());
    }

    #[test]
    fn other_threads_wait_instead_of_failing() {
        use std::sync::Arc;
        let lock = Arc::new(ReentrantMutex::new(Cell::new(false)));
        let outer = CallGuard::enter(&lock).unwrap();
        let l2 = Arc::clone(&lock);
        let h = std::thread::spawn(move || CallGuard::enter(&l2).is_ok());
        std::thread::sleep(std::time::Duration::from_millis(20));
        drop(outer);
        assert!(h.join().unwrap());
    }
}
