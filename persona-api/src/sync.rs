//! Synchronization primitives for the persona subsystem
//!
//! This module provides thread-safe synchronization primitives
//! for use in a no_std environment.

pub use spin::Mutex;
pub use spin::{RwLock, RwLockReadGuard, RwLockWriteGuard};
pub use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rwlock_guards() {
        let lock = RwLock::new(1u32);
        {
            let read: RwLockReadGuard<'_, u32> = lock.read();
            assert_eq!(*read, 1);
        }
        {
            let mut write: RwLockWriteGuard<'_, u32> = lock.write();
            *write = 2;
        }
        assert_eq!(*lock.read(), 2);
    }
}
