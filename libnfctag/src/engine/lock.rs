// libnfctag/src/engine/lock.rs

use std::sync::{Condvar, Mutex};

use crate::utils::sync::{lock, wait};

/// Exclusive "RF interface" lock. Holding an [`RfToken`] is what allows an
/// operation to change the interface or tear down the activation; helpers
/// that need exclusivity take `&RfToken` instead of locking again.
#[derive(Debug, Default)]
pub struct RfInterfaceLock {
    held: Mutex<bool>,
    cv: Condvar,
}

/// Proof of exclusive access; released on drop.
#[derive(Debug)]
pub struct RfToken<'a> {
    lock: &'a RfInterfaceLock,
}

impl RfInterfaceLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> RfToken<'_> {
        let mut held = lock(&self.held);
        while *held {
            held = wait(&self.cv, held);
        }
        *held = true;
        RfToken { lock: self }
    }

    pub fn try_acquire(&self) -> Option<RfToken<'_>> {
        let mut held = lock(&self.held);
        if *held {
            return None;
        }
        *held = true;
        Some(RfToken { lock: self })
    }

    pub fn is_held(&self) -> bool {
        *lock(&self.held)
    }
}

impl Drop for RfToken<'_> {
    fn drop(&mut self) {
        *lock(&self.lock.held) = false;
        self.lock.cv.notify_one();
    }
}
