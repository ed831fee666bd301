//! Engine clock used to stamp trades and evaluate price windows.

use std::sync::{Arc, Mutex};

use time::Duration;

use crate::UtcDateTime;

/// Source of "now" for the exchange engine. Read fresh on every call.
pub trait Clock: Send + Sync {
    fn now(&self) -> UtcDateTime;
}

/// Shared handle handed to every stock of a registry.
pub type SharedClock = Arc<dyn Clock>;

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn shared() -> SharedClock {
        Arc::new(Self)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> UtcDateTime {
        UtcDateTime::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<UtcDateTime>,
}

impl ManualClock {
    pub fn new(start: UtcDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, value: UtcDateTime) {
        *self.now.lock().expect("manual clock lock is not poisoned") = value;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("manual clock lock is not poisoned");
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UtcDateTime {
        *self.now.lock().expect("manual clock lock is not poisoned")
    }
}
