//! Callback id allocation for SendData requests
//!
//! The controller echoes the callback id of a SendData request in its
//! delayed transmit report. Id 0 means "no callback" and is never handed
//! out; the counter cycles through 1..=255.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Callback id generator
///
/// Thread-safe and can be cloned cheaply (Arc internally). Clones share the
/// same counter.
#[derive(Debug, Clone)]
pub struct CallbackIds {
    inner: Arc<CallbackIdsInner>,
}

#[derive(Debug)]
struct CallbackIdsInner {
    /// Last id handed out (0 before the first call)
    last: AtomicU8,
}

impl CallbackIds {
    /// First id handed out
    pub const FIRST: u8 = 1;

    pub fn new() -> Self {
        Self {
            inner: Arc::new(CallbackIdsInner {
                last: AtomicU8::new(0),
            }),
        }
    }

    /// Get next callback id, wrapping from 255 back to 1
    pub fn next_id(&self) -> u8 {
        let previous = self
            .inner
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(Self::successor(last))
            })
            .unwrap_or(0);

        Self::successor(previous)
    }

    /// Last id handed out, 0 if none yet
    pub fn last_id(&self) -> u8 {
        self.inner.last.load(Ordering::Acquire)
    }

    /// Start over from [`CallbackIds::FIRST`]
    pub fn reset(&self) {
        self.inner.last.store(0, Ordering::Release);
    }

    fn successor(id: u8) -> u8 {
        match id {
            u8::MAX => Self::FIRST,
            other => other + 1,
        }
    }
}

impl Default for CallbackIds {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_ids_start_at_one() {
        let ids = CallbackIds::new();
        assert_eq!(ids.last_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.last_id(), 2);
    }

    #[test]
    fn test_callback_ids_skip_zero_on_wrap() {
        let ids = CallbackIds::new();
        for expected in 1..=255u8 {
            assert_eq!(ids.next_id(), expected);
        }
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_callback_ids_never_zero() {
        let ids = CallbackIds::new();
        for _ in 0..1000 {
            assert_ne!(ids.next_id(), 0);
        }
    }

    #[test]
    fn test_callback_ids_clone_shares_counter() {
        let first = CallbackIds::new();
        let second = first.clone();

        assert_eq!(first.next_id(), 1);
        assert_eq!(second.next_id(), 2);

        second.reset();
        assert_eq!(first.next_id(), 1);
    }
}
