//! Display wake lock held while audio plays.
//!
//! Strictly best-effort: platforms without the capability (or sessions that
//! deny it) just log at debug level and playback continues. Failures here
//! never surface to the user.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Owns the wake-lock guard; dropping the guard releases the lock.
#[derive(Clone, Default)]
pub struct WakeLockService {
    guard: Arc<Mutex<Option<keepawake::KeepAwake>>>,
}

impl WakeLockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the lock while `active`, release it otherwise. Idempotent.
    pub fn set_active(&self, active: bool) {
        let mut guard = self.guard.lock();
        match (active, guard.is_some()) {
            (true, false) => {
                *guard = acquire();
            }
            (false, true) => {
                *guard = None;
                debug!("Wake lock released");
            }
            _ => {}
        }
    }

    pub fn is_held(&self) -> bool {
        self.guard.lock().is_some()
    }
}

fn acquire() -> Option<keepawake::KeepAwake> {
    let result = keepawake::Builder::default()
        .display(true)
        .idle(true)
        .reason("Playing relaxation audio")
        .app_name("Lull")
        .app_reverse_domain("io.github.shydev.lull")
        .create();

    match result {
        Ok(guard) => {
            debug!("Wake lock acquired");
            Some(guard)
        }
        Err(e) => {
            // Degrade silently; this is a nicety, not a requirement.
            debug!("Wake lock unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_without_acquire_is_noop() {
        let wake = WakeLockService::new();
        wake.set_active(false);
        assert!(!wake.is_held());
    }

    #[test]
    fn test_set_active_is_idempotent() {
        let wake = WakeLockService::new();
        // Acquisition may legitimately fail on headless CI; either way the
        // second call must not panic or double-acquire.
        wake.set_active(true);
        let held = wake.is_held();
        wake.set_active(true);
        assert_eq!(wake.is_held(), held);
        wake.set_active(false);
        assert!(!wake.is_held());
    }
}
