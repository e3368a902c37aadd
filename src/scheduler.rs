//! Unlock reminder scheduling boundary.
//!
//! Delivery (system notification, push, anything else) lives outside this
//! crate. The capsule store only relies on the register/cancel contract
//! below and treats scheduler failures as best-effort: they are logged and
//! never fail the repository operation that triggered them.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

use crate::capsule::Capsule;

/// Keeps at most one pending reminder per still-locked future capsule.
pub trait UnlockScheduler: Send + Sync {
    /// Schedule a one-shot trigger at the capsule's unlock time, keyed by
    /// the capsule id. Registering an id again replaces any existing
    /// trigger for it.
    fn register(&self, capsule: &Capsule) -> Result<()>;

    /// Remove any pending trigger for the id. No-op when none exists.
    fn cancel(&self, id: &str) -> Result<()>;
}

/// Scheduler that drops every request. Used when no delivery mechanism is
/// wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScheduler;

impl UnlockScheduler for NoopScheduler {
    fn register(&self, _capsule: &Capsule) -> Result<()> {
        Ok(())
    }

    fn cancel(&self, _id: &str) -> Result<()> {
        Ok(())
    }
}

/// In-process scheduler keeping pending triggers in a map. Useful for
/// embedding callers and for asserting the contract in tests.
#[derive(Debug, Default)]
pub struct MemoryScheduler {
    pending: Mutex<HashMap<String, i64>>,
}

impl MemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending trigger time for a capsule id, if any.
    pub fn pending_at(&self, id: &str) -> Option<i64> {
        self.lock().get(id).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        self.pending.lock().expect("scheduler mutex poisoned")
    }
}

impl UnlockScheduler for MemoryScheduler {
    fn register(&self, capsule: &Capsule) -> Result<()> {
        let Some(unlock_at_ms) = capsule.unlock_at_ms() else {
            anyhow::bail!("capsule {} has no unlock time", capsule.id);
        };
        self.lock().insert(capsule.id.clone(), unlock_at_ms);
        Ok(())
    }

    fn cancel(&self, id: &str) -> Result<()> {
        self.lock().remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capsule::{CategoryState, MediaKind};

    fn future_capsule(id: &str, unlock_at_ms: i64) -> Capsule {
        Capsule {
            id: id.to_string(),
            state: CategoryState::Future {
                unlock_at_ms,
                is_unlocked: false,
            },
            title: None,
            created_at: 0,
            duration_seconds: 5,
            media_kind: MediaKind::Video,
            media_file_name: format!("{id}.mp4"),
        }
    }

    #[test]
    fn test_register_replaces_existing_trigger() {
        let scheduler = MemoryScheduler::new();
        scheduler.register(&future_capsule("cap-1", 1_000)).unwrap();
        scheduler.register(&future_capsule("cap-1", 2_000)).unwrap();

        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scheduler.pending_at("cap-1"), Some(2_000));
    }

    #[test]
    fn test_cancel_is_noop_when_absent() {
        let scheduler = MemoryScheduler::new();
        scheduler.cancel("never-registered").unwrap();

        scheduler.register(&future_capsule("cap-1", 1_000)).unwrap();
        scheduler.cancel("cap-1").unwrap();
        assert_eq!(scheduler.pending_at("cap-1"), None);
    }

    #[test]
    fn test_register_rejects_capsule_without_unlock_time() {
        let scheduler = MemoryScheduler::new();
        let mut capsule = future_capsule("cap-1", 1_000);
        capsule.state = CategoryState::Daily;
        assert!(scheduler.register(&capsule).is_err());
    }
}
