//! Capsule repository: the single source of truth for capsule records.
//!
//! Records, media files, and unlock reminders are kept consistent here. A
//! create adopts the recording before the record is persisted, a delete
//! removes the record first and then cleans up file and reminder
//! best-effort, and future capsules are promoted to unlocked by a
//! pull-based sweep that runs on every read.
//!
//! The collection is persisted whole (one JSON array under one key), so
//! every mutating operation is a read-modify-write. All of them run inside
//! a single mutex to rule out lost updates between concurrent callers.

mod query;
mod schema;

pub use query::{CategoryFilter, ListOptions, SortBy};
pub use schema::{CAPSULES_KEY, SCHEMA};

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;
use uuid::Uuid;

use crate::capsule::{Capsule, CapsuleDraft, CapsulePatch, Category, CategoryState};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, StoreError};
use crate::media::{MediaStore, UsageStats};
use crate::scheduler::UnlockScheduler;

/// Latest capsule per category for the overview screen: daily and lift by
/// newest creation, future by soonest upcoming unlock among still-locked
/// records.
#[derive(Debug, Clone, Default)]
pub struct LatestPerCategory {
    pub daily: Option<Capsule>,
    pub future: Option<Capsule>,
    pub lift: Option<Capsule>,
}

/// Per-category record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub daily: usize,
    pub future: usize,
    pub lift: usize,
}

/// Disk usage plus record count.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageStats {
    pub usage: UsageStats,
    pub capsule_count: usize,
}

pub struct CapsuleStore {
    conn: Mutex<Connection>,
    media: MediaStore,
    scheduler: Arc<dyn UnlockScheduler>,
    clock: Arc<dyn Clock>,
}

impl CapsuleStore {
    /// Open (or create) the store at `db_path` with the system clock.
    pub fn open(
        db_path: &Path,
        media: MediaStore,
        scheduler: Arc<dyn UnlockScheduler>,
    ) -> Result<Self> {
        Self::open_with_clock(db_path, media, scheduler, Arc::new(SystemClock))
    }

    /// Open with an explicit time source.
    pub fn open_with_clock(
        db_path: &Path,
        media: MediaStore,
        scheduler: Arc<dyn UnlockScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::StorageUnavailable {
                dir: parent.to_path_buf(),
                source,
            })?;
        }
        media.ensure_ready()?;

        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            media,
            scheduler,
            clock,
        })
    }

    /// The managed media file store (path resolution, disk usage).
    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("capsule store mutex poisoned")
    }

    fn load(conn: &Connection) -> Result<Vec<Capsule>> {
        let blob: Option<String> = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?",
                params![CAPSULES_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match blob {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(conn: &Connection, capsules: &[Capsule]) -> Result<()> {
        let json = serde_json::to_string(capsules)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![CAPSULES_KEY, json],
        )?;
        Ok(())
    }

    // ============================================
    // LIFECYCLE
    // ============================================

    /// Validate the draft, adopt the recording, and persist the new record.
    ///
    /// Future capsules also get an unlock reminder registered; a scheduler
    /// failure is logged and the record kept, since the record is the
    /// durable source of truth.
    pub fn create(&self, temp_media: &Path, draft: CapsuleDraft) -> Result<Capsule> {
        let now = self.clock.now_ms();
        draft.validate(now)?;

        let CapsuleDraft {
            category,
            title,
            duration_seconds,
            media_kind,
        } = draft;

        let conn = self.lock_conn();
        let mut capsules = Self::load(&conn)?;

        let id = Uuid::new_v4().to_string();
        let media_file_name = self.media.adopt(temp_media, media_kind, &id)?;

        let capsule = Capsule {
            id,
            state: category.into_state(),
            title,
            created_at: now,
            duration_seconds,
            media_kind,
            media_file_name,
        };

        capsules.push(capsule.clone());
        if let Err(err) = Self::persist(&conn, &capsules) {
            // The record never committed; take the adopted file back out.
            self.media.remove(&capsule.media_file_name);
            return Err(err);
        }
        drop(conn);

        if capsule.is_locked() {
            if let Err(err) = self.scheduler.register(&capsule) {
                warn!(id = %capsule.id, error = %err, "failed to register unlock reminder");
            }
        }

        Ok(capsule)
    }

    /// Merge supplied fields into an existing record.
    ///
    /// The unlock promotion is one-way; a relock is not representable.
    pub fn update(&self, id: &str, patch: CapsulePatch) -> Result<Capsule> {
        let conn = self.lock_conn();
        let mut capsules = Self::load(&conn)?;
        let capsule = capsules
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            capsule.title = Some(title);
        }
        if patch.unlock {
            if let CategoryState::Future { is_unlocked, .. } = &mut capsule.state {
                *is_unlocked = true;
            }
        }

        let updated = capsule.clone();
        Self::persist(&conn, &capsules)?;
        Ok(updated)
    }

    /// Remove a capsule record, then clean up its media file and any
    /// pending unlock reminder.
    ///
    /// Metadata removal is the operation of record: file and reminder
    /// cleanup failures are logged, never propagated.
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn();
        let mut capsules = Self::load(&conn)?;
        let position = capsules
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let removed = capsules.remove(position);
        Self::persist(&conn, &capsules)?;
        drop(conn);

        self.media.remove(&removed.media_file_name);
        if removed.category() == Category::Future {
            if let Err(err) = self.scheduler.cancel(&removed.id) {
                warn!(id = %removed.id, error = %err, "failed to cancel unlock reminder");
            }
        }

        Ok(())
    }

    // ============================================
    // UNLOCK SWEEP
    // ============================================

    /// Promote every future capsule whose unlock time has passed and return
    /// the newly unlocked records.
    ///
    /// The transition is pull-based: it happens here and on reads, never
    /// from a background task. A capsule whose unlock time passes while the
    /// process is down stays marked locked until the next sweep.
    pub fn sweep_unlocks(&self) -> Result<Vec<Capsule>> {
        let conn = self.lock_conn();
        let mut capsules = Self::load(&conn)?;
        self.sweep_in_place(&conn, &mut capsules)
    }

    fn sweep_in_place(&self, conn: &Connection, capsules: &mut [Capsule]) -> Result<Vec<Capsule>> {
        let now = self.clock.now_ms();
        let mut newly_unlocked = Vec::new();

        for capsule in capsules.iter_mut() {
            if let CategoryState::Future {
                unlock_at_ms,
                is_unlocked,
            } = &mut capsule.state
            {
                if !*is_unlocked && *unlock_at_ms <= now {
                    *is_unlocked = true;
                    newly_unlocked.push(capsule.clone());
                }
            }
        }

        if !newly_unlocked.is_empty() {
            Self::persist(conn, capsules)?;
        }
        Ok(newly_unlocked)
    }

    // ============================================
    // QUERIES
    // ============================================

    /// All capsules in insertion order, after the unlock sweep.
    pub fn list(&self) -> Result<Vec<Capsule>> {
        let conn = self.lock_conn();
        let mut capsules = Self::load(&conn)?;
        self.sweep_in_place(&conn, &mut capsules)?;
        Ok(capsules)
    }

    /// `list` filtered to one category.
    pub fn list_by_category(&self, category: Category) -> Result<Vec<Capsule>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|c| c.category() == category)
            .collect())
    }

    /// Category listing with search, filter, and sort applied.
    pub fn query(&self, category: Category, opts: &ListOptions) -> Result<Vec<Capsule>> {
        let mut capsules = self.list_by_category(category)?;
        query::filter_and_sort(&mut capsules, category, opts);
        Ok(capsules)
    }

    pub fn get(&self, id: &str) -> Result<Option<Capsule>> {
        Ok(self.list()?.into_iter().find(|c| c.id == id))
    }

    /// Newest daily and lift capsules plus the next future unlock.
    pub fn latest_per_category(&self) -> Result<LatestPerCategory> {
        let capsules = self.list()?;

        let latest_created = |category: Category| {
            capsules
                .iter()
                .filter(|c| c.category() == category)
                .max_by_key(|c| c.created_at)
                .cloned()
        };
        // Unlocked future capsules no longer count toward "next unlock".
        let next_unlock = capsules
            .iter()
            .filter(|c| c.is_locked())
            .min_by_key(|c| c.unlock_at_ms().unwrap_or(i64::MAX))
            .cloned();

        Ok(LatestPerCategory {
            daily: latest_created(Category::Daily),
            future: next_unlock,
            lift: latest_created(Category::Lift),
        })
    }

    pub fn counts(&self) -> Result<CategoryCounts> {
        let mut counts = CategoryCounts::default();
        for capsule in self.list()? {
            match capsule.category() {
                Category::Daily => counts.daily += 1,
                Category::Future => counts.future += 1,
                Category::Lift => counts.lift += 1,
            }
        }
        Ok(counts)
    }

    /// Disk usage of the managed directory plus the record count.
    pub fn storage_stats(&self) -> Result<StorageStats> {
        let capsule_count = self.list()?.len();
        Ok(StorageStats {
            usage: self.media.usage_stats(),
            capsule_count,
        })
    }
}
