//! Record command implementation
//!
//! Stands in for the recording layer handoff: takes an already-recorded
//! media file plus its measured duration and turns it into a capsule.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::DateTime;

use crate::capsule::{CapsuleDraft, Category, CategoryDraft, MediaKind, MAX_DURATION_SECS};
use crate::store::CapsuleStore;
use crate::timefmt;

pub struct RecordArgs {
    pub file: PathBuf,
    pub category: String,
    pub title: Option<String>,
    pub duration: u32,
    pub kind: Option<String>,
    pub unlock_at: Option<String>,
    pub emotion: Option<String>,
}

pub fn run(store: &CapsuleStore, args: RecordArgs) -> Result<()> {
    // The recording layer owns the duration cap; this command is that layer.
    if args.duration > MAX_DURATION_SECS {
        bail!("recordings are capped at {MAX_DURATION_SECS} seconds");
    }

    let category: Category = args.category.parse().map_err(anyhow::Error::msg)?;

    let media_kind = match args.kind {
        Some(kind) => kind.parse().map_err(anyhow::Error::msg)?,
        None => MediaKind::from_path(&args.file)
            .context("cannot infer media kind from the file extension; pass --kind")?,
    };

    let category = match category {
        Category::Daily => CategoryDraft::Daily,
        Category::Future => {
            let raw = args
                .unlock_at
                .context("future capsules need --unlock-at")?;
            let unlock_at_ms = DateTime::parse_from_rfc3339(&raw)
                .context("unlock time must be RFC 3339, e.g. 2027-01-01T09:00:00Z")?
                .timestamp_millis();
            CategoryDraft::Future { unlock_at_ms }
        }
        Category::Lift => {
            let emotion_tag = args.emotion.context("lift capsules need --emotion")?;
            CategoryDraft::Lift { emotion_tag }
        }
    };

    let capsule = store.create(
        &args.file,
        CapsuleDraft {
            category,
            title: args.title,
            duration_seconds: args.duration,
            media_kind,
        },
    )?;

    println!(
        "Created {} capsule {}",
        capsule.category(),
        super::short_id(&capsule.id)
    );
    println!(
        "  {} ({})",
        capsule.display_title(),
        timefmt::format_duration(capsule.duration_seconds)
    );
    if let Some(unlock_at) = capsule.unlock_at_ms() {
        println!(
            "  {}",
            timefmt::describe_unlock(unlock_at, chrono::Utc::now().timestamp_millis())
        );
    }

    Ok(())
}
