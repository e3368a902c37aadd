//! CLI command implementations

pub mod delete;
pub mod list;
pub mod record;
pub mod show;
pub mod stats;
pub mod sweep;

use anyhow::{bail, Result};

use crate::capsule::Capsule;
use crate::store::CapsuleStore;

/// Resolve a full capsule id or a unique prefix.
pub(crate) fn find_capsule(store: &CapsuleStore, query: &str) -> Result<Option<Capsule>> {
    let capsules = store.list()?;
    if let Some(exact) = capsules.iter().find(|c| c.id == query) {
        return Ok(Some(exact.clone()));
    }

    let matches: Vec<&Capsule> = capsules
        .iter()
        .filter(|c| c.id.starts_with(query))
        .collect();
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0].clone())),
        n => bail!("capsule id prefix '{query}' is ambiguous ({n} matches)"),
    }
}

/// Short display form of a capsule id.
pub(crate) fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}
