//! Sweep command implementation

use anyhow::Result;

use crate::store::CapsuleStore;

pub fn run(store: &CapsuleStore) -> Result<()> {
    let unlocked = store.sweep_unlocks()?;

    if unlocked.is_empty() {
        println!("No capsules ready to unlock.");
        return Ok(());
    }

    for capsule in &unlocked {
        println!(
            "Unlocked: {} ({})",
            capsule.display_title(),
            super::short_id(&capsule.id)
        );
    }
    println!("{} capsule(s) unlocked.", unlocked.len());

    Ok(())
}
