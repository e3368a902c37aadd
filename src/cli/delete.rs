//! Delete command implementation

use anyhow::Result;

use crate::store::CapsuleStore;

pub fn run(store: &CapsuleStore, id: &str) -> Result<()> {
    match super::find_capsule(store, id)? {
        Some(capsule) => {
            store.delete(&capsule.id)?;
            println!(
                "Deleted capsule {} ({})",
                super::short_id(&capsule.id),
                capsule.display_title()
            );
        }
        None => println!("Capsule '{}' not found.", id),
    }
    Ok(())
}
