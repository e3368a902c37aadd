//! Show command implementation

use anyhow::Result;
use chrono::Utc;

use crate::store::CapsuleStore;
use crate::timefmt;

pub fn run(store: &CapsuleStore, id: &str) -> Result<()> {
    let capsule = match super::find_capsule(store, id)? {
        Some(capsule) => capsule,
        None => {
            println!("Capsule '{}' not found.", id);
            return Ok(());
        }
    };

    println!("\n{}", "=".repeat(60));
    println!("{}", capsule.display_title());
    println!("{}", "=".repeat(60));
    println!("Id:       {}", capsule.id);
    println!("Category: {}", capsule.category());
    println!("Created:  {}", timefmt::format_date_time(capsule.created_at));
    println!(
        "Length:   {}",
        timefmt::format_duration(capsule.duration_seconds)
    );
    println!(
        "Media:    {}",
        store.media().resolve(&capsule.media_file_name).display()
    );

    if let Some(unlock_at) = capsule.unlock_at_ms() {
        let now = Utc::now().timestamp_millis();
        println!("Unlocks:  {}", timefmt::format_date_time(unlock_at));
        println!("Status:   {}", timefmt::describe_unlock(unlock_at, now));
    }
    if let Some(emotion) = capsule.emotion_tag() {
        println!("Emotion:  {}", emotion);
    }

    Ok(())
}
