//! Stats command implementation

use anyhow::Result;

use crate::store::CapsuleStore;

pub fn run(store: &CapsuleStore) -> Result<()> {
    let counts = store.counts()?;
    let stats = store.storage_stats()?;

    println!(
        "Capsules: {} (daily {}, future {}, lift {})",
        stats.capsule_count, counts.daily, counts.future, counts.lift
    );
    println!("Media:    {}", format_bytes(stats.usage.used_by_media_bytes));
    if stats.usage.total_bytes > 0 {
        println!(
            "Disk:     {} free of {}",
            format_bytes(stats.usage.free_bytes),
            format_bytes(stats.usage.total_bytes)
        );
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
