//! List command implementation

use anyhow::{bail, Result};
use chrono::Utc;

use crate::capsule::{Capsule, Category};
use crate::store::{CapsuleStore, CategoryFilter, ListOptions};
use crate::timefmt;

pub struct ListArgs {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: String,
    pub locked: bool,
    pub unlocked: bool,
    pub emotion: Option<String>,
}

pub fn run(store: &CapsuleStore, args: ListArgs) -> Result<()> {
    let capsules = match &args.category {
        Some(category) => {
            let category: Category = category.parse().map_err(anyhow::Error::msg)?;
            let opts = ListOptions {
                sort: args.sort.parse().map_err(anyhow::Error::msg)?,
                filter: build_filter(&args)?,
                search: args.search.clone(),
            };
            store.query(category, &opts)?
        }
        None => store.list()?,
    };

    if capsules.is_empty() {
        println!("No capsules found. Run 'keepsake record' first.");
        return Ok(());
    }

    println!(
        "{:<10} {:<8} {:<22} {:<7} {}",
        "ID", "Category", "Created", "Length", "Title"
    );
    println!("{}", "-".repeat(80));

    let now = Utc::now().timestamp_millis();
    for capsule in &capsules {
        println!(
            "{:<10} {:<8} {:<22} {:<7} {}",
            super::short_id(&capsule.id),
            capsule.category().as_str(),
            timefmt::format_date_time(capsule.created_at),
            timefmt::format_duration(capsule.duration_seconds),
            annotated_title(capsule, now),
        );
    }

    Ok(())
}

fn build_filter(args: &ListArgs) -> Result<CategoryFilter> {
    if args.locked && args.unlocked {
        bail!("pass at most one of --locked/--unlocked");
    }
    if args.locked {
        return Ok(CategoryFilter::Locked);
    }
    if args.unlocked {
        return Ok(CategoryFilter::Unlocked);
    }
    if let Some(emotion) = &args.emotion {
        return Ok(CategoryFilter::Emotion(emotion.clone()));
    }
    Ok(CategoryFilter::All)
}

fn annotated_title(capsule: &Capsule, now_ms: i64) -> String {
    let title = capsule.display_title();
    if let Some(unlock_at) = capsule.unlock_at_ms() {
        if capsule.is_locked() {
            return format!("{} ({})", title, timefmt::describe_unlock(unlock_at, now_ms));
        }
        return format!("{title} (unlocked)");
    }
    if let Some(emotion) = capsule.emotion_tag() {
        return format!("{title} [{emotion}]");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SortBy;

    fn args() -> ListArgs {
        ListArgs {
            category: None,
            search: None,
            sort: "recent".to_string(),
            locked: false,
            unlocked: false,
            emotion: None,
        }
    }

    #[test]
    fn test_build_filter_rejects_conflicting_flags() {
        let conflicting = ListArgs {
            locked: true,
            unlocked: true,
            ..args()
        };
        assert!(build_filter(&conflicting).is_err());
    }

    #[test]
    fn test_build_filter_prefers_lock_flags() {
        let locked = ListArgs {
            locked: true,
            ..args()
        };
        assert_eq!(build_filter(&locked).unwrap(), CategoryFilter::Locked);

        let emotion = ListArgs {
            emotion: Some("Tired".to_string()),
            ..args()
        };
        assert_eq!(
            build_filter(&emotion).unwrap(),
            CategoryFilter::Emotion("Tired".to_string())
        );
    }

    #[test]
    fn test_sort_parses() {
        assert_eq!("recent".parse::<SortBy>().unwrap(), SortBy::Recent);
        assert_eq!("oldest".parse::<SortBy>().unwrap(), SortBy::Oldest);
        assert!("newest".parse::<SortBy>().is_err());
    }
}
