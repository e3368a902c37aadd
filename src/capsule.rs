//! Capsule records and category-specific metadata.
//!
//! A capsule is one recorded audio/video note. The three categories carry
//! different extra state: daily capsules none, future capsules an unlock
//! schedule, lift capsules an emotion tag. That state lives in a tagged
//! union so a record can never hold the wrong combination of fields.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::timefmt;

/// Hard cap on recording length in seconds. Enforced by the recording layer
/// before a capsule ever reaches the store.
pub const MAX_DURATION_SECS: u32 = 600;

/// Titles are capped at this many code points at create time.
pub const TITLE_MAX_CHARS: usize = 50;

/// Fixed vocabulary for lift capsule emotion tags.
pub const EMOTION_TAGS: [&str; 10] = [
    "Anxious",
    "Sad",
    "Stressed",
    "Lonely",
    "Overwhelmed",
    "Frustrated",
    "Angry",
    "Worried",
    "Insecure",
    "Tired",
];

/// Canonical form of an emotion tag, matched case-insensitively.
pub fn canonical_emotion(tag: &str) -> Option<&'static str> {
    EMOTION_TAGS.iter().copied().find(|e| e.eq_ignore_ascii_case(tag))
}

/// Capsule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Daily,
    Future,
    Lift,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Daily => "daily",
            Category::Future => "future",
            Category::Lift => "lift",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Category::Daily),
            "future" => Ok(Category::Future),
            "lift" => Ok(Category::Lift),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Media container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// Canonical file extension for managed files of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Video => "mp4",
            MediaKind::Audio => "m4a",
        }
    }

    /// Infer the kind from a file's extension.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "mp4" => Some(MediaKind::Video),
            "m4a" => Some(MediaKind::Audio),
            _ => None,
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            other => Err(format!("unknown media kind '{other}'")),
        }
    }
}

/// Category-specific record state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum CategoryState {
    Daily,
    #[serde(rename_all = "camelCase")]
    Future { unlock_at_ms: i64, is_unlocked: bool },
    #[serde(rename_all = "camelCase")]
    Lift { emotion_tag: String },
}

/// A single recorded capsule.
///
/// Serialized flat: the category tag and its fields sit alongside the common
/// fields, so the persisted JSON carries exactly the optional fields that
/// apply to the record's category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capsule {
    pub id: String,
    #[serde(flatten)]
    pub state: CategoryState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Milliseconds since the Unix epoch, recorded verbatim at creation.
    pub created_at: i64,
    pub duration_seconds: u32,
    pub media_kind: MediaKind,
    /// Relative name of the managed media file, never a full path.
    pub media_file_name: String,
}

impl Capsule {
    pub fn category(&self) -> Category {
        match self.state {
            CategoryState::Daily => Category::Daily,
            CategoryState::Future { .. } => Category::Future,
            CategoryState::Lift { .. } => Category::Lift,
        }
    }

    /// Whether this is a future capsule still waiting on its unlock time.
    pub fn is_locked(&self) -> bool {
        matches!(
            self.state,
            CategoryState::Future {
                is_unlocked: false,
                ..
            }
        )
    }

    pub fn unlock_at_ms(&self) -> Option<i64> {
        match self.state {
            CategoryState::Future { unlock_at_ms, .. } => Some(unlock_at_ms),
            _ => None,
        }
    }

    pub fn is_unlocked(&self) -> Option<bool> {
        match self.state {
            CategoryState::Future { is_unlocked, .. } => Some(is_unlocked),
            _ => None,
        }
    }

    pub fn emotion_tag(&self) -> Option<&str> {
        match &self.state {
            CategoryState::Lift { emotion_tag } => Some(emotion_tag),
            _ => None,
        }
    }

    /// Title shown to the user: the stored title, or the creation date when
    /// none was supplied.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => timefmt::format_date(self.created_at),
        }
    }
}

/// Category payload supplied at create time.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryDraft {
    Daily,
    Future { unlock_at_ms: i64 },
    Lift { emotion_tag: String },
}

impl CategoryDraft {
    /// Initial record state for a validated draft. Emotion tags are stored
    /// in their canonical capitalization.
    pub(crate) fn into_state(self) -> CategoryState {
        match self {
            CategoryDraft::Daily => CategoryState::Daily,
            CategoryDraft::Future { unlock_at_ms } => CategoryState::Future {
                unlock_at_ms,
                is_unlocked: false,
            },
            CategoryDraft::Lift { emotion_tag } => {
                let emotion_tag = canonical_emotion(&emotion_tag)
                    .map(str::to_string)
                    .unwrap_or(emotion_tag);
                CategoryState::Lift { emotion_tag }
            }
        }
    }
}

/// Metadata handed to [`crate::store::CapsuleStore::create`] together with
/// the recorded file.
#[derive(Debug, Clone)]
pub struct CapsuleDraft {
    pub category: CategoryDraft,
    pub title: Option<String>,
    /// Recorded length in seconds, as measured by the recording layer.
    pub duration_seconds: u32,
    pub media_kind: MediaKind,
}

impl CapsuleDraft {
    /// Validate category-specific invariants against the creation instant.
    /// Runs before any file is touched.
    pub(crate) fn validate(&self, now_ms: i64) -> Result<()> {
        if let Some(title) = &self.title {
            if title.chars().count() > TITLE_MAX_CHARS {
                return Err(StoreError::ValidationFailed(format!(
                    "title exceeds {TITLE_MAX_CHARS} characters"
                )));
            }
        }

        match &self.category {
            CategoryDraft::Daily => Ok(()),
            CategoryDraft::Future { unlock_at_ms } => {
                if *unlock_at_ms <= now_ms {
                    return Err(StoreError::ValidationFailed(
                        "unlock time must be later than the creation time".to_string(),
                    ));
                }
                Ok(())
            }
            CategoryDraft::Lift { emotion_tag } => match canonical_emotion(emotion_tag) {
                Some(_) => Ok(()),
                None => Err(StoreError::ValidationFailed(format!(
                    "unknown emotion tag '{emotion_tag}'"
                ))),
            },
        }
    }
}

/// Field-level partial update applied through
/// [`crate::store::CapsuleStore::update`].
///
/// The unlock flag is one-way: a future capsule can be promoted to unlocked
/// but never relocked.
#[derive(Debug, Clone, Default)]
pub struct CapsulePatch {
    /// Replacement title, left unchanged when `None`.
    pub title: Option<String>,
    /// Promote a future capsule to unlocked. Ignored for other categories.
    pub unlock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily_capsule() -> Capsule {
        Capsule {
            id: "cap-1".to_string(),
            state: CategoryState::Daily,
            title: None,
            created_at: 0,
            duration_seconds: 42,
            media_kind: MediaKind::Audio,
            media_file_name: "cap-1.m4a".to_string(),
        }
    }

    #[test]
    fn test_daily_serializes_without_category_fields() {
        let json = serde_json::to_value(daily_capsule()).unwrap();
        assert_eq!(json["category"], "daily");
        assert_eq!(json["durationSeconds"], 42);
        assert_eq!(json["mediaKind"], "audio");
        assert_eq!(json["mediaFileName"], "cap-1.m4a");
        assert!(json.get("title").is_none());
        assert!(json.get("unlockAtMs").is_none());
        assert!(json.get("isUnlocked").is_none());
        assert!(json.get("emotionTag").is_none());
    }

    #[test]
    fn test_future_serializes_with_unlock_fields() {
        let capsule = Capsule {
            state: CategoryState::Future {
                unlock_at_ms: 1_234,
                is_unlocked: false,
            },
            media_kind: MediaKind::Video,
            media_file_name: "cap-1.mp4".to_string(),
            ..daily_capsule()
        };
        let json = serde_json::to_value(&capsule).unwrap();
        assert_eq!(json["category"], "future");
        assert_eq!(json["unlockAtMs"], 1_234);
        assert_eq!(json["isUnlocked"], false);
        assert!(json.get("emotionTag").is_none());

        let back: Capsule = serde_json::from_value(json).unwrap();
        assert_eq!(back, capsule);
    }

    #[test]
    fn test_lift_round_trips_with_emotion_tag() {
        let capsule = Capsule {
            state: CategoryState::Lift {
                emotion_tag: "Tired".to_string(),
            },
            title: Some("Rough day".to_string()),
            ..daily_capsule()
        };
        let json = serde_json::to_string(&capsule).unwrap();
        let back: Capsule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, capsule);
        assert_eq!(back.emotion_tag(), Some("Tired"));
    }

    #[test]
    fn test_display_title_falls_back_to_creation_date() {
        let mut capsule = daily_capsule();
        assert_eq!(capsule.display_title(), timefmt::format_date(0));

        capsule.title = Some("Morning Walk".to_string());
        assert_eq!(capsule.display_title(), "Morning Walk");
    }

    #[test]
    fn test_canonical_emotion_matches_case_insensitively() {
        assert_eq!(canonical_emotion("tired"), Some("Tired"));
        assert_eq!(canonical_emotion("OVERWHELMED"), Some("Overwhelmed"));
        assert_eq!(canonical_emotion("ecstatic"), None);
    }

    #[test]
    fn test_validate_rejects_past_unlock_time() {
        let draft = CapsuleDraft {
            category: CategoryDraft::Future { unlock_at_ms: 999 },
            title: None,
            duration_seconds: 10,
            media_kind: MediaKind::Video,
        };
        assert!(matches!(
            draft.validate(1_000),
            Err(StoreError::ValidationFailed(_))
        ));
        // Exactly the creation instant is also too early.
        let draft = CapsuleDraft {
            category: CategoryDraft::Future {
                unlock_at_ms: 1_000,
            },
            ..draft
        };
        assert!(draft.validate(1_000).is_err());
    }

    #[test]
    fn test_validate_title_length_boundary() {
        let at_cap = "x".repeat(TITLE_MAX_CHARS);
        let draft = CapsuleDraft {
            category: CategoryDraft::Daily,
            title: Some(at_cap),
            duration_seconds: 10,
            media_kind: MediaKind::Audio,
        };
        assert!(draft.validate(0).is_ok());

        let over_cap = "x".repeat(TITLE_MAX_CHARS + 1);
        let draft = CapsuleDraft {
            title: Some(over_cap),
            ..draft
        };
        assert!(matches!(
            draft.validate(0),
            Err(StoreError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_emotion() {
        let draft = CapsuleDraft {
            category: CategoryDraft::Lift {
                emotion_tag: "Jubilant".to_string(),
            },
            title: None,
            duration_seconds: 10,
            media_kind: MediaKind::Audio,
        };
        assert!(matches!(
            draft.validate(0),
            Err(StoreError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_lift_draft_stores_canonical_emotion() {
        let state = CategoryDraft::Lift {
            emotion_tag: "anxious".to_string(),
        }
        .into_state();
        assert_eq!(
            state,
            CategoryState::Lift {
                emotion_tag: "Anxious".to_string()
            }
        );
    }
}
