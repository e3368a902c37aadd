pub mod capsule;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod media;
pub mod scheduler;
pub mod store;
pub mod timefmt;

pub use capsule::{Capsule, CapsuleDraft, CapsulePatch, Category, MediaKind};
pub use config::Config;
pub use error::{Result, StoreError};
pub use media::MediaStore;
pub use scheduler::UnlockScheduler;
pub use store::CapsuleStore;
