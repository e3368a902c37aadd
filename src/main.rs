use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use keepsake::cli::{delete, list, record, show, stats, sweep};
use keepsake::config::Config;
use keepsake::media::MediaStore;
use keepsake::scheduler::NoopScheduler;
use keepsake::store::CapsuleStore;

#[derive(Parser)]
#[command(name = "keepsake")]
#[command(about = "Local-first store for recorded audio/video capsules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "keepsake.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a recorded media file as a new capsule
    Record {
        /// Recorded media file; it is moved into managed storage
        file: PathBuf,

        /// Capsule category (daily, future, lift)
        #[arg(long, default_value = "daily")]
        category: String,

        /// Optional title, at most 50 characters
        #[arg(short, long)]
        title: Option<String>,

        /// Recorded duration in seconds, as measured by the recorder
        #[arg(short, long)]
        duration: u32,

        /// Media kind (video, audio); inferred from the extension when omitted
        #[arg(short, long)]
        kind: Option<String>,

        /// Unlock time for future capsules (RFC 3339)
        #[arg(long)]
        unlock_at: Option<String>,

        /// Emotion tag for lift capsules
        #[arg(long)]
        emotion: Option<String>,
    },

    /// List capsules
    List {
        /// Restrict to one category (daily, future, lift)
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive title search
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order (recent, oldest)
        #[arg(long, default_value = "recent")]
        sort: String,

        /// Future category: only still-locked capsules
        #[arg(long)]
        locked: bool,

        /// Future category: only unlocked capsules
        #[arg(long)]
        unlocked: bool,

        /// Lift category: filter by emotion tag
        #[arg(long)]
        emotion: Option<String>,
    },

    /// Show one capsule in detail
    Show {
        /// Capsule id or unique prefix
        id: String,
    },

    /// Delete a capsule and its media file
    Delete {
        /// Capsule id or unique prefix
        id: String,
    },

    /// Promote future capsules whose unlock time has passed
    Sweep,

    /// Show storage usage
    Stats,
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("keepsake=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_default();

    // Initialize store
    let media = MediaStore::new(config.media_dir());
    let store = CapsuleStore::open(&config.database_path(), media, Arc::new(NoopScheduler))?;

    match cli.command {
        Commands::Record {
            file,
            category,
            title,
            duration,
            kind,
            unlock_at,
            emotion,
        } => {
            record::run(
                &store,
                record::RecordArgs {
                    file,
                    category,
                    title,
                    duration,
                    kind,
                    unlock_at,
                    emotion,
                },
            )?;
        }
        Commands::List {
            category,
            search,
            sort,
            locked,
            unlocked,
            emotion,
        } => {
            list::run(
                &store,
                list::ListArgs {
                    category,
                    search,
                    sort,
                    locked,
                    unlocked,
                    emotion,
                },
            )?;
        }
        Commands::Show { id } => {
            show::run(&store, &id)?;
        }
        Commands::Delete { id } => {
            delete::run(&store, &id)?;
        }
        Commands::Sweep => {
            sweep::run(&store)?;
        }
        Commands::Stats => {
            stats::run(&store)?;
        }
    }

    Ok(())
}
