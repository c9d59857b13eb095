use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use donetick::notify::{NotificationOffset, SmartKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "donetick")]
#[command(about = "Natural-language task input and notification planning", long_about = None)]
pub struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a task sentence and print the structured result
    Parse {
        sentence: String,

        /// Known label, may be repeated
        #[arg(short, long = "label")]
        labels: Vec<String>,

        /// Reference time (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Read numeric dates as day/month
        #[arg(long)]
        day_first: bool,
    },

    /// Show offsets in chronological order with their timeline position
    Timeline {
        /// Offsets such as -1d, -3h, 0, +30m
        #[arg(required = true, allow_hyphen_values = true)]
        offsets: Vec<NotificationOffset>,
    },

    /// List the notifications that would fire for a task
    Plan {
        #[arg(short, long)]
        name: String,

        /// Due date (RFC 3339)
        #[arg(long)]
        due: DateTime<Utc>,

        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Offsets to use instead of the saved default template
        #[arg(allow_hyphen_values = true)]
        offsets: Vec<NotificationOffset>,
    },

    /// Inspect or edit the saved default template
    Default {
        #[command(subcommand)]
        action: DefaultAction,
    },
}

#[derive(Subcommand)]
pub enum DefaultAction {
    Show,

    /// Replace the default template
    Set {
        #[arg(required = true, allow_hyphen_values = true)]
        offsets: Vec<NotificationOffset>,
    },

    /// Append a suggested reminder, due or followup notification
    Add { kind: SmartKind },

    /// Remove the entry at a position shown by `default show`
    Rm { index: usize },
}
