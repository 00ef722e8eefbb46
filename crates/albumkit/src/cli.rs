//! Clap derive structures for the `albumkit` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// albumkit -- browse, tag, favorite, and upload photos on a file server
#[derive(Debug, Parser)]
#[command(
    name = "albumkit",
    version,
    about = "Manage photo albums on an albumkit file server",
    long_about = "Command-line client for an albumkit photo file server.\n\n\
        Lists and filters albums and photos, toggles favorites, deletes in\n\
        batches, and uploads files with live progress.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "ALBUMKIT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// File API base URL (overrides configuration), e.g. http://host:8888/api/files
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ALBUMKIT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in milliseconds (overrides configuration)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage albums
    #[command(alias = "a")]
    Albums(AlbumsArgs),

    /// Manage photos
    #[command(alias = "p")]
    Photos(PhotosArgs),

    /// List tags
    #[command(alias = "t")]
    Tags(TagsArgs),

    /// Upload photos
    #[command(alias = "up")]
    Upload(UploadArgs),

    /// Show or write the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared filter arguments ──────────────────────────────────────────

/// Client-side photo filters, applied after loading.
#[derive(Debug, Args, Default)]
pub struct PhotoFilterArgs {
    /// Case-insensitive search across names and tags
    #[arg(long, short = 'f')]
    pub search: Option<String>,

    /// Keep photos carrying any of these tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Earliest creation date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<chrono::NaiveDate>,

    /// Latest creation date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<chrono::NaiveDate>,

    /// Only favorited photos
    #[arg(long)]
    pub favorites: bool,
}

// ── Albums ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlbumsArgs {
    #[command(subcommand)]
    pub command: AlbumsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlbumsCommand {
    /// List albums, most recently updated first
    #[command(alias = "ls")]
    List {
        /// Keep albums carrying any of these tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Only favorited albums
        #[arg(long)]
        favorites: bool,
    },

    /// Show one album
    Get {
        /// Album ID or name
        album: String,
    },

    /// Create an album
    Create {
        /// Album name
        name: String,

        /// Optional description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Rename an album or replace its tags
    Update {
        /// Album ID or name
        album: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Replacement tag list (repeatable)
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },

    /// Delete an album
    #[command(alias = "rm")]
    Delete {
        /// Album ID or name
        album: String,
    },

    /// Toggle an album's favorite flag
    #[command(alias = "fav")]
    Favorite {
        /// Album ID or name
        album: String,
    },

    /// List the photos in an album
    Photos {
        /// Album ID or name
        album: String,

        #[command(flatten)]
        filter: PhotoFilterArgs,
    },
}

// ── Photos ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PhotosArgs {
    #[command(subcommand)]
    pub command: PhotosCommand,
}

#[derive(Debug, Subcommand)]
pub enum PhotosCommand {
    /// List photos, newest first
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: PhotoFilterArgs,
    },

    /// Show one photo
    Get {
        /// Photo ID
        photo: String,
    },

    /// Rename a photo, replace its tags, or move it to an album
    Update {
        /// Photo ID
        photo: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// Replacement tag list (repeatable)
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,

        /// Target album ID
        #[arg(long)]
        album: Option<String>,
    },

    /// Toggle a photo's favorite flag
    #[command(alias = "fav")]
    Favorite {
        /// Photo ID
        photo: String,
    },

    /// Delete one or more photos
    #[command(alias = "rm")]
    Delete {
        /// Photo IDs
        #[arg(required = true, num_args = 1..)]
        photos: Vec<String>,
    },

    /// Print the URL of a photo
    Url {
        /// Photo ID
        photo: String,

        /// Thumbnail instead of the original
        #[arg(long)]
        thumbnail: bool,
    },

    /// Download a photo to disk
    Download {
        /// Photo ID
        photo: String,

        /// Destination file
        #[arg(long, short = 'O')]
        output: PathBuf,

        /// Thumbnail instead of the original
        #[arg(long)]
        thumbnail: bool,
    },
}

// ── Tags ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// List tags, most recently updated first
    #[command(alias = "ls")]
    List {
        /// Group by color
        #[arg(long)]
        by_color: bool,
    },
}

// ── Upload ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Target album ID
    #[arg(long, short = 'a')]
    pub album: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file
    Init {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u32>,

        /// Server protocol (http or https)
        #[arg(long)]
        protocol: Option<String>,

        /// Route requests through the proxy origin
        #[arg(long)]
        use_proxy: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
