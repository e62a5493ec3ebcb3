//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use metalframe_core::domain::{Lang, PostId};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the API server
    #[arg(long, env = "METALFRAME_API", default_value = "http://localhost:3000")]
    pub api_base: String,

    /// Directory holding the local post cache
    #[arg(long, env = "METALFRAME_CACHE_DIR", default_value = ".metalframe")]
    pub cache_dir: PathBuf,

    /// Language used to display titles and descriptions
    #[arg(long, default_value_t = Lang::En)]
    pub lang: Lang,

    /// Log what the client is doing
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List posts, newest first
    List {
        /// Print the raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one post
    Show { id: PostId },
    /// Create a post
    Create {
        #[command(flatten)]
        fields: PostFields,
    },
    /// Update a post; omitted fields keep their current values
    Update {
        id: PostId,
        #[command(flatten)]
        fields: PostFields,
    },
    /// Delete a post
    Delete { id: PostId },
    /// Send the local cache to the server
    Import,
}

#[derive(Debug, Clone, Default, Args)]
pub struct PostFields {
    #[arg(long)]
    pub title_en: Option<String>,
    #[arg(long)]
    pub title_uk: Option<String>,
    #[arg(long)]
    pub description_en: Option<String>,
    #[arg(long)]
    pub description_uk: Option<String>,
    /// Image file to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}
