use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quill_sdk::{CommentId, PostId, UserId};

#[derive(Parser)]
#[command(
    name = "quill",
    about = "Quill: browse and edit local comment threads",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the persisted comment store
    #[arg(long, global = true, default_value = ".quill")]
    pub data_dir: PathBuf,

    /// TOML file with store settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Id of the user new comments are attributed to
    #[arg(long, global = true, default_value = "me")]
    pub user: UserId,

    /// Display name of that user
    #[arg(long, global = true, default_value = "You")]
    pub name: String,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a post's comments and replies
    List(PostArgs),
    /// Count a post's comments including direct replies
    Count(PostArgs),
    /// Add a comment, or a reply with --reply-to
    Add(AddArgs),
    /// Like a comment, or unlike it if already liked
    Like(TargetArgs),
    /// Replace a comment's text
    Edit(EditArgs),
    /// Delete a comment with its replies, or a single reply
    Delete(TargetArgs),
    /// Forget everything stored and start again from the sample comments
    Reset,
}

#[derive(Args)]
pub struct PostArgs {
    pub post: PostId,
}

#[derive(Args)]
pub struct AddArgs {
    pub post: PostId,
    pub content: String,
    #[arg(long)]
    pub reply_to: Option<CommentId>,
    /// The post is a reel rather than a feed post
    #[arg(long)]
    pub reel: bool,
}

#[derive(Args)]
pub struct TargetArgs {
    pub post: PostId,
    pub comment: CommentId,
}

#[derive(Args)]
pub struct EditArgs {
    pub post: PostId,
    pub comment: CommentId,
    pub content: String,
}
