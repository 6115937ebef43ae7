use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use colored::Colorize;
use quill_sdk::{
    relative_time, Author, Comment, CommentBody, CommentStore, FileKeyValueStore, KeyValueStore,
    PostType, SessionIdentity, StoreConfig, Timestamp,
};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref()).await?;
    let files = FileKeyValueStore::open(&cli.data_dir)
        .await
        .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?;

    if let Command::Reset = cli.command {
        files.remove(&config.storage_key).await?;
        println!("{} Cleared comments in {}", "✓".green().bold(), cli.data_dir.display());
        return Ok(());
    }

    let identity = SessionIdentity::signed_in(Author::new(cli.user.clone(), cli.name.clone()));
    let store = CommentStore::open(Arc::new(files), Arc::new(identity), config).await;

    match cli.command {
        Command::List(args) => cmd_list(&store, args, &cli.format)?,
        Command::Count(args) => cmd_count(&store, args, &cli.format),
        Command::Add(args) => cmd_add(&store, args).await?,
        Command::Like(args) => cmd_like(&store, args).await?,
        Command::Edit(args) => {
            store.edit_comment(&args.post, &args.comment, &args.content).await?;
            println!("{} Edited {}", "✓".green().bold(), args.comment.to_string().yellow());
        }
        Command::Delete(args) => {
            store.delete_comment(&args.post, &args.comment).await?;
            println!("{} Deleted {}", "✓".green().bold(), args.comment.to_string().yellow());
        }
        Command::Reset => {}
    }

    if let Some(err) = store.error() {
        eprintln!("{} {}", "warning:".yellow().bold(), err);
    }
    Ok(())
}

async fn load_config(path: Option<&Path>) -> anyhow::Result<StoreConfig> {
    let Some(path) = path else {
        return Ok(StoreConfig::default().without_latency());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    Ok(StoreConfig::from_toml_str(&text)?)
}

fn cmd_list(store: &CommentStore, args: PostArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let thread = store.comments(&args.post);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*thread)?),
        OutputFormat::Text if thread.is_empty() => println!("No comments on post {}.", args.post),
        OutputFormat::Text => print!("{}", render_thread(&thread, Utc::now())),
    }
    Ok(())
}

fn cmd_count(store: &CommentStore, args: PostArgs, format: &OutputFormat) {
    let count = store.comment_count(&args.post);
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "post": args.post, "count": count })),
        OutputFormat::Text => println!("{} comments on post {}", count.to_string().bold(), args.post),
    }
}

async fn cmd_add(store: &CommentStore, args: AddArgs) -> anyhow::Result<()> {
    let post_type = if args.reel { PostType::Reel } else { PostType::Feed };
    let id = store
        .add_comment(&args.post, post_type, &args.content, args.reply_to.as_ref())
        .await?;
    match &args.reply_to {
        Some(parent) => println!("{} Replied to {} as {}", "✓".green().bold(), parent.to_string().yellow(), id.to_string().cyan()),
        None => println!("{} Commented as {}", "✓".green().bold(), id.to_string().cyan()),
    }
    Ok(())
}

async fn cmd_like(store: &CommentStore, args: TargetArgs) -> anyhow::Result<()> {
    store.like_comment(&args.post, &args.comment).await?;
    let snapshot = store.snapshot();
    if let Some(body) = snapshot.find(&args.post, &args.comment) {
        let verb = if body.is_liked { "Liked" } else { "Unliked" };
        println!("{} {} {} ({} likes)", "✓".green().bold(), verb, args.comment.to_string().yellow(), body.likes);
    }
    Ok(())
}

fn header(body: &CommentBody, now: Timestamp) -> String {
    let mut line = format!(
        "{}  {} · {}",
        body.id.to_string().dimmed(),
        body.author.name.bold(),
        relative_time(body.created_at, now),
    );
    let heart = if body.is_liked { "♥".red() } else { "♡".normal() };
    let _ = write!(line, " · {} {}", heart, body.likes);
    if body.is_edited {
        let _ = write!(line, " · {}", "edited".italic());
    }
    line
}

/// Text rendering of a thread: each comment, then its replies indented.
pub fn render_thread(thread: &[Arc<Comment>], now: Timestamp) -> String {
    let mut out = String::new();
    for comment in thread {
        let _ = writeln!(out, "{}", header(&comment.body, now));
        let _ = writeln!(out, "  {}", comment.body.content);
        for reply in &comment.replies {
            let _ = writeln!(out, "  ↳ {}", header(&reply.body, now));
            let _ = writeln!(out, "      {}", reply.body.content);
        }
    }
    out
}
