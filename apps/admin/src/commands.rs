//! Subcommand execution on top of the posts synchronization layer.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use metalframe_core::SyncError;
use metalframe_core::error::NOT_FOUND_LOCALLY;
use metalframe_core::domain::{ImageUpload, Lang, LocalizedText, Post, PostForm};
use metalframe_core::sync::{PostsSync, Session, StorageMode, WriteOutcome};
use metalframe_infra::{FileStore, HttpPostsApi};

use crate::cli::{Cli, Command, PostFields};

pub async fn run(cli: Cli) -> Result<()> {
    let sync = PostsSync::new(
        Arc::new(HttpPostsApi::new(cli.api_base.clone())),
        Arc::new(FileStore::new(cli.cache_dir.clone())),
    );
    let mut out = std::io::stdout().lock();
    execute(&sync, &cli, &mut out).await
}

/// Run one subcommand. Every invocation starts with a read, which decides
/// whether the session talks to the server or to the local cache.
pub async fn execute(sync: &PostsSync, cli: &Cli, out: &mut impl Write) -> Result<()> {
    let mut session = Session::new();
    let posts = sync.fetch_posts(&mut session).await;
    if session.mode() == StorageMode::Local {
        writeln!(out, "Server unreachable, using local cache.")?;
    }

    match &cli.command {
        Command::List { json } => {
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&posts)?)?;
            } else {
                print_posts(out, &posts, cli.lang)?;
            }
        }
        Command::Show { id } => {
            let Some(post) = posts.iter().find(|post| post.id == *id) else {
                bail!("Post {id} not found");
            };
            print_post(out, post, cli.lang)?;
        }
        Command::Create { fields } => {
            let form = build_form(fields, None).await?;
            let outcome = sync
                .submit_post(&mut session, form, None)
                .await
                .map_err(sync_error)?;
            report(out, &outcome)?;
        }
        Command::Update { id, fields } => {
            let Some(existing) = posts.iter().find(|post| post.id == *id) else {
                match session.mode() {
                    StorageMode::Local => bail!(NOT_FOUND_LOCALLY),
                    StorageMode::Api => bail!("Post {id} not found"),
                }
            };
            let form = build_form(fields, Some(existing)).await?;
            let outcome = sync
                .submit_post(&mut session, form, Some(id))
                .await
                .map_err(sync_error)?;
            report(out, &outcome)?;
        }
        Command::Delete { id } => {
            let outcome = sync.delete_post(&mut session, id).await.map_err(sync_error)?;
            writeln!(out, "Deleted {id}.")?;
            report(out, &outcome)?;
        }
        Command::Import => {
            let imported = sync.import_local().await.map_err(sync_error)?;
            writeln!(out, "Imported {imported} posts.")?;
        }
    }

    Ok(())
}

/// Form values from the flags, with the stored post filling the gaps on update.
async fn build_form(fields: &PostFields, existing: Option<&Post>) -> Result<PostForm> {
    let stored = |text: Option<&LocalizedText>, lang: Lang| {
        text.map(|t| t.resolve(lang).to_string()).unwrap_or_default()
    };
    let title = existing.map(|post| &post.title);
    let description = existing.map(|post| &post.description);

    let image = match &fields.image {
        Some(path) => Some(read_image(path).await?),
        None => None,
    };

    Ok(PostForm {
        title_en: fields
            .title_en
            .clone()
            .unwrap_or_else(|| stored(title, Lang::En)),
        title_uk: fields
            .title_uk
            .clone()
            .unwrap_or_else(|| stored(title, Lang::Uk)),
        description_en: fields
            .description_en
            .clone()
            .unwrap_or_else(|| stored(description, Lang::En)),
        description_uk: fields
            .description_uk
            .clone()
            .unwrap_or_else(|| stored(description, Lang::Uk)),
        image,
    })
}

async fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageUpload::new(file_name, bytes))
}

fn sync_error(err: SyncError) -> anyhow::Error {
    match err {
        SyncError::Validation(e) => anyhow::anyhow!("{}: {}", e.field, e.message),
        other => anyhow::anyhow!(other.user_message()),
    }
}

fn report(out: &mut impl Write, outcome: &WriteOutcome) -> Result<()> {
    if let Some(status) = outcome.status {
        writeln!(out, "{status}")?;
    }
    writeln!(out, "{} posts.", outcome.posts.len())?;
    Ok(())
}

fn print_posts(out: &mut impl Write, posts: &[Post], lang: Lang) -> Result<()> {
    if posts.is_empty() {
        writeln!(out, "No posts yet.")?;
        return Ok(());
    }
    for post in posts {
        let title = match post.title.resolve(lang) {
            "" => "Untitled",
            text => text,
        };
        writeln!(
            out,
            "{:>4}  {}  {}",
            post.id,
            post.created_at.format("%Y-%m-%d"),
            title
        )?;
    }
    Ok(())
}

fn print_post(out: &mut impl Write, post: &Post, lang: Lang) -> Result<()> {
    writeln!(out, "id:          {}", post.id)?;
    writeln!(out, "title:       {}", post.title.resolve(lang))?;
    writeln!(out, "description: {}", post.description.resolve(lang))?;
    if post.image_url.starts_with("data:") {
        writeln!(out, "image:       (inline, {} bytes)", post.image_url.len())?;
    } else {
        writeln!(out, "image:       {}", post.image_url)?;
    }
    writeln!(out, "created:     {}", post.created_at.to_rfc3339())?;
    if let Some(updated_at) = post.updated_at {
        writeln!(out, "updated:     {}", updated_at.to_rfc3339())?;
    }
    Ok(())
}
