//! Catalog administration commands

use crate::app::App;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use nukbook_core::admin::{
    AdminAuthor, AdminBook, AdminFailure, AdminResource, AdminReview, AdminTable, AdminUser,
    AuthorDraft, BookDraft, Creatable, Deletable, NameDraft, Role, UserPatch, WithMedia,
};
use nukbook_core::lookup::{LookupKind, PICKER_LIMIT};
use nukbook_core::types::{Genre, Id, Tag};
use nukbook_core::{Redirect, Upload};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminKind {
    Authors,
    Books,
    Tags,
    Genres,
    Users,
    Reviews,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Taxonomy {
    Tags,
    Genres,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List rows of a collection
    List {
        #[arg(value_enum)]
        kind: AdminKind,

        /// Filter text
        #[arg(short, long)]
        q: Option<String>,

        #[arg(long, default_value = "0")]
        offset: u32,

        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Delete a row (users cannot be deleted)
    Delete {
        #[arg(value_enum)]
        kind: AdminKind,
        id: Id,
    },

    /// Add an author, optionally with a photo
    AddAuthor {
        name: String,

        #[arg(long)]
        bio: Option<String>,

        /// Image file to upload as the photo
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Add a book, optionally with a cover
    AddBook {
        title: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        year: Option<i32>,

        /// Author id (repeatable)
        #[arg(long = "author")]
        authors: Vec<Id>,

        /// Tag id (repeatable)
        #[arg(long = "tag")]
        tags: Vec<Id>,

        /// Genre id (repeatable)
        #[arg(long = "genre")]
        genres: Vec<Id>,

        /// Image file to upload as the cover
        #[arg(long)]
        cover: Option<PathBuf>,
    },

    /// Add a tag
    AddTag { name: String },

    /// Add a genre
    AddGenre { name: String },

    /// Rename a tag or genre
    Rename {
        #[arg(value_enum)]
        kind: Taxonomy,
        id: Id,
        name: String,
    },

    /// Change a user's role or active flag
    SetUser {
        id: Id,

        /// user, staff or admin
        #[arg(long)]
        role: Option<Role>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Find author, genre or tag ids by name
    Lookup {
        #[arg(value_enum)]
        kind: LookupTarget,
        query: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupTarget {
    Authors,
    Genres,
    Tags,
}

impl From<LookupTarget> for LookupKind {
    fn from(kind: LookupTarget) -> Self {
        match kind {
            LookupTarget::Authors => LookupKind::Authors,
            LookupTarget::Genres => LookupKind::Genres,
            LookupTarget::Tags => LookupKind::Tags,
        }
    }
}

fn failure(err: AdminFailure) -> anyhow::Error {
    match err {
        AdminFailure::Redirect(Redirect::Login { .. }) => {
            anyhow!("Not logged in. Run `nukbook login` with an admin account first.")
        }
        AdminFailure::Redirect(Redirect::Home) => anyhow!("Admin access required"),
        AdminFailure::Message(message) => anyhow!(message),
    }
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

async fn read_upload(path: &Path) -> Result<Upload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    let upload = Upload::new(file_name, bytes);
    Ok(match guess_mime(path) {
        Some(mime) => upload.with_mime(mime),
        None => upload,
    })
}

pub async fn admin(app: &mut App, action: AdminCommand) -> Result<()> {
    match action {
        AdminCommand::List {
            kind,
            q,
            offset,
            limit,
        } => {
            let q = q.unwrap_or_default();
            match kind {
                AdminKind::Authors => {
                    list::<AdminAuthor, _>(app, &q, offset, limit, |a| {
                        format!("{:>5}  {}", a.id, a.name)
                    })
                    .await
                }
                AdminKind::Books => {
                    list::<AdminBook, _>(app, &q, offset, limit, |b| {
                        let authors: Vec<&str> = b.authors.iter().map(|a| a.name.as_str()).collect();
                        format!("{:>5}  {}  {}", b.id, b.title, authors.join(", "))
                    })
                    .await
                }
                AdminKind::Tags => {
                    list::<Tag, _>(app, &q, offset, limit, |t| format!("{:>5}  {}", t.id, t.name)).await
                }
                AdminKind::Genres => {
                    list::<Genre, _>(app, &q, offset, limit, |g| format!("{:>5}  {}", g.id, g.name))
                        .await
                }
                AdminKind::Users => {
                    list::<AdminUser, _>(app, &q, offset, limit, |u| {
                        let active = if u.is_active { "" } else { "  (inactive)" };
                        format!("{:>5}  @{:<20} {:<28} {}{}", u.id, u.username, u.email, u.role, active)
                    })
                    .await
                }
                AdminKind::Reviews => {
                    list::<AdminReview, _>(app, &q, offset, limit, |r| {
                        format!(
                            "{:>5}  {}/5  @{} on {}",
                            r.id, r.rating, r.user.username, r.book.title
                        )
                    })
                    .await
                }
            }
        }

        AdminCommand::Delete { kind, id } => match kind {
            AdminKind::Authors => delete::<AdminAuthor>(app, id).await,
            AdminKind::Books => delete::<AdminBook>(app, id).await,
            AdminKind::Tags => delete::<Tag>(app, id).await,
            AdminKind::Genres => delete::<Genre>(app, id).await,
            AdminKind::Reviews => delete::<AdminReview>(app, id).await,
            AdminKind::Users => bail!("Users cannot be deleted; use `admin set-user {} --active false`", id),
        },

        AdminCommand::AddAuthor { name, bio, photo } => {
            let draft = AuthorDraft::new(&name, bio.as_deref());
            let created = create::<AdminAuthor>(app, &draft, photo.as_deref()).await?;
            report(app, &created, created.id, &created.name)
        }

        AdminCommand::AddBook {
            title,
            description,
            year,
            authors,
            tags,
            genres,
            cover,
        } => {
            let draft = BookDraft {
                title: title.trim().to_string(),
                description: description
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
                published_year: year,
                author_ids: authors,
                tag_ids: tags,
                genre_ids: genres,
            };
            let created = create::<AdminBook>(app, &draft, cover.as_deref()).await?;
            report(app, &created, created.id, &created.title)
        }

        AdminCommand::AddTag { name } => {
            let mut table = AdminTable::<Tag>::new(app.client.clone());
            let created = table.create(&NameDraft::new(&name)).await.map_err(failure)?;
            report(app, &created, created.id, &created.name)
        }

        AdminCommand::AddGenre { name } => {
            let mut table = AdminTable::<Genre>::new(app.client.clone());
            let created = table.create(&NameDraft::new(&name)).await.map_err(failure)?;
            report(app, &created, created.id, &created.name)
        }

        AdminCommand::Rename { kind, id, name } => {
            let draft = NameDraft::new(&name);
            match kind {
                Taxonomy::Tags => {
                    let updated = AdminTable::<Tag>::new(app.client.clone())
                        .update(id, &draft)
                        .await
                        .map_err(failure)?;
                    report(app, &updated, updated.id, &updated.name)
                }
                Taxonomy::Genres => {
                    let updated = AdminTable::<Genre>::new(app.client.clone())
                        .update(id, &draft)
                        .await
                        .map_err(failure)?;
                    report(app, &updated, updated.id, &updated.name)
                }
            }
        }

        AdminCommand::SetUser { id, role, active } => {
            let patch = UserPatch {
                role,
                is_active: active,
            };
            let updated = AdminTable::<AdminUser>::new(app.client.clone())
                .update(id, &patch)
                .await
                .map_err(failure)?;
            if app.json {
                return app.print_json(&updated);
            }
            println!(
                "@{}: role {}, {}",
                updated.username,
                updated.role,
                if updated.is_active { "active" } else { "inactive" }
            );
            Ok(())
        }

        AdminCommand::Lookup { kind, query } => {
            let options = app
                .client
                .admin_lookup(kind.into(), query.trim(), PICKER_LIMIT)
                .await
                .map_err(super::explain)?;
            if app.json {
                return app.print_json(&options);
            }
            for option in &options {
                println!("{:>5}  {}", option.id, option.name);
            }
            Ok(())
        }
    }
}

fn report<T: Serialize>(app: &App, row: &T, id: Id, name: &str) -> Result<()> {
    if app.json {
        return app.print_json(row);
    }
    println!("{:>5}  {}", id, name);
    Ok(())
}

async fn list<R, F>(app: &App, q: &str, offset: u32, limit: u32, render: F) -> Result<()>
where
    R: AdminResource + Serialize,
    F: Fn(&R) -> String,
{
    let mut table = AdminTable::<R>::new(app.client.clone());
    table.set_filter(q);
    table.set_page(offset, limit);

    let pb = app.spinner("Loading...");
    let result = table.load().await;
    pb.finish_and_clear();
    result.map_err(failure)?;

    if app.json {
        return app.print_json(table.rows());
    }
    if table.rows().is_empty() {
        println!("No rows");
    }
    for row in table.rows() {
        println!("{}", render(row));
    }
    Ok(())
}

async fn delete<R: Deletable>(app: &App, id: Id) -> Result<()> {
    let mut table = AdminTable::<R>::new(app.client.clone());
    table.delete(id).await.map_err(failure)?;
    if !app.json {
        println!("Deleted {} {}", R::PATH.trim_start_matches("/admin/"), id);
    }
    Ok(())
}

async fn create<R: Creatable + WithMedia>(
    app: &App,
    draft: &R::Draft,
    media: Option<&Path>,
) -> Result<R> {
    let mut table = AdminTable::<R>::new(app.client.clone());
    let created = match media {
        Some(path) => {
            let upload = read_upload(path).await?;
            let created = table.create_with_media(draft, upload).await;
            if let Some(message) = table.error() {
                eprintln!("error: upload failed: {}", message);
            }
            created
        }
        None => table.create(draft).await,
    };
    created.map_err(failure)
}
