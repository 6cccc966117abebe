//! Shelf commands

use super::explain;
use crate::app::App;
use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use nukbook_core::shelves::{ShelfBar, ShelfList, ShelfPill, ToggleError};
use nukbook_core::types::{Id, ShelfBook, Visibility};
use nukbook_core::ShelfStore;

#[derive(Subcommand, Debug)]
pub enum ShelvesCommand {
    /// My shelves with book counts
    List,

    /// Books on one of my shelves
    Show { shelf_id: Id },

    /// Which of my shelves hold a book
    Book { book_id: Id },

    /// Put a book on a shelf, or take it off
    Toggle { book_id: Id, shelf_id: Id },

    /// Take a book off whichever reading-status shelf holds it
    Clear { book_id: Id },

    /// Create a custom shelf
    Create {
        name: String,

        /// public, followers or private
        #[arg(long, default_value = "private")]
        visibility: Visibility,
    },

    /// Rename a custom shelf
    Rename { shelf_id: Id, name: String },

    /// Change who can see a shelf
    Visibility { shelf_id: Id, visibility: Visibility },

    /// Delete a custom shelf
    Delete { shelf_id: Id },

    /// Shelves another user shares
    User { user_id: Id },
}

fn toggle_error(err: ToggleError) -> anyhow::Error {
    match err {
        ToggleError::NotLoggedIn => anyhow!("Not logged in. Run `nukbook login` first."),
        ToggleError::Rejected { source, .. } => explain(source),
        other => anyhow::Error::new(other),
    }
}

fn book_line(book: &ShelfBook) -> String {
    let authors: Vec<&str> = book.authors.iter().map(|a| a.name.as_str()).collect();
    match book.published_year {
        Some(year) => format!("{:>5}  {} ({})  {}", book.id, book.title, year, authors.join(", ")),
        None => format!("{:>5}  {}  {}", book.id, book.title, authors.join(", ")),
    }
}

pub async fn shelves(app: &mut App, action: ShelvesCommand) -> Result<()> {
    match action {
        ShelvesCommand::List => list(app).await,
        ShelvesCommand::Show { shelf_id } => show(app, shelf_id).await,
        ShelvesCommand::Book { book_id } => for_book(app, book_id).await,
        ShelvesCommand::Toggle { book_id, shelf_id } => toggle(app, book_id, Some(shelf_id)).await,
        ShelvesCommand::Clear { book_id } => toggle(app, book_id, None).await,
        ShelvesCommand::Create { name, visibility } => {
            let mut list = ShelfList::new(app.client.clone(), app.notices.clone());
            let created = list.create(&name, visibility).await.map_err(explain)?;
            if app.json {
                return app.print_json(&created);
            }
            println!("Created shelf {} \"{}\" ({})", created.id, created.name, created.visibility);
            Ok(())
        }
        ShelvesCommand::Rename { shelf_id, name } => {
            let mut list = loaded(app).await?;
            list.rename(shelf_id, &name).await.map_err(explain)?;
            if !app.json {
                println!("Renamed shelf {}", shelf_id);
            }
            Ok(())
        }
        ShelvesCommand::Visibility {
            shelf_id,
            visibility,
        } => {
            let mut list = loaded(app).await?;
            list.set_visibility(shelf_id, visibility)
                .await
                .map_err(explain)?;
            Ok(())
        }
        ShelvesCommand::Delete { shelf_id } => {
            let mut list = loaded(app).await?;
            list.delete(shelf_id).await.map_err(explain)?;
            if !app.json {
                println!("Deleted shelf {}", shelf_id);
            }
            Ok(())
        }
        ShelvesCommand::User { user_id } => user(app, user_id).await,
    }
}

async fn loaded(app: &App) -> Result<ShelfList> {
    let mut list = ShelfList::new(app.client.clone(), app.notices.clone());
    list.load().await.map_err(explain)?;
    Ok(list)
}

async fn list(app: &mut App) -> Result<()> {
    let list = loaded(app).await?;
    if app.json {
        return app.print_json(list.shelves());
    }
    if list.shelves().is_empty() {
        println!("No shelves yet");
    }
    for shelf in list.shelves() {
        let kind = if shelf.is_system { "system" } else { "custom" };
        println!(
            "{:>5}  {:<24} {:>4} books  {:<9} {}",
            shelf.id, shelf.name, shelf.book_count, shelf.visibility, kind
        );
    }
    Ok(())
}

async fn show(app: &mut App, shelf_id: Id) -> Result<()> {
    let data = app.client.shelf_books(shelf_id).await.map_err(explain)?;
    if app.json {
        return app.print_json(&data);
    }
    println!("{} ({})", data.shelf.name, data.shelf.visibility);
    if data.books.is_empty() {
        println!("  No books on this shelf");
    }
    for book in &data.books {
        println!("  {}", book_line(book));
    }
    Ok(())
}

async fn for_book(app: &mut App, book_id: Id) -> Result<()> {
    let store = ShelfStore::new(app.client.clone(), app.notices.clone());
    let shelves = store
        .load(book_id)
        .await
        .context("Could not load shelves (are you logged in?)")?;

    if app.json {
        return app.print_json(&shelves);
    }
    println!("{}", ShelfPill::new(&shelves).label());
    print!("{}", ShelfBar::new(&shelves, None));
    Ok(())
}

/// `None` clears the active reading-status shelf
async fn toggle(app: &mut App, book_id: Id, shelf_id: Option<Id>) -> Result<()> {
    let store = ShelfStore::new(app.client.clone(), app.notices.clone());
    if store.load(book_id).await.is_none() {
        if app.client.tokens().get().await.is_none() {
            return Err(toggle_error(ToggleError::NotLoggedIn));
        }
        return Err(anyhow!("Failed to load shelves for book {}", book_id));
    }

    let pb = app.spinner("Updating shelf...");
    let result = match shelf_id {
        Some(shelf_id) => store.toggle(book_id, shelf_id).await.map(Some),
        None => store.clear_system(book_id).await,
    };
    pb.finish_and_clear();

    let shelves = match result.map_err(toggle_error)? {
        Some(outcome) => outcome.shelves,
        None => {
            if !app.json {
                println!("Book {} is not on a reading-status shelf", book_id);
            }
            return Ok(());
        }
    };

    if app.json {
        return app.print_json(&shelves);
    }
    print!("{}", ShelfBar::new(&shelves, None));
    Ok(())
}

async fn user(app: &mut App, user_id: Id) -> Result<()> {
    let data = app.client.user_shelves(user_id).await.map_err(explain)?;
    if app.json {
        return app.print_json(&data);
    }
    println!("@{}", data.user.username);
    if data.shelves.is_empty() {
        println!("  No shelves to show");
    }
    for shelf in &data.shelves {
        println!("  {} ({} books, {})", shelf.name, shelf.book_count, shelf.visibility);
        for book in &shelf.books {
            println!("    {}", book_line(book));
        }
    }
    Ok(())
}
