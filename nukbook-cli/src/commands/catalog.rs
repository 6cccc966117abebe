//! Search, books, authors, reviews and recommendations

use super::explain;
use crate::app::App;
use anyhow::{bail, Context, Result};
use nukbook_core::catalog::{AuthorLike, ReviewForm};
use nukbook_core::format::{relative_time_now, trim_words};
use nukbook_core::lookup::{flatten_results, LookupSource, RecentKind, RecentSearches, SearchSource};
use nukbook_core::shelves::ShelfBar;
use nukbook_core::types::{Book, Id};
use nukbook_core::ShelfStore;
use serde_json::json;

fn rating_line(book: &Book) -> String {
    match book.rating_avg {
        Some(avg) => format!("{:.1}/5 ({} ratings)", avg, book.rating_count),
        None => "no ratings yet".to_string(),
    }
}

pub async fn search(app: &mut App, query: &str, limit: u32, remember: bool) -> Result<()> {
    let source = SearchSource::new(app.client.clone()).with_limit(limit);
    let query = query.trim();

    let results = match source.immediate(query) {
        Some(results) => results,
        None => {
            let pb = app.spinner("Searching...");
            let results = source.lookup(query).await;
            pb.finish_and_clear();
            results.context("Search failed")?
        }
    };

    let items = flatten_results(&results);
    if remember {
        if let Some(first) = items.first() {
            let mut recent = RecentSearches::load(app.store.clone()).await;
            recent.record(first.clone()).await?;
        }
    }

    if app.json {
        return app.print_json(&results);
    }
    if items.is_empty() {
        println!("No results for \"{}\"", query);
        return Ok(());
    }

    let mut heading = None;
    for item in &items {
        if heading != Some(item.kind) {
            heading = Some(item.kind);
            println!(
                "{}",
                match item.kind {
                    RecentKind::Book => "Books",
                    RecentKind::Author => "Authors",
                    RecentKind::User => "Users",
                }
            );
        }
        match &item.sublabel {
            Some(sub) => println!("  {:<40} {}  ({})", item.label, item.href, sub),
            None => println!("  {:<40} {}", item.label, item.href),
        }
    }
    Ok(())
}

pub async fn recent(app: &mut App, clear: bool) -> Result<()> {
    let mut recent = RecentSearches::load(app.store.clone()).await;
    if clear {
        recent.clear().await?;
        if !app.json {
            println!("Recent searches cleared");
        }
        return Ok(());
    }

    if app.json {
        return app.print_json(recent.items());
    }
    if recent.items().is_empty() {
        println!("No recent searches");
    }
    for item in recent.items() {
        println!("{:<40} {}", item.label, item.href);
    }
    Ok(())
}

pub async fn book(app: &mut App, id: Id) -> Result<()> {
    let pb = app.spinner("Loading book...");
    let book = app.client.book(id).await;
    let reviews = app.client.reviews(id).await;
    let similar = app.client.similar_books(id, 6).await;
    pb.finish_and_clear();

    let book = book.with_context(|| format!("Failed to load book {}", id))?;
    let reviews = reviews.unwrap_or_default();
    let similar = similar.unwrap_or_default();

    let store = ShelfStore::new(app.client.clone(), app.notices.clone());
    let shelves = store.load(id).await;

    if app.json {
        return app.print_json(&json!({
            "book": book,
            "reviews": reviews,
            "similar": similar,
            "shelves": shelves,
        }));
    }

    println!("{}", book.title);
    if let Some(authors) = book.author_line() {
        println!("by {}", authors);
    }
    if let Some(year) = book.published_year {
        println!("Published: {}", year);
    }
    println!("Rating:    {}", rating_line(&book));
    if !book.genres.is_empty() {
        let genres: Vec<&str> = book.genres.iter().map(|g| g.name.as_str()).collect();
        println!("Genres:    {}", genres.join(", "));
    }
    if let Some(cover) = app.media(book.cover_url.as_deref()) {
        println!("Cover:     {}", cover);
    }
    if let Some(description) = &book.description {
        println!();
        println!("{}", trim_words(description, 60));
    }

    if let Some(shelves) = shelves {
        println!();
        println!("Shelves");
        print!("{}", ShelfBar::new(&shelves, None));
    }

    if !reviews.is_empty() {
        println!();
        println!("Reviews");
        for review in &reviews {
            let when = relative_time_now(&review.created_at).unwrap_or_default();
            println!("  {}/5 {} {}", review.rating, review.user.handle(), when);
            if let Some(body) = &review.body {
                println!("    {}", trim_words(body, 40));
            }
        }
    }

    if !similar.is_empty() {
        println!();
        println!("Similar");
        for entry in &similar {
            println!(
                "  {:>5}  {}  [{}]",
                entry.book.id,
                entry.book.title,
                entry.reasons.join(", ")
            );
        }
    }
    Ok(())
}

pub async fn author(app: &mut App, id: Id, toggle_like: bool) -> Result<()> {
    let author = app
        .client
        .author(id)
        .await
        .with_context(|| format!("Failed to load author {}", id))?;
    let books = app.client.author_books(id).await.unwrap_or_default();
    let mut like = AuthorLike::load(app.client.clone(), id).await;

    if toggle_like {
        if like.liked().is_none() {
            bail!("Not logged in. Run `nukbook login` first.");
        }
        like.toggle().await.context("Failed to update like")?;
    }

    if app.json {
        return app.print_json(&json!({
            "author": author,
            "books": books,
            "liked": like.liked(),
        }));
    }

    let heart = match like.liked() {
        Some(true) => " ♥",
        _ => "",
    };
    println!("{}{}", author.name, heart);
    if let Some(bio) = &author.bio {
        println!("{}", trim_words(bio, 60));
    }
    for book in &books {
        println!("  {:>5}  {}  {}", book.id, book.title, rating_line(book));
    }
    Ok(())
}

pub async fn review(
    app: &mut App,
    book_id: Id,
    rating: Option<u8>,
    body: Option<&str>,
    delete: bool,
) -> Result<()> {
    let mut form = ReviewForm::new(app.client.clone(), app.notices.clone(), book_id);

    if delete {
        form.remove().await.map_err(explain)?;
        return Ok(());
    }

    let rating = rating.context("--rating is required")?;
    let saved = form.submit(rating, body.unwrap_or_default()).await;
    if let Some(status) = form.status() {
        tracing::debug!(status, "Review form");
    }
    let review = saved.map_err(explain)?;
    if app.json {
        app.print_json(&review)?;
    }
    Ok(())
}

pub async fn recommend(app: &mut App, sections: bool) -> Result<()> {
    let pb = app.spinner("Finding recommendations...");
    if sections {
        let result = app.client.recommendation_sections(3, 3).await;
        pb.finish_and_clear();
        let sections = result.map_err(explain)?;
        if app.json {
            return app.print_json(&sections);
        }
        if sections.is_empty() {
            println!("Rate a few books 4 stars or more to get recommendations.");
        }
        for section in &sections {
            println!("Because you liked {}", section.seed.title);
            for book in &section.items {
                println!("  {:>5}  {}", book.id, book.title);
            }
        }
        return Ok(());
    }

    let result = app.client.recommendations(12, 0).await;
    pb.finish_and_clear();
    let books = result.map_err(explain)?;
    if app.json {
        return app.print_json(&books);
    }
    if books.is_empty() {
        println!("Rate a few books 4 stars or more to get recommendations.");
    }
    for book in &books {
        let authors = book.author_line().unwrap_or_default();
        println!("{:>5}  {}  {}", book.id, book.title, authors);
    }
    Ok(())
}

pub async fn timeline(app: &mut App) -> Result<()> {
    let entries = app.client.timeline().await.map_err(explain)?;
    if app.json {
        return app.print_json(&entries);
    }
    if entries.is_empty() {
        println!("Nothing on your timeline yet");
    }
    for entry in &entries {
        let when = relative_time_now(&entry.updated_at).unwrap_or_default();
        println!(
            "{:<13} {:<40} {}",
            entry.status.label(),
            entry.book.title,
            when
        );
    }
    Ok(())
}
