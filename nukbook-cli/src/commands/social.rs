//! Profiles, follows, feeds and notifications

use super::explain;
use crate::app::App;
use anyhow::{anyhow, Result};
use nukbook_core::format::relative_time_now;
use nukbook_core::social::{
    compatibility, CompareSort, FollowRequests, NotificationBell, ProfileView, TasteCompareView,
    Whose,
};
use nukbook_core::types::{ActivityItem, FollowStatus, Id, LovedBook, SharedRating};
use serde_json::json;

fn follow_label(status: FollowStatus) -> &'static str {
    match status {
        FollowStatus::None => "not following",
        FollowStatus::Pending => "requested",
        FollowStatus::Accepted => "following",
    }
}

fn print_activity(items: &[ActivityItem]) {
    for item in items {
        let when = item
            .updated_at
            .as_deref()
            .and_then(relative_time_now)
            .unwrap_or_default();
        match item.rating {
            Some(rating) => println!("{}  {}/5  {}", item.summary(), rating, when),
            None => println!("{}  {}", item.summary(), when),
        }
    }
}

pub async fn profile(app: &mut App, user_id: Id) -> Result<()> {
    let view = ProfileView::load(app.client.clone(), app.notices.clone(), user_id)
        .await
        .map_err(explain)?;
    let profile = view.profile();

    // Private profiles hide their lists from non-followers
    let liked = app.client.liked_authors(user_id).await.unwrap_or_default();
    let activity = app
        .client
        .activity(Whose::User(user_id), Whose::User(user_id).activity_limit(), 0)
        .await
        .unwrap_or_default();

    if app.json {
        return app.print_json(&json!({
            "profile": profile,
            "liked_authors": liked,
            "activity": activity,
        }));
    }

    let lock = if profile.is_private { " (private)" } else { "" };
    println!("@{}{}", profile.username, lock);
    println!(
        "{} followers · {} following",
        profile.followers_count, profile.following_count
    );
    if !profile.is_me {
        println!("You: {}", follow_label(profile.follow_status));
    }
    if let Some(avatar) = app.media(profile.avatar_url.as_deref()) {
        println!("Avatar: {}", avatar);
    }

    if !liked.is_empty() {
        let names: Vec<&str> = liked.iter().map(|a| a.name.as_str()).collect();
        println!();
        println!("Likes: {}", names.join(", "));
    }
    if !activity.is_empty() {
        println!();
        print_activity(&activity);
    }
    Ok(())
}

pub async fn follow(app: &mut App, user_id: Id, follow: bool) -> Result<()> {
    let mut view = ProfileView::load(app.client.clone(), app.notices.clone(), user_id)
        .await
        .map_err(explain)?;
    if view.profile().is_me {
        anyhow::bail!("You cannot follow yourself");
    }

    if follow {
        view.follow().await.map_err(explain)?;
    } else {
        view.unfollow().await.map_err(explain)?;
    }

    let profile = view.profile();
    if app.json {
        return app.print_json(profile);
    }
    println!(
        "@{}: {} ({} followers)",
        profile.username,
        follow_label(profile.follow_status),
        profile.followers_count
    );
    Ok(())
}

pub async fn requests(app: &mut App, approve: Option<Id>, deny: Option<Id>) -> Result<()> {
    let mut requests = FollowRequests::new(app.client.clone());
    requests.load().await.map_err(explain)?;

    if let Some(id) = approve {
        requests.approve(id).await.map_err(explain)?;
        if !app.json {
            println!("Approved request {}", id);
        }
    }
    if let Some(id) = deny {
        requests.deny(id).await.map_err(explain)?;
        if !app.json {
            println!("Denied request {}", id);
        }
    }

    if app.json {
        return app.print_json(requests.items());
    }
    if approve.is_some() || deny.is_some() {
        return Ok(());
    }
    if requests.items().is_empty() {
        println!("No pending follow requests");
    }
    for request in requests.items() {
        let when = request
            .created_at
            .as_deref()
            .and_then(relative_time_now)
            .unwrap_or_default();
        println!("{:>5}  {}  {}", request.id, request.requester.handle(), when);
    }
    Ok(())
}

pub async fn feed(app: &mut App, user: Option<Id>, limit: Option<u32>) -> Result<()> {
    let whose = user.map(Whose::User).unwrap_or(Whose::Mine);
    let limit = limit.unwrap_or_else(|| whose.activity_limit());

    let items = app.client.activity(whose, limit, 0).await.map_err(explain)?;
    if app.json {
        return app.print_json(&items);
    }
    if items.is_empty() {
        println!("No activity yet");
    }
    print_activity(&items);
    Ok(())
}

pub async fn notifications(app: &mut App, mark_seen: bool) -> Result<()> {
    let bell = NotificationBell::new(app.client.clone());
    bell.refresh().await.map_err(explain)?;
    let preview = bell.preview().await;
    if mark_seen {
        bell.open().await.map_err(explain)?;
    }

    if app.json {
        return app.print_json(&json!({
            "counts": bell.counts(),
            "preview": preview,
        }));
    }

    match bell.badge() {
        Some(n) => println!("{} unseen", n),
        None if mark_seen => println!("All caught up"),
        None => println!("Nothing new"),
    }
    if !preview.requests.is_empty() {
        println!();
        println!("Follow requests");
        for request in &preview.requests {
            println!("  {:>5}  {}", request.id, request.requester.handle());
        }
    }
    if !preview.activity.is_empty() {
        println!();
        println!("Activity");
        for item in &preview.activity {
            println!("  {}", item.summary());
        }
    }
    Ok(())
}

fn print_loved(heading: &str, books: &[LovedBook]) {
    println!();
    println!("{}", heading);
    if books.is_empty() {
        println!("  No matches yet.");
    }
    for book in books {
        let authors: Vec<&str> = book.authors.iter().map(|a| a.name.as_str()).collect();
        println!("  {:>5}  {}/5  {}  {}", book.book_id, book.rating, book.title, authors.join(", "));
    }
}

fn print_shared(rating: &SharedRating) {
    println!(
        "  {:>5}  you {}  them {}  Δ {}  {}%  {}",
        rating.book_id,
        rating.viewer_rating,
        rating.target_rating,
        rating.diff,
        compatibility(rating.diff),
        rating.title
    );
}

pub async fn compare(
    app: &mut App,
    user_id: Id,
    sort: CompareSort,
    offset: u32,
    limit: u32,
) -> Result<()> {
    let mut view = TasteCompareView::new(app.client.clone(), user_id);
    view.set_sort(sort);
    view.set_page(offset, limit);

    let pb = app.spinner("Comparing...");
    let result = view.load().await;
    pb.finish_and_clear();
    if let Err(e) = result {
        return Err(match view.blocked() {
            Some(message) => anyhow!(message),
            None => explain(e),
        });
    }
    let Some(data) = view.data() else {
        return Ok(());
    };

    if app.json {
        return app.print_json(data);
    }

    println!("@{} vs @{}", data.viewer.username, data.target.username);
    println!(
        "Similarity {:.0}% · {} shared · mean Δ {:.2}",
        data.similarity_score, data.common_count, data.mean_abs_diff
    );
    if let Some(pearson) = data.pearson {
        println!("Pearson {:.2}", pearson);
    }

    print_loved("Books you loved (they haven’t read)", &data.viewer_loved_target_unread);
    print_loved(
        &format!("Books @{} loved (you haven’t read)", data.target.username),
        &data.target_loved_viewer_unread,
    );

    let agreements = view.strong_agreements();
    println!();
    println!("Biggest agreements");
    if agreements.is_empty() {
        println!("  No strong agreements yet.");
    }
    agreements.into_iter().for_each(print_shared);

    let disagreements = view.strong_disagreements();
    println!();
    println!("Biggest disagreements");
    if disagreements.is_empty() {
        println!("  No major disagreements yet.");
    }
    disagreements.into_iter().for_each(print_shared);

    println!();
    println!("Shared ratings, {}", view.sort().label());
    if let Some(range) = view.range_label() {
        println!("  {}", range);
    }
    data.shared_ratings.iter().for_each(print_shared);
    Ok(())
}

pub async fn privacy(app: &mut App, is_private: bool) -> Result<()> {
    let saved = app.client.set_privacy(is_private).await.map_err(explain)?;
    if app.json {
        return app.print_json(&json!({ "is_private": saved.is_private }));
    }
    println!(
        "Your account is now {}",
        if saved.is_private { "private" } else { "public" }
    );
    Ok(())
}
