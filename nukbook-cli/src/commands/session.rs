//! Login, logout and account commands

use super::explain;
use crate::app::App;
use anyhow::{Context, Result};

pub async fn login(app: &mut App, email: &str, password: &str) -> Result<()> {
    let pb = app.spinner("Logging in...");
    let result = app.client.login(email, password).await;
    pb.finish_and_clear();

    let me = result.context("Login failed")?;
    if app.json {
        app.print_json(&me)?;
    } else {
        println!("Logged in as @{} ({})", me.username, me.email);
    }
    Ok(())
}

pub async fn register(app: &mut App, email: &str, username: &str, password: &str) -> Result<()> {
    let pb = app.spinner("Creating account...");
    let result = app.client.register(email, username, password).await;
    pb.finish_and_clear();

    let me = result.context("Registration failed")?;
    if app.json {
        app.print_json(&me)?;
    } else {
        println!("Account @{} created. Run `nukbook login {}` next.", me.username, me.email);
    }
    Ok(())
}

pub async fn logout(app: &mut App) -> Result<()> {
    app.client.logout().await;
    if !app.json {
        println!("Logged out");
    }
    Ok(())
}

pub async fn whoami(app: &mut App) -> Result<()> {
    let me = app.client.me().await.map_err(explain)?;
    if app.json {
        return app.print_json(&me);
    }

    println!("Username: @{}", me.username);
    println!("Email:    {}", me.email);
    println!("Role:     {}", me.role);
    println!(
        "Profile:  {}",
        if me.is_private { "private" } else { "public" }
    );
    if let Some(avatar) = app.media(me.avatar_url.as_deref()) {
        println!("Avatar:   {}", avatar);
    }
    Ok(())
}
