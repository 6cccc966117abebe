//! nukBook CLI - Command-line front end for the nukBook reading tracker

mod app;
mod commands;

use anyhow::Result;
use app::{App, GlobalOpts};
use clap::{Parser, Subcommand};
use commands::{AdminCommand, ShelvesCommand};
use nukbook_core::social::CompareSort;
use nukbook_core::types::Id;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse a star rating (1 to 5)
fn parse_rating(s: &str) -> Result<u8, String> {
    let n: u8 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid rating", s))?;
    if (1..=5).contains(&n) {
        Ok(n)
    } else {
        Err("rating must be between 1 and 5".to_string())
    }
}

fn parse_compare_sort(s: &str) -> Result<CompareSort, String> {
    s.parse().map_err(|_| format!("'{}' is not a sort order", s))
}

#[derive(Parser)]
#[command(name = "nukbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session token
    Login {
        email: String,

        /// Password (prompting is not supported; prefer the environment variable)
        #[arg(long, env = "NUKBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        email: String,
        username: String,

        #[arg(long, env = "NUKBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the session token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Search books, authors and @users
    Search {
        /// Search text; start with @ to search users only
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Results per category
        #[arg(short, long, default_value = "5")]
        limit: u32,

        /// Remember the first result in recent searches
        #[arg(long)]
        remember: bool,
    },

    /// Show recent searches
    Recent {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },

    /// Show a book with its reviews and similar books
    Book {
        id: Id,
    },

    /// Show an author and their books
    Author {
        id: Id,

        /// Like or unlike the author
        #[arg(long)]
        toggle_like: bool,
    },

    /// Personal and per-book shelves
    Shelves {
        #[command(subcommand)]
        action: ShelvesCommand,
    },

    /// Write, replace or delete my review of a book
    Review {
        book_id: Id,

        /// Star rating (1-5)
        #[arg(short, long, value_parser = parse_rating, required_unless_present = "delete")]
        rating: Option<u8>,

        /// Review text
        #[arg(short, long)]
        body: Option<String>,

        /// Delete my review instead
        #[arg(long, conflicts_with_all = ["rating", "body"])]
        delete: bool,
    },

    /// Recommendations based on books I rated highly
    Recommend {
        /// Group by "because you liked" seed
        #[arg(long)]
        sections: bool,
    },

    /// My reading timeline
    Timeline,

    /// Show someone's profile
    Profile {
        user_id: Id,
    },

    /// Follow a user
    Follow {
        user_id: Id,
    },

    /// Unfollow a user
    Unfollow {
        user_id: Id,
    },

    /// List, approve or deny follow requests
    Requests {
        /// Approve this request
        #[arg(long, conflicts_with = "deny")]
        approve: Option<Id>,

        /// Deny this request
        #[arg(long)]
        deny: Option<Id>,
    },

    /// Activity of the people I follow, or of one user
    Feed {
        /// Only this user's activity
        #[arg(long)]
        user: Option<Id>,

        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Unseen follow requests and activity
    Notifications {
        /// Mark everything as seen
        #[arg(long)]
        mark_seen: bool,
    },

    /// Compare my ratings with another user's
    Compare {
        user_id: Id,

        /// diff_desc, diff_asc, title, viewer_rating or target_rating
        #[arg(long, default_value = "diff_desc", value_parser = parse_compare_sort)]
        sort: CompareSort,

        #[arg(long, default_value = "0")]
        offset: u32,

        #[arg(short, long, default_value = "50")]
        limit: u32,
    },

    /// Make my account private or public
    Privacy {
        #[arg(value_parser = ["private", "public"])]
        mode: String,
    },

    /// Catalog administration
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "nukbook_cli=debug,nukbook_core=debug"
    } else {
        "nukbook_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut app = App::open(&cli.global)?;

    let result = match cli.command {
        Commands::Login { email, password } => commands::login(&mut app, &email, &password).await,
        Commands::Register {
            email,
            username,
            password,
        } => commands::register(&mut app, &email, &username, &password).await,
        Commands::Logout => commands::logout(&mut app).await,
        Commands::Whoami => commands::whoami(&mut app).await,

        Commands::Search {
            query,
            limit,
            remember,
        } => commands::search(&mut app, &query.join(" "), limit, remember).await,
        Commands::Recent { clear } => commands::recent(&mut app, clear).await,

        Commands::Book { id } => commands::book(&mut app, id).await,
        Commands::Author { id, toggle_like } => commands::author(&mut app, id, toggle_like).await,
        Commands::Review {
            book_id,
            rating,
            body,
            delete,
        } => commands::review(&mut app, book_id, rating, body.as_deref(), delete).await,
        Commands::Recommend { sections } => commands::recommend(&mut app, sections).await,
        Commands::Timeline => commands::timeline(&mut app).await,

        Commands::Shelves { action } => commands::shelves(&mut app, action).await,

        Commands::Profile { user_id } => commands::profile(&mut app, user_id).await,
        Commands::Follow { user_id } => commands::follow(&mut app, user_id, true).await,
        Commands::Unfollow { user_id } => commands::follow(&mut app, user_id, false).await,
        Commands::Requests { approve, deny } => commands::requests(&mut app, approve, deny).await,
        Commands::Feed { user, limit } => commands::feed(&mut app, user, limit).await,
        Commands::Notifications { mark_seen } => commands::notifications(&mut app, mark_seen).await,
        Commands::Compare {
            user_id,
            sort,
            offset,
            limit,
        } => commands::compare(&mut app, user_id, sort, offset, limit).await,
        Commands::Privacy { mode } => commands::privacy(&mut app, mode == "private").await,

        Commands::Admin { action } => commands::admin(&mut app, action).await,
    };

    app.flush_notices();
    result
}
