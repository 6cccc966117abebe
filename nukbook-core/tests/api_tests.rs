//! Integration tests for nukbook-core against an in-process fake API

mod common;

use axum::http::Method;
use common::{shelf, FakeApi};
use nukbook_core::admin::{AdminAuthor, AdminBook, AdminFailure, AdminTable};
use nukbook_core::catalog::AuthorLike;
use nukbook_core::lookup::{DebouncedLookup, LookupState, QueryPolicy, SearchSource};
use nukbook_core::shelves::{ShelfList, ToggleError};
use nukbook_core::social::{
    CompareSort, FollowRequests, NotificationBell, ProfileView, TasteCompareView, PRIVACY_BLOCKED,
};
use nukbook_core::types::{FollowStatus, NotificationCounts, ShelfState, Visibility};
use nukbook_core::{
    ErrorClass, NoticeBus, NoticeKind, NukbookError, Redirect, ShelfEvent, ShelfStore,
};
use serde_json::json;
use std::time::Duration;

const BOOK: i64 = 9;

fn book_shelves() -> serde_json::Value {
    json!({
        "book_id": BOOK,
        "shelves": [
            shelf(1, "want-to-read", true, true),
            shelf(2, "reading", true, false),
            shelf(3, "read", true, false),
            shelf(5, "Favorites", false, true),
        ]
    })
}

fn has_book(shelves: &[ShelfState], id: i64) -> bool {
    shelves.iter().any(|s| s.id == id && s.has_book)
}

async fn loaded_store(api: &FakeApi) -> ShelfStore {
    api.on(Method::GET, "/shelves/book/9", 200, book_shelves());
    let store = ShelfStore::new(api.client(Some("t0k")).await, NoticeBus::new());
    assert!(store.load(BOOK).await.is_some());
    store
}

#[tokio::test]
async fn test_toggle_is_visible_before_the_server_answers() {
    let api = FakeApi::start().await;
    let store = loaded_store(&api).await;
    api.on_empty(Method::POST, "/shelves/2/books/9", 204)
        .on_empty(Method::DELETE, "/shelves/1/books/9", 204)
        .on(Method::POST, "/books/9/status", 200, json!({"status": "reading"}));
    let gate = api.hold(Method::POST, "/shelves/2/books/9");

    let mut events = store.subscribe();
    let task = tokio::spawn({
        let store = store.clone();
        async move { store.toggle(BOOK, 2).await }
    });

    assert_eq!(
        events.recv().await.unwrap(),
        ShelfEvent::Updated { book_id: BOOK }
    );
    let shown = store.snapshot(BOOK).await.unwrap();
    assert!(!has_book(&shown, 1));
    assert!(has_book(&shown, 2));
    assert!(has_book(&shown, 5), "custom shelves are untouched");
    assert_eq!(store.busy(BOOK).await, Some(2));

    gate.add_permits(1);
    let outcome = task.await.unwrap().unwrap();
    assert!(outcome.has_book);

    let systems_on = outcome
        .shelves
        .iter()
        .filter(|s| s.is_system && s.has_book)
        .count();
    assert_eq!(systems_on, 1);
    assert_eq!(store.busy(BOOK).await, None);

    let lines = api.lines();
    assert!(lines.contains(&"POST /shelves/2/books/9".to_string()));
    assert!(lines.contains(&"DELETE /shelves/1/books/9".to_string()));
    let status = api
        .calls()
        .into_iter()
        .find(|c| c.line() == "POST /books/9/status")
        .unwrap();
    assert_eq!(status.json(), json!({"status": "reading"}));
    assert_eq!(status.bearer.as_deref(), Some("t0k"));
}

#[tokio::test]
async fn test_rejected_toggle_restores_previous_list() {
    let api = FakeApi::start().await;
    let store = loaded_store(&api).await;
    api.on(
        Method::POST,
        "/shelves/2/books/9",
        500,
        json!({"detail": "database unavailable"}),
    );
    let before = store.snapshot(BOOK).await.unwrap();
    let mut notices = store.notices().subscribe();

    let err = store.toggle(BOOK, 2).await.unwrap_err();
    match err {
        ToggleError::Rejected { message, .. } => assert_eq!(
            message,
            "POST /shelves/2/books/9 failed: 500 database unavailable"
        ),
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(store.snapshot(BOOK).await.unwrap(), before);
    assert_eq!(
        store.status(BOOK).await.as_deref(),
        Some("Failed to update shelf")
    );
    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Failed to update shelf.");
}

#[tokio::test]
async fn test_failed_cleanup_delete_is_ignored() {
    let api = FakeApi::start().await;
    let store = loaded_store(&api).await;
    api.on_empty(Method::POST, "/shelves/3/books/9", 204)
        .on(Method::DELETE, "/shelves/1/books/9", 500, json!({"detail": "nope"}))
        .on_empty(Method::POST, "/books/9/status", 204);

    let outcome = store.toggle(BOOK, 3).await.unwrap();
    assert!(has_book(&outcome.shelves, 3));
    assert!(!has_book(&outcome.shelves, 1));
    assert_eq!(store.status(BOOK).await, None);
}

#[tokio::test]
async fn test_turning_system_shelf_off_clears_status() {
    let api = FakeApi::start().await;
    let store = loaded_store(&api).await;
    api.on_empty(Method::DELETE, "/shelves/1/books/9", 204)
        .on_empty(Method::DELETE, "/books/9/status", 204);

    let outcome = store.clear_system(BOOK).await.unwrap().unwrap();
    assert!(!outcome.has_book);
    assert!(api.lines().contains(&"DELETE /books/9/status".to_string()));
}

#[tokio::test]
async fn test_second_toggle_while_in_flight_is_busy() {
    let api = FakeApi::start().await;
    let store = loaded_store(&api).await;
    api.on_empty(Method::POST, "/shelves/2/books/9", 204)
        .on_empty(Method::DELETE, "/shelves/1/books/9", 204)
        .on_empty(Method::POST, "/books/9/status", 204);
    let gate = api.hold(Method::POST, "/shelves/2/books/9");

    let mut events = store.subscribe();
    let first = tokio::spawn({
        let store = store.clone();
        async move { store.toggle(BOOK, 2).await }
    });
    events.recv().await.unwrap();
    while !api.lines().contains(&"POST /shelves/2/books/9".to_string()) {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let sent = api.calls().len();

    let err = store.toggle(BOOK, 3).await.unwrap_err();
    assert!(matches!(err, ToggleError::Busy));
    assert_eq!(api.calls().len(), sent, "a busy toggle sends nothing");
    assert!(has_book(&store.snapshot(BOOK).await.unwrap(), 2));

    gate.add_permits(1);
    first.await.unwrap().unwrap();
    assert_eq!(store.busy(BOOK).await, None);
}

#[tokio::test]
async fn test_cancelled_toggle_frees_the_book() {
    let api = FakeApi::start().await;
    let store = loaded_store(&api).await;
    api.on_empty(Method::POST, "/shelves/2/books/9", 204)
        .on_empty(Method::DELETE, "/shelves/5/books/9", 204);
    let gate = api.hold(Method::POST, "/shelves/2/books/9");
    let before = store.snapshot(BOOK).await.unwrap();

    let timed_out = tokio::time::timeout(Duration::from_millis(200), store.toggle(BOOK, 2)).await;
    assert!(timed_out.is_err());

    assert_eq!(store.busy(BOOK).await, None);
    assert_eq!(store.snapshot(BOOK).await.unwrap(), before);
    assert_eq!(store.status(BOOK).await, None);

    let outcome = store.toggle(BOOK, 5).await.unwrap();
    assert!(!outcome.has_book);
    gate.add_permits(1);
}

#[tokio::test]
async fn test_reload_supersedes_stuck_toggle() {
    let api = FakeApi::start().await;
    let store = loaded_store(&api).await;
    api.on_empty(Method::POST, "/shelves/2/books/9", 204)
        .on_empty(Method::DELETE, "/shelves/1/books/9", 204)
        .on_empty(Method::POST, "/books/9/status", 204)
        .on_empty(Method::DELETE, "/shelves/5/books/9", 204);
    let gate = api.hold(Method::POST, "/shelves/2/books/9");

    let mut events = store.subscribe();
    let stuck = tokio::spawn({
        let store = store.clone();
        async move { store.toggle(BOOK, 2).await }
    });
    events.recv().await.unwrap();
    assert_eq!(store.busy(BOOK).await, Some(2));

    let reloaded = store.load(BOOK).await.unwrap();
    assert!(has_book(&reloaded, 1));
    assert_eq!(store.busy(BOOK).await, None);
    assert!(store.toggle(BOOK, 5).await.is_ok());

    // The old toggle finishing late must not clobber the reloaded list
    gate.add_permits(1);
    stuck.await.unwrap().unwrap();
    let shown = store.snapshot(BOOK).await.unwrap();
    assert!(has_book(&shown, 1));
    assert!(!has_book(&shown, 5));
}

#[tokio::test]
async fn test_reconciler_reloads_after_commit() {
    let api = FakeApi::start().await;
    let store = loaded_store(&api).await;
    api.on_empty(Method::DELETE, "/shelves/5/books/9", 204);
    let reconciler = store.spawn_reconciler();
    let fetches = || {
        api.lines()
            .iter()
            .filter(|l| *l == "GET /shelves/book/9")
            .count()
    };
    assert_eq!(fetches(), 1);

    store.toggle(BOOK, 5).await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), async {
        while fetches() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("reconciler never reloaded");

    reconciler.abort();
}

#[tokio::test]
async fn test_updates_only_carry_one_book() {
    use futures::StreamExt;

    let api = FakeApi::start().await;
    let store = loaded_store(&api).await;
    api.on(
        Method::GET,
        "/shelves/book/8",
        200,
        json!({"book_id": 8, "shelves": [shelf(1, "want-to-read", true, false)]}),
    );
    let updates = store.updates(BOOK);
    tokio::pin!(updates);

    store.load(8).await.unwrap();
    store.load(BOOK).await.unwrap();

    let event = tokio::time::timeout(Duration::from_secs(1), updates.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event, ShelfEvent::Updated { book_id: BOOK });
}

#[tokio::test]
async fn test_unauthorized_clears_token() {
    let api = FakeApi::start().await;
    api.on(Method::GET, "/auth/me", 401, json!({"detail": "Invalid token"}));
    let client = api.client(Some("stale")).await;

    let err = client.me().await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Unauthenticated);
    assert_eq!(err.to_string(), "GET /auth/me failed: 401 Invalid token");
    assert!(!client.tokens().is_logged_in().await);
}

#[tokio::test]
async fn test_missing_token_never_reaches_network() {
    let api = FakeApi::start().await;
    let client = api.client(None).await;

    assert!(matches!(client.me().await, Err(NukbookError::MissingToken)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let api = FakeApi::start().await;
    api.on_text(Method::GET, "/books/4", 502, "Bad gateway");
    let client = api.client(None).await;

    let err = client.book(4).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "GET /books/4 failed: 502 Bad gateway");
}

#[tokio::test]
async fn test_admin_401_redirects_to_login() {
    let api = FakeApi::start().await;
    api.on(Method::GET, "/admin/authors", 401, json!({"detail": "Not authenticated"}));
    let client = api.client(Some("t0k")).await;
    let mut table = AdminTable::<AdminAuthor>::new(client.clone());

    let failure = table.load().await.unwrap_err();
    assert_eq!(failure, AdminFailure::Redirect(Redirect::login("/admin/authors")));
    assert_eq!(
        Redirect::login("/admin/authors").to_url(),
        "/login?next=%2Fadmin%2Fauthors"
    );
    assert!(!client.tokens().is_logged_in().await);
}

#[tokio::test]
async fn test_admin_403_redirects_home() {
    let api = FakeApi::start().await;
    api.on(Method::GET, "/admin/books", 403, json!({"detail": "Admins only"}));
    let client = api.client(Some("t0k")).await;
    let mut table = AdminTable::<AdminBook>::new(client.clone());

    assert_eq!(
        table.load().await.unwrap_err(),
        AdminFailure::Redirect(Redirect::Home)
    );
    assert!(client.tokens().is_logged_in().await);
}

#[tokio::test]
async fn test_admin_delete_rollback_and_not_found() {
    let api = FakeApi::start().await;
    api.on(
        Method::GET,
        "/admin/books",
        200,
        json!({"items": [
            {"id": 1, "title": "Dune"},
            {"id": 2, "title": "Emma"}
        ], "limit": 50, "offset": 0}),
    )
    .on(Method::DELETE, "/admin/books/1", 500, json!({"detail": "locked"}))
    .on(Method::DELETE, "/admin/books/2", 404, json!({"detail": "Book not found"}));
    let mut table = AdminTable::<AdminBook>::new(api.client(Some("t0k")).await);
    table.load().await.unwrap();

    let failure = table.delete(1).await.unwrap_err();
    assert_eq!(
        failure,
        AdminFailure::Message("DELETE /admin/books/1 failed: 500 locked".into())
    );
    assert_eq!(table.rows().len(), 2, "row restored after failure");

    table.delete(2).await.unwrap();
    let ids: Vec<i64> = table.rows().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1]);

    let list = api
        .calls()
        .into_iter()
        .find(|c| c.path == "/admin/books" && c.method == Method::GET)
        .unwrap();
    assert_eq!(list.query.as_deref(), Some("limit=50&offset=0"));
}

#[tokio::test]
async fn test_debounced_search_issues_one_request() {
    let api = FakeApi::start().await;
    api.on(
        Method::GET,
        "/search",
        200,
        json!({"books": [{"id": 7, "title": "Dune"}], "authors": [], "users": []}),
    );
    let source = SearchSource::new(api.client(None).await);
    let lookup = DebouncedLookup::new(source, QueryPolicy::SEARCH);

    lookup.set_query("d");
    assert_eq!(lookup.state(), LookupState::Hint { min_len: 2 });
    lookup.set_query("du");
    tokio::time::sleep(Duration::from_millis(50)).await;
    lookup.set_query("dune");

    let state = lookup.settled().await;
    assert_eq!(state.ready().unwrap().books[0].title, "Dune");

    let searches: Vec<_> = api.calls().into_iter().filter(|c| c.path == "/search").collect();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].query.as_deref(), Some("q=dune&limit=5"));
}

#[tokio::test]
async fn test_login_stores_token_for_later_calls() {
    let api = FakeApi::start().await;
    api.on(
        Method::POST,
        "/auth/login",
        200,
        json!({"access_token": "fresh", "token_type": "bearer"}),
    )
    .on(
        Method::GET,
        "/auth/me",
        200,
        json!({"id": 1, "email": "ana@example.com", "username": "ana", "role": "user", "is_private": false}),
    );
    let client = api.client(None).await;

    let me = client.login("ana@example.com", "secret").await.unwrap();
    assert_eq!(me.username, "ana");
    assert_eq!(client.tokens().get().await.as_deref(), Some("fresh"));

    let calls = api.calls();
    assert_eq!(
        calls[0].json(),
        json!({"email": "ana@example.com", "password": "secret"})
    );
    assert_eq!(calls[1].bearer.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_follow_private_user_goes_pending() {
    let api = FakeApi::start().await;
    api.on(
        Method::GET,
        "/users/4",
        200,
        json!({"id": 4, "username": "bo", "is_private": true, "followers_count": 2,
               "following_count": 1, "is_me": false, "follow_status": "none"}),
    )
    .on(Method::POST, "/users/4/follow", 200, json!({"status": "pending"}));
    let notices = NoticeBus::new();
    let mut rx = notices.subscribe();
    let mut view = ProfileView::load(api.client(Some("t0k")).await, notices, 4)
        .await
        .unwrap();

    assert_eq!(view.follow().await.unwrap(), FollowStatus::Pending);
    assert_eq!(view.profile().follow_status, FollowStatus::Pending);
    assert_eq!(view.profile().followers_count, 2);
    assert_eq!(rx.recv().await.unwrap().message, "Follow request sent.");
}

#[tokio::test]
async fn test_failed_unfollow_reverts() {
    let api = FakeApi::start().await;
    api.on(
        Method::GET,
        "/users/4",
        200,
        json!({"id": 4, "username": "bo", "is_private": false, "followers_count": 3,
               "following_count": 0, "is_me": false, "follow_status": "accepted"}),
    )
    .on(Method::POST, "/users/4/unfollow", 403, json!({"detail": "Forbidden"}));
    let mut view = ProfileView::load(api.client(Some("t0k")).await, NoticeBus::new(), 4)
        .await
        .unwrap();

    assert!(view.unfollow().await.is_err());
    assert_eq!(view.profile().follow_status, FollowStatus::Accepted);
    assert_eq!(view.profile().followers_count, 3);
    assert_eq!(
        view.status(),
        Some("You do not have access to update follows.")
    );
}

#[tokio::test]
async fn test_deny_request_removes_row() {
    let api = FakeApi::start().await;
    api.on(
        Method::GET,
        "/me/follow-requests",
        200,
        json!([
            {"id": 11, "requester": {"id": 4, "username": "bo"}},
            {"id": 12, "requester": {"id": 5, "username": "cy"}}
        ]),
    )
    .on_empty(Method::POST, "/me/follow-requests/11/deny", 204)
    .on(Method::POST, "/me/follow-requests/12/approve", 500, json!({"detail": "oops"}));
    let mut requests = FollowRequests::new(api.client(Some("t0k")).await);
    requests.load().await.unwrap();

    requests.deny(11).await.unwrap();
    assert!(requests.approve(12).await.is_err());
    let ids: Vec<i64> = requests.items().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![12]);
}

#[tokio::test]
async fn test_opening_notifications_zeroes_counts() {
    let api = FakeApi::start().await;
    api.on(Method::GET, "/me/notifications", 200, json!({"requests": 1, "activity": 2}))
        .on(
            Method::GET,
            "/me/notifications/preview",
            200,
            json!({"requests": [], "activity": []}),
        )
        .on(Method::POST, "/me/notifications/seen", 200, json!({"ok": true}));
    let bell = NotificationBell::new(api.client(Some("t0k")).await);

    bell.refresh().await.unwrap();
    assert_eq!(bell.badge(), Some(3));

    bell.open().await.unwrap();
    assert_eq!(bell.counts(), Some(NotificationCounts::default()));
    assert_eq!(bell.badge(), None);
    let seen = api
        .calls()
        .into_iter()
        .find(|c| c.path == "/me/notifications/seen")
        .unwrap();
    assert_eq!(seen.json(), json!({"requests": true, "activity": true}));
}

#[tokio::test]
async fn test_author_like_rolls_back() {
    let api = FakeApi::start().await;
    api.on(Method::GET, "/authors/3/liked", 200, json!({"liked": false}))
        .on(Method::POST, "/authors/3/liked", 500, json!({"detail": "down"}));
    let mut like = AuthorLike::load(api.client(Some("t0k")).await, 3).await;
    assert_eq!(like.liked(), Some(false));

    assert!(like.toggle().await.is_err());
    assert_eq!(like.liked(), Some(false));
}

#[tokio::test]
async fn test_shelf_rename_rolls_back() {
    let api = FakeApi::start().await;
    api.on(
        Method::GET,
        "/shelves",
        200,
        json!([{"id": 5, "name": "Favorites", "is_system": false, "visibility": "public", "book_count": 2}]),
    )
    .on(Method::PATCH, "/shelves/5", 409, json!({"detail": "Shelf name already exists"}));
    let mut list = ShelfList::new(api.client(Some("t0k")).await, NoticeBus::new());
    list.load().await.unwrap();

    assert!(list.rename(5, "Loved").await.is_err());
    assert_eq!(list.shelves()[0].name, "Favorites");
    assert_eq!(list.shelves()[0].visibility, Visibility::Public);
}

#[tokio::test]
async fn test_saved_rename_survives_failed_refresh() {
    let api = FakeApi::start().await;
    api.on(
        Method::GET,
        "/shelves",
        200,
        json!([{"id": 5, "name": "Favorites", "is_system": false, "visibility": "public", "book_count": 2}]),
    )
    .on(
        Method::PATCH,
        "/shelves/5",
        200,
        json!({"id": 5, "name": "Loved", "is_system": false, "visibility": "public"}),
    );
    let mut list = ShelfList::new(api.client(Some("t0k")).await, NoticeBus::new());
    list.load().await.unwrap();

    api.on(Method::GET, "/shelves", 503, json!({"detail": "busy"}));
    list.rename(5, "Loved").await.unwrap();

    assert_eq!(list.shelves()[0].name, "Loved");
    assert_eq!(list.status(), None);
    let refreshes = api.lines().iter().filter(|l| *l == "GET /shelves").count();
    assert_eq!(refreshes, 2);
}

fn taste_compare_body() -> serde_json::Value {
    let row = |id: i64, title: &str, mine: u8, theirs: u8| {
        json!({
            "book_id": id,
            "title": title,
            "viewer_rating": mine,
            "target_rating": theirs,
            "diff": (mine as i32 - theirs as i32).abs(),
        })
    };
    json!({
        "viewer": {"id": 1, "username": "ann"},
        "target": {"id": 4, "username": "bo", "avatar_url": null},
        "common_count": 120,
        "similarity_score": 71.5,
        "mean_abs_diff": 1.1,
        "pearson": null,
        "agreements": [row(9, "Dune", 5, 5), row(10, "Emma", 3, 1)],
        "disagreements": [row(11, "Ulysses", 5, 1), row(10, "Emma", 3, 1)],
        "viewer_loved_target_unread": [
            {"book_id": 12, "title": "Kindred", "authors": [{"id": 2, "name": "Octavia Butler"}], "viewer_rating": 5}
        ],
        "target_loved_viewer_unread": [],
        "shared_ratings": [row(11, "Ulysses", 5, 1)],
    })
}

#[tokio::test]
async fn test_taste_compare_pages_and_filters() {
    let api = FakeApi::start().await;
    api.on(Method::GET, "/users/4/taste-compare", 200, taste_compare_body());
    let mut view = TasteCompareView::new(api.client(Some("t0k")).await, 4);

    view.set_page(50, 50);
    view.set_sort(CompareSort::Title);
    assert_eq!(view.offset(), 0, "a new order starts at the first page");
    view.load().await.unwrap();

    let call = api.calls().pop().unwrap();
    assert_eq!(call.query.as_deref(), Some("limit=50&offset=0&sort=title"));

    let data = view.data().unwrap();
    assert_eq!(data.target.username, "bo");
    assert_eq!(data.viewer_loved_target_unread[0].rating, 5);
    assert_eq!(view.range_label().as_deref(), Some("Showing 1–50 of 120"));
    assert!(view.has_next());
    assert!(!view.has_previous());

    let agreements: Vec<i64> = view.strong_agreements().iter().map(|r| r.book_id).collect();
    assert_eq!(agreements, vec![9]);
    let disagreements: Vec<i64> = view.strong_disagreements().iter().map(|r| r.book_id).collect();
    assert_eq!(disagreements, vec![11]);

    view.next_page().await.unwrap();
    let call = api.calls().pop().unwrap();
    assert_eq!(call.query.as_deref(), Some("limit=50&offset=50&sort=title"));
}

#[tokio::test]
async fn test_taste_compare_privacy_block() {
    let api = FakeApi::start().await;
    api.on(
        Method::GET,
        "/users/4/taste-compare",
        403,
        json!({"detail": "Not allowed to compare taste"}),
    );
    let mut view = TasteCompareView::new(api.client(Some("t0k")).await, 4);

    let err = view.load().await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Forbidden);
    assert_eq!(view.blocked(), Some(PRIVACY_BLOCKED));
    assert_eq!(view.status(), None);
    assert!(view.data().is_none());
}

#[tokio::test]
async fn test_taste_compare_needs_login() {
    let api = FakeApi::start().await;
    let mut view = TasteCompareView::new(api.client(None).await, 4);

    assert!(matches!(view.load().await, Err(NukbookError::MissingToken)));
    assert_eq!(view.status(), Some("Login to compare tastes."));
    assert!(api.calls().is_empty());
}
