//! Snapshot tests for rendered shelf controls and feed lines using insta

use nukbook_core::shelves::{plan_toggle, ShelfBar, ShelfPill};
use nukbook_core::types::{ActivityItem, ShelfState};

fn shelf(id: i64, name: &str, is_system: bool, has_book: bool) -> ShelfState {
    ShelfState {
        id,
        name: name.to_string(),
        is_system,
        has_book,
        visibility: None,
    }
}

fn sample_shelves() -> Vec<ShelfState> {
    vec![
        shelf(7, "Sci-fi", false, true),
        shelf(1, "want-to-read", true, true),
        shelf(5, "Favorites", false, false),
        shelf(2, "reading", true, false),
    ]
}

#[test]
fn test_shelf_bar_rendering() {
    let bar = ShelfBar::new(&sample_shelves(), None);
    insta::assert_snapshot!(bar.to_string(), @r"
    [ ]    2  Reading
    [x]    1  Want to read
    [ ]    5  Favorites
    [x]    7  Sci-fi
    ");
}

#[test]
fn test_shelf_bar_while_toggling() {
    let plan = plan_toggle(&sample_shelves(), 2).unwrap();
    let bar = ShelfBar::new(&plan.next, Some(2));
    assert!(bar.disabled);
    insta::assert_snapshot!(bar.to_string(), @r"
    [x]    2  Reading …
    [ ]    1  Want to read
    [ ]    5  Favorites
    [x]    7  Sci-fi
    ");
}

#[test]
fn test_shelf_pill_labels() {
    let labels: Vec<String> = [
        sample_shelves(),
        vec![shelf(2, "reading", true, true)],
        vec![shelf(5, "Favorites", false, true), shelf(6, "Loans", false, true)],
        vec![],
    ]
    .iter()
    .map(|shelves| ShelfPill::new(shelves).label())
    .collect();

    insta::assert_snapshot!(labels.join("\n"), @r"
    Want to read · +1
    Reading
    Shelf · +2
    Shelf
    ");
}

#[test]
fn test_activity_lines() {
    let items: Vec<ActivityItem> = serde_json::from_value(serde_json::json!([
        {"type": "status", "status": "reading", "user": {"id": 1, "username": "ana"},
         "book": {"id": 9, "title": "Dune"}},
        {"type": "review", "rating": 4, "user": {"id": 2, "username": "bo"},
         "book": {"id": 3, "title": "Emma"}},
        {"type": "status", "status": "dropped", "user": {"id": 3, "username": "cy"},
         "book": {"id": 4, "title": "Ulysses"}}
    ]))
    .unwrap();

    let lines: Vec<String> = items.iter().map(ActivityItem::summary).collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    @ana started reading Dune
    @bo reviewed Emma
    @cy dropped Ulysses
    ");
}
