//! Wire types of the nukBook API

mod catalog;
mod shelf;
mod social;

pub use catalog::{
    Author, AuthorRef, Book, BookRef, Genre, LikeState, Page, ReadingStatusEntry,
    RecommendationSection, Review, SearchAuthor, SearchBook, SearchResults, SearchUser,
    SimilarBook, Tag, TopAuthor,
};
pub use shelf::{
    ReadingStatus, ShelfBook, ShelfBooks, ShelfInfo, ShelfOwner, ShelfState, ShelfSummary,
    ShelvesForBook, SystemShelf, UserShelf, UserShelves, Visibility,
};
pub use social::{
    ActivityItem, ActivityKind, FollowRequest, FollowState, FollowStatus, LikedAuthor, LovedBook,
    Me, NotificationCounts, NotificationPreview, Profile, SharedRating, TasteCompare,
    TokenResponse, UserRef,
};

/// Numeric identifier used by every API resource
pub type Id = i64;
