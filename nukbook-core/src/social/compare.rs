//! Taste comparison between me and another reader

use crate::client::{with_query, ApiClient, Auth};
use crate::error::{ErrorClass, NukbookError, Result};
use crate::types::{Id, SharedRating, TasteCompare};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shown instead of the comparison when the other side's shelves are hidden from me
pub const PRIVACY_BLOCKED: &str = "You can’t compare tastes due to privacy settings.";

/// Default and maximum page size for shared ratings
pub const COMPARE_PAGE: u32 = 50;
pub const COMPARE_PAGE_MAX: u32 = 100;

/// Agreements at or above this compatibility are worth showing
pub const STRONG_AGREEMENT: u32 = 55;
/// Disagreements at or below this compatibility are worth showing
pub const STRONG_DISAGREEMENT: u32 = 25;

/// Order of the shared ratings table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareSort {
    #[default]
    DiffDesc,
    DiffAsc,
    Title,
    ViewerRating,
    TargetRating,
}

impl CompareSort {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareSort::DiffDesc => "diff_desc",
            CompareSort::DiffAsc => "diff_asc",
            CompareSort::Title => "title",
            CompareSort::ViewerRating => "viewer_rating",
            CompareSort::TargetRating => "target_rating",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompareSort::DiffDesc => "Delta (high to low)",
            CompareSort::DiffAsc => "Delta (low to high)",
            CompareSort::Title => "Title (A–Z)",
            CompareSort::ViewerRating => "Your rating (high)",
            CompareSort::TargetRating => "Their rating (high)",
        }
    }
}

impl fmt::Display for CompareSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareSort {
    type Err = NukbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "diff_desc" => Ok(CompareSort::DiffDesc),
            "diff_asc" => Ok(CompareSort::DiffAsc),
            "title" => Ok(CompareSort::Title),
            "viewer_rating" => Ok(CompareSort::ViewerRating),
            "target_rating" => Ok(CompareSort::TargetRating),
            other => Err(NukbookError::Invalid(format!("{} is not a sort order", other))),
        }
    }
}

/// Percent agreement for one shared book; a 4-star gap is 0%
pub fn compatibility(diff: u8) -> u32 {
    let score = (1.0 - f64::from(diff) / 4.0).max(0.0) * 100.0;
    score.round() as u32
}

impl ApiClient {
    pub async fn taste_compare(
        &self,
        user_id: Id,
        sort: CompareSort,
        limit: u32,
        offset: u32,
    ) -> Result<TasteCompare> {
        let path = with_query(
            &format!("/users/{}/taste-compare", user_id),
            &[
                ("limit", Some(limit.clamp(1, COMPARE_PAGE_MAX).to_string())),
                ("offset", Some(offset.to_string())),
                ("sort", Some(sort.as_str().to_string())),
            ],
        );
        self.get(&path, Auth::Required).await
    }
}

/// The compare page: stats, loved-unread lists and a paged shared-ratings table
pub struct TasteCompareView {
    client: ApiClient,
    user_id: Id,
    sort: CompareSort,
    limit: u32,
    offset: u32,
    data: Option<TasteCompare>,
    status: Option<String>,
    blocked: bool,
}

impl TasteCompareView {
    pub fn new(client: ApiClient, user_id: Id) -> Self {
        Self {
            client,
            user_id,
            sort: CompareSort::default(),
            limit: COMPARE_PAGE,
            offset: 0,
            data: None,
            status: None,
            blocked: false,
        }
    }

    pub fn data(&self) -> Option<&TasteCompare> {
        self.data.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Set when a 403 says the other side's shelves are off limits
    pub fn blocked(&self) -> Option<&'static str> {
        self.blocked.then_some(PRIVACY_BLOCKED)
    }

    pub fn sort(&self) -> CompareSort {
        self.sort
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn set_page(&mut self, offset: u32, limit: u32) {
        self.offset = offset;
        self.limit = limit.clamp(1, COMPARE_PAGE_MAX);
    }

    /// Changing the order starts over at the first page
    pub fn set_sort(&mut self, sort: CompareSort) {
        self.sort = sort;
        self.offset = 0;
    }

    pub fn has_next(&self) -> bool {
        self.data
            .as_ref()
            .is_some_and(|d| self.offset + self.limit < d.common_count)
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    pub async fn next_page(&mut self) -> Result<()> {
        self.offset += self.limit;
        self.load().await
    }

    pub async fn previous_page(&mut self) -> Result<()> {
        self.offset = self.offset.saturating_sub(self.limit);
        self.load().await
    }

    pub async fn load(&mut self) -> Result<()> {
        self.status = None;
        self.blocked = false;
        if self.client.tokens().get().await.is_none() {
            self.status = Some("Login to compare tastes.".to_string());
            return Err(NukbookError::MissingToken);
        }

        match self
            .client
            .taste_compare(self.user_id, self.sort, self.limit, self.offset)
            .await
        {
            Ok(data) => {
                self.data = Some(data);
                Ok(())
            }
            Err(e) if e.class() == ErrorClass::Forbidden => {
                tracing::debug!(user_id = self.user_id, "Taste comparison blocked");
                self.blocked = true;
                self.data = None;
                Err(e)
            }
            Err(e) => {
                tracing::warn!(user_id = self.user_id, "Failed to load taste comparison: {}", e);
                self.status = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// "Showing 1–50 of 120", or the empty message
    pub fn range_label(&self) -> Option<String> {
        let total = self.data.as_ref()?.common_count;
        if total == 0 {
            return Some("No shared ratings yet.".to_string());
        }
        Some(format!(
            "Showing {}–{} of {}",
            (self.offset + 1).min(total),
            (self.offset + self.limit).min(total),
            total
        ))
    }

    pub fn strong_agreements(&self) -> Vec<&SharedRating> {
        self.filtered(|d| &d.agreements, |c| c >= STRONG_AGREEMENT)
    }

    pub fn strong_disagreements(&self) -> Vec<&SharedRating> {
        self.filtered(|d| &d.disagreements, |c| c <= STRONG_DISAGREEMENT)
    }

    fn filtered<'a>(
        &'a self,
        rows: impl Fn(&'a TasteCompare) -> &'a Vec<SharedRating>,
        keep: impl Fn(u32) -> bool,
    ) -> Vec<&'a SharedRating> {
        self.data
            .as_ref()
            .map(|d| rows(d).iter().filter(|r| keep(compatibility(r.diff))).collect())
            .unwrap_or_default()
    }
}
