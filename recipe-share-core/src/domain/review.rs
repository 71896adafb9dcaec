use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::ids::{ReviewId, UserId};
use crate::domain::session::UserSummary;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub rating: u8,
    #[serde(default)]
    pub content: Option<String>,
    pub user_id: UserId,
    pub user: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Filled/empty flags for the five rating stars.
    pub fn stars(&self) -> [bool; MAX_RATING as usize] {
        let mut stars = [false; MAX_RATING as usize];
        for (i, star) in stars.iter_mut().enumerate() {
            *star = i < self.rating as usize;
        }
        stars
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// Arithmetic mean of all ratings, 0 when there are no reviews.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    f64::from(sum) / reviews.len() as f64
}

/// One decimal place, as shown next to the star.
pub fn format_rating(average: f64) -> String {
    format!("{:.1}", average)
}

/// Count next to the average rating: `1 recenzija`, otherwise `recenzije`.
pub fn review_count_label(count: usize) -> String {
    let noun = if count == 1 { "recenzija" } else { "recenzije" };
    format!("{} {}", count, noun)
}

/// Count heading the review list: `recenzije` for 2 to 4, otherwise `recenzija`.
pub fn review_list_label(count: usize) -> String {
    let noun = match count {
        2..=4 => "recenzije",
        _ => "recenzija",
    };
    format!("{} {}", count, noun)
}

/// Body of a new or edited review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReviewDraft {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ReviewDraft {
    pub fn new(rating: u8) -> Self {
        Self {
            rating,
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        self.content = (!content.trim().is_empty()).then_some(content);
        self
    }
}
