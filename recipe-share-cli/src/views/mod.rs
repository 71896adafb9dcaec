//! Presentation of listing, filters and recipe detail
//!
//! Views render to plain lines so they can be asserted on. Colour is applied
//! by the callers that print them.

pub mod allergies;
pub mod detail;
pub mod filters;
pub mod listing;
pub mod reviews;

use recipe_share_core::{format_rating, review_count_label, RecipeBadge};

/// `"★ 4.0 (3 recenzije)"`, or nothing when the average is zero
pub fn rating_block(average: f64, count: usize) -> Option<String> {
    (average > 0.0).then(|| format!("★ {} ({})", format_rating(average), review_count_label(count)))
}

pub fn badge_line(badges: &[RecipeBadge]) -> Option<String> {
    (!badges.is_empty()).then(|| {
        badges
            .iter()
            .map(|badge| format!("[{}]", badge.label()))
            .collect::<Vec<_>>()
            .join(" ")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4.0, 3, Some("★ 4.0 (3 recenzije)"))]
    #[case(5.0, 1, Some("★ 5.0 (1 recenzija)"))]
    #[case(3.5, 12, Some("★ 3.5 (12 recenzije)"))]
    #[case(0.0, 0, None)]
    fn test_rating_block(#[case] average: f64, #[case] count: usize, #[case] expected: Option<&str>) {
        assert_eq!(rating_block(average, count).as_deref(), expected);
    }

    #[test]
    fn test_badge_line() {
        let badges = vec![
            RecipeBadge::Category("Juhe".to_string()),
            RecipeBadge::Vegan,
        ];
        assert_eq!(badge_line(&badges).as_deref(), Some("[Juhe] [Veganski]"));
        assert_eq!(badge_line(&[]), None);
    }
}
