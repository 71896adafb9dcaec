//! Review list

use chrono::Local;
use recipe_share_core::{review_list_label, Review, SessionContext};

use crate::output::format_timestamp;

/// `"★★★☆☆"` for a rating of 3
pub fn stars(review: &Review) -> String {
    review
        .stars()
        .iter()
        .map(|filled| if *filled { '★' } else { '☆' })
        .collect()
}

/// The user's initial stands in for a missing avatar image
pub fn avatar(review: &Review) -> String {
    match (&review.user.image, review.user.initial()) {
        (Some(_), _) => "◉".to_string(),
        (None, Some(initial)) => initial.to_string(),
        (None, None) => "?".to_string(),
    }
}

/// Count line, then each review headed by its last edit time. Nothing at
/// all when there are no reviews.
pub fn render_reviews(reviews: &[Review], viewer: &SessionContext) -> Vec<String> {
    if reviews.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![review_list_label(reviews.len())];
    for review in reviews {
        let mut header = format!(
            "{}  ({}) {} · {}",
            stars(review),
            avatar(review),
            review.user.display_name(),
            format_timestamp(&review.updated_at.with_timezone(&Local))
        );
        if viewer.is_user(&review.user_id) {
            header.push_str("  [yours, editable]");
        }
        lines.push(header);
        if let Some(content) = review.content() {
            lines.extend(content.lines().map(|line| format!("    {}", line)));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_share_core::{Session, UserSummary};
    use serde_json::json;

    fn review(rating: u8, user: &str, name: Option<&str>, content: Option<&str>) -> Review {
        edited_review(rating, user, name, content, "2024-06-01T08:00:00Z")
    }

    fn edited_review(
        rating: u8,
        user: &str,
        name: Option<&str>,
        content: Option<&str>,
        updated_at: &str,
    ) -> Review {
        serde_json::from_value(json!({
            "id": format!("rv-{}", user),
            "rating": rating,
            "content": content,
            "userId": user,
            "user": { "id": user, "name": name },
            "createdAt": "2024-06-01T08:00:00Z",
            "updatedAt": updated_at
        }))
        .unwrap()
    }

    #[test]
    fn test_stars_and_avatar() {
        let r = review(3, "u1", Some("marko"), None);
        assert_eq!(stars(&r), "★★★☆☆");
        assert_eq!(avatar(&r), "M");
        assert_eq!(avatar(&review(5, "u2", None, None)), "?");
    }

    #[test]
    fn test_no_reviews_renders_nothing() {
        assert!(render_reviews(&[], &SessionContext::anonymous()).is_empty());
    }

    #[test]
    fn test_own_review_is_marked() {
        let viewer = SessionContext::authenticated(Session {
            user: UserSummary {
                id: "u2".into(),
                name: Some("Ana".to_string()),
                image: None,
            },
        });
        let reviews = vec![
            review(5, "u1", Some("Marko"), Some("Izvrsno!")),
            review(4, "u2", Some("Ana"), Some("")),
        ];

        let lines = render_reviews(&reviews, &viewer);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "2 recenzije");
        assert!(lines[1].starts_with("★★★★★  (M) Marko · "));
        assert!(!lines[1].contains("[yours"));
        assert_eq!(lines[2], "    Izvrsno!");
        assert!(lines[3].starts_with("★★★★☆  (A) Ana"));
        assert!(lines[3].ends_with("[yours, editable]"));
    }

    #[test]
    fn test_header_shows_last_edit_time() {
        let edited = edited_review(4, "u1", Some("Marko"), None, "2024-07-15T12:00:00Z");
        let expected = format_timestamp(&edited.updated_at.with_timezone(&Local));
        let created = format_timestamp(&edited.created_at.with_timezone(&Local));

        let lines = render_reviews(&[edited], &SessionContext::anonymous());

        assert_eq!(lines[0], "1 recenzija");
        assert!(lines[1].ends_with(&expected));
        assert!(!lines[1].contains(&created));
    }
}
