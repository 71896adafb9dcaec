use proptest::prelude::*;
use recipe_share_core::domain::*;
use rstest::rstest;
use serde_json::json;

fn detail_with_ratings(ratings: &[u8]) -> RecipeDetail {
    let reviews: Vec<serde_json::Value> = ratings
        .iter()
        .enumerate()
        .map(|(i, rating)| {
            json!({
                "id": format!("r{}", i),
                "rating": rating,
                "content": "Fino",
                "userId": format!("u{}", i),
                "user": { "id": format!("u{}", i), "name": "Gost" },
                "createdAt": "2024-03-01T10:00:00Z",
                "updatedAt": "2024-03-02T11:30:00Z"
            })
        })
        .collect();

    serde_json::from_value(json!({
        "id": "rec_1",
        "title": "Sarma",
        "preparationTime": 180,
        "servings": 8,
        "isVegan": false,
        "isVegetarian": false,
        "userId": "owner",
        "user": { "id": "owner", "name": "Baka" },
        "categories": [{ "category": { "id": "c1", "name": "Zimnica" } }],
        "difficulty": { "id": "d2", "name": "Srednje", "level": 2 },
        "ingredients": [{ "name": "kupus", "quantity": "1", "unit": "glavica" }],
        "instructions": [
            { "stepNumber": 2, "content": "Zamotati" },
            { "stepNumber": 1, "content": "Pripremiti nadjev" }
        ],
        "reviews": reviews
    }))
    .unwrap()
}

// ===== Rating =====

#[test]
fn test_average_rating_of_detail() {
    let detail = detail_with_ratings(&[5, 3, 4]);
    assert_eq!(detail.average_rating(), 4.0);
    assert_eq!(detail.rating_summary().as_deref(), Some("4.0 (3 recenzije)"));
}

#[test]
fn test_no_reviews_means_no_rating_block() {
    let detail = detail_with_ratings(&[]);
    assert_eq!(detail.average_rating(), 0.0);
    assert_eq!(detail.rating_summary(), None);
}

#[rstest]
#[case(&[5], "5.0 (1 recenzija)")]
#[case(&[4, 5], "4.5 (2 recenzije)")]
#[case(&[1, 2, 3, 4, 5], "3.0 (5 recenzije)")]
fn test_rating_summary_labels(#[case] ratings: &[u8], #[case] expected: &str) {
    assert_eq!(
        detail_with_ratings(ratings).rating_summary().as_deref(),
        Some(expected)
    );
}

// ===== Presentation helpers =====

#[test]
fn test_detail_badges() {
    let detail = detail_with_ratings(&[]);
    let labels: Vec<String> = detail
        .badges()
        .iter()
        .map(|b| b.label().to_string())
        .collect();
    assert_eq!(labels, vec!["Zimnica".to_string(), "Srednje".to_string()]);
}

#[test]
fn test_instructions_are_ordered_by_step() {
    let detail = detail_with_ratings(&[]);
    let steps: Vec<u32> = detail
        .ordered_instructions()
        .iter()
        .map(|s| s.step_number)
        .collect();
    assert_eq!(steps, vec![1, 2]);
}

// ===== Property-based Tests =====

proptest! {
    #[test]
    fn test_average_stays_within_rating_bounds(ratings in prop::collection::vec(1u8..=5u8, 1..40)) {
        let detail = detail_with_ratings(&ratings);
        let average = detail.average_rating();
        prop_assert!((1.0..=5.0).contains(&average));
    }

    #[test]
    fn test_parse_positive_accepts_all_positive_numbers(value in 1u32..100_000u32) {
        prop_assert_eq!(parse_positive(&value.to_string()), Some(value));
    }
}
