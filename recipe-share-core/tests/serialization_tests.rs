use pretty_assertions::assert_eq;
use recipe_share_core::domain::*;
use serde_json::json;

// ===== Listing payloads =====

#[test]
fn test_recipe_summary_from_listing_payload() {
    let payload = json!({
        "id": "rec_1",
        "title": "Pašticada",
        "description": "Dalmatinski klasik",
        "image_path": "https://blob.example.com/pasticada.jpg",
        "preparationTime": 240,
        "servings": 6,
        "isVegan": false,
        "isVegetarian": false,
        "categories": [{ "category": { "id": "c1", "name": "Glavna jela" } }],
        "allergies": [{ "allergy": { "id": "a1", "name": "Gluten" } }],
        "difficulty": { "id": "d3", "name": "Teško", "level": 3 },
        "user": { "id": "u1", "name": "Marija", "image": null }
    });

    let recipe: RecipeSummary = serde_json::from_value(payload).unwrap();

    assert_eq!(recipe.id, RecipeId::from("rec_1"));
    assert_eq!(recipe.preparation_time, Some(240));
    assert_eq!(recipe.servings, Some(6));
    assert_eq!(recipe.categories[0].category.name, "Glavna jela");
    assert_eq!(recipe.allergies[0].allergy.id, AllergyId::from("a1"));
    assert_eq!(recipe.difficulty.as_ref().map(|d| d.level), Some(3));
    assert_eq!(
        recipe.image_path.as_deref(),
        Some("https://blob.example.com/pasticada.jpg")
    );
}

#[test]
fn test_recipe_summary_tolerates_sparse_payload() {
    let recipe: RecipeSummary =
        serde_json::from_value(json!({ "id": "rec_2", "title": "Palačinke" })).unwrap();

    assert!(recipe.categories.is_empty());
    assert!(recipe.difficulty.is_none());
    assert!(!recipe.is_vegan);
}

#[test]
fn test_image_path_accepts_camel_case_alias() {
    let recipe: RecipeSummary = serde_json::from_value(json!({
        "id": "rec_3",
        "title": "Fritule",
        "imagePath": "https://blob.example.com/fritule.jpg"
    }))
    .unwrap();

    assert_eq!(
        recipe.image_path.as_deref(),
        Some("https://blob.example.com/fritule.jpg")
    );
}

#[test]
fn test_filter_criteria_roundtrip_keeps_sets() {
    let criteria = FilterCriteria::new()
        .with_search_term("juha")
        .with_category_ids(["c2", "c1"])
        .with_vegetarian(true)
        .with_max_prep_time("30");

    let json = serde_json::to_string(&criteria).unwrap();
    let back: FilterCriteria = serde_json::from_str(&json).unwrap();

    assert_eq!(back, criteria);
}

#[test]
fn test_review_draft_omits_missing_content() {
    let json = serde_json::to_value(ReviewDraft::new(4)).unwrap();
    assert_eq!(json, json!({ "rating": 4 }));
}

#[test]
fn test_session_payload() {
    let session: Session = serde_json::from_value(json!({
        "user": { "id": "u9", "name": "Luka", "image": "https://cdn.example.com/luka.png" }
    }))
    .unwrap();

    assert_eq!(session.user.id, UserId::from("u9"));
    assert_eq!(session.user.display_name(), "Luka");
}
