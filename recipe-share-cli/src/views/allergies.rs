//! Allergen panel

use recipe_share_core::AllergyLink;

/// Omitted entirely when the recipe lists no allergens
pub fn render_allergies(allergies: &[AllergyLink]) -> Vec<String> {
    allergies
        .iter()
        .map(|link| format!("⚠ {}", link.allergy.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_share_core::Allergy;

    #[test]
    fn test_render_allergies() {
        let allergies = vec![AllergyLink {
            allergy: Allergy {
                id: "a1".into(),
                name: "Gluten".to_string(),
            },
        }];
        assert_eq!(render_allergies(&allergies), vec!["⚠ Gluten".to_string()]);
        assert!(render_allergies(&[]).is_empty());
    }
}
