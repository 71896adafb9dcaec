use serde::{Deserialize, Serialize};

use crate::domain::ids::{AllergyId, CategoryId, DifficultyId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allergy {
    pub id: AllergyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub id: DifficultyId,
    pub name: String,
    pub level: u32,
}

impl Difficulty {
    /// Display label with the numeric level, e.g. `"Lagano (razina 1)"`.
    pub fn label(&self) -> String {
        format!("{} (razina {})", self.name, self.level)
    }
}

/// An entry of a multi-select vocabulary in the filter panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableItem {
    pub id: String,
    pub name: String,
}

impl From<&Category> for SelectableItem {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
        }
    }
}

impl From<&Allergy> for SelectableItem {
    fn from(allergy: &Allergy) -> Self {
        Self {
            id: allergy.id.to_string(),
            name: allergy.name.clone(),
        }
    }
}

impl From<&Difficulty> for SelectableItem {
    fn from(difficulty: &Difficulty) -> Self {
        Self {
            id: difficulty.id.to_string(),
            name: difficulty.label(),
        }
    }
}

/// Join-table shape used by recipe payloads: `{ "category": {...} }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLink {
    pub category: Category,
}

/// Join-table shape used by recipe payloads: `{ "allergy": {...} }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergyLink {
    pub allergy: Allergy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_label_includes_level() {
        let difficulty = Difficulty {
            id: DifficultyId::from("d2"),
            name: "Srednje".to_string(),
            level: 2,
        };
        assert_eq!(difficulty.label(), "Srednje (razina 2)");
        assert_eq!(SelectableItem::from(&difficulty).name, "Srednje (razina 2)");
    }

    #[test]
    fn test_category_to_selectable() {
        let category = Category {
            id: CategoryId::from("c1"),
            name: "Deserti".to_string(),
        };
        let item = SelectableItem::from(&category);
        assert_eq!(item.id, "c1");
        assert_eq!(item.name, "Deserti");
    }
}
