//! Taxonomy commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use recipe_share_core::{Allergy, Category, Difficulty};
use serde::Serialize;

use crate::context::Context;
use crate::output::{finish, TableDisplay};

const TERM_HEADERS: &[&str] = &["ID", "Name"];
const LEVEL_HEADERS: &[&str] = &["ID", "Name", "Level"];

/// Vocabularies used by the recipe filters
#[derive(Debug, Args)]
pub struct TaxonomyCommands {
    #[command(subcommand)]
    pub command: TaxonomySubcommand,
}

#[derive(Debug, Subcommand)]
pub enum TaxonomySubcommand {
    /// List recipe categories
    Categories,

    /// List allergens
    Allergies {
        /// Only the allergens saved in your profile
        #[arg(long)]
        mine: bool,
    },

    /// List difficulty levels
    Difficulties,
}

/// One vocabulary entry as printed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermRow {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl From<&Category> for TermRow {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            level: None,
        }
    }
}

impl From<&Allergy> for TermRow {
    fn from(allergy: &Allergy) -> Self {
        Self {
            id: allergy.id.to_string(),
            name: allergy.name.clone(),
            level: None,
        }
    }
}

impl From<&Difficulty> for TermRow {
    fn from(difficulty: &Difficulty) -> Self {
        Self {
            id: difficulty.id.to_string(),
            name: difficulty.name.clone(),
            level: Some(difficulty.level),
        }
    }
}

impl TableDisplay for TermRow {
    fn to_row(&self) -> Vec<Cell> {
        let mut row = vec![Cell::new(&self.id), Cell::new(&self.name)];
        if let Some(level) = self.level {
            row.push(Cell::new(level));
        }
        row
    }

    fn display_single(&self) {
        println!("{}: {}", self.id, self.name);
    }

    fn display_compact(&self) {
        println!("{}\t{}", self.id, self.name);
    }
}

/// Execute taxonomy commands
pub async fn execute(ctx: &Context, cmd: TaxonomyCommands) -> Result<()> {
    let client = ctx.create_client()?;
    let taxonomy = client.taxonomy();
    let spinner = ctx.output.spinner("Fetching...");

    let (rows, headers, empty): (Vec<TermRow>, &[&str], &str) = match cmd.command {
        TaxonomySubcommand::Categories => {
            let items = taxonomy.categories().await;
            finish(spinner);
            let items = items.context("Error fetching categories")?;
            (items.iter().map(TermRow::from).collect(), TERM_HEADERS, "No categories")
        }
        TaxonomySubcommand::Allergies { mine } => {
            let items = if mine {
                taxonomy.user_allergies().await
            } else {
                taxonomy.allergies().await
            };
            finish(spinner);
            let items = items.context("Error fetching allergies")?;
            let empty = if mine {
                "No allergens saved in your profile"
            } else {
                "No allergens"
            };
            (items.iter().map(TermRow::from).collect(), TERM_HEADERS, empty)
        }
        TaxonomySubcommand::Difficulties => {
            let items = taxonomy.difficulties().await;
            finish(spinner);
            let items = items.context("Error fetching difficulty levels")?;
            (
                items.iter().map(TermRow::from).collect(),
                LEVEL_HEADERS,
                "No difficulty levels",
            )
        }
    };

    ctx.output.write_list(&rows, headers, &[empty.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_row_has_level() {
        let difficulty = Difficulty {
            id: "d3".into(),
            name: "Zahtjevno".to_string(),
            level: 3,
        };
        let row = TermRow::from(&difficulty);

        assert_eq!(row.level, Some(3));
        assert_eq!(row.to_row().len(), 3);
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            serde_json::json!({ "id": "d3", "name": "Zahtjevno", "level": 3 })
        );
    }

    #[test]
    fn test_category_row_omits_level() {
        let category = Category {
            id: "c1".into(),
            name: "Juhe".to_string(),
        };
        let value = serde_json::to_value(TermRow::from(&category)).unwrap();
        assert_eq!(value, serde_json::json!({ "id": "c1", "name": "Juhe" }));
    }
}
