//! Interactive listing
//!
//! Mounts a listing page and lets the user edit filters from a menu. Every
//! edit goes through the filter store, so typing bursts are debounced and
//! late responses are dropped by the listing itself.

use anyhow::{Context as _, Result};
use console::Term;
use dialoguer::{Input, MultiSelect, Select};
use recipe_share_core::{AllergyId, CategoryId, DifficultyId, RecipeId};
use recipe_share_sdk::listing::FilterStore;
use recipe_share_sdk::{ChannelNotifier, ListingHandle, ListingPage, ListingSnapshot, NotificationLevel};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;
use url::Url;

use crate::commands::recipes::load_page;
use crate::context::Context;
use crate::output::finish;
use crate::views::detail::RecipeDetailView;
use crate::views::filters::{choices, render_filters};
use crate::views::listing::{empty_message, phase_line, rows, snapshot_summary, LISTING_HEADERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Open,
    LoadMore,
    Search,
    Categories,
    Allergies,
    Difficulties,
    Diet,
    Ingredient,
    MaxPrepTime,
    MinServings,
    ClearFilters,
    Refresh,
    Quit,
}

impl fmt::Display for BrowseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Open => "Open a recipe",
            Self::LoadMore => "Load more",
            Self::Search => "Search",
            Self::Categories => "Categories",
            Self::Allergies => "Exclude allergens",
            Self::Difficulties => "Difficulty",
            Self::Diet => "Vegan / vegetarian",
            Self::Ingredient => "Ingredient",
            Self::MaxPrepTime => "Max preparation time",
            Self::MinServings => "Min servings",
            Self::ClearFilters => "Clear filters",
            Self::Refresh => "Refresh",
            Self::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Menu entries that make sense for the current listing
pub fn menu_actions(snapshot: &ListingSnapshot) -> Vec<BrowseAction> {
    let mut actions = Vec::new();
    if !snapshot.is_empty() {
        actions.push(BrowseAction::Open);
    }
    if snapshot.has_more() {
        actions.push(BrowseAction::LoadMore);
    }
    actions.extend([
        BrowseAction::Search,
        BrowseAction::Categories,
        BrowseAction::Allergies,
        BrowseAction::Difficulties,
        BrowseAction::Diet,
        BrowseAction::Ingredient,
        BrowseAction::MaxPrepTime,
        BrowseAction::MinServings,
    ]);
    if snapshot.has_active_filters {
        actions.push(BrowseAction::ClearFilters);
    }
    actions.push(BrowseAction::Refresh);
    actions.push(BrowseAction::Quit);
    actions
}

fn prompt<T>(f: impl FnOnce() -> dialoguer::Result<T>) -> Result<T> {
    tokio::task::block_in_place(f).context("Prompt failed")
}

fn ask_text(label: &str, current: &str) -> Result<String> {
    prompt(|| {
        Input::<String>::new()
            .with_prompt(label)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
    })
}

/// Run the interactive browser until the user quits
pub async fn run(ctx: &Context, address: Option<String>) -> Result<()> {
    let mut location = address
        .map(|raw| Url::parse(&raw))
        .transpose()
        .context("Invalid page address")?;

    let client = ctx.listing_client()?;
    let session = ctx.session_context(&client).await;
    let (notifier, notifications) = ChannelNotifier::channel();

    let handle = ListingPage::new(Arc::new(client))
        .with_notifier(Arc::new(notifier))
        .with_session(session)
        .with_debounce(ctx.listing_debounce())
        .mount(location.as_mut());
    if let Some(location) = &location {
        debug!(address = %location, "Filters imported from address");
    }

    let result = browse_loop(ctx, &handle, notifications).await;
    handle.shutdown().await;
    result
}

async fn browse_loop(
    ctx: &Context,
    handle: &ListingHandle,
    mut notifications: UnboundedReceiver<recipe_share_sdk::Notification>,
) -> Result<()> {
    let term = Term::stdout();

    loop {
        let spinner = if handle.snapshot().settled {
            None
        } else {
            ctx.output.spinner("Loading recipes...")
        };
        let snapshot = handle.settled().await;
        finish(spinner);

        if term.clear_screen().is_err() {
            debug!("Terminal cannot be cleared");
        }
        render(ctx, handle, &snapshot)?;
        while let Ok(notification) = notifications.try_recv() {
            match notification.level {
                NotificationLevel::Error => ctx.output.error(&notification.message),
                NotificationLevel::Success => ctx.output.success(&notification.message),
                NotificationLevel::Info => ctx.output.info(&notification.message),
            }
        }

        let actions = menu_actions(&snapshot);
        let selected = prompt(|| {
            Select::new()
                .with_prompt("What next?")
                .items(&actions)
                .default(0)
                .interact()
        })?;
        let store = handle.store();

        match actions[selected] {
            BrowseAction::Open => open(ctx, &term, &snapshot).await?,
            BrowseAction::LoadMore => {
                handle.load_more();
            }
            BrowseAction::Search => {
                let search = ask_text("Search", &snapshot.criteria.search_term)?;
                store.set_search_term(search);
            }
            BrowseAction::Categories => {
                let items = handle.options().categories.items;
                let ids = pick(&items, &snapshot.criteria.category_ids, "Categories")?;
                store.set_category_ids(ids.into_iter().map(CategoryId::from));
            }
            BrowseAction::Allergies => {
                let items = handle.options().allergies.items;
                let ids = pick(&items, &snapshot.criteria.allergy_ids, "Exclude allergens")?;
                store.set_allergy_ids(ids.into_iter().map(AllergyId::from));
            }
            BrowseAction::Difficulties => {
                let items = handle.options().difficulties.items;
                let ids = pick(&items, &snapshot.criteria.difficulty_ids, "Difficulty")?;
                store.set_difficulty_ids(ids.into_iter().map(DifficultyId::from));
            }
            BrowseAction::Diet => pick_diet(store, &snapshot)?,
            BrowseAction::Ingredient => {
                let search = ask_text("Ingredient", &snapshot.criteria.ingredient_search)?;
                store.set_ingredient_search(search);
            }
            BrowseAction::MaxPrepTime => {
                let raw = ask_text("Max preparation time (min)", &snapshot.criteria.max_prep_time)?;
                store.set_max_prep_time(raw);
            }
            BrowseAction::MinServings => {
                let raw = ask_text("Min servings", &snapshot.criteria.min_servings)?;
                store.set_min_servings(raw);
            }
            BrowseAction::ClearFilters => {
                handle.clear_filters();
            }
            BrowseAction::Refresh => {
                handle.refresh();
            }
            BrowseAction::Quit => return Ok(()),
        }
    }
}

fn render(ctx: &Context, handle: &ListingHandle, snapshot: &ListingSnapshot) -> Result<()> {
    for line in render_filters(&snapshot.criteria, &handle.options()) {
        println!("{}", line);
    }
    println!();

    ctx.output.write_list(
        &rows(&snapshot.recipes),
        LISTING_HEADERS,
        &empty_message(snapshot.has_active_filters),
    )?;
    if !snapshot.is_empty() {
        ctx.output.info(&snapshot_summary(snapshot));
    }
    if let Some(line) = phase_line(snapshot.phase) {
        ctx.output.info(line);
    }
    Ok(())
}

fn pick<T: fmt::Display>(
    items: &[recipe_share_core::SelectableItem],
    selected: &std::collections::BTreeSet<T>,
    label: &str,
) -> Result<Vec<String>> {
    if items.is_empty() {
        return Ok(selected.iter().map(ToString::to_string).collect());
    }
    let (labels, checked) = choices(items, selected);
    let picked = prompt(|| {
        MultiSelect::new()
            .with_prompt(label)
            .items(&labels)
            .defaults(&checked)
            .interact()
    })?;
    Ok(picked.into_iter().map(|i| items[i].id.clone()).collect())
}

fn pick_diet(store: &FilterStore, snapshot: &ListingSnapshot) -> Result<()> {
    let labels = ["Vegan", "Vegetarian"];
    let checked = [snapshot.criteria.is_vegan, snapshot.criteria.is_vegetarian];
    let picked = prompt(|| {
        MultiSelect::new()
            .with_prompt("Diet")
            .items(&labels)
            .defaults(&checked)
            .interact()
    })?;
    store.set_vegan(picked.contains(&0));
    store.set_vegetarian(picked.contains(&1));
    Ok(())
}

async fn open(ctx: &Context, term: &Term, snapshot: &ListingSnapshot) -> Result<()> {
    let titles: Vec<&str> = snapshot.recipes.iter().map(|r| r.title.as_str()).collect();
    let selected = prompt(|| {
        Select::new()
            .with_prompt("Recipe")
            .items(&titles)
            .default(0)
            .interact_opt()
    })?;
    let Some(index) = selected else {
        return Ok(());
    };

    let id: RecipeId = snapshot.recipes[index].id.clone();
    let client = ctx.create_client()?;
    match load_page(ctx, &client, &id).await {
        Ok(page) => ctx.output.write(&RecipeDetailView::from(&page))?,
        Err(e) => ctx.output.error(&format!("{:#}", e)),
    }

    ctx.output.info("Press any key to return to the list");
    tokio::task::block_in_place(|| term.read_key()).context("Failed to read key")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_share_core::{FilterCriteria, PaginationState, RecipeSummary};
    use recipe_share_sdk::listing::ListingPhase;

    fn snapshot(recipes: usize, has_more: bool, criteria: FilterCriteria) -> ListingSnapshot {
        let recipes = (0..recipes)
            .map(|i| {
                serde_json::from_value::<RecipeSummary>(serde_json::json!({
                    "id": format!("r{}", i),
                    "title": format!("Recept {}", i)
                }))
                .unwrap()
            })
            .collect();
        ListingSnapshot {
            recipes,
            pagination: Some(PaginationState::new(1, 2, 30, has_more)),
            current_page: 1,
            phase: ListingPhase::Idle,
            is_loading: false,
            is_filtering: false,
            is_loading_more: false,
            has_active_filters: criteria.has_active_filters(),
            criteria,
            revision: 0,
            settled: true,
            handled_commands: 0,
            completed_fetches: 1,
        }
    }

    #[test]
    fn test_full_menu() {
        let actions = menu_actions(&snapshot(20, true, FilterCriteria::new().with_vegan(true)));
        assert_eq!(actions.first(), Some(&BrowseAction::Open));
        assert_eq!(actions[1], BrowseAction::LoadMore);
        assert!(actions.contains(&BrowseAction::ClearFilters));
        assert_eq!(actions.last(), Some(&BrowseAction::Quit));
    }

    #[test]
    fn test_empty_unfiltered_menu() {
        let actions = menu_actions(&snapshot(0, false, FilterCriteria::new()));
        assert!(!actions.contains(&BrowseAction::Open));
        assert!(!actions.contains(&BrowseAction::LoadMore));
        assert!(!actions.contains(&BrowseAction::ClearFilters));
        assert_eq!(actions[0], BrowseAction::Search);
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(BrowseAction::Allergies.to_string(), "Exclude allergens");
        assert_eq!(BrowseAction::LoadMore.to_string(), "Load more");
    }
}
