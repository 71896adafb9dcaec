//! Recipe commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use recipe_share_core::{
    AllergyId, CategoryId, FilterCriteria, Ingredient, RecipeId, ReviewDraft, SessionContext,
};
use recipe_share_sdk::listing::ListingQuery;
use recipe_share_sdk::{
    parse_json_list, CreateRecipeRequest, ImageStore, ImageUpload, RecipePage, RecipeShareClient,
};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::commands::CommandError;
use crate::context::Context;
use crate::output::finish;
use crate::views::detail::RecipeDetailView;
use crate::views::listing::{
    empty_message, rows, summary_line, CREATE_RECIPE_HINT, LISTING_HEADERS,
};
use crate::views::rating_block;

/// Recipe commands
#[derive(Debug, Args)]
pub struct RecipesCommands {
    #[command(subcommand)]
    pub command: RecipesSubcommand,
}

/// Listing filters, mirroring the filter panel
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Free-text search in title and description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category ids (comma-separated)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Allergen ids to exclude (comma-separated)
    #[arg(long = "allergy", value_delimiter = ',')]
    pub allergies: Vec<String>,

    /// Difficulty ids (comma-separated)
    #[arg(long = "difficulty", value_delimiter = ',')]
    pub difficulties: Vec<String>,

    #[arg(long)]
    pub vegan: bool,

    #[arg(long)]
    pub vegetarian: bool,

    /// Ingredient name to look for
    #[arg(long)]
    pub ingredient: Option<String>,

    /// Upper bound on preparation time, in minutes
    #[arg(long)]
    pub max_prep_time: Option<String>,

    /// Lower bound on servings
    #[arg(long)]
    pub min_servings: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .with_search_term(self.search.clone().unwrap_or_default())
            .with_category_ids(self.categories.iter().map(String::as_str))
            .with_allergy_ids(self.allergies.iter().map(String::as_str))
            .with_difficulty_ids(self.difficulties.iter().map(String::as_str))
            .with_vegan(self.vegan)
            .with_vegetarian(self.vegetarian)
            .with_ingredient_search(self.ingredient.clone().unwrap_or_default())
            .with_max_prep_time(self.max_prep_time.clone().unwrap_or_default())
            .with_min_servings(self.min_servings.clone().unwrap_or_default())
    }
}

#[derive(Debug, Subcommand)]
pub enum RecipesSubcommand {
    /// List one page of recipes
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Page to fetch
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Browse interactively with live filters
    Browse {
        /// Page address to import filters from, e.g. ".../recipes?search=juha&isVegan=true"
        #[arg(long)]
        url: Option<String>,
    },

    /// Show a recipe
    Show {
        id: String,
    },

    /// Review a recipe
    Review {
        id: String,

        /// Stars, 1 to 5
        #[arg(short, long)]
        rating: u8,

        /// Review text
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Change your review of a recipe
    EditReview {
        /// Recipe id
        id: String,

        #[arg(short, long)]
        rating: u8,

        #[arg(short, long)]
        content: Option<String>,
    },

    /// Toggle a bookmark
    Bookmark {
        id: String,

        /// Only report whether the recipe is bookmarked
        #[arg(long)]
        status: bool,
    },

    /// Delete one of your recipes
    Delete {
        id: String,

        /// Force deletion without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Publish a new recipe
    Create(CreateArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(short, long)]
    pub title: String,

    /// Preparation time in minutes
    #[arg(long)]
    pub prep_time: u32,

    #[arg(long)]
    pub servings: u32,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(long)]
    pub vegan: bool,

    #[arg(long)]
    pub vegetarian: bool,

    #[arg(long)]
    pub difficulty: Option<String>,

    /// Category ids (comma-separated)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Allergen ids (comma-separated)
    #[arg(long = "allergy", value_delimiter = ',')]
    pub allergies: Vec<String>,

    /// Ingredients as JSON, e.g. '[{"name":"brašno","quantity":"200","unit":"g"}]'
    #[arg(long)]
    pub ingredients: Option<String>,

    /// Steps as a JSON array of strings
    #[arg(long)]
    pub steps: Option<String>,

    /// Image file to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

/// Execute recipe commands
pub async fn execute(ctx: &Context, cmd: RecipesCommands) -> Result<()> {
    match cmd.command {
        RecipesSubcommand::List { filters, page } => list(ctx, &filters, page).await,
        RecipesSubcommand::Browse { url } => crate::commands::browse::run(ctx, url).await,
        RecipesSubcommand::Show { id } => show(ctx, &RecipeId::from(id)).await,
        RecipesSubcommand::Review { id, rating, content } => {
            review(ctx, &RecipeId::from(id), draft(rating, content)).await
        }
        RecipesSubcommand::EditReview { id, rating, content } => {
            edit_review(ctx, &RecipeId::from(id), draft(rating, content)).await
        }
        RecipesSubcommand::Bookmark { id, status } => {
            bookmark(ctx, &RecipeId::from(id), status).await
        }
        RecipesSubcommand::Delete { id, force } => delete(ctx, &RecipeId::from(id), force).await,
        RecipesSubcommand::Create(args) => create(ctx, args).await,
    }
}

fn draft(rating: u8, content: Option<String>) -> ReviewDraft {
    match content {
        Some(content) => ReviewDraft::new(rating).with_content(content),
        None => ReviewDraft::new(rating),
    }
}

async fn list(ctx: &Context, filters: &FilterArgs, page: u32) -> Result<()> {
    let client = ctx.create_client()?;
    let criteria = filters.criteria();
    let query = ListingQuery::from_criteria(&criteria, page);

    let spinner = ctx.output.spinner("Fetching recipes...");
    let (response, session) = tokio::join!(
        client.recipes().list(&query),
        ctx.session_context(&client)
    );
    finish(spinner);
    let response = response.context("Error fetching recipes")?;

    ctx.output.write_list(
        &rows(&response.recipes),
        LISTING_HEADERS,
        &empty_message(criteria.has_active_filters()),
    )?;

    if !response.recipes.is_empty() {
        ctx.output
            .info(&summary_line(response.recipes.len(), response.pagination.as_ref()));
    }
    if let Some(next) = response.pagination.and_then(|p| p.next_page()) {
        ctx.output.info(&format!("More recipes: add --page {}", next));
    }
    if session.is_authenticated() {
        ctx.output.info(CREATE_RECIPE_HINT);
    }
    Ok(())
}

/// Load a recipe with the viewer, reporting a missing recipe plainly
pub async fn load_page(
    ctx: &Context,
    client: &RecipeShareClient,
    id: &RecipeId,
) -> Result<RecipePage> {
    let spinner = ctx.output.spinner("Fetching recipe...");
    let page = RecipePage::load(client, id).await;
    finish(spinner);
    page.with_context(|| format!("Could not open recipe '{}'", id))
}

async fn show(ctx: &Context, id: &RecipeId) -> Result<()> {
    let client = ctx.create_client()?;
    let page = load_page(ctx, &client, id).await?;
    ctx.output.write(&RecipeDetailView::from(&page))
}

async fn review(ctx: &Context, id: &RecipeId, draft: ReviewDraft) -> Result<()> {
    let client = ctx.create_client()?;
    let mut page = load_page(ctx, &client, id).await?;
    ensure_can_review(&page)?;

    let review = client
        .reviews()
        .create(id, draft)
        .await
        .context("Error saving review")?;
    page.apply_review(review);

    ctx.output.success("Review saved");
    report_rating(ctx, &page);
    Ok(())
}

fn ensure_can_review(page: &RecipePage) -> Result<(), CommandError> {
    if page.is_author() {
        Err(CommandError::OwnRecipe)
    } else if !page.viewer().is_authenticated() {
        Err(CommandError::NotSignedIn)
    } else {
        Ok(())
    }
}

async fn edit_review(ctx: &Context, id: &RecipeId, draft: ReviewDraft) -> Result<()> {
    let client = ctx.create_client()?;
    let mut page = load_page(ctx, &client, id).await?;
    require_signed_in(page.viewer())?;

    let review_id = page
        .own_review()
        .map(|review| review.id.clone())
        .ok_or_else(|| CommandError::NoOwnReview(id.to_string()))?;
    let review = client
        .reviews()
        .update(&review_id, draft)
        .await
        .context("Error updating review")?;
    page.apply_review(review);

    ctx.output.success("Review updated");
    report_rating(ctx, &page);
    Ok(())
}

fn report_rating(ctx: &Context, page: &RecipePage) {
    if let Some(rating) = rating_block(page.average_rating(), page.recipe().reviews.len()) {
        ctx.output.info(&format!("{}: {}", page.recipe().title, rating));
    }
}

fn require_signed_in(viewer: &SessionContext) -> Result<(), CommandError> {
    if viewer.is_authenticated() {
        Ok(())
    } else {
        Err(CommandError::NotSignedIn)
    }
}

async fn bookmark(ctx: &Context, id: &RecipeId, status_only: bool) -> Result<()> {
    let client = ctx.create_client()?;
    require_signed_in(&ctx.session_context(&client).await)?;

    let status = if status_only {
        client.bookmarks().status(id).await
    } else {
        client.bookmarks().toggle(id).await
    }
    .context("Error updating bookmark")?;

    match (status_only, status.is_bookmarked) {
        (true, true) => ctx.output.info("Bookmarked"),
        (true, false) => ctx.output.info("Not bookmarked"),
        (false, true) => ctx.output.success("Recipe bookmarked"),
        (false, false) => ctx.output.success("Bookmark removed"),
    }
    Ok(())
}

async fn delete(ctx: &Context, id: &RecipeId, force: bool) -> Result<()> {
    let client = ctx.create_client()?;
    let page = load_page(ctx, &client, id).await?;
    if !page.is_author() {
        return Err(CommandError::NotAuthor(id.to_string()).into());
    }

    if !force {
        let prompt = format!("Delete recipe '{}'?", page.recipe().title);
        let confirm = tokio::task::block_in_place(|| {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .context("Failed to get confirmation")?;

        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    client
        .recipes()
        .delete(id)
        .await
        .context("Error deleting recipe")?;
    ctx.output.success(&format!("Deleted recipe '{}'", page.recipe().title));
    Ok(())
}

/// Guess the MIME type from the file extension
fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image {:?}", path))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(ImageUpload::new(file_name, content_type(path), bytes))
}

/// Assemble the request from command-line input. Malformed JSON lists
/// are treated as empty.
pub fn build_request(args: &CreateArgs, image_path: Option<String>) -> CreateRecipeRequest {
    let ingredients: Vec<Ingredient> = parse_json_list(args.ingredients.as_deref());
    let steps: Vec<String> = parse_json_list(args.steps.as_deref());

    let mut request = CreateRecipeRequest::new(&args.title, args.prep_time, args.servings)
        .with_image_path(image_path)
        .with_diet(args.vegan, args.vegetarian)
        .with_categories(args.categories.iter().map(|id| CategoryId::from(id.as_str())).collect())
        .with_allergies(args.allergies.iter().map(|id| AllergyId::from(id.as_str())).collect())
        .with_ingredients(ingredients)
        .with_steps(steps);
    if let Some(description) = &args.description {
        request = request.with_description(description);
    }
    if let Some(difficulty) = &args.difficulty {
        request = request.with_difficulty(difficulty.as_str());
    }
    request
}

async fn create(ctx: &Context, args: CreateArgs) -> Result<()> {
    let client = ctx.create_client()?;
    require_signed_in(&ctx.session_context(&client).await)?;

    let image_path = match &args.image {
        Some(path) => {
            let upload = read_image(path)?;
            match ctx.image_store()? {
                Some(store) => {
                    let spinner = ctx.output.spinner("Uploading image...");
                    let url = store.save_image(Some(&upload)).await;
                    finish(spinner);
                    if url.is_none() {
                        ctx.output.warning("Image upload failed; saving the recipe without it");
                    }
                    url
                }
                None => {
                    ctx.output
                        .warning("No image store configured for this profile; skipping the image");
                    None
                }
            }
        }
        None => None,
    };

    let request = build_request(&args, image_path);
    let spinner = ctx.output.spinner("Publishing recipe...");
    let created = client.recipes().create(request).await;
    finish(spinner);
    let created = created.context("Error creating recipe")?;

    info!(recipe_id = %created.id, "Created recipe");
    ctx.output.success(&format!("Created recipe {}", created.id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        filters: FilterArgs,
    }

    #[test]
    fn test_filter_args_to_criteria() {
        let harness = Harness::try_parse_from([
            "test",
            "--search",
            "juha",
            "--category",
            "c2,c1",
            "--vegan",
            "--max-prep-time",
            "0",
            "--min-servings",
            "2",
        ])
        .unwrap();

        let query = ListingQuery::from_criteria(&harness.filters.criteria(), 1);
        assert_eq!(
            query.to_query_string(),
            "search=juha&categoryIds=c1%2Cc2&isVegan=true&minServings=2&page=1&limit=20"
        );
    }

    #[test]
    fn test_no_filters_is_inactive() {
        assert!(!FilterArgs::default().criteria().has_active_filters());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("sarma.JPG")), "image/jpeg");
        assert_eq!(content_type(Path::new("a.png")), "image/png");
        assert_eq!(content_type(Path::new("bez")), "application/octet-stream");
    }

    #[test]
    fn test_build_request_tolerates_bad_json() {
        let args = CreateArgs {
            title: "Štrukli".to_string(),
            prep_time: 60,
            servings: 4,
            description: None,
            vegan: false,
            vegetarian: true,
            difficulty: Some("d2".to_string()),
            categories: vec!["c1".to_string()],
            allergies: vec![],
            ingredients: Some("[{broken".to_string()),
            steps: Some(r#"["Razvaljati tijesto", "Peći"]"#.to_string()),
            image: None,
        };

        let request = build_request(&args, None);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["ingredients"], serde_json::json!([]));
        assert_eq!(body["instructions"][1]["stepNumber"], 2);
        assert_eq!(body["isVegetarian"], true);
    }

    #[test]
    fn test_review_refusals() {
        use recipe_share_core::{RecipeDetail, Session, UserSummary};

        let recipe: RecipeDetail = serde_json::from_value(serde_json::json!({
            "id": "r1", "title": "Pita", "preparationTime": 50, "servings": 6,
            "userId": "chef", "user": { "id": "chef" }
        }))
        .unwrap();
        let as_user = |id: &str| {
            SessionContext::authenticated(Session {
                user: UserSummary {
                    id: id.into(),
                    name: None,
                    image: None,
                },
            })
        };

        let author = RecipePage::new(recipe.clone(), as_user("chef"));
        assert_eq!(ensure_can_review(&author), Err(CommandError::OwnRecipe));

        let anonymous = RecipePage::new(recipe.clone(), SessionContext::anonymous());
        assert_eq!(ensure_can_review(&anonymous), Err(CommandError::NotSignedIn));

        let visitor = RecipePage::new(recipe, as_user("gost"));
        assert_eq!(ensure_can_review(&visitor), Ok(()));
    }
}
