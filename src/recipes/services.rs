use tracing::debug;

use super::dto::RecipeQuery;
use super::model::Recipe;
use super::source::RecipeSource;

pub const FALLBACK_CATEGORY: &str = "Beef";
const ALL_CATEGORIES: &str = "All";

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

/// Resolves a listing request: a name query wins over a category filter,
/// which wins over an area filter. With no filter at all the first known
/// category is shown, or [`FALLBACK_CATEGORY`] when none are known.
pub async fn list_recipes(source: &dyn RecipeSource, query: &RecipeQuery) -> Vec<Recipe> {
    let category = non_blank(query.category.as_deref()).filter(|c| *c != ALL_CATEGORIES);

    let mut recipes = if let Some(q) = non_blank(query.q.as_deref()) {
        source.search(q).await
    } else if let Some(category) = category {
        source.recipes_by_category(category).await
    } else if let Some(area) = non_blank(query.area.as_deref()) {
        source.recipes_by_area(area).await
    } else {
        let first = source.categories().await.into_iter().next().map(|c| c.name);
        let category = first.as_deref().unwrap_or(FALLBACK_CATEGORY);
        debug!(category, "no filter given, listing default category");
        source.recipes_by_category(category).await
    };

    if let Some(limit) = query.limit {
        recipes.truncate(limit);
    }
    recipes
}
