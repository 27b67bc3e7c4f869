//! Wire shapes of the public recipe API and their normalization into
//! [`Recipe`] and [`Category`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::{Category, Ingredient, Recipe};

/// Numbered ingredient/measure slots per meal record.
pub const INGREDIENT_SLOTS: usize = 20;

/// `{"meals": [...]}`; `null` or a missing key means no results.
#[derive(Debug, Deserialize)]
pub struct MealsEnvelope<T> {
    pub meals: Option<Vec<T>>,
}

impl<T> MealsEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.meals.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoriesEnvelope {
    pub categories: Option<Vec<CategoryRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id_category: String,
    pub str_category: String,
    #[serde(default)]
    pub str_category_thumb: Option<String>,
    #[serde(default)]
    pub str_category_description: Option<String>,
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Self {
            id: r.id_category,
            name: r.str_category,
            image: r.str_category_thumb.unwrap_or_default(),
            description: r.str_category_description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRecord {
    pub str_area: String,
}

/// A meal record. Ingredient slots (`strIngredient1..20`, `strMeasure1..20`)
/// land in `extra`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub id_meal: String,
    pub str_meal: String,
    #[serde(default)]
    pub str_meal_thumb: Option<String>,
    #[serde(default)]
    pub str_category: Option<String>,
    #[serde(default)]
    pub str_area: Option<String>,
    #[serde(default)]
    pub str_instructions: Option<String>,
    #[serde(default)]
    pub str_tags: Option<String>,
    #[serde(default)]
    pub str_youtube: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MealRecord {
    /// Summary from the filter endpoints, which only carry id, name and thumbnail.
    /// The category or area that was filtered on is stamped onto the result.
    pub fn into_filtered(self, category: Option<&str>, area: Option<&str>) -> Recipe {
        let mut recipe = Recipe::summary(
            self.id_meal,
            self.str_meal,
            self.str_meal_thumb.unwrap_or_default(),
        );
        recipe.category = category.map(str::to_string);
        recipe.area = area.map(str::to_string);
        recipe
    }

    /// Summary from name search: carries category and area but no details.
    pub fn into_search_hit(self) -> Recipe {
        let mut recipe = Recipe::summary(
            self.id_meal,
            self.str_meal,
            self.str_meal_thumb.unwrap_or_default(),
        );
        recipe.category = non_blank(self.str_category);
        recipe.area = non_blank(self.str_area);
        recipe
    }

    /// Full detail from lookup and random.
    pub fn into_detail(self) -> Recipe {
        let ingredients = extract_ingredients(&self.extra);
        Recipe {
            id: self.id_meal,
            name: self.str_meal,
            image: self.str_meal_thumb.unwrap_or_default(),
            category: non_blank(self.str_category),
            area: non_blank(self.str_area),
            instructions: non_blank(self.str_instructions),
            tags: Some(split_tags(self.str_tags.as_deref())),
            youtube: non_blank(self.str_youtube),
            ingredients: Some(ingredients),
        }
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Walks slots 1..=20 in order, keeping those with a non-blank ingredient name.
pub fn extract_ingredients(slots: &Map<String, Value>) -> Vec<Ingredient> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|i| {
            let name = slots
                .get(&format!("strIngredient{i}"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())?;
            let measure = slots
                .get(&format!("strMeasure{i}"))
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default();
            Some(Ingredient {
                name: name.to_string(),
                measure: measure.to_string(),
            })
        })
        .collect()
}

/// Query string for `GET /recipes`.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub limit: Option<usize>,
}

/// A recipe together with the caller's favorite status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub is_favorite: bool,
}
