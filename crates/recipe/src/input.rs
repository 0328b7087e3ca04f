use chefdeck_shared::{Color, Ingredient};
use serde::Deserialize;
use validator::Validate;

pub const MAX_DIRECTION_LEN: usize = 2000;
pub const MAX_TAG_LEN: usize = 40;

#[derive(Validate, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(range(min = 1))]
    pub servings: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    #[validate(url)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RecipeInput {
    /// Runs the derived rules plus the ones `validator` cannot express on
    /// collections. Title and ingredient names are trimmed before the rules
    /// run; tags come out trimmed, unique and sorted.
    pub fn check(mut self) -> chefdeck_shared::Result<Self> {
        self.title = self.title.trim().to_owned();
        for ingredient in self.ingredients.iter_mut() {
            ingredient.name = ingredient.name.trim().to_owned();
            ingredient.unit = ingredient.unit.trim().to_owned();
        }
        self.validate()?;

        if let Some(ingredient) = self.ingredients.iter().find(|i| !i.has_valid_amount()) {
            chefdeck_shared::invalid!(
                "amount of \"{}\" must be a finite, non-negative number",
                ingredient.name
            );
        }

        if let Some(direction) = self
            .directions
            .iter()
            .find(|d| d.trim().is_empty() || d.chars().count() > MAX_DIRECTION_LEN)
        {
            chefdeck_shared::invalid!(
                "direction must be 1 to {} characters, got {}",
                MAX_DIRECTION_LEN,
                direction.chars().count()
            );
        }

        let mut tags = self
            .tags
            .iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();

        if let Some(tag) = tags.iter().find(|t| t.chars().count() > MAX_TAG_LEN) {
            chefdeck_shared::invalid!("tag \"{}\" is longer than {} characters", tag, MAX_TAG_LEN);
        }

        tags.sort();
        tags.dedup();
        self.tags = tags;

        Ok(self)
    }
}
