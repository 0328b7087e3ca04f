use std::{collections::HashMap, ops::Deref};

use chefdeck_db::table::RecipeIngredient;
use chefdeck_shared::{Ingredient, Session};
use sea_query::{Expr, ExprTrait, Order, Query as Sql, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;

use crate::GroceryRange;

#[derive(FromRow)]
struct IngredientRow {
    recipe_id: String,
    #[sqlx(flatten)]
    ingredient: Ingredient,
}

#[derive(Clone)]
pub struct Query(pub chefdeck_shared::State);

impl Deref for Query {
    type Target = chefdeck_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Query {
    /// Raw grocery lines for `range`: every ingredient of a recipe, once per
    /// occurrence of that recipe on the calendar.
    #[tracing::instrument(skip(self), fields(user_id = %session.user_id))]
    pub async fn ingredients_between(
        &self,
        session: &Session,
        range: GroceryRange,
    ) -> chefdeck_shared::Result<Vec<Ingredient>> {
        let occurrences = chefdeck_schedule::Query(self.0.clone())
            .scheduled(session, range.from(), range.to())
            .await?;

        if occurrences.is_empty() {
            return Ok(vec![]);
        }

        let mut recipe_ids = occurrences
            .iter()
            .map(|o| o.recipe_id.to_owned())
            .collect::<Vec<_>>();
        recipe_ids.sort();
        recipe_ids.dedup();

        let statement = Sql::select()
            .columns([
                RecipeIngredient::RecipeId,
                RecipeIngredient::Name,
                RecipeIngredient::Amount,
                RecipeIngredient::Unit,
            ])
            .from(RecipeIngredient::Table)
            .and_where(Expr::col(RecipeIngredient::RecipeId).is_in(recipe_ids))
            .order_by(RecipeIngredient::RecipeId, Order::Asc)
            .order_by(RecipeIngredient::Sequence, Order::Asc)
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut by_recipe: HashMap<String, Vec<Ingredient>> = HashMap::new();
        for row in rows {
            by_recipe
                .entry(row.recipe_id)
                .or_default()
                .push(row.ingredient);
        }

        Ok(occurrences
            .iter()
            .filter_map(|o| by_recipe.get(&o.recipe_id))
            .flatten()
            .cloned()
            .collect())
    }
}
