use std::sync::Arc;

use chefdeck_shared::{Ingredient, Session};
use chrono::NaiveDate;

use crate::{GroceryError, GroceryRange, MergeIngredients, Query, merge_sorted};

/// Grocery list of a user: scheduled ingredients, merged by the external
/// service and sorted by name.
#[derive(Clone)]
pub struct Service {
    query: Query,
    merger: Arc<dyn MergeIngredients>,
}

impl Service {
    pub fn new(state: chefdeck_shared::State, merger: Arc<dyn MergeIngredients>) -> Self {
        Self {
            query: Query(state),
            merger,
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %session.user_id))]
    pub async fn groceries(
        &self,
        session: &Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Ingredient>, GroceryError> {
        let range = GroceryRange::new(from, to)?;
        let ingredients = self.query.ingredients_between(session, range).await?;

        merge_sorted(self.merger.as_ref(), ingredients).await
    }
}
