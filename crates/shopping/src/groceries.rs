use chefdeck_shared::Ingredient;
use chrono::NaiveDate;

use crate::MergeIngredients;

#[derive(Debug, thiserror::Error)]
pub enum GroceryError {
    #[error("From date must be before to date.")]
    InvalidRange,

    #[error("Date range must not cover more than {} days.", chefdeck_shared::MAX_RANGE_DAYS)]
    RangeTooLong,

    #[error("Too many requests. Try again in a minute.")]
    RateLimited,

    #[error("Could not merge ingredients.")]
    MergeFailed,

    #[error("{0}")]
    Data(#[from] chefdeck_shared::Error),
}

/// Inclusive date range a grocery list covers. Construction fails when
/// `from` is after `to` or the range is longer than
/// [`chefdeck_shared::MAX_RANGE_DAYS`], so an invalid range never reaches the
/// data layer or the merge service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroceryRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl GroceryRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, GroceryError> {
        if from > to {
            tracing::debug!(%from, %to, "grocery range rejected");
            return Err(GroceryError::InvalidRange);
        }

        if (to - from).num_days() >= chefdeck_shared::MAX_RANGE_DAYS {
            tracing::debug!(%from, %to, "grocery range too long");
            return Err(GroceryError::RangeTooLong);
        }

        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }
}

/// Merges `ingredients` through `merger` and sorts the result by name.
///
/// An empty list is returned as is, without calling the service.
pub async fn merge_sorted<M: MergeIngredients + ?Sized>(
    merger: &M,
    ingredients: Vec<Ingredient>,
) -> Result<Vec<Ingredient>, GroceryError> {
    if ingredients.is_empty() {
        return Ok(ingredients);
    }

    let mut merged = merger.merge(&ingredients).await?;
    merged.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(merged)
}
