use std::ops::Deref;

use chefdeck_db::table::{Recipe, Schedule};
use chefdeck_shared::{Color, RepeatRule, ScheduleDisplay, ScheduleEntry, Session};
use chrono::NaiveDate;
use sea_query::{Cond, Expr, ExprTrait, Order, Query as Sql, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;

use crate::{RecipeDate, ScheduledRecipe, build_grid, expand, month_window};

#[derive(FromRow)]
pub struct ScheduleRow {
    pub id: String,
    pub recipe_id: String,
    pub date: NaiveDate,
    pub repeat: String,
    pub repeat_end: Option<NaiveDate>,
}

impl TryFrom<ScheduleRow> for ScheduleEntry {
    type Error = chefdeck_shared::Error;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let repeat = RepeatRule::parse(&row.repeat).map_err(|err| {
            tracing::error!(schedule_id = row.id, "{err}");
            chefdeck_shared::Error::Server(format!("schedule {} is corrupted: {err}", row.id))
        })?;

        Ok(ScheduleEntry {
            id: row.id,
            recipe_id: row.recipe_id,
            date: row.date,
            repeat,
            end_repeat: row.repeat_end,
        })
    }
}

#[derive(FromRow)]
pub struct ScheduledRecipeRow {
    #[sqlx(flatten)]
    pub schedule: ScheduleRow,
    pub title: String,
    pub color: sqlx::types::Text<Color>,
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
    pub async fn find_by_recipe(
        &self,
        session: &Session,
        recipe_id: &str,
    ) -> chefdeck_shared::Result<Vec<ScheduleEntry>> {
        let statement = Sql::select()
            .column(Recipe::Id)
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(recipe_id))
            .and_where(Expr::col(Recipe::UserId).eq(&session.user_id))
            .limit(1)
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let recipe = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?;

        if recipe.is_none() {
            return Err(chefdeck_shared::Error::NotFound);
        }

        let statement = Sql::select()
            .columns([
                Schedule::Id,
                Schedule::RecipeId,
                Schedule::Date,
                Schedule::Repeat,
                Schedule::RepeatEnd,
            ])
            .from(Schedule::Table)
            .and_where(Expr::col(Schedule::RecipeId).eq(recipe_id))
            .and_where(Expr::col(Schedule::UserId).eq(&session.user_id))
            .order_by(Schedule::Date, Order::Asc)
            .order_by(Schedule::Id, Order::Asc)
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, ScheduleRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        rows.into_iter().map(ScheduleEntry::try_from).collect()
    }

    /// Schedules of the session user that can have an occurrence in
    /// `[start, end]`, joined with their recipe. One-off entries before
    /// `start` and recurring entries that ended before it are left out.
    pub async fn scheduled_recipes(
        &self,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> chefdeck_shared::Result<Vec<ScheduledRecipe>> {
        let statement = Sql::select()
            .columns([
                (Schedule::Table, Schedule::Id),
                (Schedule::Table, Schedule::RecipeId),
                (Schedule::Table, Schedule::Date),
                (Schedule::Table, Schedule::Repeat),
                (Schedule::Table, Schedule::RepeatEnd),
            ])
            .columns([(Recipe::Table, Recipe::Title), (Recipe::Table, Recipe::Color)])
            .from(Schedule::Table)
            .join(
                sea_query::JoinType::InnerJoin,
                Recipe::Table,
                Expr::col((Schedule::Table, Schedule::RecipeId)).equals((Recipe::Table, Recipe::Id)),
            )
            .and_where(Expr::col((Schedule::Table, Schedule::UserId)).eq(&session.user_id))
            .and_where(Expr::col((Recipe::Table, Recipe::UserId)).eq(&session.user_id))
            .and_where(Expr::col((Schedule::Table, Schedule::Date)).lte(end.to_string()))
            .cond_where(
                Cond::any()
                    .add(
                        Cond::all()
                            .add(Expr::col((Schedule::Table, Schedule::Repeat)).eq(RepeatRule::None.as_ref()))
                            .add(Expr::col((Schedule::Table, Schedule::Date)).gte(start.to_string())),
                    )
                    .add(
                        Cond::all()
                            .add(Expr::col((Schedule::Table, Schedule::Repeat)).ne(RepeatRule::None.as_ref()))
                            .add(
                                Cond::any()
                                    .add(Expr::col((Schedule::Table, Schedule::RepeatEnd)).is_null())
                                    .add(
                                        Expr::col((Schedule::Table, Schedule::RepeatEnd))
                                            .gte(start.to_string()),
                                    ),
                            ),
                    ),
            )
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, ScheduledRecipeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ScheduledRecipe {
                    entry: row.schedule.try_into()?,
                    recipe_title: row.title,
                    recipe_color: row.color.0,
                })
            })
            .collect()
    }

    /// Every occurrence in `[start, end]`, sorted by date then recipe title.
    #[tracing::instrument(skip(self), fields(user_id = %session.user_id))]
    pub async fn scheduled(
        &self,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> chefdeck_shared::Result<Vec<ScheduleDisplay>> {
        chefdeck_shared::check_range(start, end)?;

        let items = self.scheduled_recipes(session, start, end).await?;

        Ok(expand(&items, start, end))
    }

    /// Calendar grid of one month with its occurrences.
    pub async fn month(
        &self,
        session: &Session,
        year: i32,
        month: u32,
    ) -> chefdeck_shared::Result<Vec<RecipeDate>> {
        let (start, end) = month_window(year, month)?;
        let occurrences = self.scheduled(session, start, end).await?;

        Ok(build_grid(start, end, &occurrences))
    }
}
