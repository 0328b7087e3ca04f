use std::{collections::HashSet, ops::Deref};

use chefdeck_db::table::{Recipe, Schedule};
use chefdeck_shared::{RepeatRule, ScheduleEntry, Session};
use chrono::NaiveDate;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;

/// A schedule as submitted by a client. Strings are parsed by
/// [`ScheduleInput::parse`] before anything touches the database.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    #[serde(default)]
    pub id: Option<String>,
    pub date: String,
    pub repeat: String,
    #[serde(default)]
    pub end_repeat: Option<String>,
}

impl ScheduleInput {
    pub fn parse(&self, recipe_id: &str) -> chefdeck_shared::Result<ScheduleEntry> {
        let date = parse_date(&self.date)?;
        let repeat = RepeatRule::parse(&self.repeat)?;
        let end_repeat = match (repeat, self.end_repeat.as_deref()) {
            (RepeatRule::None, _) | (_, None) | (_, Some("")) => None,
            (_, Some(value)) => Some(parse_date(value)?),
        };

        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() && id.len() <= 26 => id.to_owned(),
            _ => ulid::Ulid::new().to_string(),
        };

        Ok(ScheduleEntry {
            id,
            recipe_id: recipe_id.to_owned(),
            date,
            repeat,
            end_repeat,
        })
    }
}

pub fn parse_date(value: &str) -> chefdeck_shared::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| chefdeck_shared::Error::Invalid(format!("invalid date \"{value}\"")))
}

#[derive(Clone)]
pub struct Command(pub chefdeck_shared::State);

impl Deref for Command {
    type Target = chefdeck_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    /// Replaces every schedule of `recipe_id` with `inputs`, in one
    /// transaction. Returns the stored entries in input order.
    ///
    /// Ids must be unique within `inputs`. A client id already held by a
    /// schedule of another recipe is swapped for a fresh ulid.
    #[tracing::instrument(skip(self, inputs), fields(user_id = %session.user_id, count = inputs.len()))]
    pub async fn replace(
        &self,
        session: &Session,
        recipe_id: &str,
        inputs: &[ScheduleInput],
    ) -> chefdeck_shared::Result<Vec<ScheduleEntry>> {
        let mut entries = inputs
            .iter()
            .map(|input| input.parse(recipe_id))
            .collect::<chefdeck_shared::Result<Vec<_>>>()?;

        let mut ids = HashSet::with_capacity(entries.len());
        if let Some(entry) = entries.iter().find(|entry| !ids.insert(entry.id.as_str())) {
            chefdeck_shared::invalid!("duplicate schedule id \"{}\"", entry.id);
        }

        let mut tx = self.write_db.begin().await?;

        let statement = Query::select()
            .column(Recipe::Id)
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(recipe_id))
            .and_where(Expr::col(Recipe::UserId).eq(&session.user_id))
            .limit(1)
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let owned = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&mut *tx)
            .await?;

        if owned.is_none() {
            return Err(chefdeck_shared::Error::NotFound);
        }

        let statement = Query::delete()
            .from_table(Schedule::Table)
            .and_where(Expr::col(Schedule::RecipeId).eq(recipe_id))
            .and_where(Expr::col(Schedule::UserId).eq(&session.user_id))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if !entries.is_empty() {
            let statement = Query::select()
                .column(Schedule::Id)
                .from(Schedule::Table)
                .and_where(Expr::col(Schedule::Id).is_in(entries.iter().map(|e| e.id.to_owned())))
                .to_owned();
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            let taken = sqlx::query_as_with::<_, (String,), _>(&sql, values)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .map(|(id,)| id)
                .collect::<HashSet<_>>();

            for entry in entries.iter_mut().filter(|e| taken.contains(&e.id)) {
                entry.id = ulid::Ulid::new().to_string();
            }
        }

        for entry in entries.iter() {
            let statement = Query::insert()
                .into_table(Schedule::Table)
                .columns([
                    Schedule::Id,
                    Schedule::RecipeId,
                    Schedule::UserId,
                    Schedule::Date,
                    Schedule::Repeat,
                    Schedule::RepeatEnd,
                ])
                .values_panic([
                    entry.id.to_owned().into(),
                    entry.recipe_id.to_owned().into(),
                    session.user_id.to_owned().into(),
                    entry.date.to_string().into(),
                    entry.repeat.to_string().into(),
                    entry.end_repeat.map(|d| d.to_string()).into(),
                ])
                .to_owned();
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::debug!(recipe_id, "schedules replaced");

        Ok(entries)
    }
}
