use std::ops::Deref;

use chefdeck_db::table::{Recipe, RecipeDirection, RecipeIngredient, RecipeTag, Schedule};
use chefdeck_shared::Session;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqliteConnection;
use time::OffsetDateTime;
use validator::ValidateUrl;

use crate::{ImportError, RecipeInput, ScrapeRecipe};

#[derive(Clone)]
pub struct Command(pub chefdeck_shared::State);

impl Deref for Command {
    type Target = chefdeck_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    #[tracing::instrument(skip(self, input), fields(user_id = %session.user_id))]
    pub async fn create(
        &self,
        session: &Session,
        input: RecipeInput,
    ) -> chefdeck_shared::Result<String> {
        let input = input.check()?;
        let id = ulid::Ulid::new().to_string();

        let mut tx = self.write_db.begin().await?;

        let statement = Query::insert()
            .into_table(Recipe::Table)
            .columns([
                Recipe::Id,
                Recipe::UserId,
                Recipe::Title,
                Recipe::Servings,
                Recipe::Minutes,
                Recipe::SourceUrl,
                Recipe::Color,
                Recipe::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                session.user_id.to_owned().into(),
                input.title.to_owned().into(),
                input.servings.into(),
                input.minutes.into(),
                input.source_url.to_owned().into(),
                input.color.to_string().into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        insert_details(&mut tx, &id, session, &input).await?;

        tx.commit().await?;

        tracing::info!(recipe_id = id, "recipe created");

        Ok(id)
    }

    /// Scrapes `url` and stores the result as a new recipe of the session
    /// user.
    #[tracing::instrument(skip(self, scraper), fields(user_id = %session.user_id))]
    pub async fn import(
        &self,
        session: &Session,
        scraper: &dyn ScrapeRecipe,
        url: &str,
    ) -> Result<String, ImportError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(chefdeck_shared::Error::Invalid("URL is required.".to_owned()).into());
        }

        if !url.validate_url() {
            return Err(chefdeck_shared::Error::Invalid(format!("invalid URL \"{url}\"")).into());
        }

        let scraped = scraper.scrape(url).await?;

        Ok(self.create(session, scraped.into_input(url)).await?)
    }

    #[tracing::instrument(skip(self, input), fields(user_id = %session.user_id))]
    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        input: RecipeInput,
    ) -> chefdeck_shared::Result<()> {
        let input = input.check()?;

        let mut tx = self.write_db.begin().await?;

        let statement = Query::update()
            .table(Recipe::Table)
            .values([
                (Recipe::Title, input.title.to_owned().into()),
                (Recipe::Servings, input.servings.into()),
                (Recipe::Minutes, input.minutes.into()),
                (Recipe::SourceUrl, input.source_url.to_owned().into()),
                (Recipe::Color, input.color.to_string().into()),
                (
                    Recipe::UpdatedAt,
                    OffsetDateTime::now_utc().unix_timestamp().into(),
                ),
            ])
            .and_where(Expr::col(Recipe::Id).eq(id))
            .and_where(Expr::col(Recipe::UserId).eq(&session.user_id))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            return Err(chefdeck_shared::Error::NotFound);
        }

        delete_details(&mut tx, id).await?;
        insert_details(&mut tx, id, session, &input).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Deletes the recipe with its ingredients, directions, tags and
    /// schedules.
    #[tracing::instrument(skip(self), fields(user_id = %session.user_id))]
    pub async fn delete(&self, session: &Session, id: &str) -> chefdeck_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;

        let statement = Query::delete()
            .from_table(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id))
            .and_where(Expr::col(Recipe::UserId).eq(&session.user_id))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            return Err(chefdeck_shared::Error::NotFound);
        }

        delete_details(&mut tx, id).await?;

        let statement = Query::delete()
            .from_table(Schedule::Table)
            .and_where(Expr::col(Schedule::RecipeId).eq(id))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Removes `tag` from every recipe of the session user.
    #[tracing::instrument(skip(self), fields(user_id = %session.user_id))]
    pub async fn delete_tag(&self, session: &Session, tag: &str) -> chefdeck_shared::Result<u64> {
        let statement = Query::delete()
            .from_table(RecipeTag::Table)
            .and_where(Expr::col(RecipeTag::UserId).eq(&session.user_id))
            .and_where(Expr::col(RecipeTag::Value).eq(tag.trim()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(chefdeck_shared::Error::NotFound);
        }

        Ok(result.rows_affected())
    }
}

async fn insert_details(
    conn: &mut SqliteConnection,
    id: &str,
    session: &Session,
    input: &RecipeInput,
) -> chefdeck_shared::Result<()> {
    if !input.ingredients.is_empty() {
        let mut statement = Query::insert()
            .into_table(RecipeIngredient::Table)
            .columns([
                RecipeIngredient::RecipeId,
                RecipeIngredient::Sequence,
                RecipeIngredient::Name,
                RecipeIngredient::Amount,
                RecipeIngredient::Unit,
            ])
            .to_owned();

        for (sequence, ingredient) in input.ingredients.iter().enumerate() {
            statement.values_panic([
                id.into(),
                (sequence as i64).into(),
                ingredient.name.as_str().into(),
                ingredient.amount.into(),
                ingredient.unit.as_str().into(),
            ]);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    if !input.directions.is_empty() {
        let mut statement = Query::insert()
            .into_table(RecipeDirection::Table)
            .columns([
                RecipeDirection::RecipeId,
                RecipeDirection::Sequence,
                RecipeDirection::Content,
            ])
            .to_owned();

        for (sequence, direction) in input.directions.iter().enumerate() {
            statement.values_panic([
                id.into(),
                (sequence as i64).into(),
                direction.trim().into(),
            ]);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    if !input.tags.is_empty() {
        let mut statement = Query::insert()
            .into_table(RecipeTag::Table)
            .columns([RecipeTag::RecipeId, RecipeTag::UserId, RecipeTag::Value])
            .to_owned();

        for tag in input.tags.iter() {
            statement.values_panic([
                id.into(),
                session.user_id.to_owned().into(),
                tag.to_owned().into(),
            ]);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    Ok(())
}

async fn delete_details(conn: &mut SqliteConnection, id: &str) -> chefdeck_shared::Result<()> {
    let statements = [
        Query::delete()
            .from_table(RecipeIngredient::Table)
            .and_where(Expr::col(RecipeIngredient::RecipeId).eq(id))
            .to_owned(),
        Query::delete()
            .from_table(RecipeDirection::Table)
            .and_where(Expr::col(RecipeDirection::RecipeId).eq(id))
            .to_owned(),
        Query::delete()
            .from_table(RecipeTag::Table)
            .and_where(Expr::col(RecipeTag::RecipeId).eq(id))
            .to_owned(),
    ];

    for statement in statements {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    Ok(())
}
