use std::{collections::HashMap, ops::Deref};

use chefdeck_db::table::{Recipe, RecipeDirection, RecipeIngredient, RecipeTag};
use chefdeck_shared::{Color, Ingredient, Session};
use sea_query::{Expr, ExprTrait, Func, LikeExpr, Order, Query as Sql, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const MAX_PAGE_LIMIT: u64 = 100;

#[derive(Debug, Clone)]
pub struct RecipesQuery {
    /// 1-based
    pub page: u64,
    pub limit: u64,
    /// Case-insensitive title substring.
    pub q: Option<String>,
    /// Every tag must be present on a recipe for it to match.
    pub tags: Vec<String>,
}

impl Default for RecipesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            q: None,
            tags: vec![],
        }
    }
}

#[derive(FromRow)]
struct RecipeRow {
    id: String,
    title: String,
    servings: u32,
    minutes: u32,
    source_url: Option<String>,
    color: sqlx::types::Text<Color>,
    created_at: i64,
    updated_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: String,
    pub title: String,
    pub servings: u32,
    pub minutes: u32,
    pub color: Color,
    pub tags: Vec<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    pub items: Vec<RecipeSummary>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: String,
    pub title: String,
    pub servings: u32,
    pub minutes: u32,
    pub source_url: Option<String>,
    pub color: Color,
    pub ingredients: Vec<Ingredient>,
    pub directions: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeExistence {
    pub id: String,
    pub is_extant: bool,
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
    /// Recipes of the session user, newest first.
    #[tracing::instrument(skip(self), fields(user_id = %session.user_id))]
    pub async fn filter(
        &self,
        session: &Session,
        query: RecipesQuery,
    ) -> chefdeck_shared::Result<RecipePage> {
        if query.page < 1 {
            chefdeck_shared::invalid!("page must be at least 1");
        }

        if query.limit < 1 || query.limit > MAX_PAGE_LIMIT {
            chefdeck_shared::invalid!("limit must be between 1 and {}", MAX_PAGE_LIMIT);
        }

        let Some(offset) = (query.page - 1)
            .checked_mul(query.limit)
            .filter(|offset| i64::try_from(*offset).is_ok())
        else {
            chefdeck_shared::invalid!("page is too large");
        };

        let mut statement = Sql::select()
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::UserId).eq(&session.user_id))
            .to_owned();

        if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            statement.and_where(
                Expr::col(Recipe::Title)
                    .like(LikeExpr::new(format!("%{}%", escape_like(q))).escape('\\')),
            );
        }

        let mut tags = query
            .tags
            .iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();
        tags.sort();
        tags.dedup();

        if !tags.is_empty() {
            let in_clause = tags.iter().map(|_| "?").collect::<Vec<_>>().join(", ");

            statement.and_where(Expr::cust_with_values(
                format!(
                    "(SELECT COUNT(*) FROM recipe_tag WHERE recipe_tag.recipe_id = recipe.id AND recipe_tag.value IN ({in_clause})) = ?"
                ),
                tags.iter()
                    .map(|t| sea_query::Value::String(Some(t.to_owned())))
                    .chain(std::iter::once(sea_query::Value::Int(Some(
                        tags.len() as i32,
                    ))))
                    .collect::<Vec<_>>(),
            ));
        }

        let (sql, values) = statement
            .clone()
            .expr(Func::count(Expr::col(Recipe::Id)))
            .build_sqlx(SqliteQueryBuilder);
        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.read_db)
            .await?;

        let (sql, values) = statement
            .columns(recipe_columns())
            .order_by(Recipe::CreatedAt, Order::Desc)
            .order_by(Recipe::Id, Order::Desc)
            .limit(query.limit)
            .offset(offset)
            .build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut tags = self
            .tags_by_recipe(rows.iter().map(|r| r.id.to_owned()).collect())
            .await?;

        let items = rows
            .into_iter()
            .map(|row| RecipeSummary {
                tags: tags.remove(&row.id).unwrap_or_default(),
                id: row.id,
                title: row.title,
                servings: row.servings,
                minutes: row.minutes,
                color: row.color.0,
                created_at: row.created_at,
            })
            .collect();

        Ok(RecipePage {
            items,
            page: query.page,
            limit: query.limit,
            total: total.try_into().unwrap_or(0),
        })
    }

    pub async fn find(&self, session: &Session, id: &str) -> chefdeck_shared::Result<RecipeDetail> {
        let statement = Sql::select()
            .columns(recipe_columns())
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id))
            .and_where(Expr::col(Recipe::UserId).eq(&session.user_id))
            .limit(1)
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(row) = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
        else {
            return Err(chefdeck_shared::Error::NotFound);
        };

        let statement = Sql::select()
            .columns([
                RecipeIngredient::Name,
                RecipeIngredient::Amount,
                RecipeIngredient::Unit,
            ])
            .from(RecipeIngredient::Table)
            .and_where(Expr::col(RecipeIngredient::RecipeId).eq(id))
            .order_by(RecipeIngredient::Sequence, Order::Asc)
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let ingredients = sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let statement = Sql::select()
            .column(RecipeDirection::Content)
            .from(RecipeDirection::Table)
            .and_where(Expr::col(RecipeDirection::RecipeId).eq(id))
            .order_by(RecipeDirection::Sequence, Order::Asc)
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let directions = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .map(|(content,)| content)
            .collect();

        let tags = self
            .tags_by_recipe(vec![row.id.to_owned()])
            .await?
            .remove(&row.id)
            .unwrap_or_default();

        Ok(RecipeDetail {
            id: row.id,
            title: row.title,
            servings: row.servings,
            minutes: row.minutes,
            source_url: row.source_url,
            color: row.color.0,
            ingredients,
            directions,
            tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Distinct tags used by the session user, sorted.
    pub async fn tags(&self, session: &Session) -> chefdeck_shared::Result<Vec<String>> {
        let statement = Sql::select()
            .distinct()
            .column(RecipeTag::Value)
            .from(RecipeTag::Table)
            .and_where(Expr::col(RecipeTag::UserId).eq(&session.user_id))
            .order_by(RecipeTag::Value, Order::Asc)
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let tags = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(tags.into_iter().map(|(value,)| value).collect())
    }

    /// One flag per requested id, in request order. Recipes of other users
    /// count as missing.
    pub async fn which_exist(
        &self,
        session: &Session,
        ids: &[String],
    ) -> chefdeck_shared::Result<Vec<RecipeExistence>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = Sql::select()
            .column(Recipe::Id)
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::UserId).eq(&session.user_id))
            .and_where(Expr::col(Recipe::Id).is_in(ids.iter().map(|id| id.to_owned())))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let found = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .map(|(id,)| id)
            .collect::<std::collections::HashSet<_>>();

        Ok(ids
            .iter()
            .map(|id| RecipeExistence {
                id: id.to_owned(),
                is_extant: found.contains(id),
            })
            .collect())
    }

    async fn tags_by_recipe(
        &self,
        ids: Vec<String>,
    ) -> chefdeck_shared::Result<HashMap<String, Vec<String>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let statement = Sql::select()
            .columns([RecipeTag::RecipeId, RecipeTag::Value])
            .from(RecipeTag::Table)
            .and_where(Expr::col(RecipeTag::RecipeId).is_in(ids))
            .order_by(RecipeTag::Value, Order::Asc)
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String, String), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut tags = HashMap::<String, Vec<String>>::new();
        for (recipe_id, value) in rows {
            tags.entry(recipe_id).or_default().push(value);
        }

        Ok(tags)
    }
}

fn recipe_columns() -> [Recipe; 8] {
    [
        Recipe::Id,
        Recipe::Title,
        Recipe::Servings,
        Recipe::Minutes,
        Recipe::SourceUrl,
        Recipe::Color,
        Recipe::CreatedAt,
        Recipe::UpdatedAt,
    ]
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
