use sea_query::{ColumnDef, Index, Table, TableCreateStatement, TableDropStatement};

use crate::table::RecipeIngredient;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(RecipeIngredient::Table)
        .col(
            ColumnDef::new(RecipeIngredient::RecipeId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(RecipeIngredient::Sequence)
                .integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(RecipeIngredient::Name)
                .string()
                .not_null()
                .string_len(120),
        )
        .col(
            ColumnDef::new(RecipeIngredient::Amount)
                .double()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(RecipeIngredient::Unit)
                .string()
                .not_null()
                .string_len(40)
                .default(""),
        )
        .primary_key(
            Index::create()
                .col(RecipeIngredient::RecipeId)
                .col(RecipeIngredient::Sequence),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(RecipeIngredient::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
