use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Recipe {
    Table,
    Id,
    UserId,
    Title,
    Servings,
    Minutes,
    SourceUrl,
    Color,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum RecipeIngredient {
    Table,
    RecipeId,
    Sequence,
    Name,
    Amount,
    Unit,
}

#[derive(Iden, Clone)]
pub enum RecipeDirection {
    Table,
    RecipeId,
    Sequence,
    Content,
}

#[derive(Iden, Clone)]
pub enum RecipeTag {
    Table,
    RecipeId,
    UserId,
    Value,
}

#[derive(Iden, Clone)]
pub enum Schedule {
    Table,
    Id,
    RecipeId,
    UserId,
    Date,
    Repeat,
    RepeatEnd,
}
