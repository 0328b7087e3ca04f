mod recipe;
mod recipe_direction;
mod recipe_ingredient;
mod recipe_tag;
mod schedule;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "chefdeck",
    "m0001",
    vec_box![],
    vec_box![
        recipe::CreateTable,
        recipe::CreateIdx1,
        recipe_ingredient::CreateTable,
        recipe_direction::CreateTable,
        recipe_tag::CreateTable,
        recipe_tag::CreateIdx1,
        schedule::CreateTable,
        schedule::CreateIdx1,
        schedule::CreateIdx2
    ]
);
