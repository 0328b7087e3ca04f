mod command;
pub mod recipe;
pub mod schedule;
mod session;

pub use command::*;
pub use recipe::{Color, Ingredient};
pub use schedule::{MAX_RANGE_DAYS, RepeatRule, ScheduleDisplay, ScheduleEntry, check_range};
pub use session::Session;

/// Pools handed to every command and query. Writes go through the single
/// connection `write_db`, reads through the read-only `read_db`.
#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

impl State {
    pub fn new(read_db: sqlx::SqlitePool, write_db: sqlx::SqlitePool) -> Self {
        Self { read_db, write_db }
    }
}
