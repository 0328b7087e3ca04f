use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::Color;

/// Longest range, counted in days with both ends included, that a calendar or
/// grocery query may cover.
pub const MAX_RANGE_DAYS: i64 = 3 * 366;

/// Rejects ranges whose start is after their end or that cover more than
/// [`MAX_RANGE_DAYS`].
pub fn check_range(start: NaiveDate, end: NaiveDate) -> crate::Result<()> {
    if start > end {
        crate::invalid!("start date must not be after end date");
    }

    if (end - start).num_days() >= MAX_RANGE_DAYS {
        crate::invalid!("date range must not cover more than {} days", MAX_RANGE_DAYS);
    }

    Ok(())
}

/// How a schedule entry repeats. The string forms are the ones stored in the
/// `schedule.repeat` column and exchanged over the API.
#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
)]
pub enum RepeatRule {
    #[default]
    #[strum(serialize = "none")]
    #[serde(rename = "none")]
    None,
    #[strum(serialize = "weekly")]
    #[serde(rename = "weekly")]
    Weekly,
    /// Same day of the month, e.g. every 15th.
    #[strum(serialize = "monthly date")]
    #[serde(rename = "monthly date")]
    MonthlyDate,
    /// Same ordinal weekday of the month, e.g. every 2nd Tuesday.
    #[strum(serialize = "monthly day")]
    #[serde(rename = "monthly day")]
    MonthlyWeekday,
}

impl RepeatRule {
    pub fn parse(value: &str) -> crate::Result<Self> {
        value
            .parse()
            .map_err(|_| crate::Error::Invalid(format!("invalid repeat rule \"{value}\"")))
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, RepeatRule::None)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub recipe_id: String,
    pub date: NaiveDate,
    pub repeat: RepeatRule,
    pub end_repeat: Option<NaiveDate>,
}

impl ScheduleEntry {
    /// End bound that actually applies; `none` entries never carry one.
    pub fn effective_end(&self) -> Option<NaiveDate> {
        if self.repeat.is_recurring() {
            self.end_repeat
        } else {
            None
        }
    }
}

/// One occurrence of a schedule entry joined with the recipe it points at.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDisplay {
    pub schedule_id: String,
    pub recipe_id: String,
    pub recipe_title: String,
    pub recipe_color: Color,
    pub scheduled_date: NaiveDate,
}
