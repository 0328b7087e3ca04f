//! Expansion of schedule entries into the concrete dates they land on.
//!
//! Every date is a [`NaiveDate`]: occurrences are compared by calendar day
//! only, so the time zone a client rendered its picker in never shifts an
//! occurrence onto a neighbouring day.

use chefdeck_shared::{Color, RepeatRule, ScheduleDisplay, ScheduleEntry};
use chrono::{Datelike, Days, NaiveDate};

/// Lazy, finite iterator over the occurrences of one entry inside a window.
///
/// Created by [`occurrences`]. The iterator never yields a date before the
/// window start, before the entry date, after the window end or after the
/// entry's `end_repeat`.
#[derive(Debug, Clone)]
pub struct Occurrences {
    base: NaiveDate,
    rule: RepeatRule,
    start: NaiveDate,
    /// Last admissible day; `None` once the iterator is exhausted.
    limit: Option<NaiveDate>,
    step: u32,
}

/// Occurrences of `entry` within `[start, end]` (both inclusive).
///
/// Rules:
/// - `none` occurs once, on `entry.date`.
/// - `weekly` occurs every 7 days from `entry.date`.
/// - `monthly date` occurs on the same day of the month. Months without
///   that day (the 31st in April, the 30th in February) are skipped, not
///   clamped to the month end.
/// - `monthly day` occurs on the same ordinal weekday ("2nd Tuesday").
///   Months without a 5th occurrence of the weekday are skipped.
///
/// Recurring rules stop after `end_repeat` when it is set. `end_repeat` is
/// ignored for `none`.
pub fn occurrences(entry: &ScheduleEntry, start: NaiveDate, end: NaiveDate) -> Occurrences {
    let limit = match entry.effective_end() {
        Some(end_repeat) => end.min(end_repeat),
        None => end,
    };

    // Skip straight to the first step that can land inside the window.
    let step = match entry.repeat {
        RepeatRule::None => 0,
        RepeatRule::Weekly => {
            let days = (start - entry.date).num_days().max(0);
            u32::try_from((days + 6) / 7).unwrap_or(u32::MAX)
        }
        RepeatRule::MonthlyDate | RepeatRule::MonthlyWeekday => {
            u32::try_from(month_index(start) - month_index(entry.date)).unwrap_or(0)
        }
    };

    Occurrences {
        base: entry.date,
        rule: entry.repeat,
        start,
        limit: Some(limit),
        step,
    }
}

/// Collected form of [`occurrences`], ascending.
pub fn occurrences_in_range(
    entry: &ScheduleEntry,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    occurrences(entry, start, end).collect()
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let limit = self.limit?;

        loop {
            let step = self.step;
            self.step = self.step.saturating_add(1);

            let candidate = match self.rule {
                RepeatRule::None => {
                    self.limit = None;
                    return (self.start <= self.base && self.base <= limit).then_some(self.base);
                }
                RepeatRule::Weekly => self.base.checked_add_days(Days::new(7 * u64::from(step))),
                RepeatRule::MonthlyDate | RepeatRule::MonthlyWeekday => {
                    let month = i32::try_from(step)
                        .ok()
                        .and_then(|step| month_index(self.base).checked_add(step))
                        .and_then(month_from_index);

                    let Some((year, month)) = month else {
                        self.limit = None;
                        return None;
                    };

                    match NaiveDate::from_ymd_opt(year, month, 1) {
                        Some(first) if first <= limit => {}
                        _ => {
                            self.limit = None;
                            return None;
                        }
                    }

                    match self.day_in_month(year, month) {
                        Some(date) => Some(date),
                        None => continue,
                    }
                }
            };

            match candidate {
                Some(date) if date > limit => {
                    self.limit = None;
                    return None;
                }
                Some(date) if date >= self.start => return Some(date),
                Some(_) => continue,
                None => {
                    self.limit = None;
                    return None;
                }
            }
        }
    }
}

impl Occurrences {
    fn day_in_month(&self, year: i32, month: u32) -> Option<NaiveDate> {
        match self.rule {
            RepeatRule::MonthlyDate => NaiveDate::from_ymd_opt(year, month, self.base.day()),
            RepeatRule::MonthlyWeekday => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                let target = self.base.weekday().num_days_from_sunday();
                let offset = (target + 7 - first.weekday().num_days_from_sunday()) % 7;
                let day = 1 + offset + 7 * (weekday_ordinal(self.base) - 1);

                NaiveDate::from_ymd_opt(year, month, day)
            }
            RepeatRule::None | RepeatRule::Weekly => None,
        }
    }
}

/// 1-based position of `date`'s weekday within its month (the 9th is always
/// the 2nd of its weekday).
pub fn weekday_ordinal(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

fn month_from_index(index: i32) -> Option<(i32, u32)> {
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;

    Some((index.div_euclid(12), month))
}

/// A schedule entry together with the recipe fields shown on the calendar.
#[derive(Debug, Clone)]
pub struct ScheduledRecipe {
    pub entry: ScheduleEntry,
    pub recipe_title: String,
    pub recipe_color: Color,
}

/// Expands every entry into one [`ScheduleDisplay`] per occurrence inside
/// `[start, end]`, sorted by date then recipe title.
pub fn expand(
    items: &[ScheduledRecipe],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ScheduleDisplay> {
    let mut displays = items
        .iter()
        .flat_map(|item| {
            occurrences(&item.entry, start, end).map(move |date| ScheduleDisplay {
                schedule_id: item.entry.id.to_owned(),
                recipe_id: item.entry.recipe_id.to_owned(),
                recipe_title: item.recipe_title.to_owned(),
                recipe_color: item.recipe_color,
                scheduled_date: date,
            })
        })
        .collect::<Vec<_>>();

    displays.sort_by(|a, b| {
        a.scheduled_date
            .cmp(&b.scheduled_date)
            .then_with(|| a.recipe_title.cmp(&b.recipe_title))
    });

    displays
}
