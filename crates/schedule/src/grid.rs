use std::collections::BTreeMap;

use chefdeck_shared::ScheduleDisplay;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9999;

/// One cell of the 7-column calendar. `date` is `None` for padding cells,
/// which never carry recipes.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RecipeDate {
    pub date: Option<NaiveDate>,
    pub recipes: Vec<ScheduleDisplay>,
}

impl RecipeDate {
    fn padding() -> Self {
        Self {
            date: None,
            recipes: vec![],
        }
    }
}

/// Builds the Sunday-first grid for `[start, end]`: blank cells up to the
/// weekday of `start`, one cell per day, blank cells after `end` up to
/// Saturday. The result length is always a multiple of 7; an inverted window
/// gives an empty grid.
pub fn build_grid(
    start: NaiveDate,
    end: NaiveDate,
    occurrences: &[ScheduleDisplay],
) -> Vec<RecipeDate> {
    if start > end {
        return vec![];
    }

    let mut by_day: BTreeMap<NaiveDate, Vec<ScheduleDisplay>> = BTreeMap::new();
    for occurrence in occurrences {
        by_day
            .entry(occurrence.scheduled_date)
            .or_default()
            .push(occurrence.clone());
    }

    let days_before = start.weekday().num_days_from_sunday() as usize;
    let days_after = 6 - end.weekday().num_days_from_sunday() as usize;

    let mut cells = Vec::with_capacity(days_before + days_after + 31);
    cells.extend(std::iter::repeat_with(RecipeDate::padding).take(days_before));
    cells.extend(
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| RecipeDate {
                date: Some(day),
                recipes: by_day.remove(&day).unwrap_or_default(),
            }),
    );
    cells.extend(std::iter::repeat_with(RecipeDate::padding).take(days_after));

    cells
}

/// First and last day of `month` in `year`.
pub fn month_window(year: i32, month: u32) -> chefdeck_shared::Result<(NaiveDate, NaiveDate)> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        chefdeck_shared::invalid!("year must be between {} and {}", MIN_YEAR, MAX_YEAR);
    }

    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        chefdeck_shared::invalid!("month must be between 1 and 12");
    };

    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| chefdeck_shared::Error::Invalid(format!("no last day for {year}-{month}")))?;

    Ok((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chefdeck_shared::Color;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn display(on: NaiveDate, title: &str) -> ScheduleDisplay {
        ScheduleDisplay {
            schedule_id: format!("s-{title}"),
            recipe_id: format!("r-{title}"),
            recipe_title: title.to_owned(),
            recipe_color: Color::Yellow,
            scheduled_date: on,
        }
    }

    #[test]
    fn june_2024_padding() {
        // Saturday 1st to Sunday 30th.
        let (start, end) = month_window(2024, 6).unwrap();
        let grid = build_grid(start, end, &[]);

        assert_eq!(grid.len(), 42);
        assert!(grid[..6].iter().all(|c| c.date.is_none()));
        assert_eq!(grid[6].date, Some(date(2024, 6, 1)));
        assert_eq!(grid[35].date, Some(date(2024, 6, 30)));
        assert!(grid[36..].iter().all(|c| c.date.is_none()));
    }

    #[test]
    fn february_2026_needs_no_padding() {
        let (start, end) = month_window(2026, 2).unwrap();
        let grid = build_grid(start, end, &[]);

        assert_eq!(grid.len(), 28);
        assert_eq!(grid[0].date, Some(date(2026, 2, 1)));
        assert_eq!(grid[27].date, Some(date(2026, 2, 28)));
    }

    #[test]
    fn every_month_is_a_multiple_of_seven() {
        for year in [1900, 2023, 2024, 2100, 9999] {
            for month in 1..=12 {
                let (start, end) = month_window(year, month).unwrap();
                let occurrences = vec![display(start, "a"), display(end, "b")];
                let grid = build_grid(start, end, &occurrences);

                assert_eq!(grid.len() % 7, 0, "{year}-{month}");
                assert!(
                    grid.iter()
                        .filter(|c| c.date.is_none())
                        .all(|c| c.recipes.is_empty())
                );
                assert_eq!(grid.iter().map(|c| c.recipes.len()).sum::<usize>(), 2);
            }
        }
    }

    #[test]
    fn recipes_land_on_matching_day() {
        let occurrences = vec![
            display(date(2024, 6, 8), "Soup"),
            display(date(2024, 6, 8), "Bread"),
            display(date(2024, 6, 20), "Pasta"),
            display(date(2024, 7, 1), "Outside"),
        ];
        let grid = build_grid(date(2024, 6, 1), date(2024, 6, 30), &occurrences);

        let june_8 = grid
            .iter()
            .find(|c| c.date == Some(date(2024, 6, 8)))
            .unwrap();
        assert_eq!(
            june_8
                .recipes
                .iter()
                .map(|r| r.recipe_title.as_str())
                .collect::<Vec<_>>(),
            vec!["Soup", "Bread"]
        );

        let total = grid.iter().map(|c| c.recipes.len()).sum::<usize>();
        assert_eq!(total, 3);
    }

    #[test]
    fn arbitrary_window() {
        // Wednesday to Thursday.
        let grid = build_grid(date(2024, 6, 5), date(2024, 6, 13), &[]);

        assert_eq!(grid.len(), 14);
        assert!(grid[..3].iter().all(|c| c.date.is_none()));
        assert_eq!(grid[3].date, Some(date(2024, 6, 5)));
        assert_eq!(grid[11].date, Some(date(2024, 6, 13)));
    }

    #[test]
    fn inverted_window_is_empty() {
        assert!(build_grid(date(2024, 6, 30), date(2024, 6, 1), &[]).is_empty());
    }

    #[test]
    fn month_window_bounds() {
        assert_eq!(
            month_window(2024, 2).unwrap(),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            month_window(2023, 12).unwrap(),
            (date(2023, 12, 1), date(2023, 12, 31))
        );
        assert!(month_window(1899, 1).is_err());
        assert!(month_window(10000, 1).is_err());
        assert!(month_window(2024, 0).is_err());
        assert!(month_window(2024, 13).is_err());
    }
}
