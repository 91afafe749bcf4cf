//! Lazy sequence of consecutive weeks between two dates.

use crate::domain::week_numbering::date_to_week_number;
use crate::domain::Week;
use chrono::{Datelike, Days, NaiveDate};
use std::iter::FusedIterator;

/// Weeks in chronological order, from the week containing `from` through the
/// week containing `to`. Computed on demand; to iterate again, build a new range.
#[derive(Debug, Clone)]
pub struct WeekRange {
    next_start: Option<NaiveDate>,
    last_start: NaiveDate,
}

impl WeekRange {
    /// Empty when `from > to`. Weeks that would run past `NaiveDate::MIN` or
    /// `NaiveDate::MAX` are left out.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        let first = sunday_on_or_before(from).or_else(|| sunday_after(from));
        let last = sunday_on_or_before(to).and_then(|s| {
            if s.checked_add_days(Days::new(6)).is_some() {
                Some(s)
            } else {
                s.checked_sub_days(Days::new(7))
            }
        });
        match (first, last) {
            (Some(first), Some(last)) if from <= to => Self {
                next_start: Some(first),
                last_start: last,
            },
            _ => Self {
                next_start: None,
                last_start: NaiveDate::MIN,
            },
        }
    }
}

fn sunday_on_or_before(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
}

fn sunday_after(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(7 - u64::from(date.weekday().num_days_from_sunday())))
}

impl Iterator for WeekRange {
    type Item = Week;

    fn next(&mut self) -> Option<Week> {
        let start = self.next_start.filter(|s| *s <= self.last_start)?;
        let id = date_to_week_number(start);
        self.next_start = start.checked_add_days(Days::new(7));
        Some(Week::new(id.week_year, id.week_number, start))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next_start {
            Some(s) if s <= self.last_start => ((self.last_start - s).num_days() / 7 + 1) as usize,
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl FusedIterator for WeekRange {}
