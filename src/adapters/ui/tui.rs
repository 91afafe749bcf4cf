//! Implements InputPort. Inquire-based interactive menu over the calendar cache.

use crate::adapters::ui::progress::spinner;
use crate::domain::dates::parse_date;
use crate::domain::{DomainError, StartOfWeek, Week};
use crate::ports::InputPort;
use crate::usecases::CalendarService;
use async_trait::async_trait;
use chrono::NaiveDate;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{CustomType, Select, Text};
use std::fmt;
use std::sync::Arc;

/// Prompt prefix and highlight colors for every inquire prompt.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("»").with_fg(Color::LightCyan))
        .with_highlighted_option_prefix(Styled::new("▸").with_fg(Color::DarkYellow));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Rebuild,
    ShowWeeks,
    LookupDate,
    LookupWeek,
    ShowYear,
    WeeksBetween,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 7] = [
        MenuItem::Rebuild,
        MenuItem::ShowWeeks,
        MenuItem::LookupDate,
        MenuItem::LookupWeek,
        MenuItem::ShowYear,
        MenuItem::WeeksBetween,
        MenuItem::Exit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuItem::Rebuild => "Rebuild calendar cache",
            MenuItem::ShowWeeks => "Show weeks of a year",
            MenuItem::LookupDate => "Look up a date",
            MenuItem::LookupWeek => "Look up a week",
            MenuItem::ShowYear => "Show a year",
            MenuItem::WeeksBetween => "Weeks between two dates",
            MenuItem::Exit => "Exit",
        };
        f.write_str(label)
    }
}

fn prompt_err(e: inquire::InquireError) -> DomainError {
    DomainError::Input(e.to_string())
}

/// One-line rendering used by every week listing.
pub fn format_week(week: &Week) -> String {
    format!(
        "{}  {} .. {}",
        week.key_suffix(),
        week.date_start.format("%a %Y-%m-%d"),
        week.date_end.format("%a %Y-%m-%d")
    )
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    calendar: Arc<CalendarService>,
}

impl TuiInputPort {
    pub fn new(calendar: Arc<CalendarService>) -> Self {
        Self { calendar }
    }

    fn prompt_date(message: &str) -> Result<NaiveDate, DomainError> {
        let raw = Text::new(message)
            .with_help_message("YYYY-MM-DD or MM/DD/YYYY")
            .prompt()
            .map_err(prompt_err)?;
        parse_date(&raw)
    }

    fn prompt_year(message: &str, default: i32) -> Result<i32, DomainError> {
        CustomType::<i32>::new(message)
            .with_default(default)
            .prompt()
            .map_err(prompt_err)
    }

    async fn rebuild(&self) -> Result<(), DomainError> {
        let defaults = *self.calendar.defaults();
        let epoch = Self::prompt_year("First year:", defaults.epoch_year())?;
        let end = Self::prompt_year("Last year:", defaults.end_year())?;
        let pb = spinner("Rebuilding calendar cache");
        let result = self
            .calendar
            .rebuild(Some(epoch), Some(end), StartOfWeek::Sunday.as_str())
            .await;
        match &result {
            Ok(summary) => pb.finish_with_message(format!(
                "Finished: {} weeks, {} years, {} days",
                summary.weeks, summary.years, summary.days
            )),
            Err(e) => pb.abandon_with_message(format!("Rebuild failed: {}", e)),
        }
        result.map(|_| ())
    }

    async fn show_weeks(&self) -> Result<(), DomainError> {
        let year = Self::prompt_year("Week year:", self.calendar.defaults().epoch_year())?;
        let prefix = format!("{}-", year);
        let keys = self.calendar.week_keys().await?;
        let mut shown = 0;
        for key in keys.iter().filter(|k| k.starts_with(&prefix)) {
            let Some(week_number) = key[prefix.len()..].parse::<u32>().ok() else {
                continue;
            };
            if let Some(week) = self.calendar.week(year, week_number).await? {
                println!("{}", format_week(&week));
                shown += 1;
            }
        }
        if shown == 0 {
            println!("No weeks cached for {}", year);
        }
        Ok(())
    }

    async fn lookup_date(&self) -> Result<(), DomainError> {
        let date = Self::prompt_date("Date:")?;
        match self.calendar.day(date).await? {
            Some(day) => {
                println!(
                    "{}  {} ({}), day {} of {}",
                    day.date, day.weekday_name, day.index_in_week, day.day_of_year, day.year
                );
                println!(
                    "week {} of {}, {} {}",
                    day.week_number, day.week_year, day.month_name, day.day_of_month
                );
            }
            None => println!("{} is not in the cached range", date),
        }
        Ok(())
    }

    async fn lookup_week(&self) -> Result<(), DomainError> {
        let year = Self::prompt_year("Week year:", self.calendar.defaults().epoch_year())?;
        let week_number = CustomType::<u32>::new("Week number:")
            .prompt()
            .map_err(prompt_err)?;
        match self.calendar.week(year, week_number).await? {
            Some(week) => println!("{}", format_week(&week)),
            None => println!("Week {}-{:02} is not cached", year, week_number),
        }
        Ok(())
    }

    async fn show_year(&self) -> Result<(), DomainError> {
        let year = Self::prompt_year("Year:", self.calendar.defaults().epoch_year())?;
        match self.calendar.year(year).await? {
            Some(y) => println!(
                "{}: {} days, January 1st is {} (position {}), {} weeks",
                y.year, y.days_in_year, y.jan_one_dayname, y.jan_one_weekpos, y.max_week_number
            ),
            None => println!("{} is not in the cached range", year),
        }
        Ok(())
    }

    fn weeks_between(&self) -> Result<(), DomainError> {
        let from = Self::prompt_date("From date:")?;
        let to = Self::prompt_date("To date:")?;
        for week in self.calendar.weeks_between(from, to) {
            println!("{}", format_week(&week));
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = Select::new("Temporal", MenuItem::ALL.to_vec())
                .prompt()
                .map_err(prompt_err)?;
            let outcome = match choice {
                MenuItem::Rebuild => self.rebuild().await,
                MenuItem::ShowWeeks => self.show_weeks().await,
                MenuItem::LookupDate => self.lookup_date().await,
                MenuItem::LookupWeek => self.lookup_week().await,
                MenuItem::ShowYear => self.show_year().await,
                MenuItem::WeeksBetween => self.weeks_between(),
                MenuItem::Exit => return Ok(()),
            };
            // Caller errors are reported and the menu continues; storage failures end the session.
            match outcome {
                Ok(()) => {}
                Err(e @ DomainError::Cache(_)) => return Err(e),
                Err(e) => println!("{}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_week() {
        let week = Week::new(2022, 1, NaiveDate::from_ymd_opt(2021, 12, 26).unwrap());
        assert_eq!(
            format_week(&week),
            "2022-01  Sun 2021-12-26 .. Sat 2022-01-01"
        );
    }

    #[test]
    fn test_menu_labels_are_unique() {
        let labels: std::collections::HashSet<String> =
            MenuItem::ALL.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels.len(), MenuItem::ALL.len());
    }
}
