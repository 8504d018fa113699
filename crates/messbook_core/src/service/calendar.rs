//! Month grid for the shopper calendar.
//!
//! # Responsibility
//! - Compute the dates shown for one month, padded to whole weeks.
//! - Navigate between months.
//!
//! # Invariants
//! - A grid always starts on `week_start` and holds a multiple of 7 days.
//! - Every day of the displayed month appears exactly once with `in_month`.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use std::str::FromStr;

/// First day of the displayed week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    /// Weekday header labels in display order.
    pub fn labels(self) -> [&'static str; 7] {
        match self {
            Self::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            Self::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }

    fn offset_of(self, day: Weekday) -> i64 {
        match self {
            Self::Sunday => i64::from(day.num_days_from_sunday()),
            Self::Monday => i64::from(day.num_days_from_monday()),
        }
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            other => Err(format!(
                "unsupported week start `{other}`; expected sunday|monday"
            )),
        }
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    /// Whether the date belongs to the displayed month (only those accept
    /// assignments).
    pub in_month: bool,
    pub is_today: bool,
}

/// Display grid for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// First day of the displayed month.
    pub month: NaiveDate,
    pub week_start: WeekStart,
    pub days: Vec<GridDay>,
}

impl MonthGrid {
    /// Builds the grid for the month containing `any_day`.
    pub fn for_month(any_day: NaiveDate, week_start: WeekStart, today: NaiveDate) -> Self {
        let month = first_of_month(any_day);
        let last = last_of_month(month);

        let lead = week_start.offset_of(month.weekday());
        let trail = 6 - week_start.offset_of(last.weekday());
        let start = month - Duration::days(lead);
        let end = last + Duration::days(trail);

        let days = start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| GridDay {
                date,
                in_month: date.month() == month.month() && date.year() == month.year(),
                is_today: date == today,
            })
            .collect();

        Self {
            month,
            week_start,
            days,
        }
    }

    /// Grid rows of seven days each.
    pub fn weeks(&self) -> impl Iterator<Item = &[GridDay]> {
        self.days.chunks(7)
    }

    /// Dates of the displayed month only.
    pub fn month_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().filter(|day| day.in_month).map(|day| day.date)
    }

    /// Heading such as `October 2026`.
    pub fn title(&self) -> String {
        self.month.format("%B %Y").to_string()
    }
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

/// First day of the month `offset` months away from the month of `date`.
///
/// Returns the unshifted month when the result would leave chrono's range.
pub fn shift_month(date: NaiveDate, offset: i32) -> NaiveDate {
    let first = first_of_month(date);
    let months = Months::new(offset.unsigned_abs());
    let shifted = if offset >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    };
    shifted.unwrap_or(first)
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|_| format!("Invalid month '{value}'. Expected YYYY-MM"))
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{value}'. Expected YYYY-MM-DD"))
}
