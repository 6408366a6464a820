use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Week,
    Month,
    Year,
}

/// Inclusive date range for a statistics window, recomputed on demand from a
/// reference date. Weeks start on Monday.
#[derive(Debug, Clone, Serialize)]
pub struct Period {
    pub kind: PeriodKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl Period {
    pub fn resolve(reference: NaiveDate, kind: PeriodKind) -> Self {
        let (start, end) = match kind {
            PeriodKind::Week => {
                let start = week_start(reference);
                let end = start
                    .checked_add_signed(Duration::days(6))
                    .unwrap_or(NaiveDate::MAX);
                (start, end)
            }
            PeriodKind::Month => (first_of_month(reference), last_of_month(reference)),
            PeriodKind::Year => (
                ymd(reference.year(), 1, 1),
                ymd(reference.year(), 12, 31),
            ),
        };

        let label = match kind {
            PeriodKind::Week => format!(
                "{}/{} - {}/{}",
                start.month(),
                start.day(),
                end.month(),
                end.day()
            ),
            PeriodKind::Month => format!("{}年{}月", reference.year(), reference.month()),
            PeriodKind::Year => format!("{}年", reference.year()),
        };

        Self { kind, start, end, label }
    }
}

/// Monday of the week containing `date`, clamped at the calendar minimum.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(i64::from(
        date.weekday().num_days_from_monday(),
    )))
    .unwrap_or(NaiveDate::MIN)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    ymd(date.year(), date.month(), 1)
}

/// Day before the first of the next month. Past the last representable
/// month the range simply ends at the calendar maximum.
fn last_of_month(date: NaiveDate) -> NaiveDate {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month.map_or(NaiveDate::MAX, |first| first - Duration::days(1))
}

// Day 1 and Jan 1 / Dec 31 exist for every representable year.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("calendar boundary date is valid")
}
