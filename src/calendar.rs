use crate::models::Record;
use crate::period::{Period, PeriodKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Week,
    Month,
}

/// Days shown by the calendar. The week view follows the selected date, the
/// month view follows the navigation reference date.
pub fn grid_days(view: ViewKind, reference: NaiveDate, selected: NaiveDate) -> Vec<NaiveDate> {
    let period = match view {
        ViewKind::Week => Period::resolve(selected, PeriodKind::Week),
        ViewKind::Month => Period::resolve(reference, PeriodKind::Month),
    };

    let mut days = Vec::new();
    let mut day = period.start;
    while day <= period.end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// Records logged on exactly `day`, for binding into a calendar cell.
pub fn records_on(records: &[Record], day: NaiveDate) -> Vec<Record> {
    records
        .iter()
        .filter(|record| record.date == day)
        .cloned()
        .collect()
}
