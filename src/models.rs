use crate::calendar::ViewKind;
use crate::period::{Period, PeriodKind};
use crate::stats::{DailyStats, ShapeStats};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stool consistency classification. The wire values ("normal", "hard",
/// "soft", "watery") are fixed; the aggregators rely on the set being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Normal,
    Hard,
    Soft,
    Watery,
}

impl Shape {
    pub const ALL: [Self; 4] = [Self::Normal, Self::Hard, Self::Soft, Self::Watery];
}

/// One logged bowel movement. `date` alone drives period filtering; `time`
/// is display-only within a calendar cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Whole persisted store: records keyed by owning user. Ids come from a
/// monotonically increasing counter and are never reused.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub next_id: u64,
    #[serde(default)]
    pub users: BTreeMap<String, Vec<Record>>,
}

impl AppData {
    pub fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn user_records(&self, user_id: &str) -> &[Record] {
        self.users.get(user_id).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct NewRecordRequest {
    pub date: String,
    pub time: String,
    pub shape: Shape,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateRecordRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub shape: Option<Shape>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub period: Option<PeriodKind>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub view: Option<ViewKind>,
    pub date: Option<NaiveDate>,
    pub selected: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: u64,
    pub date: String,
    pub time: String,
    pub shape: Shape,
    pub notes: Option<String>,
}

impl RecordResponse {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id,
            date: record.date.to_string(),
            time: record.time.format("%H:%M").to_string(),
            shape: record.shape,
            notes: record.notes.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub period: Period,
    pub shape: ShapeStats,
    pub daily: DailyStats,
    pub advice: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarDayResponse {
    pub date: String,
    pub records: Vec<RecordResponse>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub view: ViewKind,
    pub days: Vec<CalendarDayResponse>,
}

#[derive(Debug, Serialize)]
pub struct HealthMessageResponse {
    pub week_start: String,
    pub week_end: String,
    pub message: String,
}
