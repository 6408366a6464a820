use crate::models::{Record, Shape};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Records whose `date` falls inside the inclusive range. Input order is
/// preserved; time-of-day never participates in the comparison.
pub fn records_in_range(records: &[Record], start: NaiveDate, end: NaiveDate) -> Vec<Record> {
    records
        .iter()
        .filter(|record| start <= record.date && record.date <= end)
        .cloned()
        .collect()
}

/// Per-shape tallies. All four categories are materialized so that the sum
/// of the fields always equals the record count.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ShapeCounts {
    pub normal: u32,
    pub hard: u32,
    pub soft: u32,
    pub watery: u32,
}

impl ShapeCounts {
    fn bump(&mut self, shape: Shape) {
        match shape {
            Shape::Normal => self.normal += 1,
            Shape::Hard => self.hard += 1,
            Shape::Soft => self.soft += 1,
            Shape::Watery => self.watery += 1,
        }
    }

    pub fn get(&self, shape: Shape) -> u32 {
        match shape {
            Shape::Normal => self.normal,
            Shape::Hard => self.hard,
            Shape::Soft => self.soft,
            Shape::Watery => self.watery,
        }
    }

    pub fn sum(&self) -> u32 {
        Shape::ALL.iter().map(|shape| self.get(*shape)).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShapeStats {
    pub counts: ShapeCounts,
    pub total: u32,
    pub normal_rate_pct: f64,
    pub abnormal_count: u32,
}

impl ShapeStats {
    pub fn aggregate(records: &[Record]) -> Self {
        let mut counts = ShapeCounts::default();
        for record in records {
            counts.bump(record.shape);
        }

        let total = records.len() as u32;
        let normal_rate_pct = if total == 0 {
            0.0
        } else {
            round1(f64::from(counts.normal) / f64::from(total) * 100.0)
        };

        Self {
            counts,
            total,
            normal_rate_pct,
            abnormal_count: total - counts.normal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyStats {
    pub days_with_records: u32,
    pub average_per_day: f64,
    pub max_per_day: u32,
}

impl DailyStats {
    pub fn aggregate(records: &[Record]) -> Self {
        let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for record in records {
            *per_day.entry(record.date).or_default() += 1;
        }

        let days_with_records = per_day.len() as u32;
        let average_per_day = if records.is_empty() {
            0.0
        } else {
            round1(records.len() as f64 / f64::from(days_with_records))
        };

        Self {
            days_with_records,
            average_per_day,
            max_per_day: per_day.values().copied().max().unwrap_or(0),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
