use crate::models::Record;
use crate::stats::{DailyStats, ShapeStats};

pub const MSG_NO_RECORDS: &str = "まだ記録がありません。健康管理のためにも記録を始めましょう！";
pub const MSG_SHAPE_GOOD: &str = "✅ 形状が良好です！健康的な排便パターンを維持できています。";
pub const MSG_SHAPE_CAUTION: &str =
    "⚠️ 形状に変化があります。水分摂取や食事内容を見直してみてください。";
pub const MSG_FREQ_GOOD: &str = "✅ 記録頻度が良好です。継続的な健康管理ができています。";
pub const MSG_FREQ_SUGGESTION: &str = "💡 記録頻度を上げると、より詳細な健康分析ができます。";
pub const MSG_URGENT: &str =
    "🚨 異常な形状が多く見られます。体調管理に注意し、必要に応じて医師に相談してください。";

pub const MSG_WEEK_EMPTY: &str =
    "今週はまだ記録がありません。健康管理のためにも記録を始めましょう！";

type Predicate = fn(&ShapeStats, &DailyStats) -> bool;

/// Threshold rules, evaluated in full. Several can fire for the same input;
/// a low normal rate yields both the caution and the urgent message.
const RULES: [(Predicate, &str); 5] = [
    (|shape, _| shape.normal_rate_pct >= 70.0, MSG_SHAPE_GOOD),
    (|shape, _| shape.normal_rate_pct < 70.0, MSG_SHAPE_CAUTION),
    (|_, daily| daily.days_with_records >= 5, MSG_FREQ_GOOD),
    (|_, daily| daily.days_with_records < 5, MSG_FREQ_SUGGESTION),
    (|shape, _| shape.normal_rate_pct < 50.0, MSG_URGENT),
];

pub fn advise(shape: &ShapeStats, daily: &DailyStats) -> Vec<String> {
    if shape.total == 0 {
        return vec![MSG_NO_RECORDS.to_string()];
    }

    RULES
        .into_iter()
        .filter(|(applies, _)| applies(shape, daily))
        .map(|(_, message)| message.to_string())
        .collect()
}

/// One-line summary for the week shown above the calendar: a record-count
/// clause followed by a shape clause, mirroring the stats thresholds.
pub fn weekly_summary(week_records: &[Record]) -> String {
    if week_records.is_empty() {
        return MSG_WEEK_EMPTY.to_string();
    }

    let total = week_records.len();
    let counts = ShapeStats::aggregate(week_records).counts;

    let mut message = String::from(if total >= 7 {
        "毎日記録できていますね！素晴らしいです。"
    } else if total >= 5 {
        "週5回以上記録できています。"
    } else {
        "記録回数が少なめです。"
    });

    if counts.normal > 0 && f64::from(counts.normal) >= total as f64 * 0.7 {
        message.push_str(" 形状も良好です！");
    } else if counts.hard > 0 || counts.soft > 0 {
        message.push_str(" 形状に変化があります。水分摂取や食事内容を見直してみてください。");
    } else if counts.watery > 0 {
        message.push_str(" 下痢気味のようです。体調管理に気をつけてください。");
    }

    message
}
