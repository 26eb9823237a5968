//! Day-by-day emotional trajectory with a fitted trend.

use std::collections::BTreeMap;

use sentira_types::emotion::EmotionLabel;
use sentira_types::interaction::InteractionLog;
use sentira_types::report::{DailyEmotionPoint, EmotionTally, TrajectoryAnalysis};

use super::trend::trend_of;

/// Group logs by calendar date, map each log's fine-grained emotion onto
/// the three-way label, and fit a trend over the daily positive ratios.
pub fn analyze_trajectory(logs: &[InteractionLog], window_days: i64) -> TrajectoryAnalysis {
    let mut days: BTreeMap<String, (EmotionTally, f64)> = BTreeMap::new();
    for log in logs {
        let date = log.timestamp.date_naive().to_string();
        let entry = days.entry(date).or_default();
        entry.0.bump(EmotionLabel::from_fine_grained(&log.emotion.emotion));
        entry.1 += log.detected_emotion.pleasure;
    }

    let daily_points: Vec<DailyEmotionPoint> = days
        .into_iter()
        .map(|(date, (tally, pleasure_sum))| {
            let samples = tally.total();
            DailyEmotionPoint {
                date,
                positive_ratio: tally.positive as f64 / samples as f64,
                average_pleasure: pleasure_sum / samples as f64,
                dominant_label: tally.dominant(),
                sample_count: samples,
            }
        })
        .collect();

    let ratios: Vec<f64> = daily_points.iter().map(|p| p.positive_ratio).collect();
    TrajectoryAnalysis {
        window_days,
        trend: trend_of(&ratios),
        daily_points,
    }
}
