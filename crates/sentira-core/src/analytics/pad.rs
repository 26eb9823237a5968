//! Per-dimension PAD trends, averages, and stability over a window.

use sentira_types::interaction::InteractionLog;
use sentira_types::report::{PadDimensions, PadTrendLabels, PadTrends, TrendLabel};

use super::trend::{population_stddev, trend_of};

/// Fit a trend per PAD dimension over logs ordered oldest first.
/// Stability is 1 minus the population standard deviation, so a constant
/// series scores exactly 1.
pub fn analyze_pad_trends(logs: &[InteractionLog]) -> PadTrends {
    if logs.is_empty() {
        return PadTrends {
            trends: PadTrendLabels {
                pleasure: TrendLabel::NoData,
                arousal: TrendLabel::NoData,
                dominance: TrendLabel::NoData,
            },
            averages: PadDimensions::default(),
            stability: PadDimensions::default(),
            data_points: 0,
        };
    }

    let pleasure: Vec<f64> = logs.iter().map(|l| l.detected_emotion.pleasure).collect();
    let arousal: Vec<f64> = logs.iter().map(|l| l.detected_emotion.arousal).collect();
    let dominance: Vec<f64> = logs.iter().map(|l| l.detected_emotion.dominance).collect();

    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;

    PadTrends {
        trends: PadTrendLabels {
            pleasure: trend_of(&pleasure).label,
            arousal: trend_of(&arousal).label,
            dominance: trend_of(&dominance).label,
        },
        averages: PadDimensions {
            pleasure: mean(&pleasure),
            arousal: mean(&arousal),
            dominance: mean(&dominance),
        },
        stability: PadDimensions {
            pleasure: 1.0 - population_stddev(&pleasure),
            arousal: 1.0 - population_stddev(&arousal),
            dominance: 1.0 - population_stddev(&dominance),
        },
        data_points: logs.len(),
    }
}
