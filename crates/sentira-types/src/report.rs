//! Analytics output shapes: classifications, trends, distributions, and
//! the periodic report envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::BTreeMap;
use std::fmt;

use crate::emotion::EmotionLabel;
use crate::memory::MemoryEvent;

/// Counts per three-way emotion label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionTally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl EmotionTally {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    pub fn bump(&mut self, label: EmotionLabel) {
        match label {
            EmotionLabel::Positive => self.positive += 1,
            EmotionLabel::Negative => self.negative += 1,
            EmotionLabel::Neutral => self.neutral += 1,
        }
    }

    /// Which label dominates. Ties resolve positive, then negative.
    pub fn dominant(&self) -> EmotionLabel {
        if self.positive >= self.negative && self.positive >= self.neutral {
            EmotionLabel::Positive
        } else if self.negative >= self.neutral {
            EmotionLabel::Negative
        } else {
            EmotionLabel::Neutral
        }
    }
}

/// Memories grouped by their three-way label, with summary ratios and
/// co-occurring time/entity patterns.
#[derive(Debug, Clone, Serialize)]
pub struct EmotionClassification {
    pub positive: Vec<MemoryEvent>,
    pub negative: Vec<MemoryEvent>,
    pub neutral: Vec<MemoryEvent>,
    pub stats: ClassificationStats,
    pub patterns: MemoryPatterns,
}

/// Ratios are `None` when there are no memories to divide by.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationStats {
    pub total: usize,
    pub positive_ratio: Option<f64>,
    pub negative_ratio: Option<f64>,
    pub neutral_ratio: Option<f64>,
}

/// Recurring structure in when and why memories form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryPatterns {
    /// Hours of day (0-23) with the most memory formation, most active first.
    pub peak_hours: Vec<u32>,
    /// Memory counts keyed by weekday name (Monday..Sunday).
    pub weekday_counts: BTreeMap<String, usize>,
    /// Per-entity emotion tallies across memories that mention the entity.
    pub emotion_triggers: BTreeMap<String, EmotionTally>,
}

/// Average PAD pleasure and dominant label for one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyEmotionPoint {
    pub date: String,
    pub positive_ratio: f64,
    pub average_pleasure: f64,
    pub dominant_label: EmotionLabel,
    pub sample_count: usize,
}

/// Direction of a fitted trend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Improving,
    Declining,
    Stable,
    InsufficientData,
    NoData,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendLabel::Improving => write!(f, "improving"),
            TrendLabel::Declining => write!(f, "declining"),
            TrendLabel::Stable => write!(f, "stable"),
            TrendLabel::InsufficientData => write!(f, "insufficient_data"),
            TrendLabel::NoData => write!(f, "no_data"),
        }
    }
}

/// Least-squares slope over ordinal day index, plus its label. Strength
/// is the slope magnitude.
#[derive(Debug, Clone, Serialize)]
pub struct TrendAnalysis {
    pub label: TrendLabel,
    pub slope: Option<f64>,
    pub strength: Option<f64>,
}

/// Day-by-day emotional trajectory over a window.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryAnalysis {
    pub window_days: i64,
    pub daily_points: Vec<DailyEmotionPoint>,
    pub trend: TrendAnalysis,
}

/// Memory counts split into importance tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportanceTiers {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Dominant emotional pattern across a memory set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionPattern {
    PredominantlyPositive,
    ConcerningNegative,
    Balanced,
}

/// Cross-cutting patterns found while computing a distribution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistributionPatterns {
    pub emotion_pattern: Option<EmotionPattern>,
    /// Up to three most frequent tags.
    pub top_themes: Vec<String>,
}

/// How a user's memories spread across type, importance, tags, and time.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryDistribution {
    pub by_type: EmotionTally,
    pub by_importance: ImportanceTiers,
    pub by_tags: BTreeMap<String, usize>,
    /// Counts keyed by ISO week, e.g. "2026-W35".
    pub by_week: BTreeMap<String, usize>,
    pub patterns: DistributionPatterns,
}

/// Interaction analysis for one mentioned person. `persona_id` is absent
/// when the name has no stored persona record.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaInteractionAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<Uuid>,
    pub persona_name: String,
    pub mention_count: usize,
    pub emotion_tally: EmotionTally,
    pub positive_ratio: f64,
    /// interaction frequency times (1 + positive ratio).
    pub relationship_strength: f64,
}

/// One value per PAD dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PadDimensions {
    pub pleasure: f64,
    pub arousal: f64,
    pub dominance: f64,
}

/// One trend label per PAD dimension.
#[derive(Debug, Clone, Serialize)]
pub struct PadTrendLabels {
    pub pleasure: TrendLabel,
    pub arousal: TrendLabel,
    pub dominance: TrendLabel,
}

/// Per-dimension PAD trends over a window, with averages and stability
/// (1 minus population standard deviation, not clamped).
#[derive(Debug, Clone, Serialize)]
pub struct PadTrends {
    pub trends: PadTrendLabels,
    pub averages: PadDimensions,
    pub stability: PadDimensions,
    pub data_points: usize,
}

/// Narrative summary attached to a period report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub active_days: usize,
    pub average_daily_interactions: f64,
    pub dominant_emotion: EmotionLabel,
    pub most_mentioned_person: Option<String>,
    pub insights: Vec<String>,
}

/// Reporting period granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Weekly,
    Monthly,
}

impl PeriodType {
    pub fn days(&self) -> i64 {
        match self {
            PeriodType::Weekly => 7,
            PeriodType::Monthly => 30,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodType::Weekly => write!(f, "weekly"),
            PeriodType::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(PeriodType::Weekly),
            "monthly" => Ok(PeriodType::Monthly),
            other => Err(format!("invalid period type: '{other}'")),
        }
    }
}

/// Full analytics report over one period.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub user_id: String,
    pub period: PeriodType,
    pub period_days: i64,
    pub generated_at: DateTime<Utc>,
    pub interaction_count: usize,
    pub memory_count: usize,
    pub trajectory: TrajectoryAnalysis,
    pub distribution: MemoryDistribution,
    pub memory_patterns: MemoryPatterns,
    pub personas: Vec<PersonaInteractionAnalysis>,
    pub pad_trends: PadTrends,
    pub summary: ReportSummary,
    pub charts: Vec<RenderedChart>,
}

/// High-level usage numbers for one user.
#[derive(Debug, Clone, Serialize)]
pub struct UserStatistics {
    pub user_id: String,
    pub interaction_count: i64,
    pub interactions_last_7_days: i64,
    pub memory_count: i64,
    pub memory_type_distribution: EmotionTally,
    pub persona_count: i64,
    pub first_interaction: Option<DateTime<Utc>>,
    pub last_interaction: Option<DateTime<Utc>>,
}

/// Chart families a renderer can produce for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    EmotionTrajectory,
    MemoryDistribution,
    WeekdayActivity,
    PersonaStrength,
    PadTrends,
}

/// A rendered chart as a base64-encoded PNG.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub png_base64: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_bump_and_total() {
        let mut tally = EmotionTally::default();
        tally.bump(EmotionLabel::Positive);
        tally.bump(EmotionLabel::Positive);
        tally.bump(EmotionLabel::Negative);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.dominant(), EmotionLabel::Positive);
    }

    #[test]
    fn test_tally_dominant_tie_prefers_positive() {
        let tally = EmotionTally {
            positive: 2,
            negative: 2,
            neutral: 2,
        };
        assert_eq!(tally.dominant(), EmotionLabel::Positive);
    }

    #[test]
    fn test_period_days() {
        assert_eq!(PeriodType::Weekly.days(), 7);
        assert_eq!(PeriodType::Monthly.days(), 30);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Weekly".parse::<PeriodType>().unwrap(), PeriodType::Weekly);
        assert!("daily".parse::<PeriodType>().is_err());
    }

    #[test]
    fn test_trend_label_serializes_snake_case() {
        let json = serde_json::to_string(&TrendLabel::InsufficientData).unwrap();
        assert_eq!(json, r#""insufficient_data""#);
    }
}
