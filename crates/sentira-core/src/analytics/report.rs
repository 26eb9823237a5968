//! Period report assembly: fetch a window of records, run every analysis,
//! derive a summary, and render charts.

use chrono::{Duration, Utc};

use sentira_types::error::RepositoryError;
use sentira_types::interaction::InteractionLog;
use sentira_types::memory::MemoryEvent;
use sentira_types::persona::Persona;
use sentira_types::report::{
    EmotionClassification, EmotionPattern, EmotionTally, PeriodReport, PeriodType, ReportSummary,
    TrendLabel,
};

use crate::render::ChartRenderer;
use crate::repository::{InteractionRepository, MemoryRepository, PersonaRepository};

use super::classify::classify_by_emotion;
use super::distribution::analyze_distribution;
use super::pad::analyze_pad_trends;
use super::persona::analyze_personas;
use super::trajectory::analyze_trajectory;

const FETCH_LIMIT: u32 = 1000;
const STEADY_STABILITY_FLOOR: f64 = 0.8;
const HIGH_ACTIVITY_FLOOR: f64 = 5.0;
const LOW_ACTIVITY_CEILING: f64 = 2.0;

/// Read-only analytics over already-persisted state.
pub struct ReportEngine<S, R> {
    store: S,
    renderer: R,
}

impl<S, R> ReportEngine<S, R>
where
    S: InteractionRepository + MemoryRepository + PersonaRepository,
    R: ChartRenderer,
{
    pub fn new(store: S, renderer: R) -> Self {
        Self { store, renderer }
    }

    /// Classify a user's memories from the last `window_days` days.
    #[tracing::instrument(skip(self))]
    pub async fn classify_memories_by_emotion(
        &self,
        user_id: &str,
        window_days: i64,
    ) -> Result<EmotionClassification, RepositoryError> {
        let since = Utc::now() - Duration::days(window_days);
        let memories = self.store.memories_since(user_id, since, FETCH_LIMIT).await?;
        Ok(classify_by_emotion(memories))
    }

    #[tracing::instrument(skip(self))]
    pub async fn generate_report(
        &self,
        user_id: &str,
        period: PeriodType,
    ) -> Result<PeriodReport, RepositoryError> {
        let since = Utc::now() - Duration::days(period.days());
        let mut logs = self.store.logs_since(user_id, since, FETCH_LIMIT).await?;
        logs.reverse();
        let memories = self.store.memories_since(user_id, since, FETCH_LIMIT).await?;
        let personas = self.store.list_personas(user_id).await?;

        let mut report = assemble_report(user_id, period, &logs, &memories, &personas);
        report.charts = self.renderer.render_all(&report);
        Ok(report)
    }

    pub async fn generate_weekly_report(
        &self,
        user_id: &str,
    ) -> Result<PeriodReport, RepositoryError> {
        self.generate_report(user_id, PeriodType::Weekly).await
    }

    pub async fn generate_monthly_report(
        &self,
        user_id: &str,
    ) -> Result<PeriodReport, RepositoryError> {
        self.generate_report(user_id, PeriodType::Monthly).await
    }
}

/// Pure assembly over pre-fetched records. Logs must be ordered oldest
/// first. Charts are left empty for the renderer.
fn assemble_report(
    user_id: &str,
    period: PeriodType,
    logs: &[InteractionLog],
    memories: &[MemoryEvent],
    personas: &[Persona],
) -> PeriodReport {
    let trajectory = analyze_trajectory(logs, period.days());
    let distribution = analyze_distribution(memories);
    let memory_patterns = super::classify::memory_patterns(memories);
    let persona_analyses = analyze_personas(personas, memories);
    let pad_trends = analyze_pad_trends(logs);

    let mut log_tally = EmotionTally::default();
    for log in logs {
        log_tally.bump(sentira_types::emotion::EmotionLabel::from_fine_grained(
            &log.emotion.emotion,
        ));
    }

    let active_days: std::collections::BTreeSet<String> = logs
        .iter()
        .map(|l| l.timestamp.date_naive().to_string())
        .collect();
    let most_mentioned_person = persona_analyses
        .iter()
        .max_by_key(|p| p.mention_count)
        .map(|p| p.persona_name.clone());

    let mut insights = Vec::new();
    if logs.is_empty() {
        insights.push("No interactions were recorded in this period.".to_string());
    }
    match distribution.patterns.emotion_pattern {
        Some(EmotionPattern::PredominantlyPositive) => {
            insights.push("Memories this period were predominantly positive.".to_string());
        }
        Some(EmotionPattern::ConcerningNegative) => {
            insights.push("Negative memories were elevated this period.".to_string());
        }
        _ => {}
    }
    match trajectory.trend.label {
        TrendLabel::Improving => insights.push("Daily mood has been improving.".to_string()),
        TrendLabel::Declining => insights.push("Daily mood has been declining.".to_string()),
        _ => {}
    }
    if pad_trends.data_points > 0 && pad_trends.stability.pleasure >= STEADY_STABILITY_FLOOR {
        insights.push("Pleasure levels were steady across the period.".to_string());
    }
    if let Some(name) = &most_mentioned_person {
        insights.push(format!("{name} came up most often in memories."));
    }

    // Averaged over days with activity, not the period length.
    let average_daily_interactions = if active_days.is_empty() {
        0.0
    } else {
        logs.len() as f64 / active_days.len() as f64
    };
    if average_daily_interactions > HIGH_ACTIVITY_FLOOR {
        insights.push("Interaction activity was high this period.".to_string());
    } else if !logs.is_empty() && average_daily_interactions < LOW_ACTIVITY_CEILING {
        insights.push("Interaction activity was low this period.".to_string());
    }

    let summary = ReportSummary {
        active_days: active_days.len(),
        average_daily_interactions,
        dominant_emotion: log_tally.dominant(),
        most_mentioned_person,
        insights,
    };

    PeriodReport {
        user_id: user_id.to_string(),
        period,
        period_days: period.days(),
        generated_at: Utc::now(),
        interaction_count: logs.len(),
        memory_count: memories.len(),
        trajectory,
        distribution,
        memory_patterns,
        personas: persona_analyses,
        pad_trends,
        summary,
        charts: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sentira_types::emotion::{EmotionCategory, EmotionLabel, PadValues};
    use sentira_types::interaction::{InputModality, RawInput};
    use sentira_types::memory::{EmotionAnnotation, EntityMap};
    use serde_json::json;
    use uuid::Uuid;

    fn log(day: u32, emotion: &str, pleasure: f64) -> InteractionLog {
        InteractionLog {
            id: Uuid::now_v7(),
            user_id: "u1".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap(),
            input_type: InputModality::Text,
            detected_emotion: PadValues {
                pleasure,
                arousal: 0.5,
                dominance: 0.5,
            },
            emotion: EmotionCategory {
                emotion: emotion.to_string(),
                label: EmotionLabel::from_fine_grained(emotion),
                intensity: 0.5,
            },
            raw_input: RawInput {
                text: "hi".to_string(),
                image_description: None,
            },
            metadata: json!({}),
        }
    }

    fn memory(label: EmotionLabel, person: Option<&str>, day: u32) -> MemoryEvent {
        MemoryEvent {
            id: Uuid::now_v7(),
            user_id: "u1".to_string(),
            interaction_log_id: Uuid::now_v7(),
            emotion_annotation: EmotionAnnotation {
                pad_values: PadValues::neutral(),
                emotion_category: EmotionCategory::default(),
            },
            linked_topic: "topic".to_string(),
            memory_type: label,
            importance_score: 0.5,
            tags: vec![label.to_string()],
            entities: EntityMap {
                persons: person.into_iter().map(String::from).collect(),
                ..EntityMap::default()
            },
            created_at: Utc.with_ymd_and_hms(2026, 8, day, 9, 0, 0).unwrap(),
        }
    }

    fn persona(name: &str) -> Persona {
        let mut p = Persona::default_companion("u1");
        p.id = Uuid::now_v7();
        p.name = name.to_string();
        p
    }

    #[test]
    fn test_report_summary_counts() {
        let logs = vec![log(1, "happy", 0.8), log(1, "happy", 0.7), log(3, "sad", 0.2)];
        let memories = vec![
            memory(EmotionLabel::Positive, Some("Alice"), 1),
            memory(EmotionLabel::Positive, Some("Alice"), 2),
            memory(EmotionLabel::Negative, None, 3),
        ];
        let personas = vec![persona("Alice")];

        let report = assemble_report("u1", PeriodType::Weekly, &logs, &memories, &personas);
        assert_eq!(report.period_days, 7);
        assert_eq!(report.interaction_count, 3);
        assert!(report
            .summary
            .insights
            .iter()
            .any(|i| i.contains("activity was low")));
        assert_eq!(report.memory_count, 3);
        assert_eq!(report.summary.active_days, 2);
        assert!((report.summary.average_daily_interactions - 1.5).abs() < 1e-9);
        assert_eq!(report.summary.dominant_emotion, EmotionLabel::Positive);
        assert_eq!(report.summary.most_mentioned_person.as_deref(), Some("Alice"));
        assert_eq!(report.personas.len(), 1);
        assert!(report.charts.is_empty());
    }

    #[test]
    fn test_average_daily_uses_active_days() {
        // Three logs on two distinct days averages to 1.5, not 3/7.
        let logs = vec![log(4, "happy", 0.8), log(4, "content", 0.6), log(6, "sad", 0.3)];
        let report = assemble_report("u1", PeriodType::Weekly, &logs, &[], &[]);
        assert_eq!(report.summary.active_days, 2);
        assert!((report.summary.average_daily_interactions - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report_has_no_data_insight() {
        let report = assemble_report("u1", PeriodType::Monthly, &[], &[], &[]);
        assert_eq!(report.summary.active_days, 0);
        assert_eq!(report.trajectory.trend.label, TrendLabel::NoData);
        assert!(report
            .summary
            .insights
            .iter()
            .any(|i| i.contains("No interactions")));
        assert!(report.summary.most_mentioned_person.is_none());
    }

    #[test]
    fn test_positive_pattern_yields_insight() {
        let memories = vec![
            memory(EmotionLabel::Positive, None, 1),
            memory(EmotionLabel::Positive, None, 2),
            memory(EmotionLabel::Positive, None, 3),
        ];
        let report = assemble_report("u1", PeriodType::Weekly, &[], &memories, &[]);
        assert!(report
            .summary
            .insights
            .iter()
            .any(|i| i.contains("predominantly positive")));
    }
}
