//! Distribution of memories across type, importance, tags, and weeks.

use chrono::Datelike;
use sentira_types::memory::MemoryEvent;
use sentira_types::report::{
    DistributionPatterns, EmotionPattern, EmotionTally, ImportanceTiers, MemoryDistribution,
};

const HIGH_IMPORTANCE: f64 = 0.7;
const MEDIUM_IMPORTANCE: f64 = 0.4;
const POSITIVE_PATTERN_FLOOR: f64 = 0.6;
const NEGATIVE_PATTERN_FLOOR: f64 = 0.4;
const TOP_THEME_LIMIT: usize = 3;

pub fn analyze_distribution(memories: &[MemoryEvent]) -> MemoryDistribution {
    let mut by_type = EmotionTally::default();
    let mut by_importance = ImportanceTiers::default();
    let mut by_tags = std::collections::BTreeMap::new();
    let mut by_week = std::collections::BTreeMap::new();

    for memory in memories {
        by_type.bump(memory.memory_type);

        if memory.importance_score >= HIGH_IMPORTANCE {
            by_importance.high += 1;
        } else if memory.importance_score >= MEDIUM_IMPORTANCE {
            by_importance.medium += 1;
        } else {
            by_importance.low += 1;
        }

        for tag in &memory.tags {
            *by_tags.entry(tag.clone()).or_insert(0usize) += 1;
        }

        let iso = memory.created_at.iso_week();
        let week = format!("{}-W{:02}", iso.year(), iso.week());
        *by_week.entry(week).or_insert(0usize) += 1;
    }

    let total = by_type.total();
    let emotion_pattern = if total == 0 {
        None
    } else {
        let positive_ratio = by_type.positive as f64 / total as f64;
        let negative_ratio = by_type.negative as f64 / total as f64;
        Some(if positive_ratio > POSITIVE_PATTERN_FLOOR {
            EmotionPattern::PredominantlyPositive
        } else if negative_ratio > NEGATIVE_PATTERN_FLOOR {
            EmotionPattern::ConcerningNegative
        } else {
            EmotionPattern::Balanced
        })
    };

    let mut ranked_tags: Vec<(&String, &usize)> = by_tags.iter().collect();
    ranked_tags.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let top_themes = ranked_tags
        .into_iter()
        .take(TOP_THEME_LIMIT)
        .map(|(tag, _)| tag.clone())
        .collect();

    MemoryDistribution {
        by_type,
        by_importance,
        by_tags,
        by_week,
        patterns: DistributionPatterns {
            emotion_pattern,
            top_themes,
        },
    }
}
