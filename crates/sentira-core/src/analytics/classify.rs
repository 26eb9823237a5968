//! Classification of memories by emotion label, with co-occurring
//! time-of-day and entity patterns.

use chrono::{Datelike, Timelike};
use sentira_types::memory::MemoryEvent;
use sentira_types::report::{
    ClassificationStats, EmotionClassification, EmotionTally, MemoryPatterns,
};

const PEAK_HOUR_LIMIT: usize = 3;

/// Bucket memories into positive/negative/neutral lists and compute
/// summary ratios. Ratios are omitted when there is nothing to divide by.
pub fn classify_by_emotion(memories: Vec<MemoryEvent>) -> EmotionClassification {
    let patterns = memory_patterns(&memories);
    let mut positive = Vec::new();
    let mut negative = Vec::new();
    let mut neutral = Vec::new();
    for memory in memories {
        match memory.memory_type {
            sentira_types::emotion::EmotionLabel::Positive => positive.push(memory),
            sentira_types::emotion::EmotionLabel::Negative => negative.push(memory),
            sentira_types::emotion::EmotionLabel::Neutral => neutral.push(memory),
        }
    }
    let total = positive.len() + negative.len() + neutral.len();
    let ratio = |count: usize| {
        if total == 0 {
            None
        } else {
            Some(count as f64 / total as f64)
        }
    };
    let stats = ClassificationStats {
        total,
        positive_ratio: ratio(positive.len()),
        negative_ratio: ratio(negative.len()),
        neutral_ratio: ratio(neutral.len()),
    };
    EmotionClassification {
        positive,
        negative,
        neutral,
        stats,
        patterns,
    }
}

/// When memories form (hour of day, weekday) and which entities co-occur
/// with which outcomes.
pub fn memory_patterns(memories: &[MemoryEvent]) -> MemoryPatterns {
    let mut patterns = MemoryPatterns::default();

    let mut hour_counts = [0usize; 24];
    for memory in memories {
        hour_counts[memory.created_at.hour() as usize] += 1;

        let weekday = memory.created_at.weekday().to_string();
        *patterns.weekday_counts.entry(weekday).or_default() += 1;

        let entities = &memory.entities;
        for name in entities
            .persons
            .iter()
            .chain(&entities.locations)
            .chain(&entities.events)
            .chain(&entities.organizations)
        {
            patterns
                .emotion_triggers
                .entry(name.clone())
                .or_default()
                .bump(memory.memory_type);
        }
    }

    let mut hours: Vec<u32> = (0..24).filter(|&h| hour_counts[h as usize] > 0).collect();
    hours.sort_by_key(|&h| std::cmp::Reverse(hour_counts[h as usize]));
    hours.truncate(PEAK_HOUR_LIMIT);
    patterns.peak_hours = hours;

    patterns
}
