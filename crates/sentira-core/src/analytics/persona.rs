//! Relationship-strength scoring per mentioned person.

use std::collections::BTreeMap;

use sentira_types::memory::MemoryEvent;
use sentira_types::persona::Persona;
use sentira_types::report::{EmotionTally, PersonaInteractionAnalysis};

/// Tally every person name mentioned across memories' person entities and
/// score the relationship. Strength is mention frequency times (1 + the
/// share of positive mentions). Names without a stored persona record
/// still get an entry, just with no persona id attached.
pub fn analyze_personas(
    personas: &[Persona],
    memories: &[MemoryEvent],
) -> Vec<PersonaInteractionAnalysis> {
    let mut tallies: BTreeMap<&str, EmotionTally> = BTreeMap::new();
    for memory in memories {
        for person in &memory.entities.persons {
            tallies
                .entry(person.as_str())
                .or_default()
                .bump(memory.memory_type);
        }
    }

    let mut out = Vec::new();
    for (name, tally) in tallies {
        let mentions = tally.total();
        let positive_ratio = tally.positive as f64 / mentions as f64;
        let persona_id = personas.iter().find(|p| p.name == name).map(|p| p.id);
        out.push(PersonaInteractionAnalysis {
            persona_id,
            persona_name: name.to_string(),
            mention_count: mentions,
            positive_ratio,
            relationship_strength: mentions as f64 * (1.0 + positive_ratio),
            emotion_tally: tally,
        });
    }
    out.sort_by(|a, b| {
        b.relationship_strength
            .partial_cmp(&a.relationship_strength)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sentira_types::emotion::{EmotionCategory, EmotionLabel, PadValues};
    use sentira_types::memory::{EmotionAnnotation, EntityMap};
    use uuid::Uuid;

    fn persona(name: &str) -> Persona {
        let mut p = Persona::default_companion("u1");
        p.id = Uuid::now_v7();
        p.name = name.to_string();
        p
    }

    fn mention(person: &str, label: EmotionLabel) -> MemoryEvent {
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
            tags: vec![],
            entities: EntityMap {
                persons: vec![person.to_string()],
                ..EntityMap::default()
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_relationship_strength_formula() {
        let personas = vec![persona("Alice")];
        let memories = vec![
            mention("Alice", EmotionLabel::Positive),
            mention("Alice", EmotionLabel::Positive),
            mention("Alice", EmotionLabel::Positive),
            mention("Alice", EmotionLabel::Negative),
        ];
        let analysis = analyze_personas(&personas, &memories);
        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0].mention_count, 4);
        assert!((analysis[0].positive_ratio - 0.75).abs() < 1e-9);
        assert!((analysis[0].relationship_strength - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmentioned_personas_omitted() {
        let personas = vec![persona("Alice"), persona("Bob")];
        let memories = vec![mention("Alice", EmotionLabel::Neutral)];
        let analysis = analyze_personas(&personas, &memories);
        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0].persona_name, "Alice");
        assert_eq!(analysis[0].persona_id, Some(personas[0].id));
    }

    #[test]
    fn test_mentions_without_persona_record_still_counted() {
        let personas = vec![persona("Alice")];
        let memories = vec![
            mention("Alice", EmotionLabel::Positive),
            mention("Carol", EmotionLabel::Positive),
            mention("Carol", EmotionLabel::Neutral),
        ];
        let analysis = analyze_personas(&personas, &memories);
        assert_eq!(analysis.len(), 2);

        let carol = analysis.iter().find(|a| a.persona_name == "Carol").unwrap();
        assert_eq!(carol.persona_id, None);
        assert_eq!(carol.mention_count, 2);

        let alice = analysis.iter().find(|a| a.persona_name == "Alice").unwrap();
        assert_eq!(alice.persona_id, Some(personas[0].id));
    }

    #[test]
    fn test_sorted_by_strength() {
        let personas = vec![persona("Alice"), persona("Bob")];
        let memories = vec![
            mention("Alice", EmotionLabel::Neutral),
            mention("Bob", EmotionLabel::Positive),
            mention("Bob", EmotionLabel::Positive),
        ];
        let analysis = analyze_personas(&personas, &memories);
        assert_eq!(analysis[0].persona_name, "Bob");
        assert!((analysis[0].relationship_strength - 4.0).abs() < 1e-9);
        assert!((analysis[1].relationship_strength - 1.0).abs() < 1e-9);
    }
}
