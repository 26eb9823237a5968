//! The interaction pipeline: a strictly ordered sequence of stages that
//! turns one raw user input into persisted affect, entity, persona, and
//! memory records plus a synthesized reply.
//!
//! Transport failures abort the whole invocation. Shape failures at any
//! extraction stage degrade to that stage's typed default and the run
//! continues; callers detect degradation via the analysis method tag.

mod prompts;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use sentira_types::emotion::{
    AnalysisMethod, EmotionAnalysisRecord, EmotionAssessment, EmotionCategory, EmotionLabel,
    PadValues,
};
use sentira_types::error::PipelineError;
use sentira_types::interaction::{
    InteractionLog, InteractionOutcome, InteractionRequest, RawInput, ReplyOutcome, SpeakerPersona,
};
use sentira_types::llm::ChatMessage;
use sentira_types::memory::{EmotionAnnotation, EntityMap, MemoryEvent};
use sentira_types::persona::{EmotionalTendencies, Persona};

use crate::llm::{extract_json, ChatClient, Extracted};
use crate::repository::{
    InteractionRepository, MemoryRepository, PersonaRepository, PersonaUpsert, UserRepository,
};

const ANALYSIS_TEMPERATURE: f64 = 0.2;
const REPLY_TEMPERATURE: f64 = 0.7;
const CAPTION_TEMPERATURE: f64 = 0.5;
const ANALYSIS_MAX_TOKENS: u32 = 500;
const REPLY_MAX_TOKENS: u32 = 800;
const CAPTION_MAX_TOKENS: u32 = 300;

const MEMORY_CONTEXT_FETCH: u32 = 20;
const MEMORY_CONTEXT_LIMIT: usize = 3;
const MEMORY_IMPORTANCE_FLOOR: f64 = 0.7;
const HISTORY_LIMIT: u32 = 5;

/// Flat emotion shape the model is asked to produce.
#[derive(Debug, Deserialize)]
struct EmotionWire {
    #[serde(default = "half")]
    pleasure: f64,
    #[serde(default = "half")]
    arousal: f64,
    #[serde(default = "half")]
    dominance: f64,
    #[serde(default)]
    emotion: String,
    #[serde(default)]
    intensity: f64,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    detected_emotions: Vec<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

fn half() -> f64 {
    0.5
}

impl Default for EmotionWire {
    fn default() -> Self {
        Self {
            pleasure: 0.5,
            arousal: 0.5,
            dominance: 0.5,
            emotion: String::new(),
            intensity: 0.0,
            confidence: 0.0,
            detected_emotions: Vec::new(),
            reasoning: None,
        }
    }
}

impl EmotionWire {
    fn into_assessment(self, method: AnalysisMethod) -> EmotionAssessment {
        let emotion = if self.emotion.is_empty() {
            "neutral".to_string()
        } else {
            self.emotion
        };
        let label = EmotionLabel::from_fine_grained(&emotion);
        EmotionAssessment {
            pad_values: PadValues {
                pleasure: self.pleasure,
                arousal: self.arousal,
                dominance: self.dominance,
            },
            emotion_category: EmotionCategory {
                emotion,
                label,
                intensity: self.intensity,
            },
            confidence: self.confidence,
            detected_emotions: self.detected_emotions,
            analysis_reasoning: self.reasoning,
            analysis_method: method,
        }
        .normalized()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StyleProfile {
    #[serde(default)]
    communication_style: Option<String>,
    #[serde(default)]
    tone: Option<String>,
    #[serde(default)]
    formality: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TemporalSpatial {
    #[serde(default)]
    time_references: Vec<String>,
    #[serde(default)]
    place_references: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PersonaWire {
    #[serde(default)]
    description: String,
    #[serde(default)]
    personality_traits: Vec<String>,
    #[serde(default)]
    communication_style: String,
    #[serde(default)]
    avatar_type: String,
}

impl PersonaWire {
    fn into_persona(self, user_id: &str, name: &str) -> Persona {
        let now = Utc::now();
        Persona {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            description: if self.description.is_empty() {
                "Mentioned in conversation".to_string()
            } else {
                self.description
            },
            personality_traits: if self.personality_traits.is_empty() {
                vec!["friendly".to_string()]
            } else {
                self.personality_traits
            },
            communication_style: if self.communication_style.is_empty() {
                "casual".to_string()
            } else {
                self.communication_style
            },
            emotional_tendencies: EmotionalTendencies::default(),
            avatar_type: if self.avatar_type.is_empty() {
                "friend".to_string()
            } else {
                self.avatar_type
            },
            interaction_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MemoryWire {
    #[serde(default)]
    topic: String,
    #[serde(default = "half")]
    importance: f64,
}

impl Default for MemoryWire {
    fn default() -> Self {
        Self {
            topic: String::new(),
            importance: 0.5,
        }
    }
}

/// Runs the interaction stages against a chat backend and a store.
pub struct InteractionPipeline<C, S> {
    client: C,
    store: S,
}

impl<C, S> InteractionPipeline<C, S>
where
    C: ChatClient,
    S: UserRepository + InteractionRepository + PersonaRepository + MemoryRepository,
{
    pub fn new(client: C, store: S) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Process one interaction end to end.
    #[tracing::instrument(skip_all, fields(user_id = %request.user_id, input_type = %request.input_type))]
    pub async fn process(
        &self,
        request: InteractionRequest,
    ) -> Result<InteractionOutcome, PipelineError> {
        // Stage 1: user and default persona bootstrap.
        self.store.ensure_profile(&request.user_id).await?;
        let default_persona = self
            .store
            .create_if_absent(&Persona::default_companion(&request.user_id))
            .await?
            .into_persona();

        // Stage 2: optional image grounding.
        let mut text = request.text.clone();
        let mut image_description = None;
        if let Some(image) = &request.image {
            let caption = self
                .client
                .chat_with_image(
                    prompts::IMAGE_CAPTION_PROMPT,
                    image,
                    CAPTION_TEMPERATURE,
                    CAPTION_MAX_TOKENS,
                )
                .await?
                .content;
            text = format!("{text}\n[Provided image: {caption}]");
            image_description = Some(caption);
        }

        // Stage 3: emotion analysis, then persist the log and its analysis.
        let method = if request.image.is_some() {
            AnalysisMethod::MultimodalLlm
        } else {
            AnalysisMethod::Llm
        };
        let assessment = self.analyze_emotion(&text, method).await?;

        let log = InteractionLog {
            id: Uuid::now_v7(),
            user_id: request.user_id.clone(),
            timestamp: Utc::now(),
            input_type: request.input_type,
            detected_emotion: assessment.pad_values,
            emotion: assessment.emotion_category.clone(),
            raw_input: RawInput {
                text: request.text.clone(),
                image_description,
            },
            metadata: json!({}),
        };
        self.store.insert_log(&log).await?;
        self.store
            .insert_analysis(&EmotionAnalysisRecord::from_assessment(log.id, &assessment))
            .await?;

        // Stage 4: entity extraction.
        let entities = self.extract_entities(&text).await?;

        // Stage 5: style and temporal/spatial context.
        let style = self.analyze_style(&text).await?;
        let temporal_spatial = self.extract_temporal_spatial(&text).await?;

        // Stage 6: persona materialization.
        let (new_personas, updated_personas) =
            self.materialize_personas(&request.user_id, &entities, &text).await?;

        // Stage 7: memory materialization.
        let memory = self
            .materialize_memory(&request.user_id, &log, &assessment, &entities, &text)
            .await?;

        // Stage 8: reply synthesis.
        let reply = self
            .synthesize_reply(&request, &default_persona, &log, &style, &temporal_spatial, &text)
            .await?;

        Ok(InteractionOutcome {
            interaction_log_id: log.id,
            pad_analysis: assessment,
            entities,
            new_personas,
            updated_personas,
            memory,
            reply,
            timestamp: log.timestamp,
        })
    }

    async fn analyze_emotion(
        &self,
        text: &str,
        method: AnalysisMethod,
    ) -> Result<EmotionAssessment, PipelineError> {
        let outcome = self
            .client
            .chat(
                &[ChatMessage::user(prompts::emotion_analysis(text))],
                ANALYSIS_TEMPERATURE,
                ANALYSIS_MAX_TOKENS,
            )
            .await?;
        let extracted: Extracted<EmotionWire> = extract_json(&outcome.content);
        if extracted.degraded {
            return Ok(EmotionAssessment::fallback());
        }
        Ok(extracted.value.into_assessment(method))
    }

    async fn extract_entities(&self, text: &str) -> Result<EntityMap, PipelineError> {
        let outcome = self
            .client
            .chat(
                &[ChatMessage::user(prompts::entity_extraction(text))],
                ANALYSIS_TEMPERATURE,
                ANALYSIS_MAX_TOKENS,
            )
            .await?;
        let extracted: Extracted<EntityMap> = extract_json(&outcome.content);
        Ok(extracted.value)
    }

    async fn analyze_style(&self, text: &str) -> Result<StyleProfile, PipelineError> {
        let outcome = self
            .client
            .chat(
                &[ChatMessage::user(prompts::style_analysis(text))],
                ANALYSIS_TEMPERATURE,
                ANALYSIS_MAX_TOKENS,
            )
            .await?;
        let extracted: Extracted<StyleProfile> = extract_json(&outcome.content);
        Ok(extracted.value)
    }

    async fn extract_temporal_spatial(&self, text: &str) -> Result<TemporalSpatial, PipelineError> {
        let outcome = self
            .client
            .chat(
                &[ChatMessage::user(prompts::temporal_spatial(text))],
                ANALYSIS_TEMPERATURE,
                ANALYSIS_MAX_TOKENS,
            )
            .await?;
        let extracted: Extracted<TemporalSpatial> = extract_json(&outcome.content);
        Ok(extracted.value)
    }

    /// New names get one inference call each; names already stored are
    /// returned touched, not mutated, with no model call.
    async fn materialize_personas(
        &self,
        user_id: &str,
        entities: &EntityMap,
        text: &str,
    ) -> Result<(Vec<Persona>, Vec<Persona>), PipelineError> {
        let mut created = Vec::new();
        let mut touched = Vec::new();
        for name in &entities.persons {
            if let Some(existing) = self.store.find_by_name(user_id, name).await? {
                touched.push(existing);
                continue;
            }
            let outcome = self
                .client
                .chat(
                    &[ChatMessage::user(prompts::persona_inference(name, text))],
                    ANALYSIS_TEMPERATURE,
                    ANALYSIS_MAX_TOKENS,
                )
                .await?;
            let extracted: Extracted<PersonaWire> = extract_json(&outcome.content);
            let persona = extracted.value.into_persona(user_id, name);
            match self.store.create_if_absent(&persona).await? {
                PersonaUpsert::Created(p) => created.push(p),
                // Lost a race with a concurrent run; treat as touched.
                PersonaUpsert::Existing(p) => touched.push(p),
            }
        }
        Ok((created, touched))
    }

    async fn materialize_memory(
        &self,
        user_id: &str,
        log: &InteractionLog,
        assessment: &EmotionAssessment,
        entities: &EntityMap,
        text: &str,
    ) -> Result<MemoryEvent, PipelineError> {
        let outcome = self
            .client
            .chat(
                &[ChatMessage::user(prompts::memory_summary(text))],
                ANALYSIS_TEMPERATURE,
                ANALYSIS_MAX_TOKENS,
            )
            .await?;
        let extracted: Extracted<MemoryWire> = extract_json(&outcome.content);
        let wire = extracted.value;
        let memory = MemoryEvent {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            interaction_log_id: log.id,
            emotion_annotation: EmotionAnnotation {
                pad_values: assessment.pad_values,
                emotion_category: assessment.emotion_category.clone(),
            },
            linked_topic: if wire.topic.is_empty() {
                "general".to_string()
            } else {
                wire.topic
            },
            memory_type: assessment.emotion_category.label,
            importance_score: MemoryEvent::clamp_importance(wire.importance),
            tags: vec![assessment.emotion_category.label.to_string()],
            entities: entities.clone(),
            created_at: Utc::now(),
        };
        self.store.insert_memory(&memory).await?;
        Ok(memory)
    }

    async fn synthesize_reply(
        &self,
        request: &InteractionRequest,
        default_persona: &Persona,
        log: &InteractionLog,
        style: &StyleProfile,
        temporal_spatial: &TemporalSpatial,
        text: &str,
    ) -> Result<ReplyOutcome, PipelineError> {
        let speaker = match request.persona_id {
            Some(id) => self
                .store
                .get_persona(id)
                .await?
                .unwrap_or_else(|| default_persona.clone()),
            None => default_persona.clone(),
        };

        let recent = self
            .store
            .recent_memories(&request.user_id, MEMORY_CONTEXT_FETCH)
            .await?;
        let context_memories: Vec<&MemoryEvent> = recent
            .iter()
            .filter(|m| m.importance_score >= MEMORY_IMPORTANCE_FLOOR)
            .take(MEMORY_CONTEXT_LIMIT)
            .collect();

        let mut history = self
            .store
            .recent_logs(&request.user_id, HISTORY_LIMIT)
            .await?;
        history.reverse();
        let history_refs: Vec<&InteractionLog> = history.iter().collect();

        let preamble = prompts::reply_preamble(&speaker, &context_memories, &history_refs);
        let outcome = self
            .client
            .chat(
                &[ChatMessage::system(preamble), ChatMessage::user(text)],
                REPLY_TEMPERATURE,
                REPLY_MAX_TOKENS,
            )
            .await?;

        let patch = json!({
            "assistant_reply": outcome.content,
            "speaker_persona": {
                "persona_id": speaker.id,
                "name": speaker.name,
                "avatar_type": speaker.avatar_type,
            },
            "style": style,
            "temporal_spatial": temporal_spatial,
        });
        self.store.patch_metadata(log.id, &patch).await?;
        self.store.increment_interaction_count(speaker.id).await?;

        Ok(ReplyOutcome {
            reply: outcome.content,
            speaker: SpeakerPersona {
                persona_id: speaker.id,
                name: speaker.name,
                avatar_type: speaker.avatar_type,
            },
            used_memories: context_memories.iter().map(|m| m.id).collect(),
            raw_response: outcome.raw,
        })
    }
}
