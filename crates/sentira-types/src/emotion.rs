//! Affective state types built on the PAD (Pleasure-Arousal-Dominance) model.
//!
//! A [`PadValues`] triple plus a categorical [`EmotionCategory`] is the unit
//! of affect the pipeline derives from each interaction and the analytics
//! engine aggregates over time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// A PAD triple. Each dimension is a real value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PadValues {
    #[serde(default = "half")]
    pub pleasure: f64,
    #[serde(default = "half")]
    pub arousal: f64,
    #[serde(default = "half")]
    pub dominance: f64,
}

fn half() -> f64 {
    0.5
}

impl PadValues {
    /// The neutral midpoint (0.5, 0.5, 0.5), used as the extraction fallback.
    pub fn neutral() -> Self {
        Self {
            pleasure: 0.5,
            arousal: 0.5,
            dominance: 0.5,
        }
    }

    /// Clamp every dimension into [0, 1].
    pub fn clamped(self) -> Self {
        Self {
            pleasure: self.pleasure.clamp(0.0, 1.0),
            arousal: self.arousal.clamp(0.0, 1.0),
            dominance: self.dominance.clamp(0.0, 1.0),
        }
    }
}

/// The fixed three-way emotion polarity.
///
/// Doubles as the memory type on [`crate::memory::MemoryEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Positive,
    Negative,
    Neutral,
}

impl EmotionLabel {
    /// Map a fine-grained emotion name onto the three-way polarity.
    ///
    /// happy/excited/content/relaxed -> positive; sad/angry/anxious ->
    /// negative; anything else -> neutral.
    pub fn from_fine_grained(emotion: &str) -> Self {
        match emotion.to_lowercase().as_str() {
            "happy" | "excited" | "content" | "relaxed" => EmotionLabel::Positive,
            "sad" | "angry" | "anxious" => EmotionLabel::Negative,
            _ => EmotionLabel::Neutral,
        }
    }
}

impl Default for EmotionLabel {
    fn default() -> Self {
        EmotionLabel::Neutral
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmotionLabel::Positive => write!(f, "positive"),
            EmotionLabel::Negative => write!(f, "negative"),
            EmotionLabel::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for EmotionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(EmotionLabel::Positive),
            "negative" => Ok(EmotionLabel::Negative),
            "neutral" => Ok(EmotionLabel::Neutral),
            other => Err(format!("invalid emotion label: '{other}'")),
        }
    }
}

/// A categorical emotion judgment: a fine-grained name (e.g. "happy"),
/// its three-way polarity, and an intensity in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionCategory {
    #[serde(default = "neutral_name")]
    pub emotion: String,
    #[serde(default)]
    pub label: EmotionLabel,
    #[serde(default)]
    pub intensity: f64,
}

fn neutral_name() -> String {
    "neutral".to_string()
}

impl Default for EmotionCategory {
    fn default() -> Self {
        Self {
            emotion: "neutral".to_string(),
            label: EmotionLabel::Neutral,
            intensity: 0.0,
        }
    }
}

/// How an affect assessment was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    /// Parsed from a structured model response.
    Llm,
    /// Parsed from a multimodal (image-grounded) model response.
    MultimodalLlm,
    /// The model response was unusable; typed defaults were substituted.
    Fallback,
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMethod::Llm => write!(f, "llm"),
            AnalysisMethod::MultimodalLlm => write!(f, "multimodal_llm"),
            AnalysisMethod::Fallback => write!(f, "fallback"),
        }
    }
}

impl FromStr for AnalysisMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "llm" => Ok(AnalysisMethod::Llm),
            "multimodal_llm" => Ok(AnalysisMethod::MultimodalLlm),
            "fallback" => Ok(AnalysisMethod::Fallback),
            other => Err(format!("invalid analysis method: '{other}'")),
        }
    }
}

/// Full affect assessment for one interaction.
///
/// Callers detect degraded (fallback) assessments via `analysis_method`
/// and `confidence`, never via an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionAssessment {
    #[serde(default)]
    pub pad_values: PadValues,
    #[serde(default)]
    pub emotion_category: EmotionCategory,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub detected_emotions: Vec<String>,
    #[serde(default)]
    pub analysis_reasoning: Option<String>,
    #[serde(default = "fallback_method")]
    pub analysis_method: AnalysisMethod,
}

fn fallback_method() -> AnalysisMethod {
    AnalysisMethod::Fallback
}

impl EmotionAssessment {
    /// The neutral fallback: midpoint PAD, zero confidence, tagged fallback.
    pub fn fallback() -> Self {
        Self {
            pad_values: PadValues::neutral(),
            emotion_category: EmotionCategory::default(),
            confidence: 0.0,
            detected_emotions: Vec::new(),
            analysis_reasoning: None,
            analysis_method: AnalysisMethod::Fallback,
        }
    }

    /// Normalize a parsed assessment: clamp PAD and intensity into [0, 1].
    pub fn normalized(mut self) -> Self {
        self.pad_values = self.pad_values.clamped();
        self.emotion_category.intensity = self.emotion_category.intensity.clamp(0.0, 1.0);
        self.confidence = self.confidence.clamp(0.0, 1.0);
        self
    }
}

/// Persisted affect assessment. Exactly one row per interaction log,
/// written in the same pipeline stage that writes the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionAnalysisRecord {
    pub id: Uuid,
    pub interaction_log_id: Uuid,
    pub pad_values: PadValues,
    pub emotion_category: EmotionCategory,
    pub confidence: f64,
    pub analysis_method: AnalysisMethod,
    pub created_at: DateTime<Utc>,
}

impl EmotionAnalysisRecord {
    pub fn from_assessment(interaction_log_id: Uuid, assessment: &EmotionAssessment) -> Self {
        Self {
            id: Uuid::now_v7(),
            interaction_log_id,
            pad_values: assessment.pad_values,
            emotion_category: assessment.emotion_category.clone(),
            confidence: assessment.confidence,
            analysis_method: assessment.analysis_method,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_label_roundtrip() {
        for label in [
            EmotionLabel::Positive,
            EmotionLabel::Negative,
            EmotionLabel::Neutral,
        ] {
            let s = label.to_string();
            let parsed: EmotionLabel = s.parse().unwrap();
            assert_eq!(label, parsed);
        }
    }

    #[test]
    fn test_emotion_label_serde() {
        let json = serde_json::to_string(&EmotionLabel::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        let parsed: EmotionLabel = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(parsed, EmotionLabel::Negative);
    }

    #[test]
    fn test_fine_grained_mapping() {
        assert_eq!(EmotionLabel::from_fine_grained("happy"), EmotionLabel::Positive);
        assert_eq!(EmotionLabel::from_fine_grained("Excited"), EmotionLabel::Positive);
        assert_eq!(EmotionLabel::from_fine_grained("sad"), EmotionLabel::Negative);
        assert_eq!(EmotionLabel::from_fine_grained("anxious"), EmotionLabel::Negative);
        assert_eq!(EmotionLabel::from_fine_grained("calm"), EmotionLabel::Neutral);
        assert_eq!(EmotionLabel::from_fine_grained(""), EmotionLabel::Neutral);
    }

    #[test]
    fn test_pad_clamp() {
        let pad = PadValues {
            pleasure: 1.7,
            arousal: -0.2,
            dominance: 0.4,
        }
        .clamped();
        assert_eq!(pad.pleasure, 1.0);
        assert_eq!(pad.arousal, 0.0);
        assert_eq!(pad.dominance, 0.4);
    }

    #[test]
    fn test_pad_partial_deserialize_defaults_to_midpoint() {
        let pad: PadValues = serde_json::from_str(r#"{"pleasure": 0.9}"#).unwrap();
        assert_eq!(pad.pleasure, 0.9);
        assert_eq!(pad.arousal, 0.5);
        assert_eq!(pad.dominance, 0.5);
    }

    #[test]
    fn test_assessment_fallback_is_tagged() {
        let a = EmotionAssessment::fallback();
        assert_eq!(a.analysis_method, AnalysisMethod::Fallback);
        assert_eq!(a.confidence, 0.0);
        assert_eq!(a.pad_values, PadValues::neutral());
    }

    #[test]
    fn test_assessment_normalized_clamps() {
        let mut a = EmotionAssessment::fallback();
        a.pad_values.pleasure = 3.0;
        a.emotion_category.intensity = -1.0;
        a.confidence = 1.5;
        let a = a.normalized();
        assert_eq!(a.pad_values.pleasure, 1.0);
        assert_eq!(a.emotion_category.intensity, 0.0);
        assert_eq!(a.confidence, 1.0);
    }

    #[test]
    fn test_analysis_method_roundtrip() {
        for m in [
            AnalysisMethod::Llm,
            AnalysisMethod::MultimodalLlm,
            AnalysisMethod::Fallback,
        ] {
            let parsed: AnalysisMethod = m.to_string().parse().unwrap();
            assert_eq!(m, parsed);
        }
    }
}
