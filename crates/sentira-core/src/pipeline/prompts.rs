//! Prompt builders for each pipeline stage.
//!
//! Every structured prompt spells out the exact JSON shape expected back;
//! the extractor tolerates models that wrap it in prose anyway.

use sentira_types::interaction::InteractionLog;
use sentira_types::memory::MemoryEvent;
use sentira_types::persona::Persona;

pub(crate) const IMAGE_CAPTION_PROMPT: &str = "Describe what this image shows in two or three \
sentences. Mention the people, objects, setting, and any visible mood or activity. Reply with \
the description only.";

pub(crate) fn emotion_analysis(text: &str) -> String {
    format!(
        "Analyze the emotional content of the following message using the PAD model \
(pleasure, arousal, dominance, each between 0 and 1).\n\nMessage: {text}\n\n\
Respond with only a JSON object of this exact shape:\n\
{{\"pleasure\": 0.0, \"arousal\": 0.0, \"dominance\": 0.0, \"emotion\": \"happy\", \
\"intensity\": 0.0, \"confidence\": 0.0, \"detected_emotions\": [\"happy\"], \
\"reasoning\": \"one sentence\"}}"
    )
}

pub(crate) fn entity_extraction(text: &str) -> String {
    format!(
        "Extract named entities from the following message.\n\nMessage: {text}\n\n\
Respond with only a JSON object of this exact shape, using empty lists when nothing \
matches:\n{{\"persons\": [], \"locations\": [], \"time_expressions\": [], \
\"events\": [], \"organizations\": []}}"
    )
}

pub(crate) fn style_analysis(text: &str) -> String {
    format!(
        "Describe the communication style of the following message.\n\nMessage: {text}\n\n\
Respond with only a JSON object of this exact shape:\n\
{{\"communication_style\": \"casual\", \"tone\": \"warm\", \"formality\": \"informal\"}}"
    )
}

pub(crate) fn temporal_spatial(text: &str) -> String {
    format!(
        "List the time references and place references in the following message.\n\n\
Message: {text}\n\nRespond with only a JSON object of this exact shape, using empty \
lists when nothing matches:\n{{\"time_references\": [], \"place_references\": []}}"
    )
}

pub(crate) fn persona_inference(name: &str, text: &str) -> String {
    format!(
        "The person \"{name}\" is mentioned in the following message. Infer how they come \
across.\n\nMessage: {text}\n\nRespond with only a JSON object of this exact shape:\n\
{{\"description\": \"one sentence\", \"personality_traits\": [\"friendly\"], \
\"communication_style\": \"casual\", \"avatar_type\": \"friend\"}}"
    )
}

pub(crate) fn memory_summary(text: &str) -> String {
    format!(
        "Summarize the following message as a memory.\n\nMessage: {text}\n\n\
Respond with only a JSON object of this exact shape, where topic is a short phrase and \
importance is between 0 and 1:\n{{\"topic\": \"short phrase\", \"importance\": 0.5}}"
    )
}

/// System preamble for reply synthesis: who is speaking, what they quietly
/// remember, and how the conversation has gone so far.
pub(crate) fn reply_preamble(
    persona: &Persona,
    memories: &[&MemoryEvent],
    history: &[&InteractionLog],
) -> String {
    let mut out = format!(
        "You are {name}, {description}. Your personality traits: {traits}. \
Your communication style: {style}. Reply naturally in one or two short paragraphs, \
staying in character.",
        name = persona.name,
        description = persona.description,
        traits = persona.personality_traits.join(", "),
        style = persona.communication_style,
    );
    if !memories.is_empty() {
        out.push_str("\n\nThings you remember about this user (do not recite them verbatim):");
        for memory in memories {
            out.push_str("\n- ");
            out.push_str(&memory.linked_topic);
        }
    }
    if !history.is_empty() {
        out.push_str("\n\nRecent conversation, oldest first:");
        for log in history {
            out.push_str(&format!(
                "\n[{label}] user: {text}",
                label = log.emotion.label,
                text = log.raw_input.text,
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentira_types::persona::Persona;

    #[test]
    fn test_prompts_embed_input_text() {
        let text = "I met Alice in Paris";
        for prompt in [
            emotion_analysis(text),
            entity_extraction(text),
            style_analysis(text),
            temporal_spatial(text),
            memory_summary(text),
            persona_inference("Alice", text),
        ] {
            assert!(prompt.contains(text));
        }
    }

    #[test]
    fn test_reply_preamble_without_context() {
        let persona = Persona::default_companion("u1");
        let preamble = reply_preamble(&persona, &[], &[]);
        assert!(preamble.contains("Companion"));
        assert!(preamble.contains("friendly"));
        assert!(!preamble.contains("Recent conversation"));
        assert!(!preamble.contains("Things you remember"));
    }
}
