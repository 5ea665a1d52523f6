//! Persona prompt templates for reply generation

use crate::conversation::entities::Character;
use crate::conversation::turn::Turn;

const IM_START: &str = "<|im_start|>";
const IM_END: &str = "<|im_end|>";

/// Templates for turning a character and a transcript into model input
pub struct PersonaPrompt;

impl PersonaPrompt {
    /// Stop sequence for ChatML-style text generation
    pub const CHATML_STOP: &'static str = IM_END;

    /// System prompt that puts the model in character
    pub fn system(character: &Character) -> String {
        let description = character.description.trim();
        if description.is_empty() {
            format!("You are {}. Always stay in character.", character.name)
        } else {
            format!(
                "You are {}. {} Always stay in character.",
                character.name, description
            )
        }
    }

    /// Full ChatML prompt ending with an open assistant block.
    pub fn chatml(character: &Character, turns: &[Turn]) -> String {
        let mut prompt = format!("{IM_START}system\n{}\n{IM_END}\n", Self::system(character));

        for turn in turns {
            prompt.push_str(&format!(
                "{IM_START}{}\n{}{IM_END}\n",
                turn.role, turn.content
            ));
        }

        prompt.push_str(IM_START);
        prompt.push_str("assistant\n");
        prompt
    }

    /// Pull the generated reply out of a raw ChatML completion.
    ///
    /// Text-generation endpoints usually echo the prompt, so the reply is
    /// whatever follows the last assistant header, cut at the first end marker.
    pub fn extract_chatml_reply(output: &str) -> Option<String> {
        let header = format!("{IM_START}assistant\n");
        let tail = output.rsplit(header.as_str()).next().unwrap_or(output);
        let reply = tail.split(IM_END).next().unwrap_or(tail).trim();

        if reply.is_empty() {
            None
        } else {
            Some(reply.to_string())
        }
    }
}
