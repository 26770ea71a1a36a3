//! Builds the chat requests for the two generation passes.
//!
//! Builders are pure: the same inputs always produce the same request.

use crate::generation::prompts::{
    COVER_LETTER_EXCERPT_CHARS, COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM,
    EMAIL_PROMPT_TEMPLATE, EMAIL_SYSTEM,
};
use crate::generation::tone::Tone;
use crate::llm_client::types::{ChatMessage, ChatRequest};

/// System + user messages for the cover letter pass, with the full resume and
/// job description embedded.
pub fn cover_letter_request(model: &str, resume_text: &str, job_description: &str) -> ChatRequest {
    let prompt = fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("{resume_text}", resume_text),
            ("{job_description}", job_description),
        ],
    );

    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(COVER_LETTER_SYSTEM),
            ChatMessage::user(prompt),
        ],
    }
}

/// System + user messages for the email pass. Only the opening of the cover
/// letter is sent as context.
pub fn email_request(model: &str, cover_letter: &str, tone: Tone) -> ChatRequest {
    let excerpt = excerpt(cover_letter, COVER_LETTER_EXCERPT_CHARS);
    let prompt = fill_template(
        EMAIL_PROMPT_TEMPLATE,
        &[
            ("{tone_instruction}", tone.instruction()),
            ("{cover_letter_excerpt}", excerpt),
        ],
    );

    ChatRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::system(EMAIL_SYSTEM), ChatMessage::user(prompt)],
    }
}

/// First `max_chars` characters of `text` (not bytes).
fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Substitutes `{placeholder}` markers in a single left-to-right pass, so
/// substituted values are never re-scanned for markers.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(marker, _)| tail.starts_with(marker)) {
            Some((marker, value)) => {
                out.push_str(value);
                rest = &tail[marker.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
