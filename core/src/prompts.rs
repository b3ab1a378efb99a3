//! Prompt templates for each study task.
//!
//! Every builder is a pure function producing the single prompt string sent to
//! the generation endpoint.

/// Only this many characters of the source text are quoted in a quiz prompt.
pub const QUIZ_SOURCE_CHARS: usize = 200;

pub fn explain(topic: &str, context: &str) -> String {
    format!("Explain {} in simple terms: {}", topic, context)
}

pub fn summarize(notes: &str) -> String {
    format!("Summarize the following text: {}", notes)
}

pub fn quiz_prompt(source_text: &str) -> String {
    format!(
        "Generate a multiple-choice question with 4 options based on: {}... Format: Question? A) Option1 B) Option2 C) Option3 D) Option4 Correct: A",
        leading_chars(source_text, QUIZ_SOURCE_CHARS)
    )
}

/// `summarized_text` is the output of a previous [`summarize`] call, not the raw source.
pub fn flashcard_prompt(summarized_text: &str, count: usize) -> String {
    format!(
        "Extract {} term-definition pairs from: {} Format: Term: Definition",
        count, summarized_text
    )
}

pub fn quiz_prompt_json(source_text: &str) -> String {
    format!(
        "Generate one multiple-choice question with exactly 4 options based on: {}... \
         Respond only with a JSON object of the form \
         {{\"question\": \"...\", \"options\": [\"...\", \"...\", \"...\", \"...\"], \"correct\": \"A\"}}",
        leading_chars(source_text, QUIZ_SOURCE_CHARS)
    )
}

pub fn flashcard_prompt_json(summarized_text: &str, count: usize) -> String {
    format!(
        "Extract {} term-definition pairs from: {} \
         Respond only with a JSON array of the form [{{\"term\": \"...\", \"definition\": \"...\"}}]",
        count, summarized_text
    )
}

/// First `n` characters of `text` (not bytes).
pub fn leading_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
