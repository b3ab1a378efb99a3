//! In-memory interaction history for one study session
//!
//! The log lives as long as the session that owns it. It is never written to
//! disk and is emptied only by an explicit [`SessionLog::clear`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::prompts::leading_chars;
use crate::records::{Flashcard, QuizItem, TaskKind};

/// Characters of the raw input kept in a history entry
pub const INPUT_PREVIEW_CHARS: usize = 100;
/// Characters of the output shown on a history line
pub const OUTPUT_PREVIEW_CHARS: usize = 100;

/// What an interaction produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HistoryOutput {
    Text(String),
    Quiz(Vec<QuizItem>),
    Flashcards(Vec<Flashcard>),
}

impl HistoryOutput {
    /// Flat text form used for previews
    pub fn preview_text(&self) -> String {
        match self {
            HistoryOutput::Text(text) => text.clone(),
            HistoryOutput::Quiz(items) => items
                .iter()
                .map(|item| item.question.as_str())
                .collect::<Vec<_>>()
                .join(" | "),
            HistoryOutput::Flashcards(cards) => cards
                .iter()
                .map(|card| format!("{}: {}", card.term, card.definition))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

/// One completed user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub kind: TaskKind,
    /// First 100 characters of the raw input
    pub input_preview: String,
    pub output: HistoryOutput,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(kind: TaskKind, raw_input: &str, output: HistoryOutput) -> Self {
        Self {
            kind,
            input_preview: leading_chars(raw_input, INPUT_PREVIEW_CHARS).to_string(),
            output,
            created_at: Utc::now(),
        }
    }

    /// `"{kind}: {input}... -> {output}..."`, both sides cut to 100 characters
    pub fn summary_line(&self) -> String {
        let output = self.output.preview_text();
        format!(
            "{}: {}... -> {}...",
            self.kind,
            self.input_preview,
            leading_chars(&output, OUTPUT_PREVIEW_CHARS)
        )
    }
}

/// Append-only ordered log of a session's interactions
#[derive(Debug, Default)]
pub struct SessionLog {
    entries: Vec<HistoryEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        debug!(kind = %entry.kind, "Appending history entry");
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        debug!(count = self.entries.len(), "Clearing session history");
        self.entries.clear();
    }

    /// Entries in insertion order
    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
