//! Extraction of quiz items and flashcards from generated text.
//!
//! [`MarkerParser`] reproduces the literal-marker format the prompts ask for.
//! [`JsonParser`] asks the model for JSON instead. Both sit behind
//! [`ResponseParser`], which also owns the prompt templates each format needs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::debug;

use crate::errors::StudyError;
use crate::prompts;
use crate::records::{Flashcard, QuizItem};

pub const CORRECT_MARKER: &str = "Correct:";
pub const TERM_MARKER: &str = "Term:";
const FIRST_OPTION_LABEL: &str = "A)";
const LATER_OPTION_LABELS: [&str; 3] = ["B)", "C)", "D)"];

/// Turns generated text into structured study records.
///
/// Parsing never fails: output that ignores the requested format degrades to
/// the placeholder quiz item or to fewer flashcards.
pub trait ResponseParser: Send + Sync + Debug {
    fn quiz_prompt(&self, source_text: &str) -> String;

    fn flashcard_prompt(&self, summarized_text: &str, count: usize) -> String;

    /// Format hint forwarded with quiz and flashcard requests.
    fn response_format(&self) -> Option<&'static str> {
        None
    }

    fn parse_quiz(&self, raw_text: &str) -> QuizItem;

    fn parse_flashcards(&self, raw_text: &str, max_count: usize) -> Vec<Flashcard>;
}

/// Which parser the service uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserMode {
    #[default]
    Markers,
    Json,
}

impl ParserMode {
    pub fn build(self) -> Box<dyn ResponseParser> {
        match self {
            ParserMode::Markers => Box::new(MarkerParser),
            ParserMode::Json => Box::new(JsonParser),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParserMode::Markers => "markers",
            ParserMode::Json => "json",
        }
    }
}

impl FromStr for ParserMode {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markers" | "marker" | "text" => Ok(ParserMode::Markers),
            "json" => Ok(ParserMode::Json),
            other => Err(StudyError::Config(format!(
                "Unknown parser mode '{}', expected 'markers' or 'json'",
                other
            ))),
        }
    }
}

/// Literal substring-marker parser
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerParser;

impl ResponseParser for MarkerParser {
    fn quiz_prompt(&self, source_text: &str) -> String {
        prompts::quiz_prompt(source_text)
    }

    fn flashcard_prompt(&self, summarized_text: &str, count: usize) -> String {
        prompts::flashcard_prompt(summarized_text, count)
    }

    fn parse_quiz(&self, raw_text: &str) -> QuizItem {
        parse_quiz(raw_text)
    }

    fn parse_flashcards(&self, raw_text: &str, max_count: usize) -> Vec<Flashcard> {
        parse_flashcards(raw_text, max_count)
    }
}

/// Splits `raw_text` on `"Correct:"` and slices the options out of the question.
///
/// Options come from the text between the first `"A)"` and the next `"B)"`,
/// `"C)"` or `"D)"`, split on whitespace. A multi-word option therefore spreads
/// over several entries, and options B to D never appear on their own.
pub fn parse_quiz(raw_text: &str) -> QuizItem {
    let mut segments = raw_text.split(CORRECT_MARKER);
    let question_part = segments.next().unwrap_or_default();
    let Some(answer_part) = segments.next() else {
        debug!("No '{}' marker in generated text, using placeholder", CORRECT_MARKER);
        return QuizItem::placeholder();
    };

    let question = question_part.trim();
    QuizItem {
        question: question.to_string(),
        options: extract_options(question),
        correct: answer_part.trim().to_string(),
    }
}

fn extract_options(question: &str) -> Vec<String> {
    let Some(after_first) = question.split(FIRST_OPTION_LABEL).nth(1) else {
        debug!("No '{}' label in question text", FIRST_OPTION_LABEL);
        return Vec::new();
    };

    let fragment = LATER_OPTION_LABELS
        .iter()
        .fold(after_first, |acc, label| {
            acc.split_once(label).map_or(acc, |(head, _)| head)
        });

    fragment
        .split_whitespace()
        .take(QuizItem::MAX_OPTIONS)
        .map(str::to_string)
        .collect()
}

/// Splits `raw_text` on `"Term:"` and each segment on its first `':'`.
pub fn parse_flashcards(raw_text: &str, max_count: usize) -> Vec<Flashcard> {
    raw_text
        .split(TERM_MARKER)
        .skip(1)
        .filter_map(|segment| {
            let (term, definition) = segment.split_once(':')?;
            let term = term.trim();
            if term.is_empty() {
                return None;
            }
            Some(Flashcard {
                term: term.to_string(),
                definition: definition.trim().to_string(),
            })
        })
        .take(max_count)
        .collect()
}

/// Structured-output parser: asks for JSON and reads it back
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

#[derive(Deserialize)]
struct JsonQuiz {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct: String,
}

impl ResponseParser for JsonParser {
    fn quiz_prompt(&self, source_text: &str) -> String {
        prompts::quiz_prompt_json(source_text)
    }

    fn flashcard_prompt(&self, summarized_text: &str, count: usize) -> String {
        prompts::flashcard_prompt_json(summarized_text, count)
    }

    fn response_format(&self) -> Option<&'static str> {
        Some("json")
    }

    fn parse_quiz(&self, raw_text: &str) -> QuizItem {
        let parsed = json_slice(raw_text, '{', '}')
            .and_then(|slice| serde_json::from_str::<JsonQuiz>(slice).ok());

        match parsed {
            Some(quiz) if !quiz.question.trim().is_empty() => QuizItem {
                question: quiz.question.trim().to_string(),
                options: quiz
                    .options
                    .iter()
                    .map(|opt| opt.trim())
                    .filter(|opt| !opt.is_empty())
                    .take(QuizItem::MAX_OPTIONS)
                    .map(str::to_string)
                    .collect(),
                correct: quiz.correct.trim().to_string(),
            },
            _ => {
                debug!("Generated text is not a quiz object, using placeholder");
                QuizItem::placeholder()
            }
        }
    }

    fn parse_flashcards(&self, raw_text: &str, max_count: usize) -> Vec<Flashcard> {
        let Some(cards) = find_card_array(raw_text) else {
            debug!("Generated text holds no flashcard array");
            return Vec::new();
        };

        cards
            .iter()
            .filter_map(|card| {
                let term = card.get("term")?.as_str()?.trim();
                if term.is_empty() {
                    return None;
                }
                let definition = card
                    .get("definition")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .trim();
                Some(Flashcard {
                    term: term.to_string(),
                    definition: definition.to_string(),
                })
            })
            .take(max_count)
            .collect()
    }
}

/// Text between the first `open` and the last `close`, inclusive.
fn json_slice(raw_text: &str, open: char, close: char) -> Option<&str> {
    let start = raw_text.find(open)?;
    let end = raw_text.rfind(close)?;
    (end > start).then(|| &raw_text[start..=end])
}

/// Accepts a bare array or an object wrapping one (JSON mode forces an object on some models).
fn find_card_array(raw_text: &str) -> Option<Vec<Value>> {
    let value: Value = serde_json::from_str(raw_text.trim())
        .ok()
        .or_else(|| json_slice(raw_text, '[', ']').and_then(|s| serde_json::from_str(s).ok()))?;

    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.into_iter().find_map(|(_, v)| match v {
            Value::Array(items) => Some(items),
            _ => None,
        }),
        _ => None,
    }
}
