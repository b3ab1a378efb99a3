use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{StudyError, StudyResult};

/// A multiple-choice question carved out of generated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    /// Question text; option labels stay inline ("A) ... B) ...").
    pub question: String,
    /// At most four options, never padded.
    pub options: Vec<String>,
    pub correct: String,
}

impl QuizItem {
    pub const MAX_OPTIONS: usize = 4;

    /// The fixed item used when generated text ignores the expected format.
    pub fn placeholder() -> Self {
        Self {
            question: "Sample Question?".to_string(),
            options: ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect(),
            correct: "A".to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

/// A term/definition pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

/// The four presentation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    Explanation,
    Summary,
    Quiz,
    Flashcards,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskKind::Explanation => "Explanation",
            TaskKind::Summary => "Summary",
            TaskKind::Quiz => "Quiz",
            TaskKind::Flashcards => "Flashcards",
        };
        f.write_str(name)
    }
}

/// Number of quiz questions or flashcards to produce, in `[1, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ItemCount(u8);

impl ItemCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> StudyResult<Self> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            return Err(StudyError::InvalidItemCount {
                got: value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value as u8))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for ItemCount {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<i64> for ItemCount {
    type Error = StudyError;

    fn try_from(value: i64) -> StudyResult<Self> {
        Self::new(value)
    }
}

impl From<ItemCount> for u8 {
    fn from(count: ItemCount) -> Self {
        count.0
    }
}

impl FromStr for ItemCount {
    type Err = StudyError;

    fn from_str(s: &str) -> StudyResult<Self> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|e| StudyError::Parsing(format!("Invalid item count '{}': {}", s, e)))?;
        Self::new(value)
    }
}

impl fmt::Display for ItemCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_count_bounds() {
        assert!(ItemCount::new(0).is_err());
        assert!(ItemCount::new(11).is_err());
        assert!(ItemCount::new(-3).is_err());
        assert_eq!(ItemCount::new(1).unwrap().get(), 1);
        assert_eq!(ItemCount::new(10).unwrap().get(), 10);
        assert_eq!(ItemCount::default().get(), 3);
    }

    #[test]
    fn test_item_count_from_str() {
        assert_eq!("7".parse::<ItemCount>().unwrap().get(), 7);
        assert!(matches!(
            "abc".parse::<ItemCount>(),
            Err(StudyError::Parsing(_))
        ));
        assert!(matches!(
            "42".parse::<ItemCount>(),
            Err(StudyError::InvalidItemCount { got: 42, .. })
        ));
    }

    #[test]
    fn test_quiz_item_json_field_names() {
        let value = serde_json::to_value(QuizItem::placeholder()).unwrap();
        assert_eq!(value["question"], "Sample Question?");
        assert_eq!(value["options"], serde_json::json!(["A", "B", "C", "D"]));
        assert_eq!(value["correct"], "A");
    }

    #[test]
    fn test_task_kind_display() {
        assert_eq!(TaskKind::Flashcards.to_string(), "Flashcards");
        assert_eq!(TaskKind::Explanation.to_string(), "Explanation");
    }
}
