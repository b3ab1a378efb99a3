//! Downloadable artifacts: summary text, quiz JSON and flashcard JSON.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::StudyResult;
use crate::records::{Flashcard, QuizItem};

pub const SUMMARY_FILE: &str = "summary.txt";
pub const QUIZ_FILE: &str = "quiz.json";
pub const FLASHCARDS_FILE: &str = "flashcards.json";

/// A byte stream the user can save, with its conventional file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn summary(text: &str) -> Self {
        Self {
            file_name: SUMMARY_FILE,
            bytes: text.as_bytes().to_vec(),
        }
    }

    /// Array of quiz items, 2-space indented
    pub fn quiz(items: &[QuizItem]) -> StudyResult<Self> {
        Ok(Self {
            file_name: QUIZ_FILE,
            bytes: serde_json::to_vec_pretty(items)?,
        })
    }

    /// Array of flashcards, 2-space indented
    pub fn flashcards(cards: &[Flashcard]) -> StudyResult<Self> {
        Ok(Self {
            file_name: FLASHCARDS_FILE,
            bytes: serde_json::to_vec_pretty(cards)?,
        })
    }

    /// Writes the artifact into `dir`, creating it if needed, and returns the path.
    pub fn write_to(&self, dir: &Path) -> StudyResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name);
        fs::write(&path, &self.bytes)?;
        info!("Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}
