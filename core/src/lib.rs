// Core Study Buddy functionality:
// - Client for the local generation endpoint
// - Prompt templates and response parsers
// - In-memory session history
// - Document ingestion and artifact export
// - Configuration loading and shared error types

// Export client module - generation endpoint client
pub mod client;
pub use client::*;

// Export types module - request/result data structures
pub mod types;
pub use types::*;

// Export records module - quiz items, flashcards, task kinds
pub mod records;
pub use records::*;

pub mod prompts;

// Export parser module - marker and JSON response parsers
pub mod parser;
pub use parser::{JsonParser, MarkerParser, ParserMode, ResponseParser};

pub mod session;
pub use session::{HistoryEntry, HistoryOutput, SessionLog};

pub mod buddy;
pub use buddy::StudyBuddy;

pub mod ingest;
pub mod export;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
