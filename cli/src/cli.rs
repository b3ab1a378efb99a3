use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use study_core::ingest::load_document;
use study_core::ParserMode;

/// Explanations, summaries, quizzes and flashcards from a local model
#[derive(Parser, Debug)]
#[command(name = "study-buddy", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the config file (defaults to ~/.config/study-buddy/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Generation endpoint URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Model identifier sent with every request
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Number of quiz questions / flashcards (1-10)
    #[arg(short = 'n', long, global = true, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub count: Option<u8>,

    /// Response format to request: markers or json
    #[arg(long, global = true, value_parser = parse_parser_mode)]
    pub parser: Option<ParserMode>,

    /// Enable verbose output
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Explain a topic in simple terms
    Explain {
        /// Topic to explain
        topic: String,
        /// Extra context appended to the prompt
        #[arg(short, long, default_value = "")]
        context: String,
    },
    /// Summarize notes
    Summarize {
        #[command(flatten)]
        input: InputArgs,
        /// Write summary.txt to the export directory
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    /// Generate multiple-choice questions
    Quiz {
        #[command(flatten)]
        input: InputArgs,
        /// Write quiz.json to the export directory
        #[arg(long, default_value_t = false)]
        save: bool,
        /// Pick an answer for each question before the stated answer is shown
        #[arg(long, default_value_t = false)]
        answer: bool,
    },
    /// Generate term/definition flashcards
    Flashcards {
        #[command(flatten)]
        input: InputArgs,
        /// Write flashcards.json to the export directory
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    /// Menu-driven session with history
    Interactive,
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

/// Input text given inline or read from a document
#[derive(ClapArgs, Debug, Clone)]
pub struct InputArgs {
    /// Text to work on
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Read the text from a plain-text document instead
    #[arg(short, long, conflicts_with = "text", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn resolve(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (_, Some(path)) => load_document(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            (Some(text), None) => Ok(text.clone()),
            (None, None) => bail!("Provide TEXT or --file <PATH>"),
        }
    }
}

fn parse_parser_mode(value: &str) -> Result<ParserMode, String> {
    value.parse::<ParserMode>().map_err(|e| e.to_string())
}
