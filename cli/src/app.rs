use anyhow::{Context, Result};
use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use study_core::export::Artifact;
use study_core::ingest::load_document;
use study_core::{
    GenerationClient, GenerationResult, HistoryEntry, HistoryOutput, ItemCount,
    QuizItem, SessionLog, StudyBuddy, StudyConfig, TaskKind, TextGenerator,
};

use crate::cli::Command;
use crate::output::{
    format_flashcards, format_history, format_quiz, print_failure, print_generated_text,
    print_success,
};

const ANSWER_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

const MENU: [&str; 7] = [
    "Explain a topic",
    "Summarize notes",
    "Quiz",
    "Flashcards",
    "History",
    "Clear history",
    "Quit",
];

pub struct App<G: TextGenerator = GenerationClient> {
    buddy: StudyBuddy<G>,
    config: StudyConfig,
    item_count: ItemCount,
    session: SessionLog,
}

impl App {
    pub fn new(config: StudyConfig) -> Result<Self> {
        let client = GenerationClient::new(&config).context("Failed to create generation client")?;
        Self::with_generator(config, client)
    }
}

impl<G: TextGenerator> App<G> {
    pub fn with_generator(config: StudyConfig, generator: G) -> Result<Self> {
        let buddy = StudyBuddy::new(generator, config.parser_mode().build())
            .with_quiz_concurrency(config.quiz_concurrency());
        let item_count = config.item_count()?;

        info!(
            "Using model {} at {} ({} parser)",
            config.model_name(),
            config.endpoint(),
            config.parser_mode().as_str()
        );

        Ok(Self {
            buddy,
            config,
            item_count,
            session: SessionLog::new(),
        })
    }

    pub async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Explain { topic, context } => self.run_explain(&topic, &context).await,
            Command::Summarize { input, save } => {
                let notes = input.resolve()?;
                self.run_summarize(&notes, save).await
            }
            Command::Quiz {
                input,
                save,
                answer,
            } => {
                let text = input.resolve()?;
                self.run_quiz(&text, save, answer).await
            }
            Command::Flashcards { input, save } => {
                let text = input.resolve()?;
                self.run_flashcards(&text, save).await
            }
            Command::Interactive => self.run_interactive().await,
            // Handled before an App is built
            Command::Config { .. } => Ok(()),
        }
    }

    async fn run_explain(&mut self, topic: &str, context: &str) -> Result<()> {
        let result = with_spinner("Explaining...", self.buddy.explain(topic, context)).await;
        if let Some(text) = successful_text(&result) {
            print_generated_text("Explanation", text);
            self.session.append(HistoryEntry::new(
                TaskKind::Explanation,
                topic,
                HistoryOutput::Text(text.to_string()),
            ));
        }
        Ok(())
    }

    async fn run_summarize(&mut self, notes: &str, save: bool) -> Result<()> {
        let result = with_spinner("Summarizing...", self.buddy.summarize(notes)).await;
        if let Some(text) = successful_text(&result) {
            print_generated_text("Summary", text);
            self.session.append(HistoryEntry::new(
                TaskKind::Summary,
                notes,
                HistoryOutput::Text(text.to_string()),
            ));
            if save {
                self.save(Artifact::summary(text))?;
            }
        }
        Ok(())
    }

    async fn run_quiz(&mut self, text: &str, save: bool, answer: bool) -> Result<()> {
        let message = format!("Generating {} question(s)...", self.item_count);
        let items = with_spinner(&message, self.buddy.generate_quiz(text, self.item_count)).await;

        // Placeholders stand in for unusable replies and are shown like any other item
        let placeholders = items.iter().filter(|item| item.is_placeholder()).count();
        if placeholders > 0 {
            warn!("{} of {} questions could not be generated", placeholders, items.len());
        }

        if answer {
            ask_questions(&items)?;
        } else {
            print!("{}", format_quiz(&items, true));
        }

        self.session.append(HistoryEntry::new(
            TaskKind::Quiz,
            text,
            HistoryOutput::Quiz(items.clone()),
        ));
        if save {
            self.save(Artifact::quiz(&items)?)?;
        }
        Ok(())
    }

    async fn run_flashcards(&mut self, text: &str, save: bool) -> Result<()> {
        let message = format!("Generating {} flashcard(s)...", self.item_count);
        let cards = with_spinner(&message, self.buddy.generate_flashcards(text, self.item_count)).await;

        if cards.is_empty() {
            print_failure();
            return Ok(());
        }

        println!("{}", format_flashcards(&cards));
        self.session.append(HistoryEntry::new(
            TaskKind::Flashcards,
            text,
            HistoryOutput::Flashcards(cards.clone()),
        ));
        if save {
            self.save(Artifact::flashcards(&cards)?)?;
        }
        Ok(())
    }

    /// Menu-driven loop; history lives for the duration of the session
    pub async fn run_interactive(&mut self) -> Result<()> {
        println!("{}", "Study Buddy".blue().bold());
        println!("Prefix input with '@' to read it from a file, e.g. @notes.txt");
        println!();

        let theme = ColorfulTheme::default();
        loop {
            let choice = Select::with_theme(&theme)
                .with_prompt("What would you like to do?")
                .items(&MENU)
                .default(0)
                .interact()
                .context("Failed to read menu selection")?;
            debug!("Menu selection: {}", MENU[choice]);

            if choice == MENU.len() - 1 {
                break;
            }

            // A bad file or failed save should not end the session
            if let Err(e) = self.handle_choice(choice, &theme).await {
                crate::logging::log_error(&format!("{:#}", e));
            }
            println!();
        }

        Ok(())
    }

    async fn handle_choice(&mut self, choice: usize, theme: &ColorfulTheme) -> Result<()> {
        match choice {
            0 => {
                let topic = prompt_text(theme, "Topic")?;
                let context: String = Input::with_theme(theme)
                    .with_prompt("Context (optional)")
                    .allow_empty(true)
                    .interact_text()?;
                self.run_explain(&topic, &context).await
            }
            1 => {
                let notes = prompt_input(theme, "Notes")?;
                let save = confirm_save(theme)?;
                self.run_summarize(&notes, save).await
            }
            2 => {
                let text = prompt_input(theme, "Text to quiz on")?;
                self.item_count = prompt_count(theme, self.item_count)?;
                let answer = Confirm::with_theme(theme)
                    .with_prompt("Answer the questions yourself?")
                    .default(true)
                    .interact()?;
                let save = confirm_save(theme)?;
                self.run_quiz(&text, save, answer).await
            }
            3 => {
                let text = prompt_input(theme, "Text for flashcards")?;
                self.item_count = prompt_count(theme, self.item_count)?;
                let save = confirm_save(theme)?;
                self.run_flashcards(&text, save).await
            }
            4 => {
                println!("{}", format_history(self.session.list()));
                Ok(())
            }
            _ => {
                self.session.clear();
                print_success("History cleared.");
                Ok(())
            }
        }
    }

    fn save(&self, artifact: Artifact) -> Result<PathBuf> {
        let dir = self.config.export_dir();
        let path = artifact
            .write_to(&dir)
            .with_context(|| format!("Failed to write {}", artifact.file_name))?;
        print_success(&format!("Saved {}", path.display()));
        Ok(path)
    }
}

/// The text of a result unless it carries the failure marker
fn successful_text(result: &GenerationResult) -> Option<&str> {
    if result.looks_failed() {
        if let GenerationResult::Failure { reason } = result {
            debug!("Generation failed: {}", reason);
        }
        print_failure();
        return None;
    }
    result.text()
}

fn ask_questions(items: &[QuizItem]) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut right = 0;

    for (i, item) in items.iter().enumerate() {
        println!("{} {}", format!("Q{}.", i + 1).yellow().bold(), item.question.bold());
        let picked = Select::with_theme(&theme)
            .with_prompt("Your answer")
            .items(&ANSWER_LETTERS)
            .default(0)
            .interact()?;

        let letter = ANSWER_LETTERS[picked];
        if item.correct.trim().to_uppercase().starts_with(letter) {
            right += 1;
            println!("{}", "Correct!".green().bold());
        } else {
            println!("{} {}", "Stated answer:".red(), item.correct);
        }
        println!();
    }

    println!("Score: {}/{}", right, items.len());
    Ok(())
}

fn prompt_text(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    let text: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|value: &String| {
            if value.trim().is_empty() {
                Err("Input cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(text)
}

/// Free text, or the contents of a document when prefixed with '@'
fn prompt_input(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    let raw = prompt_text(theme, prompt)?;
    match raw.trim().strip_prefix('@') {
        Some(path) => {
            let path = PathBuf::from(path.trim());
            load_document(&path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => Ok(raw),
    }
}

fn prompt_count(theme: &ColorfulTheme, current: ItemCount) -> Result<ItemCount> {
    let value: u8 = Input::with_theme(theme)
        .with_prompt(format!("How many? ({}-{})", ItemCount::MIN, ItemCount::MAX))
        .default(u8::from(current))
        .validate_with(|n: &u8| {
            ItemCount::new(i64::from(*n))
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(ItemCount::new(i64::from(value))?)
}

fn confirm_save(theme: &ColorfulTheme) -> Result<bool> {
    Ok(Confirm::with_theme(theme)
        .with_prompt("Save the result to a file?")
        .default(false)
        .interact()?)
}

/// Show a spinner on stderr while the future runs
async fn with_spinner<F: Future>(message: &str, fut: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));

    let output = fut.await;
    spinner.finish_and_clear();
    output
}
