use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::client::TextGenerator;
use crate::parser::ResponseParser;
use crate::prompts;
use crate::records::{Flashcard, ItemCount, QuizItem};
use crate::types::{GenerationRequest, GenerationResult};

/// Runs one study action end to end: build the prompt, call the generator,
/// parse the reply.
#[derive(Debug)]
pub struct StudyBuddy<G: TextGenerator> {
    generator: G,
    parser: Box<dyn ResponseParser>,
    quiz_concurrency: usize,
}

impl<G: TextGenerator> StudyBuddy<G> {
    pub fn new(generator: G, parser: Box<dyn ResponseParser>) -> Self {
        Self {
            generator,
            parser,
            quiz_concurrency: 1,
        }
    }

    /// Allow up to `limit` quiz questions to be generated at once.
    pub fn with_quiz_concurrency(mut self, limit: usize) -> Self {
        self.quiz_concurrency = limit.max(1);
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    fn request(&self, prompt_text: String) -> GenerationRequest {
        GenerationRequest::new(prompt_text, self.generator.model_name())
    }

    pub async fn explain(&self, topic: &str, context: &str) -> GenerationResult {
        info!("Explaining topic: {}", topic);
        let request = self.request(prompts::explain(topic, context));
        self.generator.generate(&request).await
    }

    pub async fn summarize(&self, notes: &str) -> GenerationResult {
        info!(input_len = notes.len(), "Summarizing notes");
        let request = self.request(prompts::summarize(notes));
        self.generator.generate(&request).await
    }

    /// One independent generation call per question, returned in question order.
    ///
    /// A failed call or unparseable reply yields the placeholder item for that slot.
    pub async fn generate_quiz(&self, text: &str, count: ItemCount) -> Vec<QuizItem> {
        info!(count = count.get(), "Generating quiz");
        let request = self
            .request(self.parser.quiz_prompt(text))
            .with_format(self.parser.response_format());

        stream::iter(0..count.get())
            .map(|index| self.quiz_item(index, &request))
            .buffered(self.quiz_concurrency)
            .collect()
            .await
    }

    async fn quiz_item(&self, index: usize, request: &GenerationRequest) -> QuizItem {
        match self.generator.generate(request).await {
            GenerationResult::Success { text } => self.parser.parse_quiz(&text),
            GenerationResult::Failure { reason } => {
                warn!(index, %reason, "Quiz question generation failed");
                QuizItem::placeholder()
            }
        }
    }

    /// Summarizes `text`, then extracts up to `count` flashcards from the summary.
    ///
    /// A failed summary stage returns no cards without a second call.
    pub async fn generate_flashcards(&self, text: &str, count: ItemCount) -> Vec<Flashcard> {
        info!(count = count.get(), "Generating flashcards");
        let summary = match self.summarize(text).await {
            GenerationResult::Success { text } => text,
            GenerationResult::Failure { reason } => {
                warn!(%reason, "Summary stage failed, skipping flashcard extraction");
                return Vec::new();
            }
        };

        let request = self
            .request(self.parser.flashcard_prompt(&summary, count.get()))
            .with_format(self.parser.response_format());

        match self.generator.generate(&request).await {
            GenerationResult::Success { text } => self.parser.parse_flashcards(&text, count.get()),
            GenerationResult::Failure { reason } => {
                warn!(%reason, "Flashcard extraction failed");
                Vec::new()
            }
        }
    }
}
