use colored::*;
use pulldown_cmark::{CodeBlockKind, Event as MdEvent, Options, Parser as MdParser, Tag};
use study_core::{Flashcard, HistoryEntry, QuizItem};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

/// Shown whenever a generation step fails, whatever the cause
pub const SERVICE_HINT: &str = "Failed. Ensure the local generation service (Ollama) is running.";

pub fn print_failure() {
    eprintln!("{}", SERVICE_HINT.red().bold());
}

pub fn print_success(message: &str) {
    println!("{}", message.green().bold());
}

/// Print generated prose (explanations, summaries) with markdown rendering
pub fn print_generated_text(title: &str, text: &str) {
    println!("{}", title.blue().bold());
    println!("{}", render_markdown(text));
}

pub fn format_quiz(items: &[QuizItem], reveal_answers: bool) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{} {}\n", format!("Q{}.", i + 1).yellow().bold(), item.question.bold()));
        if !item.options.is_empty() {
            out.push_str(&format!("    {} {}\n", "Options:".dimmed(), item.options.join(" / ")));
        }
        if reveal_answers {
            out.push_str(&format!("    {} {}\n", "Answer:".green(), item.correct));
        }
        out.push('\n');
    }
    out
}

pub fn format_flashcards(cards: &[Flashcard]) -> String {
    cards
        .iter()
        .map(|card| {
            format!(
                "{} {}\n    {} {}\n",
                "Term:".cyan().bold(),
                card.term,
                "Definition:".dimmed(),
                card.definition
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history.".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "{} {}",
                entry.created_at.format("%H:%M:%S").to_string().dimmed(),
                entry.summary_line()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Show usage instructions when no subcommand is given
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "study-buddy explain \"photosynthesis\"".green().bold());
    println!("    Explain a topic in simple terms");
    println!();
    println!("  {}", "study-buddy summarize --file notes.txt --save".green().bold());
    println!("    Summarize notes and write summary.txt");
    println!();
    println!("  {}", "study-buddy quiz -n 5 \"your notes\"".green().bold());
    println!("    Generate a multiple-choice quiz");
    println!();
    println!("  {}", "study-buddy flashcards --file notes.txt".green().bold());
    println!("    Generate term/definition flashcards");
    println!();
    println!("  {}", "study-buddy interactive".green().bold());
    println!("    Menu-driven session with history");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --endpoint <URL>   Generation endpoint (default http://localhost:11434/api/generate)");
    println!("  --model <ID>       Model to use (default llama2)");
    println!("  -n, --count <N>    Quiz questions / flashcards, 1-10");
    println!("  --help             Show all options");
    println!();
}

/// Render markdown in the terminal with syntax highlighting for code blocks
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = MdParser::new_ext(markdown, options);

    let syntax_set = SyntaxSet::load_defaults_newlines();
    let theme_set = ThemeSet::load_defaults();
    let theme = theme_set.themes.get("base16-ocean.dark");

    let mut output = String::new();
    let mut in_code_block = false;
    let mut code_block_lang = String::new();
    let mut code_block_content = String::new();
    let mut list_counters: Vec<Option<u64>> = Vec::new();
    let mut emphasis_depth = 0usize;

    for event in parser {
        match event {
            MdEvent::Start(Tag::Heading(..)) => {
                if !output.is_empty() {
                    output.push('\n');
                }
                emphasis_depth += 1;
            }
            MdEvent::End(Tag::Heading(..)) => {
                emphasis_depth = emphasis_depth.saturating_sub(1);
                output.push('\n');
            }
            MdEvent::Start(Tag::Paragraph) => {
                if !output.is_empty() && !output.ends_with("\n\n") && list_counters.is_empty() {
                    output.push('\n');
                }
            }
            MdEvent::End(Tag::Paragraph) => {
                output.push('\n');
            }
            MdEvent::Start(Tag::CodeBlock(info)) => {
                in_code_block = true;
                code_block_lang = match info {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                code_block_content.clear();
                output.push('\n');
            }
            MdEvent::End(Tag::CodeBlock(_)) => {
                in_code_block = false;
                output.push_str(&"─".repeat(40).dimmed().to_string());
                output.push('\n');
                output.push_str(&highlight_code(
                    &code_block_content,
                    &code_block_lang,
                    &syntax_set,
                    theme,
                ));
                output.push_str(&"─".repeat(40).dimmed().to_string());
                output.push('\n');
            }
            MdEvent::Start(Tag::List(start)) => {
                list_counters.push(start);
                if list_counters.len() == 1 {
                    output.push('\n');
                }
            }
            MdEvent::End(Tag::List(_)) => {
                list_counters.pop();
            }
            MdEvent::Start(Tag::Item) => {
                let indent = "  ".repeat(list_counters.len().saturating_sub(1));
                let bullet = match list_counters.last_mut() {
                    Some(Some(n)) => {
                        let label = format!("{}.", n);
                        *n += 1;
                        label
                    }
                    _ => "•".to_string(),
                };
                output.push_str(&format!("{}{} ", indent, bullet.yellow()));
            }
            MdEvent::End(Tag::Item) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            MdEvent::Start(Tag::Emphasis) | MdEvent::Start(Tag::Strong) => {
                emphasis_depth += 1;
            }
            MdEvent::End(Tag::Emphasis) | MdEvent::End(Tag::Strong) => {
                emphasis_depth = emphasis_depth.saturating_sub(1);
            }
            MdEvent::Code(code) => {
                output.push_str(&code.on_bright_black().white().to_string());
            }
            MdEvent::Text(text) => {
                if in_code_block {
                    code_block_content.push_str(&text);
                } else if emphasis_depth > 0 {
                    output.push_str(&text.bold().to_string());
                } else {
                    output.push_str(&text);
                }
            }
            MdEvent::SoftBreak => output.push(' '),
            MdEvent::HardBreak => output.push('\n'),
            MdEvent::Rule => {
                output.push_str(&"─".repeat(40).dimmed().to_string());
                output.push('\n');
            }
            _ => {}
        }
    }

    output.trim_end().to_string()
}

fn highlight_code(
    code: &str,
    lang: &str,
    syntax_set: &SyntaxSet,
    theme: Option<&syntect::highlighting::Theme>,
) -> String {
    let Some(theme) = theme else {
        return code.to_string();
    };

    let syntax = syntax_set
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme);

    let mut out = String::new();
    for line in LinesWithEndings::from(code) {
        let highlighted = highlighter
            .highlight_line(line, syntax_set)
            .unwrap_or_default();
        out.push_str(&as_24_bit_terminal_escaped(&highlighted, false));
    }
    out.push_str("\x1b[0m");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::{HistoryOutput, TaskKind};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_markdown_paragraphs_and_lists() {
        plain();
        let rendered = render_markdown("# Cells\n\nCells are **small**.\n\n- nucleus\n- membrane\n\n1. first\n2. second");
        assert!(rendered.starts_with("Cells\n"));
        assert!(rendered.contains("Cells are small."));
        assert!(rendered.contains("• nucleus\n• membrane"));
        assert!(rendered.contains("1. first\n2. second"));
    }

    #[test]
    fn test_render_markdown_plain_text_is_unchanged() {
        plain();
        assert_eq!(render_markdown("Just a sentence."), "Just a sentence.");
    }

    #[test]
    fn test_format_quiz() {
        plain();
        let items = vec![QuizItem {
            question: "foo A) cat B) dog".to_string(),
            options: vec!["cat".to_string()],
            correct: "B".to_string(),
        }];
        assert_eq!(
            format_quiz(&items, false),
            "Q1. foo A) cat B) dog\n    Options: cat\n\n"
        );
        assert!(format_quiz(&items, true).contains("Answer: B"));
    }

    #[test]
    fn test_format_flashcards() {
        plain();
        let cards = vec![
            Flashcard {
                term: "Mitosis".to_string(),
                definition: "cell division".to_string(),
            },
            Flashcard {
                term: "Osmosis".to_string(),
                definition: "water movement".to_string(),
            },
        ];
        assert_eq!(
            format_flashcards(&cards),
            "Term: Mitosis\n    Definition: cell division\n\nTerm: Osmosis\n    Definition: water movement\n"
        );
    }

    #[test]
    fn test_format_history() {
        plain();
        assert_eq!(format_history(&[]), "No history.");

        let entry = HistoryEntry::new(
            TaskKind::Summary,
            "notes",
            HistoryOutput::Text("Short summary".to_string()),
        );
        let rendered = format_history(&[entry]);
        assert!(rendered.ends_with("Summary: notes... -> Short summary..."));
    }
}
