//! Interactive chat with the narrative assistant.

use crate::commands::chat::print_fragment;
use crate::commands::Context;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use narrative_llm::{ChatProvider, ChatSession, LlmError, GREETING, SUGGESTIONS};
use rustyline::config::Config as EditorConfig;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the chat loop until `exit` or end of input.
pub async fn run_chat<P: ChatProvider>(session: &mut ChatSession<P>, ctx: &Context) -> Result<()> {
    let formatter = &ctx.formatter;
    println!("{}", formatter.info(GREETING));
    println!();
    print_suggestions(formatter);

    let editor_config = EditorConfig::builder()
        .max_history_size(ctx.config.settings.history_size)
        .map_err(|e| CliError::Config(format!("Invalid history size: {}", e)))?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)
        .map_err(|e| CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e))))?;

    let history_path = history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let input = match parse_input(&line, session.is_fresh()) {
                    ReplInput::Empty => continue,
                    ReplInput::Exit => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    ReplInput::Help => {
                        print_help(formatter);
                        continue;
                    }
                    ReplInput::Message(message) => message,
                };

                editor.add_history_entry(line.trim()).ok();

                match session.send(&input, print_fragment).await {
                    Ok(_) => println!(),
                    Err(LlmError::EmptyMessage) => {}
                    Err(e) => {
                        println!();
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();
    Ok(())
}

/// One line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput {
    Empty,
    Exit,
    Help,
    Message(String),
}

/// Classify a line. Suggestion numbers only count before the first question.
fn parse_input(line: &str, fresh: bool) -> ReplInput {
    let line = line.trim();
    match line {
        "" => ReplInput::Empty,
        "exit" | "quit" | "q" => ReplInput::Exit,
        "help" | "?" => ReplInput::Help,
        _ => {
            if fresh {
                if let Some(suggestion) = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| SUGGESTIONS.get(i))
                {
                    return ReplInput::Message(suggestion.to_string());
                }
            }
            ReplInput::Message(line.to_string())
        }
    }
}

fn history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_suggestions(formatter: &Formatter) {
    println!("{}", formatter.info("Try asking:"));
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        println!("  {}. {}", i + 1, suggestion);
    }
    println!();
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Type a question and press Enter."));
    println!();
    println!("  1-4             - Ask a suggested question (before the first message)");
    println!("  help, ?         - Show this help");
    println!("  exit, quit, q   - Leave the chat");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_control_lines() {
        assert_eq!(parse_input("   ", true), ReplInput::Empty);
        assert_eq!(parse_input("quit", false), ReplInput::Exit);
        assert_eq!(parse_input(" ? ", false), ReplInput::Help);
    }

    #[test]
    fn test_suggestion_numbers_on_fresh_session() {
        assert_eq!(parse_input("3", true), ReplInput::Message(SUGGESTIONS[2].to_string()));
        assert_eq!(parse_input("5", true), ReplInput::Message("5".into()));
        assert_eq!(parse_input("0", true), ReplInput::Message("0".into()));
    }

    #[test]
    fn test_numbers_are_plain_text_after_first_message() {
        assert_eq!(parse_input("1", false), ReplInput::Message("1".into()));
    }

    #[test]
    fn test_message_is_trimmed() {
        assert_eq!(
            parse_input("  why is NVDA exposed?  ", false),
            ReplInput::Message("why is NVDA exposed?".into())
        );
    }
}
