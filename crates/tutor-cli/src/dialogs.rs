//! Terminal front end for dialog requests.

use crate::terminal::{Input, Terminal};
use colored::Colorize;
use tokio::sync::mpsc::UnboundedReceiver;
use tutor_core::interaction::DialogRequest;

/// Answers dialogs until the engine side is dropped.
///
/// Notifications are printed and acknowledged at once, so a reply that fails
/// in the background never waits for the prompt. Questions read from the
/// terminal; Ctrl-C or Ctrl-D cancels them.
pub async fn serve(mut requests: UnboundedReceiver<DialogRequest>, terminal: Terminal) {
    while let Some(request) = requests.recv().await {
        match request {
            DialogRequest::Notify {
                title,
                message,
                done,
            } => {
                println!("{} {}", format!("[{}]", title).yellow().bold(), message);
                done.resolve(());
            }
            DialogRequest::Confirm { message, answer } => {
                match ask(&terminal, &format!("{} [y/N] ", message), "").await {
                    Some(line) => answer.resolve(is_yes(&line)),
                    None => answer.cancel(),
                }
            }
            DialogRequest::Prompt {
                title,
                placeholder,
                default,
                answer,
            } => {
                if !placeholder.is_empty() {
                    println!("{}", format!("({})", placeholder).bright_black());
                }
                match ask(&terminal, &format!("{}: ", title), &default).await {
                    Some(line) => answer.resolve(line.trim().to_string()),
                    None => answer.cancel(),
                }
            }
            DialogRequest::EditText { current, answer } => {
                match ask(&terminal, "Edit message: ", &current).await {
                    Some(line) => answer.resolve(line),
                    None => answer.cancel(),
                }
            }
        }
    }
    tracing::debug!("[Dialogs] Request channel closed");
}

async fn ask(terminal: &Terminal, prompt: &str, initial: &str) -> Option<String> {
    match terminal.read_line(prompt, initial).await {
        Ok(Input::Line(line)) => Some(line),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!("[Dialogs] Failed to read answer: {}", err);
            None
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes(" Y "));
        assert!(is_yes("yes"));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }
}
