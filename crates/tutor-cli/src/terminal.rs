//! Line editor shared by the REPL and the dialog front end.
//!
//! rustyline blocks, so every read runs on the blocking pool. The editor sits
//! behind a mutex: the REPL prompt and a dialog question never read at the
//! same time.

use crate::commands::{COMMAND_NAMES, argument_usage};
use anyhow::{Result, anyhow};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::{Arc, Mutex};

/// Completion, highlighting and hints for slash commands.
///
/// Command names complete from [`COMMAND_NAMES`]; `/theme` also completes its
/// value. Once a command is typed, the hint shows its arguments as listed in
/// the help text.
#[derive(Clone)]
struct CliHelper;

const THEME_VALUES: &[&str] = &["light", "dark"];

impl Helper for CliHelper {}

/// Start of the completed word and its candidates.
fn completions(line: &str) -> (usize, Vec<&'static str>) {
    if !line.starts_with('/') {
        return (0, vec![]);
    }
    match line.split_once(' ') {
        None => (
            0,
            COMMAND_NAMES
                .iter()
                .copied()
                .filter(|cmd| cmd.starts_with(line))
                .collect(),
        ),
        Some(("/theme", value)) => (
            "/theme ".len(),
            THEME_VALUES
                .iter()
                .copied()
                .filter(|theme| theme.starts_with(value))
                .collect(),
        ),
        Some(_) => (0, vec![]),
    }
}

/// Rest of a uniquely typed command name plus its argument synopsis.
fn hint(line: &str) -> Option<String> {
    if !line.starts_with('/') {
        return None;
    }
    match line.split_once(' ') {
        None => {
            let name = match COMMAND_NAMES.iter().find(|cmd| **cmd == line) {
                Some(exact) => exact,
                None => {
                    let mut matches = COMMAND_NAMES.iter().filter(|cmd| cmd.starts_with(line));
                    let name = matches.next()?;
                    if matches.next().is_some() {
                        return None;
                    }
                    name
                }
            };
            let args = argument_usage(name).unwrap_or_default();
            let rest = &name[line.len()..];
            Some(if args.is_empty() {
                rest.to_string()
            } else {
                format!("{} {}", rest, args)
            })
            .filter(|h| !h.is_empty())
        }
        Some((name, "")) => argument_usage(name)
            .filter(|args| !args.is_empty())
            .map(str::to_string),
        Some(_) => None,
    }
}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = completions(&line[..pos]);
        let pairs = candidates
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        let (name, rest) = match line.find(' ') {
            Some(at) => line.split_at(at),
            None => (line, ""),
        };
        let name = if COMMAND_NAMES.contains(&name) {
            name.bright_cyan()
        } else {
            name.normal()
        };
        Owned(format!("{}{}", name, rest))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        hint(line)
    }
}

impl Validator for CliHelper {}

/// Result of one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Interrupted,
    Eof,
}

#[derive(Clone)]
pub struct Terminal {
    editor: Arc<Mutex<Editor<CliHelper, DefaultHistory>>>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut editor: Editor<CliHelper, DefaultHistory> = Editor::new()?;
        editor.set_helper(Some(CliHelper));
        Ok(Self {
            editor: Arc::new(Mutex::new(editor)),
        })
    }

    /// Reads one line; `initial` pre-fills the buffer.
    pub async fn read_line(&self, prompt: &str, initial: &str) -> Result<Input> {
        let editor = self.editor.clone();
        let prompt = prompt.to_string();
        let initial = initial.to_string();
        tokio::task::spawn_blocking(move || -> Result<Input> {
            let mut editor = editor
                .lock()
                .map_err(|_| anyhow!("line editor lock poisoned"))?;
            let result = if initial.is_empty() {
                editor.readline(&prompt)
            } else {
                editor.readline_with_initial(&prompt, (initial.as_str(), ""))
            };
            match result {
                Ok(line) => Ok(Input::Line(line)),
                Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                Err(ReadlineError::Eof) => Ok(Input::Eof),
                Err(err) => Err(err.into()),
            }
        })
        .await?
    }

    pub fn add_history(&self, line: &str) {
        if let Ok(mut editor) = self.editor.lock() {
            let _ = editor.add_history_entry(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_command_names() {
        assert_eq!(completions("/del"), (0, vec!["/delete", "/delete-archived", "/delete-all"]));
        assert_eq!(completions("hello"), (0, vec![]));
        assert_eq!(completions("/switch Ch"), (0, vec![]));
    }

    #[test]
    fn test_completes_theme_values() {
        assert_eq!(completions("/theme d"), (7, vec!["dark"]));
        assert_eq!(completions("/theme "), (7, vec!["light", "dark"]));
    }

    #[test]
    fn test_hint_shows_arguments_from_help() {
        assert_eq!(hint("/swi").as_deref(), Some("tch <name>"));
        assert_eq!(hint("/switch").as_deref(), Some(" <name>"));
        assert_eq!(hint("/switch ").as_deref(), Some("<name>"));
        assert_eq!(hint("/edit ").as_deref(), Some("<n>"));
        assert_eq!(hint("/sidebar"), None);
        assert_eq!(hint("/switch Chat 2"), None);
    }

    #[test]
    fn test_hint_waits_for_an_unambiguous_name() {
        assert_eq!(hint("/de"), None);
        assert_eq!(hint("/delete").as_deref(), Some(" [name]"));
        assert_eq!(hint("/delete-a"), None);
        assert_eq!(hint("/delete-al").as_deref(), Some("l"));
        assert_eq!(hint("/archive").as_deref(), Some(" [name]"));
    }
}
