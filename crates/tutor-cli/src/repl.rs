//! Read-eval-print loop.
//!
//! Commands that open dialogs are awaited before the next prompt, so the line
//! editor is free for the dialog's question. Replies resolve in the
//! background: the prompt comes back as soon as the message is stored.

use crate::commands::{self, Command, HELP};
use crate::render::TerminalRenderer;
use crate::terminal::{Input, Terminal};
use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tutor_application::{ChatSessionEngine, PreferencesService, ReplyOutcome};
use tutor_core::TutorError;
use tutor_core::chat::ChatList;
use tutor_core::interaction::Destination;
use tutor_core::remote::AlgebraAction;

pub struct Repl {
    engine: Arc<ChatSessionEngine>,
    renderer: Arc<TerminalRenderer>,
    preferences: PreferencesService,
    terminal: Terminal,
    left: watch::Receiver<Option<Destination>>,
    replies: JoinSet<()>,
}

impl Repl {
    pub fn new(
        engine: Arc<ChatSessionEngine>,
        renderer: Arc<TerminalRenderer>,
        preferences: PreferencesService,
        terminal: Terminal,
        left: watch::Receiver<Option<Destination>>,
    ) -> Self {
        Self {
            engine,
            renderer,
            preferences,
            terminal,
            left,
            replies: JoinSet::new(),
        }
    }

    fn has_left(&self) -> bool {
        self.left.borrow().is_some()
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("{}", "=== Math Tutor ===".bright_magenta().bold());
        println!(
            "{}",
            "Type a message to ask, '/help' for commands, or 'quit' to exit.".bright_black()
        );
        println!();

        while !self.has_left() {
            let prompt = format!("{}> ", self.engine.current_chat_id().await);
            let line = match self.terminal.read_line(&prompt, "").await? {
                Input::Line(line) => line,
                Input::Interrupted => {
                    println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                    continue;
                }
                Input::Eof => {
                    println!("{}", "CTRL-D detected. Exiting...".bright_green());
                    break;
                }
            };
            while self.replies.try_join_next().is_some() {}

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.terminal.add_history(trimmed);

            match commands::parse(trimmed) {
                Ok(Command::Quit) => {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                Ok(command) => {
                    if let Err(err) = self.execute(command).await {
                        show_error(&err);
                    }
                }
                Err(usage) => println!("{}", usage.bright_black()),
            }
        }

        self.replies.abort_all();
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> tutor_core::Result<()> {
        match command {
            Command::New => {
                self.engine.create_chat().await?;
            }
            Command::NewAi => {
                // Failures were already shown by the engine.
                if let Err(err) = self.engine.create_ai_chat_interactive().await {
                    tracing::debug!("[Repl] AI chat not created: {}", err);
                }
            }
            Command::Chats => {
                let view = self.engine.view().await;
                self.renderer.print_lists(&view, true, false);
            }
            Command::Archived => {
                let view = self.engine.view().await;
                self.renderer.print_lists(&view, false, true);
            }
            Command::Switch(name) => {
                self.engine.select_chat(&name).await?;
            }
            Command::Rename(name) => {
                let old = self.target(name).await;
                self.engine.rename_chat_interactive(&old).await?;
            }
            Command::Archive(name) => {
                let id = self.target(name).await;
                self.engine.archive_chat(&id).await?;
            }
            Command::Unarchive(name) => {
                self.engine.unarchive_chat(&name).await?;
            }
            Command::Delete(name) => {
                let id = self.target(name).await;
                self.engine
                    .delete_chat_interactive(&id, ChatList::Active)
                    .await?;
            }
            Command::DeleteArchived(name) => {
                self.engine
                    .delete_chat_interactive(&name, ChatList::Archived)
                    .await?;
            }
            Command::DeleteAll => {
                self.engine.delete_all_active().await?;
            }
            Command::Edit(position) => {
                if self.engine.edit_message(position - 1).await? {
                    println!(
                        "{}",
                        "Message updated. Send it again to get a new reply.".bright_black()
                    );
                }
            }
            Command::Simplify(expr) => {
                self.send(AlgebraAction::Simplify.message(&expr)).await?;
            }
            Command::Solve(expr) => {
                self.send(AlgebraAction::Solve.message(&expr)).await?;
            }
            Command::Theme(theme) => {
                self.preferences.set_theme(theme)?;
                self.renderer.set_preferences(self.preferences.load());
                println!("{}", format!("Theme: {}", theme.as_str()).bright_black());
            }
            Command::Sidebar => {
                let state = self.preferences.toggle_sidebar()?;
                self.renderer.set_preferences(self.preferences.load());
                println!("{}", format!("Sidebar: {}", state.as_str()).bright_black());
            }
            Command::Logout => self.engine.logout(),
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
            Command::Send(text) => self.send(text).await?,
        }
        Ok(())
    }

    /// The named chat, or the current one.
    async fn target(&self, name: Option<String>) -> String {
        match name {
            Some(name) => name,
            None => self.engine.current_chat_id().await,
        }
    }

    /// Stores the message now and resolves its reply in the background.
    async fn send(&mut self, text: String) -> tutor_core::Result<()> {
        let Some(ticket) = self.engine.append_user_message(&text).await? else {
            return Ok(());
        };
        let engine = self.engine.clone();
        self.replies.spawn(async move {
            match engine.resolve_reply(ticket).await {
                Ok(ReplyOutcome::Answered {
                    algebra_options: Some(expr),
                }) => {
                    println!(
                        "{}",
                        format!("Try: /simplify {} or /solve {}", expr, expr).bright_black()
                    );
                }
                Ok(outcome) => tracing::debug!("[Repl] Reply resolved: {:?}", outcome),
                Err(err) => tracing::debug!("[Repl] Reply abandoned: {}", err),
            }
        });
        Ok(())
    }
}

/// Prints errors the engine did not already show through a dialog.
fn show_error(err: &TutorError) {
    if err.is_validation() || err.is_auth_expired() {
        return;
    }
    eprintln!("{}", format!("Error: {}", err.reason()).red());
}
