//! Terminal renderer.
//!
//! Prints the session as plain lines. Turn bubbles are diffed against the
//! last printed view so a reply arriving in the background prints only the
//! turn that changed.

use colored::{Color, Colorize};
use std::sync::{Mutex, RwLock};
use tutor_core::chat::{ChatEntry, MessageView, SessionView};
use tutor_core::interaction::{RenderProjector, RenderScope};
use tutor_core::preferences::{SidebarState, Theme, UiPreferences};

struct Palette {
    user: Color,
    bot: Color,
    current: Color,
    muted: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                user: Color::Blue,
                bot: Color::Green,
                current: Color::Magenta,
                muted: Color::BrightBlack,
            },
            Theme::Dark => Self {
                user: Color::BrightCyan,
                bot: Color::BrightGreen,
                current: Color::BrightYellow,
                muted: Color::White,
            },
        }
    }
}

pub struct TerminalRenderer {
    prefs: RwLock<UiPreferences>,
    last: Mutex<Option<SessionView>>,
}

impl TerminalRenderer {
    pub fn new(prefs: UiPreferences) -> Self {
        Self {
            prefs: RwLock::new(prefs),
            last: Mutex::new(None),
        }
    }

    pub fn set_preferences(&self, prefs: UiPreferences) {
        if let Ok(mut current) = self.prefs.write() {
            *current = prefs;
        }
    }

    fn palette(&self) -> Palette {
        let theme = self.prefs.read().map(|p| p.theme).unwrap_or_default();
        Palette::for_theme(theme)
    }

    fn sidebar_open(&self) -> bool {
        self.prefs
            .read()
            .map(|p| p.sidebar == SidebarState::Open)
            .unwrap_or(true)
    }

    /// Prints the active list, the archived list, or both.
    pub fn print_lists(&self, view: &SessionView, active: bool, archived: bool) {
        let palette = self.palette();
        if active {
            println!("{}", format_list("Chats", &view.chats, &palette));
        }
        if archived {
            println!("{}", format_list("Archived", &view.archived, &palette));
        }
    }

    /// Reprints the whole current chat.
    pub fn print_chat(&self, view: &SessionView) {
        let palette = self.palette();
        println!("{}", format!("── {} ──", view.title).bold());
        if view.messages.is_empty() {
            println!("{}", "(no messages yet)".color(palette.muted));
        }
        for message in &view.messages {
            print_message(message, &palette);
        }
    }
}

impl RenderProjector for TerminalRenderer {
    fn render(&self, view: &SessionView, scope: RenderScope) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        if self.sidebar_open() {
            self.print_lists(
                view,
                scope.chat_list && last.as_ref().map(|l| l.chats != view.chats).unwrap_or(true),
                scope.archived_list
                    && last
                        .as_ref()
                        .map(|l| l.archived != view.archived)
                        .unwrap_or(true),
            );
        }
        if scope.messages {
            match last.as_ref() {
                Some(previous) if previous.title == view.title => {
                    let palette = self.palette();
                    for message in changed_messages(&previous.messages, &view.messages) {
                        print_message(message, &palette);
                    }
                }
                _ => self.print_chat(view),
            }
        }
        *last = Some(view.clone());
    }

    fn busy(&self, label: Option<&str>) {
        if let Some(label) = label {
            println!("{}", label.yellow());
        }
    }
}

/// Messages of `current` that differ from, or are missing in, `previous`.
fn changed_messages<'a>(previous: &[MessageView], current: &'a [MessageView]) -> Vec<&'a MessageView> {
    current
        .iter()
        .filter(|m| previous.get(m.index) != Some(*m))
        .collect()
}

fn print_message(message: &MessageView, palette: &Palette) {
    println!(
        "{} {}",
        format!("[{}] You:", message.index + 1).color(palette.user).bold(),
        message.user
    );
    println!(
        "{} {}",
        "    Tutor:".color(palette.bot).bold(),
        plain_text(&message.bot)
    );
}

fn format_list(heading: &str, entries: &[ChatEntry], palette: &Palette) -> String {
    let mut out = format!("{}:", heading).bold().to_string();
    if entries.is_empty() {
        out.push_str(&format!("\n  {}", "(none)".color(palette.muted)));
    }
    for entry in entries {
        if entry.is_current {
            out.push_str(&format!("\n* {}", entry.label.color(palette.current).bold()));
        } else {
            out.push_str(&format!("\n  {}", entry.label));
        }
    }
    out
}

/// Turns the server's HTML reply into terminal text: line breaks become
/// newlines, other tags are dropped and common entities decoded.
pub fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        match rest[start..].find('>') {
            Some(end) => {
                let tag = rest[start + 1..start + end].trim().to_lowercase();
                if tag.starts_with("br") || tag == "/p" || tag == "/div" {
                    out.push('\n');
                }
                rest = &rest[start + end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(index: usize, user: &str, bot: &str) -> MessageView {
        MessageView {
            index,
            user: user.to_string(),
            bot: bot.to_string(),
        }
    }

    #[test]
    fn test_plain_text_strips_tags() {
        assert_eq!(plain_text("x = 2<br>y = 3"), "x = 2\ny = 3");
        assert_eq!(plain_text("<b>Answer:</b> 4 &lt; 5"), "Answer: 4 < 5");
        assert_eq!(plain_text("<p>one</p><p>two</p>"), "one\ntwo");
        assert_eq!(plain_text("a < b"), "a < b");
    }

    #[test]
    fn test_changed_messages_only_reports_new_or_filled_turns() {
        let before = vec![message(0, "1+1", "2"), message(1, "2+2", "")];
        let after = vec![
            message(0, "1+1", "2"),
            message(1, "2+2", "4"),
            message(2, "3+3", ""),
        ];
        let changed: Vec<usize> = changed_messages(&before, &after)
            .iter()
            .map(|m| m.index)
            .collect();
        assert_eq!(changed, vec![1, 2]);
    }

    #[test]
    fn test_format_list_marks_current() {
        colored::control::set_override(false);
        let entries = vec![
            ChatEntry {
                id: "Chat 1".to_string(),
                label: "Chat 1".to_string(),
                is_current: false,
            },
            ChatEntry {
                id: "Fractions".to_string(),
                label: "Fractions (AI)".to_string(),
                is_current: true,
            },
        ];
        let palette = Palette::for_theme(Theme::Light);
        assert_eq!(
            format_list("Chats", &entries, &palette),
            "Chats:\n  Chat 1\n* Fractions (AI)"
        );
        assert_eq!(format_list("Archived", &[], &palette), "Archived:\n  (none)");
    }
}
