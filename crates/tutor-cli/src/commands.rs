//! REPL command parsing.

use tutor_core::preferences::Theme;

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    NewAi,
    Chats,
    Archived,
    Switch(String),
    /// Renames the named chat, or the current one.
    Rename(Option<String>),
    Archive(Option<String>),
    Unarchive(String),
    Delete(Option<String>),
    DeleteArchived(String),
    DeleteAll,
    /// 1-based position of the message in the current chat.
    Edit(usize),
    Simplify(String),
    Solve(String),
    Theme(Theme),
    Sidebar,
    Logout,
    Help,
    Quit,
    Send(String),
}

pub const HELP: &str = "\
Commands:
  /new                     start a new chat
  /new-ai                  generate an AI tutor chat (asks for an optional topic)
  /chats                   list active chats
  /archived                list archived chats
  /switch <name>           make a chat current
  /rename [name]           rename a chat (current chat by default)
  /archive [name]          archive a chat (current chat by default)
  /unarchive <name>        restore an archived chat
  /delete [name]           delete an active chat (current chat by default)
  /delete-archived <name>  delete an archived chat
  /delete-all              delete every active chat
  /edit <n>                edit message n of the current chat
  /simplify <expr>         ask to simplify an expression
  /solve <expr>            ask to solve an equation
  /theme <light|dark>      switch colour theme
  /sidebar                 show or hide chat lists after each change
  /logout                  log out
  /help                    show this help
  quit                     exit
Anything else is sent as a message to the current chat.";

/// Command names offered for completion.
pub const COMMAND_NAMES: &[&str] = &[
    "/new",
    "/new-ai",
    "/chats",
    "/archived",
    "/switch",
    "/rename",
    "/archive",
    "/unarchive",
    "/delete",
    "/delete-archived",
    "/delete-all",
    "/edit",
    "/simplify",
    "/solve",
    "/theme",
    "/sidebar",
    "/logout",
    "/help",
];

/// Argument synopsis of `name` as listed in [`HELP`], e.g. `"<name>"` for
/// `/switch`. Empty for commands without arguments.
pub fn argument_usage(name: &str) -> Option<&'static str> {
    HELP.lines().find_map(|line| {
        let synopsis = line.trim_start().split("  ").next()?;
        match synopsis.split_once(' ') {
            Some((command, args)) if command == name => Some(args),
            None if synopsis == name => Some(""),
            _ => None,
        }
    })
}

/// Parses a non-empty, trimmed line. `Err` carries a usage hint.
pub fn parse(line: &str) -> Result<Command, String> {
    if line == "quit" || line == "exit" {
        return Ok(Command::Quit);
    }
    if !line.starts_with('/') {
        return Ok(Command::Send(line.to_string()));
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());
    let required = |usage: &str| arg.clone().ok_or_else(|| format!("Usage: {}", usage));

    let command = match name {
        "/new" => Command::New,
        "/new-ai" => Command::NewAi,
        "/chats" => Command::Chats,
        "/archived" => Command::Archived,
        "/switch" => Command::Switch(required("/switch <name>")?),
        "/rename" => Command::Rename(arg.clone()),
        "/archive" => Command::Archive(arg.clone()),
        "/unarchive" => Command::Unarchive(required("/unarchive <name>")?),
        "/delete" => Command::Delete(arg.clone()),
        "/delete-archived" => Command::DeleteArchived(required("/delete-archived <name>")?),
        "/delete-all" => Command::DeleteAll,
        "/edit" => {
            let index = required("/edit <n>")?
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| "Usage: /edit <n> (n starts at 1)".to_string())?;
            Command::Edit(index)
        }
        "/simplify" => Command::Simplify(required("/simplify <expr>")?),
        "/solve" => Command::Solve(required("/solve <expr>")?),
        "/theme" => match rest {
            "light" => Command::Theme(Theme::Light),
            "dark" => Command::Theme(Theme::Dark),
            _ => return Err("Usage: /theme <light|dark>".to_string()),
        },
        "/sidebar" => Command::Sidebar,
        "/logout" => Command::Logout,
        "/help" => Command::Help,
        other => return Err(format!("Unknown command {}. Type /help for a list.", other)),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_sent() {
        assert_eq!(parse("2+2").unwrap(), Command::Send("2+2".into()));
        assert_eq!(parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_arguments_keep_inner_spaces() {
        assert_eq!(
            parse("/switch Chat 2").unwrap(),
            Command::Switch("Chat 2".into())
        );
        assert_eq!(
            parse("/solve 2x + 4 = 0").unwrap(),
            Command::Solve("2x + 4 = 0".into())
        );
    }

    #[test]
    fn test_optional_arguments() {
        assert_eq!(parse("/rename").unwrap(), Command::Rename(None));
        assert_eq!(
            parse("/archive Fractions").unwrap(),
            Command::Archive(Some("Fractions".into()))
        );
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse("/switch").unwrap_err().starts_with("Usage"));
        assert!(parse("/edit zero").is_err());
        assert!(parse("/edit 0").is_err());
        assert_eq!(parse("/edit 3").unwrap(), Command::Edit(3));
        assert!(parse("/theme blue").is_err());
        assert!(parse("/frobnicate").unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn test_argument_usage_reads_help() {
        assert_eq!(argument_usage("/switch"), Some("<name>"));
        assert_eq!(argument_usage("/theme"), Some("<light|dark>"));
        assert_eq!(argument_usage("/delete-archived"), Some("<name>"));
        assert_eq!(argument_usage("/delete"), Some("[name]"));
        assert_eq!(argument_usage("/new"), Some(""));
        assert_eq!(argument_usage("/nope"), None);
        for name in COMMAND_NAMES {
            assert!(argument_usage(name).is_some(), "{} missing from help", name);
        }
    }

    #[test]
    fn test_every_listed_command_parses() {
        for name in COMMAND_NAMES {
            let line = format!("{} 1", name);
            let result = parse(&line);
            assert!(
                !matches!(&result, Err(e) if e.contains("Unknown command")),
                "{} is not handled",
                name
            );
        }
    }
}
