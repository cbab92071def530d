//! Slash command system.
//!
//! Commands are invoked by typing `/` followed by the command name, for
//! example `/upload report.pdf`. A leading `//` sends a literal slash.

mod parse;

pub use parse::{parse_command, Command, CommandInfo, COMMANDS};

/// Check if input starts with '/' (is a command).
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/') && !is_escaped_slash(input)
}

/// Check if input is an escaped slash (starts with //).
pub fn is_escaped_slash(input: &str) -> bool {
    input.trim().starts_with("//")
}

/// Unescape a slash command (// -> /).
pub fn unescape_slash(input: &str) -> String {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix("//") {
        format!("/{rest}")
    } else {
        input.to_string()
    }
}

/// Commands matching a partially typed name, for the footer hint.
pub fn get_completions(partial: &str) -> Vec<&'static CommandInfo> {
    let partial = partial.trim().to_lowercase();
    let partial = partial.strip_prefix('/').unwrap_or(&partial);
    // Only complete the command word, not its arguments
    if partial.contains(char::is_whitespace) {
        return Vec::new();
    }

    COMMANDS
        .iter()
        .filter(|cmd| {
            cmd.name.starts_with(partial) || cmd.aliases.iter().any(|a| a.starts_with(partial))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_command() {
        assert!(is_command("/help"));
        assert!(is_command("  /upload x.pdf  "));
        assert!(!is_command("hello"));
        assert!(!is_command("//escaped"));
        assert!(!is_command(""));
    }

    #[test]
    fn test_is_escaped_slash() {
        assert!(is_escaped_slash("//etc/config"));
        assert!(is_escaped_slash("  //foo"));
        assert!(!is_escaped_slash("/help"));
    }

    #[test]
    fn test_unescape_slash() {
        assert_eq!(unescape_slash("//etc/config"), "/etc/config");
        assert_eq!(unescape_slash("//"), "/");
        assert_eq!(unescape_slash("/help"), "/help");
    }

    #[test]
    fn test_get_completions() {
        assert!(get_completions("/u").iter().any(|c| c.name == "upload"));
        assert!(get_completions("/e").iter().any(|c| c.name == "quit"));
        assert_eq!(get_completions("/").len(), COMMANDS.len());
        assert!(get_completions("/upload some").is_empty());
    }
}
