//! Command parser and registry for slash commands.

/// A parsed slash command from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show help overlay
    Help,
    /// Exit the application
    Quit,
    /// Upload a PDF from the given path
    Upload(Option<String>),
    /// Unknown command
    Unknown(String),
}

/// Command metadata for help display and autocomplete.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    /// Primary command name (without the /)
    pub name: &'static str,
    /// Alternative names for the command
    pub aliases: &'static [&'static str],
    /// Argument placeholder shown in help
    pub args: Option<&'static str>,
    /// Brief description for help
    pub description: &'static str,
    /// Keyboard shortcut if available
    pub keybinding: Option<&'static str>,
}

/// Static registry of all available commands.
pub static COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "upload",
        aliases: &["u"],
        args: Some("<path>"),
        description: "Upload a PDF to the document backend",
        keybinding: None,
    },
    CommandInfo {
        name: "help",
        aliases: &["?"],
        args: None,
        description: "Show keys and commands",
        keybinding: Some("F1"),
    },
    CommandInfo {
        name: "quit",
        aliases: &["q", "exit"],
        args: None,
        description: "Exit ragchat",
        keybinding: Some("Ctrl+C"),
    },
];

/// Parse a slash command from user input.
///
/// Returns `None` if the input is not a command at all.
/// Returns `Command::Unknown` if the command is not recognized.
///
/// # Examples
///
/// ```
/// use ragchat_tui::commands::{parse_command, Command};
///
/// assert!(matches!(parse_command("/help"), Some(Command::Help)));
/// assert!(matches!(parse_command("/q"), Some(Command::Quit)));
/// assert!(matches!(parse_command("/upload a.pdf"), Some(Command::Upload(Some(_)))));
/// ```
pub fn parse_command(input: &str) -> Option<Command> {
    let content = input.trim().strip_prefix('/')?;

    let (name, args) = match content.find(char::is_whitespace) {
        Some(idx) => {
            let (c, a) = content.split_at(idx);
            let a = a.trim();
            (c.to_lowercase(), (!a.is_empty()).then(|| a.to_string()))
        }
        None => (content.to_lowercase(), None),
    };

    Some(match name.as_str() {
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "upload" | "u" => Command::Upload(args),
        other => Command::Unknown(other.to_string()),
    })
}
