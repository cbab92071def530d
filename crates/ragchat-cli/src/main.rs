//! ragchat CLI: chat with your PDFs through a document backend

use clap::{Parser, Subcommand};
use ragchat_engine::{
    Config, ConversationController, HttpBackend, SelectedFile, Sender, CHAT_FAILURE_TEXT,
    RAGCHAT_DIR,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Terminal client for a retrieval-augmented document chat backend
#[derive(Parser)]
#[command(name = "ragchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Config file (default: .ragchat/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show message text literally instead of rendering markdown
    #[arg(long, global = true)]
    plain: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Upload a PDF and print the resulting status
    Upload {
        /// PDF file to upload
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask one question and print the answer
    Ask {
        /// The question
        message: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the backend is reachable
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let tui_mode = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(cli.verbose, tui_mode);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    let ok = match cli.command {
        None | Some(Commands::Tui) => match rt.block_on(ragchat_tui::run_tui(&config)) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("Error: {e}");
                false
            }
        },
        Some(Commands::Upload { file, json }) => rt.block_on(cmd_upload(&config, file, json)),
        Some(Commands::Ask { message, json }) => rt.block_on(cmd_ask(&config, message, json)),
        Some(Commands::Doctor { json }) => rt.block_on(cmd_doctor(&config, json)),
    };

    if !ok {
        std::process::exit(1);
    }
}

/// Load config from `--config` or the default location, then apply flags.
fn load_config(cli: &Cli) -> Result<Config, ragchat_engine::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path(Path::new(".")))?,
    };

    if let Some(server) = &cli.server {
        config.server_url.clone_from(server);
    }
    if cli.plain {
        config.render_markdown = false;
    }
    Ok(config)
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so in TUI mode logs go to a file instead.
fn init_logging(verbose: u8, tui_mode: bool) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    if tui_mode {
        let dir = Path::new(RAGCHAT_DIR);
        let file = std::fs::create_dir_all(dir)
            .and_then(|()| std::fs::File::create(dir.join("ragchat.log")));
        // Without a log file the TUI runs silently
        if let Ok(file) = file {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn connect(config: &Config) -> Option<Arc<HttpBackend>> {
    match HttpBackend::new(&config.server_url) {
        Ok(backend) => Some(Arc::new(backend)),
        Err(e) => {
            eprintln!("Error: {e}");
            None
        }
    }
}

async fn cmd_upload(config: &Config, file: PathBuf, json: bool) -> bool {
    let Some(backend) = connect(config) else {
        return false;
    };
    let mut controller = ConversationController::new(backend);

    info!(file = %file.display(), "Uploading");
    let status = controller.upload(SelectedFile::from_path(file)).await;

    if json {
        match serde_json::to_string_pretty(&status) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("Failed to serialize status: {e}"),
        }
    } else {
        println!("{}", status.text);
    }
    !status.is_error()
}

async fn cmd_ask(config: &Config, message: String, json: bool) -> bool {
    let Some(backend) = connect(config) else {
        return false;
    };
    let mut controller = ConversationController::new(backend);

    controller.input_mut().set_content(message);
    if !controller.send().await {
        eprintln!("Error: message is empty");
        return false;
    }

    let conversation = controller.conversation();
    let Some(reply) = conversation.last().filter(|m| m.sender == Sender::Bot) else {
        eprintln!("Error: no reply");
        return false;
    };

    if json {
        match serde_json::to_string_pretty(conversation) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("Failed to serialize conversation: {e}"),
        }
    } else {
        println!("{}", reply.text);
        if let Some(sources) = reply.sources_line() {
            println!("\n{sources}");
        }
    }
    reply.text != CHAT_FAILURE_TEXT
}

async fn cmd_doctor(config: &Config, json: bool) -> bool {
    let Some(backend) = connect(config) else {
        return false;
    };

    let result = backend.probe().await;

    if json {
        let report = serde_json::json!({
            "server_url": backend.base_url(),
            "reachable": result.is_ok(),
            "status": result.as_ref().ok(),
            "error": result.as_ref().err().map(ToString::to_string),
        });
        println!("{report:#}");
    } else {
        match &result {
            Ok(status) => println!("✓ {} reachable (HTTP {status})", backend.base_url()),
            Err(e) => println!("✗ {} unreachable: {e}", backend.base_url()),
        }
    }
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_tui() {
        let cli = Cli::parse_from(["ragchat"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ragchat", "ask", "hello", "--server", "http://x:1", "-vv"]);
        assert_eq!(cli.server.as_deref(), Some("http://x:1"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Some(Commands::Ask { ref message, json: false }) if message == "hello"
        ));
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"server_url": "http://from-file:1"}"#).unwrap();

        let cli = Cli::parse_from([
            "ragchat",
            "--config",
            path.to_str().unwrap(),
            "--plain",
            "--server",
            "http://flag:2",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.server_url, "http://flag:2");
        assert!(!config.render_markdown);

        let cli = Cli::parse_from(["ragchat", "--config", path.to_str().unwrap()]);
        assert_eq!(load_config(&cli).unwrap().server_url, "http://from-file:1");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let cli = Cli::parse_from(["ragchat", "--config", "/definitely/not/here.json"]);
        assert!(load_config(&cli).is_err());
    }
}
