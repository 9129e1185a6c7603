//! healthbot CLI: terminal chat client for the HealthBot assistant

use clap::{Parser, Subcommand};
use healthbot_engine::{
    exchange, CompletionClient, Config, ConfigError, Conversation, HttpCompletionClient,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// HealthBot: an AI healthcare chat assistant in your terminal
#[derive(Parser)]
#[command(name = "healthbot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (missing file means defaults)
    #[arg(long, global = true, env = "HEALTHBOT_CONFIG", default_value = "healthbot.json")]
    config: PathBuf,

    /// Send requests through a backend proxy at this base URL
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Model name for direct requests
    #[arg(long, global = true)]
    model: Option<String>,

    /// Write TUI logs to this file (TUI logging is off otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Send one message and print the reply
    Ask {
        /// The question to ask
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Print the effective configuration and credential status
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Where log output goes.
enum LogTarget<'a> {
    /// No subscriber is installed.
    Off,
    Stderr,
    File(&'a Path),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match &cli.command {
        None | Some(Commands::Tui) => {
            let target = cli.log_file.as_deref().map_or(LogTarget::Off, LogTarget::File);
            init_logging(&target);
            let config = load_config_or_exit(&cli);
            let client = client_or_exit(&config);
            let rt = runtime_or_exit();
            if let Err(e) = rt.block_on(healthbot_tui::run_tui(&config, client)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Ask { message }) => {
            init_logging(&LogTarget::Stderr);
            let config = load_config_or_exit(&cli);
            cmd_ask(&config, &message.join(" "));
        }
        Some(Commands::Doctor { json }) => {
            let config = load_config_or_exit(&cli);
            cmd_doctor(&config, &cli.config, *json);
        }
        Some(Commands::Init { force }) => {
            cmd_init(&cli.config, *force);
        }
    }
}

fn init_logging(target: &LogTarget<'_>) {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match target {
        LogTarget::Off => {}
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .init();
        }
        LogTarget::File(path) => {
            let file = match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("Failed to open log file {}: {e}", path.display());
                    std::process::exit(1);
                }
            };
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
    }
}

/// Load the config file, apply flag overrides and resolve the credential.
fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = Config::load_or_default(Some(&cli.config))?;
    if let Some(base) = &cli.proxy {
        config.use_proxy(base);
    }
    if let Some(model) = &cli.model {
        config.model.clone_from(model);
    }
    config.resolve_credential();
    Ok(config)
}

fn load_config_or_exit(cli: &Cli) -> Config {
    match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    }
}

fn client_or_exit(config: &Config) -> Arc<dyn CompletionClient> {
    match HttpCompletionClient::from_config(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Failed to create HTTP client: {e}");
            std::process::exit(1);
        }
    }
}

fn runtime_or_exit() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_ask(config: &Config, message: &str) {
    if !config.is_ready() {
        eprintln!(
            "No API key found. Set {} or use --proxy <url>.",
            config.api_key_env
        );
        std::process::exit(1);
    }

    let client = client_or_exit(config);
    let rt = runtime_or_exit();
    let mut conversation = Conversation::from_config(config);

    let settled = rt.block_on(exchange(&mut conversation, client.as_ref(), message));
    let (content, failed) = match settled {
        Ok(settled) => (settled.message().content.clone(), settled.is_failure()),
        Err(rejected) => {
            eprintln!("Nothing sent: {rejected}");
            std::process::exit(1);
        }
    };

    info!(failed, messages = conversation.len(), "ask finished");
    if failed {
        eprintln!("{content}");
        std::process::exit(1);
    }
    println!("{content}");
}

fn cmd_doctor(config: &Config, path: &Path, json: bool) {
    let report = doctor_report(config, path);

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("HealthBot Configuration\n");
    println!("  Config file: {}", path.display());
    println!("  Transport:   {}", config.transport);
    println!("  Endpoint:    {}", config.endpoint_url());
    println!("  Model:       {}", config.model);
    let credential = if config.has_credential() {
        "present"
    } else {
        "missing"
    };
    println!("  API key:     {credential} (from {})", config.api_key_env);
    println!();

    if config.is_ready() {
        println!("Ready to chat");
    } else {
        println!(
            "Not ready: set {} or use --proxy <url>",
            config.api_key_env
        );
    }
}

/// Doctor output. Never includes the credential itself.
fn doctor_report(config: &Config, path: &Path) -> serde_json::Value {
    serde_json::json!({
        "config_file": path.display().to_string(),
        "config_file_exists": path.exists(),
        "transport": config.transport.to_string(),
        "endpoint": config.endpoint_url(),
        "model": config.model,
        "api_key_env": config.api_key_env,
        "credential_present": config.has_credential(),
        "ready": config.is_ready(),
    })
}

fn cmd_init(path: &Path, force: bool) {
    if path.exists() && !force {
        eprintln!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
        std::process::exit(1);
    }

    if let Err(e) = Config::default().save(path) {
        eprintln!("Failed to write {}: {e}", path.display());
        std::process::exit(1);
    }
    println!("Wrote default config to {}", path.display());
}
