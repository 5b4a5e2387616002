//! trackhook - webhook receiver and tracking API utilities.
//!
//! # Commands
//!
//! - `trackhook serve` - Run the webhook endpoint
//! - `trackhook register-webhook` - Subscribe the webhook URL to all events
//! - `trackhook webhook-config` - Show the current webhook subscription
//! - `trackhook register-tracking <number>` - Register a tracking
//! - `trackhook get-tracking <number>` - Show a tracking and its checkpoints
//! - `trackhook delete-tracking <number>` - Delete a tracking
//! - `trackhook list-trackings` - List trackings
//! - `trackhook couriers` - List supported couriers
//! - `trackhook test-webhook` - Send a signed sample delivery

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use trackhook_config::Settings;
use trackhook_log::Level;

mod commands;
mod error;

use commands::{Context, serve, test_webhook, tracking, webhook};
use error::CliResult;

/// trackhook - shipment tracking webhooks
#[derive(Parser, Debug)]
#[command(name = "trackhook")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Webhook receiver and API utilities for shipment tracking")]
#[command(long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = format!(
    "{}\n  {} trackhook serve --bind 0.0.0.0:8080\n  {} trackhook register-webhook\n  {} trackhook get-tracking 600527447944 --courier jt\n  {} trackhook test-webhook --event trackings/checkpoint_update",
    "Examples:".bright_cyan().bold(),
    "$".dimmed(),
    "$".dimmed(),
    "$".dimmed(),
    "$".dimmed(),
))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(long, global = true, env = "TRACKHOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Skip TLS certificate verification for outbound calls
    #[arg(long, global = true)]
    insecure_tls: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the webhook endpoint
    #[command(alias = "s")]
    Serve {
        /// Address to bind, overrides the configured bind address
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Subscribe the webhook URL to every event type
    RegisterWebhook {
        /// Webhook URL, overrides the configured URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Show the current webhook subscription
    WebhookConfig,

    /// Register a tracking number
    RegisterTracking {
        /// Tracking number
        number: String,

        /// Courier code
        #[arg(short, long, default_value = "jt")]
        courier: String,

        /// Order number, random when omitted
        #[arg(short, long)]
        order_number: Option<String>,
    },

    /// Show a tracking and its checkpoints
    GetTracking {
        /// Tracking number
        number: String,

        /// Courier code
        #[arg(short, long, default_value = "jt")]
        courier: String,
    },

    /// Delete a tracking
    DeleteTracking {
        /// Tracking number
        number: String,

        /// Courier code
        #[arg(short, long, default_value = "jt")]
        courier: String,
    },

    /// List trackings
    ListTrackings,

    /// List supported couriers
    Couriers,

    /// Send a signed sample webhook
    TestWebhook {
        /// Target URL, overrides the configured webhook URL
        #[arg(short, long)]
        url: Option<String>,

        /// Event name (v1 or v2)
        #[arg(short, long, default_value = test_webhook::DEFAULT_EVENT)]
        event: String,
    },
}

impl Commands {
    fn is_server(&self) -> bool {
        matches!(self, Commands::Serve { .. })
    }

    /// Subcommand name as typed on the command line.
    fn name(&self) -> &'static str {
        match self {
            Commands::Serve { .. } => "serve",
            Commands::RegisterWebhook { .. } => "register-webhook",
            Commands::WebhookConfig => "webhook-config",
            Commands::RegisterTracking { .. } => "register-tracking",
            Commands::GetTracking { .. } => "get-tracking",
            Commands::DeleteTracking { .. } => "delete-tracking",
            Commands::ListTrackings => "list-trackings",
            Commands::Couriers => "couriers",
            Commands::TestWebhook { .. } => "test-webhook",
        }
    }
}

fn print_mini_banner() {
    println!(
        "\n  {} {} {}\n",
        "⚡".bright_yellow(),
        "trackhook".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}

fn success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg.green());
}

fn warn(msg: &str) {
    println!("  {} {}", "⚠".yellow().bold(), msg.yellow());
}

fn info(msg: &str) {
    println!("  {} {}", "→".cyan(), msg);
}

/// Level used when `TRACKHOOK_LOG_LEVEL` is not set.
fn default_level(cli: &Cli) -> Level {
    if cli.verbose {
        Level::Debug
    } else if cli.command.is_server() {
        Level::Info
    } else {
        Level::Warn
    }
}

fn init_logging(cli: &Cli) {
    let mut config = trackhook_log::config().clone();
    if std::env::var("TRACKHOOK_LOG_LEVEL").is_err() {
        config = config.level(default_level(cli));
    }
    if cli.no_color {
        config = config.with_colors(false);
    }
    config.init();
}

async fn run(cli: Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    dispatch(Context::new(settings, cli.insecure_tls), cli.command).await
}

async fn dispatch(ctx: Context, command: Commands) -> CliResult<()> {
    tracing::debug!(
        command = command.name(),
        insecure_tls = ctx.insecure_tls,
        "dispatching command"
    );

    match command {
        Commands::Serve { bind } => serve::run(&ctx, bind.as_deref()).await,
        Commands::RegisterWebhook { url } => webhook::register(&ctx, url.as_deref()).await,
        Commands::WebhookConfig => webhook::show_config(&ctx).await,
        Commands::RegisterTracking {
            number,
            courier,
            order_number,
        } => tracking::register(&ctx, &number, &courier, order_number.as_deref()).await,
        Commands::GetTracking { number, courier } => {
            tracking::get(&ctx, &number, &courier).await
        }
        Commands::DeleteTracking { number, courier } => {
            tracking::delete(&ctx, &number, &courier).await
        }
        Commands::ListTrackings => tracking::list(&ctx).await,
        Commands::Couriers => tracking::couriers(&ctx).await,
        Commands::TestWebhook { url, event } => {
            test_webhook::run(&ctx, url.as_deref(), &event).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_logging(&cli);
    print_mini_banner();

    let result: CliResult<()> = run(cli).await;

    if let Err(e) = result {
        eprintln!("\n  {} {}\n", "Error:".red().bold(), e);
        std::process::exit(1);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackhook_config::ConfigManager;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("trackhook").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_serve() {
        let cli = parse(&["serve", "--bind", "127.0.0.1:9000"]);
        assert!(matches!(cli.command, Commands::Serve { bind: Some(ref b) } if b == "127.0.0.1:9000"));
        assert_eq!(default_level(&cli), Level::Info);
    }

    #[test]
    fn test_parse_tracking_defaults() {
        let cli = parse(&["get-tracking", "600527447944"]);
        assert_eq!(default_level(&cli), Level::Warn);
        match cli.command {
            Commands::GetTracking { number, courier } => {
                assert_eq!(number, "600527447944");
                assert_eq!(courier, "jt");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = parse(&["couriers", "--insecure-tls", "-v", "--no-color"]);
        assert!(cli.insecure_tls);
        assert!(cli.no_color);
        assert_eq!(default_level(&cli), Level::Debug);
    }

    #[test]
    fn test_parse_test_webhook_default_event() {
        let cli = parse(&["test-webhook"]);
        match cli.command {
            Commands::TestWebhook { url, event } => {
                assert!(url.is_none());
                assert_eq!(event, "trackings/update");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_tracking_number_required() {
        assert!(Cli::try_parse_from(["trackhook", "delete-tracking"]).is_err());
    }

    #[test]
    fn test_command_names_match_argv() {
        for argv in [
            vec!["serve"],
            vec!["register-webhook"],
            vec!["webhook-config"],
            vec!["register-tracking", "X1"],
            vec!["get-tracking", "X1"],
            vec!["delete-tracking", "X1"],
            vec!["list-trackings"],
            vec!["couriers"],
            vec!["test-webhook"],
        ] {
            assert_eq!(parse(&argv).command.name(), argv[0]);
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_is_reported() {
        let settings = Settings::from_manager(&ConfigManager::new()).unwrap();
        let command = parse(&["couriers"]).command;

        let err = dispatch(Context::new(settings, false), command)
            .await
            .unwrap_err();
        assert!(matches!(err, error::CliError::Config(_)));
    }
}
