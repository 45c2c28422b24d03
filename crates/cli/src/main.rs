mod commands;
mod config;
mod history;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Synthetic health-coaching journeys.
#[derive(Parser)]
#[command(
    name = "careline",
    version,
    about = "Synthetic health-coaching journey generator"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(
        long,
        global = true,
        env = "CARELINE_DEBUG",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    debug: bool,

    /// TOML file with journey configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a journey and print it as JSON
    Generate {
        /// Seed for a reproducible journey
        #[arg(long, env = "CARELINE_SEED")]
        seed: Option<u64>,
        /// Number of simulated weeks
        #[arg(long)]
        weeks: Option<u32>,
        /// Print {timeline_events, chat_messages} instead of a flat list
        #[arg(long)]
        split: bool,
    },

    /// Explain a query against a saved journey
    Explain {
        /// Free-text question
        query: String,
        /// Journey JSON (flat list or split object)
        #[arg(long)]
        journey: PathBuf,
        /// Seed for the phrasing of the explanation
        #[arg(long, env = "CARELINE_SEED")]
        seed: Option<u64>,
    },

    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,
        /// Seed applied to every generated journey unless a request overrides it
        #[arg(long, env = "CARELINE_SEED")]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.quiet);

    let base = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Generate { seed, weeks, split } => {
            let overrides = config::Overrides { seed, weeks };
            commands::generate::cmd_generate(base, overrides, split, cli.output, cli.quiet);
        }
        Commands::Explain {
            query,
            journey,
            seed,
        } => {
            commands::explain::cmd_explain(&query, &journey, seed, cli.output, cli.quiet);
        }
        Commands::Serve { port, seed } => {
            let overrides = config::Overrides { seed, weeks: None };
            let config = match overrides.apply(base) {
                Ok(c) => c,
                Err(e) => {
                    report_error(&e.to_string(), cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    report_error(&format!("failed to create tokio runtime: {}", e), cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(port, config)) {
                report_error(&format!("Server error: {}", e), cli.output, cli.quiet);
                process::exit(1);
            }
        }
    }
}

/// `info` by default, `debug` with `--debug`, `warn` with `--quiet`.
/// `RUST_LOG` overrides all of them.
fn init_logging(debug: bool, quiet: bool) {
    let level = match (debug, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
