//! gapit CLI
//!
//! Drives a GAPIS server to export replayable instruction streams and
//! assets from recorded graphics traces.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::time::Duration;

use gapit::commands::{execute_export_replay, ExportReplayArgs, Outcome};
use gapit::rpc::HttpConnector;
use gapit::utils::config::{ConnectionConfig, DEFAULT_EXPORT_DIR, DEFAULT_GAPIS_ENDPOINT};
use gapit::utils::{Context, InterruptGuard};

/// gapit - graphics API debugger command-line tools
#[derive(Parser, Debug)]
#[command(name = "gapit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verb to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available verbs
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export replay vm instruction and assets.
    #[command(name = "export_replay")]
    ExportReplay {
        /// GAPIS endpoint URL
        #[arg(long, env = "GAPIS_ENDPOINT", default_value = DEFAULT_GAPIS_ENDPOINT)]
        gapis: String,

        /// Auth token for the GAPIS server
        #[arg(long, env = "GAPIS_TOKEN")]
        gapis_token: Option<String>,

        /// Serial of the device to replay on
        #[arg(long, env = "GAPIR_DEVICE")]
        gapir_device: Option<String>,

        /// Output directory for the exported replay
        #[arg(short, long, default_value = DEFAULT_EXPORT_DIR)]
        out: PathBuf,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Path to the gfx trace file
        #[arg(value_name = "TRACE")]
        traces: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute verb
    match cli.command {
        Commands::ExportReplay {
            gapis,
            gapis_token,
            gapir_device,
            out,
            timeout,
            traces,
        } => {
            let ctx = match timeout {
                Some(secs) => Context::new().with_timeout(Duration::from_secs(secs)),
                None => Context::new(),
            };
            let _interrupts = InterruptGuard::install(&ctx)?;

            let args = ExportReplayArgs {
                traces,
                connection: ConnectionConfig {
                    gapis,
                    token: gapis_token,
                    gapir_device,
                },
                out,
            };

            if let Outcome::Usage(message) = execute_export_replay(&ctx, &HttpConnector, &args)? {
                print_usage("export_replay", &message);
            }
        }
    }

    Ok(())
}

/// Report a malformed invocation without failing the process
///
/// **Private** - internal helper
fn print_usage(verb: &str, message: &str) {
    eprintln!("{}", message);

    let mut command = Cli::command();
    if let Some(sub) = command.find_subcommand_mut(verb) {
        eprintln!("{}", sub.render_usage());
    }
}
