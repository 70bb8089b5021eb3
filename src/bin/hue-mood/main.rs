//! Command-line shell for hue-mood.
//!
//! Reads bridge settings from the environment (`HUE_USER_ID`, `HUE_BRIDGE_IP`,
//! `REQUEST_TIMEOUT`, `LOG_LEVEL`) and either animates bulbs or dumps what the
//! bridge knows.
//!
//! Run with: cargo run -- mood --bulb Billy --bulb Anna -M 10

mod stop;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hue_mood::{
    AnimationGroup, Error, HueBridge, LoopExit, LoopOutcome, MaxSeconds, Settings, redact_user_id,
};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_BULBS: [&str; 3] = ["Billy", "Anna", "Sleepy"];

#[derive(Parser)]
#[command(name = "hue-mood")]
#[command(about = "Random mood lighting for Philips Hue bulbs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate bulbs until Esc or Ctrl-C, then restore them (default)
    ///
    /// Esc is read from the terminal on Unix only; elsewhere stop with Ctrl-C.
    Mood {
        /// Name of a bulb to animate; repeat for several bulbs
        #[arg(short = 'b', long = "bulb", default_values = DEFAULT_BULBS)]
        bulbs: Vec<String>,

        /// Longest transition in seconds (overrides HUE_MOOD_MAX_SECONDS, minimum 0.5)
        #[arg(short = 'M', long)]
        mood_max_seconds: Option<f64>,
    },

    /// Print the full bridge state as JSON
    State,

    /// List the lights known to the bridge
    Lights,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Mood {
            bulbs: DEFAULT_BULBS.iter().map(|b| b.to_string()).collect(),
            mood_max_seconds: None,
        }
    }
}

fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" | "critical" => Level::ERROR,
        _ => Level::INFO,
    };

    if let Err(e) = FmtSubscriber::builder().with_max_level(level).try_init() {
        eprintln!("failed to install logger: {e}");
    }
}

fn exit_code(err: &Error) -> ExitCode {
    match err {
        Error::Http { .. } => ExitCode::from(2),
        Error::JsonLoad(_) | Error::Bridge { .. } => ExitCode::from(3),
        _ => ExitCode::from(1),
    }
}

async fn show_state(bridge: &HueBridge) -> Result<(), Error> {
    let state = bridge.fetch_root().await?;
    let pretty = serde_json::to_string_pretty(&state).map_err(Error::JsonDump)?;
    println!("{pretty}");
    Ok(())
}

async fn list_lights(bridge: &HueBridge) -> Result<(), Error> {
    let lights = bridge.lights().await?;
    if lights.is_empty() {
        println!("No lights known to the bridge.");
    }
    for (id, info) in &lights {
        let name = info.get("name").and_then(|n| n.as_str()).unwrap_or("?");
        let on = info
            .get("state")
            .and_then(|s| s.get("on"))
            .and_then(|o| o.as_bool())
            .unwrap_or(false);
        println!("{id:>4}  {name:<32} {}", if on { "ON" } else { "OFF" });
    }
    Ok(())
}

async fn run_mood(bridge: HueBridge, bulbs: Vec<String>, max_seconds: Option<f64>) {
    let group = AnimationGroup::new(Arc::new(bridge), bulbs, MaxSeconds::new(max_seconds));
    if cfg!(unix) {
        info!("Press ESC (or Ctrl-C) to stop and restore bulbs...");
    } else {
        info!("Press Ctrl-C to stop and restore bulbs...");
    }

    let report = group.run(stop::wait_for_stop()).await;
    for exit in &report.loops {
        match exit {
            LoopExit::Finished(r) => match &r.outcome {
                LoopOutcome::Restored => info!(
                    "'{}': {} cycles, {} ticks written, {} failed, restored",
                    r.name, r.cycles, r.ticks_written, r.failed_writes
                ),
                LoopOutcome::RestoreFailed(reason) => {
                    warn!("'{}': could not be restored: {reason}", r.name)
                }
                LoopOutcome::NotFound => warn!("'{}': not found on the bridge", r.name),
                LoopOutcome::SetupFailed { stage, reason } => {
                    warn!("'{}': failed at {stage}: {reason}", r.name)
                }
            },
            LoopExit::TimedOut { name } => warn!("'{name}': still running at exit"),
            LoopExit::Panicked { name } => error!("'{name}': loop died"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::from_env();
    init_logging(&settings.log_level);

    let user_id = match settings.require_user_id() {
        Ok(id) => id,
        Err(e) => {
            error!("{e}. Please export HUE_USER_ID before running.");
            return ExitCode::from(1);
        }
    };
    debug!(
        "Effective configuration: bridge_ip={}, user_id={}, timeout={:?}",
        settings.bridge_ip,
        redact_user_id(user_id),
        settings.request_timeout
    );

    let bridge = match HueBridge::new(&settings) {
        Ok(bridge) => bridge,
        Err(e) => {
            error!("Cannot create bridge client: {e}");
            return exit_code(&e);
        }
    };

    let result = match cli.command.unwrap_or_default() {
        Commands::State => {
            info!("Fetching Hue bridge state from http://{}/...", settings.bridge_ip);
            show_state(&bridge).await
        }
        Commands::Lights => list_lights(&bridge).await,
        Commands::Mood {
            bulbs,
            mood_max_seconds,
        } => {
            run_mood(bridge, bulbs, mood_max_seconds).await;
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Talking to the Hue bridge at {} failed: {e}", settings.bridge_ip);
            exit_code(&e)
        }
    }
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
    fn test_mood_help_names_esc_platforms() {
        let mut cli = Cli::command();
        let help = cli
            .find_subcommand_mut("mood")
            .map(|mood| mood.render_long_help().to_string())
            .unwrap();
        assert!(help.contains("Unix only"));
        assert!(help.contains("Ctrl-C"));
    }

    #[test]
    fn test_default_command_is_mood() {
        let cli = Cli::try_parse_from(["hue-mood"]).unwrap();
        assert!(cli.command.is_none());
        match Commands::default() {
            Commands::Mood {
                bulbs,
                mood_max_seconds,
            } => {
                assert_eq!(bulbs, DEFAULT_BULBS);
                assert!(mood_max_seconds.is_none());
            }
            _ => panic!("default command is not mood"),
        }
    }

    #[test]
    fn test_mood_flags() {
        let cli =
            Cli::try_parse_from(["hue-mood", "mood", "-b", "Anna", "--bulb", "Billy", "-M", "1e30"])
                .unwrap();
        match cli.command {
            Some(Commands::Mood {
                bulbs,
                mood_max_seconds,
            }) => {
                assert_eq!(bulbs, ["Anna", "Billy"]);
                assert_eq!(mood_max_seconds, Some(1e30));
            }
            _ => panic!("expected mood"),
        }
    }
}
