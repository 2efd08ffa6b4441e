use anyhow::Result;
use clap::{Parser, Subcommand};
use pod_autopilot::bots::{create_bot, describe_bots, resolve_config, PilotBot, RacingBot};
use pod_autopilot::replay::{collect_logs, resolve_bots, run_replay, ReplayConfig};
use pod_autopilot::runner::run_race;
use pod_autopilot::util::{read_config, write_file};
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

const DEFAULT_BOT: &str = "pod-anticipate";

#[derive(Parser, Debug)]
#[command(name = "pod-autopilot")]
#[command(about = "Checkpoint racing autopilot: reads telemetry on stdin, writes commands on stdout")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Race on stdin/stdout (the default when no subcommand is given)
    Race {
        #[arg(long, conflicts_with = "config")]
        bot: Option<String>,
        /// JSON pilot config; missing fields take their defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List available bots
    ListBots,
    /// Print a bot's full config as JSON (roster id or config:<path>)
    ShowConfig {
        #[arg(long, default_value = DEFAULT_BOT)]
        bot: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replay recorded telemetry logs through one or more bots
    Replay {
        #[arg(long)]
        inputs: Option<String>,
        #[arg(long, conflicts_with = "inputs")]
        input_dir: Option<PathBuf>,
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        jobs: Option<usize>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Also write every run's command stream under <out_dir>/traces
        #[arg(long, default_value_t = false)]
        traces: bool,
    },
}

fn main() -> Result<()> {
    // stdout carries commands; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let Cli { command } = Cli::parse();
    let command = command.unwrap_or(Commands::Race {
        bot: None,
        config: None,
    });

    match command {
        Commands::Race { bot, config } => {
            let mut bot: Box<dyn RacingBot> = match config {
                Some(path) => Box::new(PilotBot::new(read_config(&path)?)),
                None => create_bot(bot.as_deref().unwrap_or(DEFAULT_BOT))?,
            };
            tracing::info!(bot = bot.id(), "race started");
            let stdin = io::stdin();
            let summary = run_race(bot.as_mut(), stdin.lock(), io::stdout().lock())?;
            tracing::info!(
                ticks = summary.ticks,
                checkpoints = summary.checkpoints,
                loop_closed_tick = ?summary.loop_closed_tick,
                boost_tick = ?summary.boost_tick,
                "race finished"
            );
        }
        Commands::ListBots => {
            for (id, description) in describe_bots() {
                println!("{id:20} {description}");
            }
        }
        Commands::ShowConfig { bot, output } => {
            let config = resolve_config(&bot)?;
            let encoded = serde_json::to_vec_pretty(&config)?;
            if let Some(path) = output {
                write_file(&path, &encoded)?;
                println!("wrote={}", path.display());
            } else {
                println!("{}", String::from_utf8_lossy(&encoded));
            }
        }
        Commands::Replay {
            inputs,
            input_dir,
            bots,
            jobs,
            out_dir,
            traces,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            let logs = collect_logs(inputs.as_deref(), input_dir.as_deref())?;
            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("replays/{}", timestamp_suffix())));

            let report = run_replay(ReplayConfig {
                bots,
                logs,
                out_dir: out_dir.clone(),
                jobs,
                write_traces: traces,
            })?;

            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("bots:");
            for (idx, bot) in report.bot_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  closed={:.0}% avg_close_tick={} boosted={:.0}% avg_thrust={:.1} min_thrust={}",
                    idx + 1,
                    bot.bot_id,
                    bot.closed_rate * 100.0,
                    bot.avg_loop_closed_tick
                        .map(|tick| format!("{tick:.1}"))
                        .unwrap_or_else(|| "-".to_string()),
                    bot.boost_rate * 100.0,
                    bot.avg_thrust,
                    bot.min_thrust
                        .map(|value| value.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
        }
    }

    Ok(())
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
