//! Offline replay: feeds recorded telemetry streams through one or more bots.
//!
//! A log is the exact stdin of a race. The pod does not react to the bot's
//! commands here, so this measures track discovery and thrust/boost behavior,
//! not lap times.

use crate::bots::bot_ids;
use crate::runner::{run_bot, RaceSummary};
use crate::util::{list_files, parse_csv_list, safe_name, safe_stem, write_file};
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct ReplayConfig {
    pub bots: Vec<String>,
    pub logs: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
    pub write_traces: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayMetrics {
    pub bot_id: String,
    pub log: String,
    pub ticks: u32,
    pub checkpoints: usize,
    pub track_complete: bool,
    pub loop_closed_tick: Option<u32>,
    pub boost_tick: Option<u32>,
    pub fallback_matches: u32,
    pub avg_thrust: f64,
    pub min_thrust: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub runs: usize,
    pub closed_rate: f64,
    pub avg_loop_closed_tick: Option<f64>,
    pub boost_rate: f64,
    pub avg_thrust: f64,
    pub min_thrust: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayReport {
    pub generated_unix_s: u64,
    pub jobs: Option<usize>,
    pub bots: Vec<String>,
    pub logs: Vec<String>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<ReplayMetrics>,
}

struct InternalRun {
    metrics: ReplayMetrics,
    trace: Vec<u8>,
}

pub fn resolve_bots(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(bot_ids().iter().map(|id| (*id).to_string()).collect()),
        Some(raw) => parse_csv_list(raw, "--bots"),
    }
}

/// Log files from an explicit comma-separated list, or every file in a directory.
pub fn collect_logs(inputs: Option<&str>, input_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    if let Some(dir) = input_dir {
        return list_files(dir);
    }
    match inputs {
        Some(raw) => Ok(parse_csv_list(raw, "--inputs")?
            .into_iter()
            .map(PathBuf::from)
            .collect()),
        None => Err(anyhow!("replay requires --inputs or --input-dir")),
    }
}

fn metrics_from(summary: RaceSummary, log: &str) -> ReplayMetrics {
    ReplayMetrics {
        bot_id: summary.bot_id,
        log: log.to_string(),
        ticks: summary.ticks,
        checkpoints: summary.checkpoints,
        track_complete: summary.track_complete,
        loop_closed_tick: summary.loop_closed_tick,
        boost_tick: summary.boost_tick,
        fallback_matches: summary.fallback_matches,
        avg_thrust: summary.avg_thrust,
        min_thrust: summary.min_thrust,
    }
}

pub fn run_replay(config: ReplayConfig) -> Result<ReplayReport> {
    if config.logs.is_empty() {
        return Err(anyhow!("replay requires at least one log"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("replay requires at least one bot"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("replay --jobs must be >= 1 when provided"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let mut logs = Vec::with_capacity(config.logs.len());
    for path in &config.logs {
        let bytes =
            fs::read(path).with_context(|| format!("failed reading log {}", path.display()))?;
        logs.push((safe_stem(path), bytes));
    }

    let run_jobs: Vec<(&str, usize)> = config
        .bots
        .iter()
        .flat_map(|bot| (0..logs.len()).map(move |idx| (bot.as_str(), idx)))
        .collect();

    let run_one = |&(bot_id, log_idx): &(&str, usize)| -> Result<InternalRun> {
        let (log_name, bytes) = &logs[log_idx];
        let mut trace = Vec::new();
        let summary = run_bot(bot_id, bytes.as_slice(), &mut trace)
            .with_context(|| format!("replay failed for bot={bot_id} log={log_name}"))?;
        Ok(InternalRun {
            metrics: metrics_from(summary, log_name),
            trace,
        })
    };

    let run_results: Vec<Result<InternalRun>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }

    if config.write_traces {
        let trace_dir = config.out_dir.join("traces");
        for run in &runs {
            let name = format!("{}-{}.out", safe_name(&run.metrics.bot_id), run.metrics.log);
            write_file(&trace_dir.join(name), &run.trace)?;
        }
    }

    let metrics: Vec<ReplayMetrics> = runs.into_iter().map(|run| run.metrics).collect();
    let rankings = rank_bots(&metrics);

    write_runs_csv(&config.out_dir.join("runs.csv"), &metrics)?;

    let report = ReplayReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        jobs: config.jobs,
        bots: config.bots,
        logs: logs.into_iter().map(|(name, _)| name).collect(),
        run_count: metrics.len(),
        bot_rankings: rankings,
        runs: metrics,
    };

    let report_path = config.out_dir.join("summary.json");
    write_file(
        &report_path,
        &serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )?;

    Ok(report)
}

/// Best first: more closed loops, then earlier closure, then more thrust.
fn rank_bots(runs: &[ReplayMetrics]) -> Vec<BotAggregate> {
    let mut grouped: HashMap<&str, Vec<&ReplayMetrics>> = HashMap::new();
    for run in runs {
        grouped.entry(run.bot_id.as_str()).or_default().push(run);
    }

    let mut rankings: Vec<BotAggregate> = grouped
        .into_iter()
        .map(|(bot_id, bot_runs)| {
            let count = bot_runs.len() as f64;
            let closed: Vec<u32> = bot_runs.iter().filter_map(|r| r.loop_closed_tick).collect();
            let avg_loop_closed_tick = if closed.is_empty() {
                None
            } else {
                Some(closed.iter().map(|&t| f64::from(t)).sum::<f64>() / closed.len() as f64)
            };
            let boosted = bot_runs.iter().filter(|r| r.boost_tick.is_some()).count();
            BotAggregate {
                bot_id: bot_id.to_string(),
                runs: bot_runs.len(),
                closed_rate: closed.len() as f64 / count,
                avg_loop_closed_tick,
                boost_rate: boosted as f64 / count,
                avg_thrust: bot_runs.iter().map(|r| r.avg_thrust).sum::<f64>() / count,
                min_thrust: bot_runs.iter().filter_map(|r| r.min_thrust).min(),
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.closed_rate
            .total_cmp(&a.closed_rate)
            .then_with(|| {
                let a_tick = a.avg_loop_closed_tick.unwrap_or(f64::INFINITY);
                let b_tick = b.avg_loop_closed_tick.unwrap_or(f64::INFINITY);
                a_tick.total_cmp(&b_tick)
            })
            .then_with(|| b.avg_thrust.total_cmp(&a.avg_thrust))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });
    rankings
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_runs_csv(path: &Path, rows: &[ReplayMetrics]) -> Result<()> {
    let mut csv = String::from(
        "bot_id,log,ticks,checkpoints,track_complete,loop_closed_tick,boost_tick,fallback_matches,avg_thrust,min_thrust\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{:.2},{}\n",
            row.bot_id,
            row.log,
            row.ticks,
            row.checkpoints,
            row.track_complete,
            optional(row.loop_closed_tick),
            optional(row.boost_tick),
            row.fallback_matches,
            row.avg_thrust,
            optional(row.min_thrust),
        ));
    }
    write_file(path, csv.as_bytes())
}
