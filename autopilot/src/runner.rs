use crate::bots::{create_bot, RacingBot};
use anyhow::{Context, Result};
use pod_racer_core::{Decision, Telemetry, TelemetryError, Thrust};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub bot_id: String,
    pub ticks: u32,
    pub checkpoints: usize,
    pub track_complete: bool,
    pub loop_closed_tick: Option<u32>,
    pub boost_tick: Option<u32>,
    pub fallback_matches: u32,
    pub avg_thrust: f64,
    pub min_thrust: Option<i32>,
}

pub fn run_bot<R: BufRead, W: Write>(bot_id: &str, input: R, output: W) -> Result<RaceSummary> {
    let mut bot = create_bot(bot_id)?;
    run_race(bot.as_mut(), input, output)
}

/// Reads two telemetry lines per tick and answers each with one command line.
/// Input ending cleanly between ticks ends the race.
pub fn run_race<R: BufRead, W: Write>(
    bot: &mut dyn RacingBot,
    input: R,
    mut output: W,
) -> Result<RaceSummary> {
    bot.reset();
    let mut summary = RaceSummary {
        bot_id: bot.id().to_string(),
        ..RaceSummary::default()
    };
    let mut thrust_sum: i64 = 0;
    let mut power_ticks: u32 = 0;

    let mut lines = input.lines();
    while let Some(pod_line) = lines.next() {
        let pod_line = pod_line.context("failed reading telemetry")?;
        if pod_line.trim().is_empty() {
            continue;
        }
        let opponent_line = lines
            .next()
            .ok_or(TelemetryError::TruncatedTick)
            .with_context(|| format!("tick {}", summary.ticks))?
            .context("failed reading telemetry")?;
        let telemetry = Telemetry::parse(&pod_line, &opponent_line)
            .with_context(|| format!("tick {}", summary.ticks))?;

        let decision = bot.next_command(&telemetry);
        log_decision(bot, summary.ticks, &decision);

        writeln!(output, "{}", decision.command).context("failed writing command")?;
        output.flush().context("failed flushing command")?;

        if decision.loop_closed_now {
            summary.loop_closed_tick = Some(summary.ticks);
        }
        if decision.fallback_match {
            summary.fallback_matches += 1;
        }
        match decision.command.thrust {
            Thrust::Boost => summary.boost_tick = Some(summary.ticks),
            Thrust::Power(power) => {
                thrust_sum += i64::from(power);
                power_ticks += 1;
                summary.min_thrust = Some(summary.min_thrust.map_or(power, |min| min.min(power)));
            }
        }
        summary.ticks += 1;
    }

    let state = bot.race_state();
    summary.checkpoints = state.track.len();
    summary.track_complete = state.track.is_complete();
    if power_ticks > 0 {
        summary.avg_thrust = thrust_sum as f64 / f64::from(power_ticks);
    }
    Ok(summary)
}

fn log_decision(bot: &dyn RacingBot, tick: u32, decision: &Decision) {
    let state = bot.race_state();
    if decision.loop_closed_now {
        tracing::info!(
            tick,
            checkpoints = state.track.len(),
            boost_target = ?state.boost_target.map(|cp| cp.id),
            "track loop closed"
        );
    }
    if decision.boosted_now {
        tracing::info!(tick, checkpoint = decision.current_checkpoint.id, "boost");
    }
    if decision.fallback_match {
        tracing::warn!(
            tick,
            nearest = decision.current_checkpoint.id,
            "reported checkpoint matched nothing on a closed track"
        );
    }
    tracing::debug!(
        tick,
        checkpoint = decision.current_checkpoint.id,
        target_x = decision.command.target.x,
        target_y = decision.command.target.y,
        thrust = %decision.command.thrust,
        penalty = decision.penalty,
        speed = decision.speed,
        "decision"
    );
    for cp in state.track.checkpoints() {
        tracing::trace!(
            tick,
            id = cp.id,
            x = cp.position.x,
            y = cp.position.y,
            distance_to_next = cp.distance_to_next,
            current = cp.id == decision.current_checkpoint.id,
            "checkpoint"
        );
    }
}
