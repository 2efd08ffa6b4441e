use crate::util::read_config;
use anyhow::{anyhow, Result};
use pod_racer_core::{Decision, Pilot, PilotConfig, RaceState, Telemetry};
use std::path::Path;

mod roster;

pub use roster::bot_config;

/// Prefix for bots loaded from a JSON `PilotConfig` instead of the roster.
pub const CONFIG_BOT_PREFIX: &str = "config:";

pub trait RacingBot: Send {
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    /// Forget everything learned about the current race.
    fn reset(&mut self);
    fn next_command(&mut self, telemetry: &Telemetry) -> Decision;
    fn race_state(&self) -> &RaceState;
}

/// A [`Pilot`] plus the per-race state it drives.
pub struct PilotBot {
    pilot: Pilot,
    state: RaceState,
}

impl PilotBot {
    pub fn new(config: PilotConfig) -> Self {
        Self {
            pilot: Pilot::new(config),
            state: RaceState::new(),
        }
    }
}

impl RacingBot for PilotBot {
    fn id(&self) -> &str {
        &self.pilot.config().id
    }

    fn description(&self) -> &str {
        &self.pilot.config().description
    }

    fn reset(&mut self) {
        self.state = RaceState::new();
    }

    fn next_command(&mut self, telemetry: &Telemetry) -> Decision {
        self.pilot.tick(&mut self.state, telemetry)
    }

    fn race_state(&self) -> &RaceState {
        &self.state
    }
}

pub fn bot_ids() -> Vec<&'static str> {
    roster::presets().iter().map(|preset| preset.id).collect()
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    roster::presets()
        .iter()
        .map(|preset| (preset.id, preset.description))
        .collect()
}

/// Resolves a roster id or a `config:<path>` reference into a validated config.
pub fn resolve_config(bot_id: &str) -> Result<PilotConfig> {
    if let Some(path) = bot_id.strip_prefix(CONFIG_BOT_PREFIX) {
        return read_config(Path::new(path));
    }
    bot_config(bot_id).ok_or_else(|| {
        let available = bot_ids().join(", ");
        anyhow!("unknown bot '{bot_id}'. available: {available}, or {CONFIG_BOT_PREFIX}<path>")
    })
}

pub fn create_bot(bot_id: &str) -> Result<Box<dyn RacingBot>> {
    let config = resolve_config(bot_id)?;
    Ok(Box::new(PilotBot::new(config)))
}
