//! Decision core for the pod racing autopilot.
//!
//! Everything in here is pure and tick-driven: the caller owns a [`RaceState`]
//! for the lifetime of one race and feeds it one [`Telemetry`] record per tick.

pub mod boost;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod motion;
pub mod pilot;
pub mod steering;
pub mod telemetry;
pub mod thrust;
pub mod track;

pub use boost::{select_boost_target, BoostState};
pub use config::PilotConfig;
pub use error::{ConfigError, TelemetryError, TelemetryLine};
pub use geometry::{Point, Vec2};
pub use pilot::{Decision, Pilot, RaceState};
pub use steering::{BisectorSteering, CheckpointCenter, SteeringMode, SteeringTargetSelector};
pub use telemetry::{Command, Telemetry};
pub use thrust::{Estimator, Thrust, ThrustContext, ThrustPlan, ThrustPlanner};
pub use track::{Checkpoint, CheckpointTrack, TrackUpdate};
