//! Thrust planning.
//!
//! Slowdown is the sum of an ordered list of independent estimators, each a
//! pure function of the tick context. The summed penalty is taken off full
//! thrust and clamped; the boost gate can replace the result once per race.

use crate::boost::BoostState;
use crate::config::PilotConfig;
use crate::geometry::{Point, Vec2};
use crate::motion::{predict, trajectory_hits_circle};
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimator {
    /// Brakes on approach while the layout is still being discovered.
    Distance,
    /// Brakes while the pod faces away from the checkpoint.
    Angle,
    /// Brakes while the pod drifts away from the aim point.
    HeadingDivergence,
    /// Brakes on a close, sharp approach that would miss the checkpoint.
    HitPrediction,
}

/// Per-tick inputs shared by all estimators and the boost gate.
#[derive(Clone, Copy, Debug)]
pub struct ThrustContext {
    pub distance_to_next: i32,
    pub angle_to_next: i32,
    pub own: Point,
    pub target: Point,
    /// Center of the checkpoint currently being raced to.
    pub checkpoint: Point,
    /// Displacement over the last tick; `None` on the first tick.
    pub velocity: Option<Vec2>,
    pub track_complete: bool,
    pub at_boost_target: bool,
}

impl Estimator {
    /// Non-negative slowdown contributed by this estimator.
    pub fn penalty(self, ctx: &ThrustContext, cfg: &PilotConfig) -> f64 {
        let raw = match self {
            Self::Distance => {
                if ctx.track_complete {
                    0.0
                } else {
                    (cfg.distance_slowdown_range - f64::from(ctx.distance_to_next))
                        / cfg.distance_slowdown_divisor
                }
            }
            Self::Angle => f64::from(ctx.angle_to_next).abs() - cfg.angle_dead_zone_deg,
            Self::HeadingDivergence => {
                let Some(velocity) = ctx.velocity else {
                    return 0.0;
                };
                match velocity.angle_to(ctx.own.vector_to(ctx.target)) {
                    Some(angle) => cfg.heading_slope * angle - cfg.heading_dead_zone_deg,
                    None => 0.0,
                }
            }
            Self::HitPrediction => {
                let Some(velocity) = ctx.velocity else {
                    return 0.0;
                };
                let distance = f64::from(ctx.distance_to_next);
                if distance >= cfg.hit_max_distance
                    || f64::from(ctx.angle_to_next).abs() <= cfg.hit_min_angle_deg
                {
                    return 0.0;
                }
                let samples = predict(ctx.own, velocity, cfg.prediction_samples);
                if trajectory_hits_circle(samples, ctx.checkpoint, cfg.hit_radius) {
                    0.0
                } else {
                    cfg.hit_slope * distance + cfg.hit_intercept
                }
            }
        };
        raw.max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Thrust {
    Power(i32),
    Boost,
}

impl Thrust {
    pub fn power(self) -> Option<i32> {
        match self {
            Self::Power(value) => Some(value),
            Self::Boost => None,
        }
    }
}

impl fmt::Display for Thrust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power(value) => write!(f, "{value}"),
            Self::Boost => write!(f, "BOOST"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrustPlan {
    pub thrust: Thrust,
    pub penalty: f64,
}

pub struct ThrustPlanner {
    config: PilotConfig,
}

impl ThrustPlanner {
    pub fn new(config: PilotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PilotConfig {
        &self.config
    }

    pub fn total_penalty(&self, ctx: &ThrustContext) -> f64 {
        self.config
            .estimators
            .iter()
            .map(|estimator| estimator.penalty(ctx, &self.config))
            .sum()
    }

    pub fn compute(&self, ctx: &ThrustContext, boost: &mut BoostState) -> ThrustPlan {
        let cfg = &self.config;
        let penalty = self.total_penalty(ctx);
        let power = cfg
            .thrust_max
            .saturating_sub(penalty.round() as i32)
            .clamp(cfg.thrust_min, cfg.thrust_max);

        let boost_ready = cfg.boost_enabled
            && ctx.track_complete
            && ctx.at_boost_target
            && penalty < cfg.boost_max_penalty
            && ctx.distance_to_next > cfg.boost_min_distance;

        let thrust = if boost_ready && boost.fire() {
            Thrust::Boost
        } else {
            Thrust::Power(power)
        };

        ThrustPlan { thrust, penalty }
    }
}
