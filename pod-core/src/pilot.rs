//! One tick of decision making: track update, aim point, thrust.

use crate::boost::{select_boost_target, BoostState};
use crate::config::PilotConfig;
use crate::geometry::Point;
use crate::steering::{
    BisectorSteering, CheckpointCenter, SteeringInput, SteeringMode, SteeringTargetSelector,
};
use crate::telemetry::{Command, Telemetry};
use crate::thrust::{Thrust, ThrustContext, ThrustPlanner};
use crate::track::{Checkpoint, CheckpointTrack};

/// Everything remembered between ticks of a single race.
#[derive(Clone, Debug, Default)]
pub struct RaceState {
    pub track: CheckpointTrack,
    pub boost: BoostState,
    pub boost_target: Option<Checkpoint>,
    pub last_position: Option<Point>,
    pub tick: u32,
}

impl RaceState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub command: Command,
    pub current_checkpoint: Checkpoint,
    pub penalty: f64,
    /// Manhattan displacement since the previous tick.
    pub speed: i32,
    pub loop_closed_now: bool,
    pub boosted_now: bool,
    pub fallback_match: bool,
}

pub struct Pilot {
    steering: Box<dyn SteeringTargetSelector>,
    thrust: ThrustPlanner,
}

impl Pilot {
    pub fn new(config: PilotConfig) -> Self {
        let steering: Box<dyn SteeringTargetSelector> = match config.steering {
            SteeringMode::Bisector => Box::new(BisectorSteering {
                radius: config.bisector_radius,
                preempt_distance: config.preempt_distance,
                preempt_speed: config.preempt_speed,
            }),
            SteeringMode::CheckpointCenter => Box::new(CheckpointCenter {
                preempt_distance: config.preempt_distance,
                preempt_speed: config.preempt_speed,
            }),
        };
        Self::with_steering(config, steering)
    }

    pub fn with_steering(config: PilotConfig, steering: Box<dyn SteeringTargetSelector>) -> Self {
        Self {
            steering,
            thrust: ThrustPlanner::new(config),
        }
    }

    pub fn config(&self) -> &PilotConfig {
        self.thrust.config()
    }

    pub fn steering_id(&self) -> &'static str {
        self.steering.id()
    }

    pub fn tick(&self, state: &mut RaceState, telemetry: &Telemetry) -> Decision {
        let cfg = self.thrust.config();
        let own = telemetry.position;
        let reported = telemetry.next_checkpoint;

        let update = state
            .track
            .update(own, telemetry.opponent, reported, cfg.match_tolerance);
        if update.loop_closed_now {
            state.boost_target = select_boost_target(&state.track);
        }

        let velocity = state.last_position.map(|last| last.vector_to(own));
        let speed = state.last_position.map_or(0, |last| last.manhattan(own));

        let target = self.steering.compute_target(&SteeringInput {
            own,
            reported,
            current: update.current,
            next: update.next,
            after_next: update.after_next,
            track: &state.track,
            speed,
            distance_to_current: telemetry.next_checkpoint_dist,
        });

        let ctx = ThrustContext {
            distance_to_next: telemetry.next_checkpoint_dist,
            angle_to_next: telemetry.next_checkpoint_angle,
            own,
            target,
            checkpoint: reported,
            velocity,
            track_complete: state.track.is_complete(),
            at_boost_target: state
                .boost_target
                .is_some_and(|cp| cp.id == update.current.id),
        };
        let plan = self.thrust.compute(&ctx, &mut state.boost);

        state.last_position = Some(own);
        state.tick = state.tick.saturating_add(1);

        Decision {
            command: Command {
                target,
                thrust: plan.thrust,
            },
            current_checkpoint: update.current,
            penalty: plan.penalty,
            speed,
            loop_closed_now: update.loop_closed_now,
            boosted_now: plan.thrust == Thrust::Boost,
            fallback_match: update.fallback_match,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrust::Estimator;

    fn telemetry(own: (i32, i32), cp: (i32, i32), angle: i32) -> Telemetry {
        let position = Point::new(own.0, own.1);
        let next_checkpoint = Point::new(cp.0, cp.1);
        Telemetry {
            position,
            next_checkpoint,
            next_checkpoint_dist: position.distance(next_checkpoint).round() as i32,
            next_checkpoint_angle: angle,
            opponent: Point::new(own.0 + 800, own.1),
        }
    }

    #[test]
    fn first_tick_aims_at_reported_checkpoint() {
        let pilot = Pilot::new(PilotConfig::default());
        let mut state = RaceState::new();
        let decision = pilot.tick(&mut state, &telemetry((-400, 0), (8000, 0), 0));

        assert_eq!(decision.command.target, Point::new(8000, 0));
        assert_eq!(decision.command.thrust, Thrust::Power(100));
        assert_eq!(decision.current_checkpoint.id, 1);
        assert_eq!(decision.speed, 0);
        assert_eq!(state.track.len(), 2);
        assert_eq!(state.last_position, Some(Point::new(-400, 0)));
        assert_eq!(state.tick, 1);
    }

    #[test]
    fn speed_is_manhattan_displacement() {
        let pilot = Pilot::new(PilotConfig::default());
        let mut state = RaceState::new();
        pilot.tick(&mut state, &telemetry((0, 0), (8000, 0), 0));
        let decision = pilot.tick(&mut state, &telemetry((300, -200), (8000, 0), 0));
        assert_eq!(decision.speed, 500);
    }

    #[test]
    fn loop_closure_selects_boost_target_and_boosts_once() {
        let pilot = Pilot::new(PilotConfig::default());
        let mut state = RaceState::new();
        // Start guess lands on (0, 0).
        pilot.tick(&mut state, &telemetry((-400, 0), (2000, 0), 0));
        pilot.tick(&mut state, &telemetry((1800, 0), (2000, 9000), 0));
        pilot.tick(&mut state, &telemetry((2000, 8800), (0, 0), 0));
        assert!(state.track.is_complete());
        // Legs 2000, 9000, 11000: the longest ends at checkpoint 0.
        assert_eq!(state.boost_target.map(|cp| cp.id), Some(0));

        // Still racing to 0, far away and moving almost straight at the aim point.
        let first = pilot.tick(&mut state, &telemetry((2000, 8000), (0, 0), 0));
        assert!(first.boosted_now);
        assert_eq!(first.command.thrust, Thrust::Boost);

        let mut boosts = 0;
        for step in 1..5 {
            let decision = pilot.tick(&mut state, &telemetry((2000, 8000 - step * 400), (0, 0), 0));
            if decision.command.thrust == Thrust::Boost {
                boosts += 1;
            }
        }
        assert_eq!(boosts, 0);
        assert!(state.boost.is_used());
    }

    #[test]
    fn closing_tick_reports_exact_start() {
        let pilot = Pilot::new(PilotConfig::default());
        let mut state = RaceState::new();
        pilot.tick(&mut state, &telemetry((-400, 0), (5000, 0), 0));
        pilot.tick(&mut state, &telemetry((4800, 0), (5000, 5000), 0));
        let closing = pilot.tick(&mut state, &telemetry((5000, 4800), (150, -60), 0));
        assert!(closing.loop_closed_now);
        assert_eq!(closing.current_checkpoint.id, 0);
        assert_eq!(closing.current_checkpoint.position, Point::new(150, -60));
    }

    #[test]
    fn direct_pilot_ignores_layout() {
        let cfg = PilotConfig {
            id: "direct".to_string(),
            steering: SteeringMode::CheckpointCenter,
            estimators: vec![Estimator::Distance, Estimator::Angle],
            ..PilotConfig::default()
        };
        let pilot = Pilot::new(cfg);
        assert_eq!(pilot.steering_id(), "checkpoint-center");
        let mut state = RaceState::new();
        let decision = pilot.tick(&mut state, &telemetry((0, 0), (3000, 4000), 40));
        assert_eq!(decision.command.target, Point::new(3000, 4000));
        // Angle alone: 40 - 10.
        assert_eq!(decision.penalty, 30.0);
        assert_eq!(decision.command.thrust, Thrust::Power(70));
    }

    #[test]
    fn extreme_telemetry_does_not_overflow() {
        let direct = PilotConfig {
            steering: SteeringMode::CheckpointCenter,
            estimators: vec![Estimator::Distance, Estimator::Angle],
            ..PilotConfig::default()
        };
        for cfg in [PilotConfig::default(), direct] {
            let angle_braking = cfg.estimators.contains(&Estimator::Angle);
            let pilot = Pilot::new(cfg);
            let mut state = RaceState::new();

            let first = Telemetry::parse("2000000000 0 -2000000000 0 5000 0", "2000000000 0");
            let first = pilot.tick(&mut state, &first.expect("valid telemetry"));
            assert_eq!(first.command.target, Point::new(-2_000_000_000, 0));
            assert_eq!(first.command.thrust, Thrust::Power(100));

            let second = Telemetry::parse(
                "-2000000000 2000000000 -2000000000 0 2000000000 -2147483648",
                "2000000000 -2000000000",
            );
            let second = pilot.tick(&mut state, &second.expect("valid telemetry"));
            assert_eq!(second.current_checkpoint.id, 1);
            assert_eq!(second.speed, i32::MAX);
            assert_eq!(second.command.target, Point::new(-2_000_000_000, 0));
            if angle_braking {
                assert_eq!(second.command.thrust, Thrust::Power(30));
            }
        }
    }
}
