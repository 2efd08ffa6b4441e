use crate::constants::*;
use crate::error::ConfigError;
use crate::steering::SteeringMode;
use crate::thrust::Estimator;
use serde::{Deserialize, Serialize};

/// Every tunable of a pilot. Missing JSON fields take the default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub id: String,
    pub description: String,

    pub steering: SteeringMode,
    /// Summed in this order.
    pub estimators: Vec<Estimator>,
    pub boost_enabled: bool,

    // Track discovery
    pub match_tolerance: i32,

    // Steering
    pub bisector_radius: f64,
    pub preempt_distance: i32,
    pub preempt_speed: i32,

    // Thrust range
    pub thrust_min: i32,
    pub thrust_max: i32,

    // Estimators
    pub distance_slowdown_range: f64,
    pub distance_slowdown_divisor: f64,
    pub angle_dead_zone_deg: f64,
    pub heading_slope: f64,
    pub heading_dead_zone_deg: f64,
    pub prediction_samples: usize,
    pub hit_radius: f64,
    pub hit_max_distance: f64,
    pub hit_min_angle_deg: f64,
    pub hit_slope: f64,
    pub hit_intercept: f64,

    // Boost gate
    pub boost_max_penalty: f64,
    pub boost_min_distance: i32,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            id: "pod-anticipate".to_string(),
            description: "Bisector steering with heading and hit-prediction braking.".to_string(),
            steering: SteeringMode::Bisector,
            estimators: vec![
                Estimator::Distance,
                Estimator::HeadingDivergence,
                Estimator::HitPrediction,
            ],
            boost_enabled: true,
            match_tolerance: MATCH_TOLERANCE,
            bisector_radius: BISECTOR_RADIUS,
            preempt_distance: PREEMPT_DISTANCE,
            preempt_speed: PREEMPT_SPEED,
            thrust_min: THRUST_MIN,
            thrust_max: THRUST_MAX,
            distance_slowdown_range: DISTANCE_SLOWDOWN_RANGE,
            distance_slowdown_divisor: DISTANCE_SLOWDOWN_DIVISOR,
            angle_dead_zone_deg: ANGLE_DEAD_ZONE_DEG,
            heading_slope: HEADING_SLOPE,
            heading_dead_zone_deg: HEADING_DEAD_ZONE_DEG,
            prediction_samples: PREDICTION_SAMPLES,
            hit_radius: HIT_RADIUS,
            hit_max_distance: HIT_MAX_DISTANCE,
            hit_min_angle_deg: HIT_MIN_ANGLE_DEG,
            hit_slope: HIT_SLOPE,
            hit_intercept: HIT_INTERCEPT,
            boost_max_penalty: BOOST_MAX_PENALTY,
            boost_min_distance: BOOST_MIN_DISTANCE,
        }
    }
}

impl PilotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::EmptyId);
        }
        if self.thrust_min < 0 || self.thrust_min > self.thrust_max || self.thrust_max > 100 {
            return Err(ConfigError::ThrustRange {
                min: self.thrust_min,
                max: self.thrust_max,
            });
        }
        let positive: [(&'static str, bool); 5] = [
            ("match_tolerance", self.match_tolerance > 0),
            ("bisector_radius", self.bisector_radius > 0.0),
            ("distance_slowdown_divisor", self.distance_slowdown_divisor > 0.0),
            ("prediction_samples", self.prediction_samples > 0),
            ("hit_radius", self.hit_radius > 0.0),
        ];
        for (field, ok) in positive {
            if !ok {
                return Err(ConfigError::NonPositive { field });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(PilotConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_thrust_range() {
        let cfg = PilotConfig {
            thrust_min: 80,
            thrust_max: 60,
            ..PilotConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ThrustRange { min: 80, max: 60 })
        );
    }

    #[test]
    fn rejects_zero_divisor() {
        let cfg = PilotConfig {
            distance_slowdown_divisor: 0.0,
            ..PilotConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "distance_slowdown_divisor"
            })
        );
    }
}
