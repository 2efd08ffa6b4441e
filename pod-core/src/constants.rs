//! Default tunables. Every value here can be overridden through [`crate::PilotConfig`].

// Track discovery
pub const MATCH_TOLERANCE: i32 = 600; // axis-aligned box half-width

// Steering
pub const BISECTOR_RADIUS: f64 = 400.0;
pub const PREEMPT_DISTANCE: i32 = 1500;
pub const PREEMPT_SPEED: i32 = 500; // manhattan units per tick
pub const STRAIGHT_LEG_DEG: f64 = 0.5;

// Thrust range
pub const THRUST_MIN: i32 = 30;
pub const THRUST_MAX: i32 = 100;

// Distance estimator: (range - distance) / divisor
pub const DISTANCE_SLOWDOWN_RANGE: f64 = 2000.0;
pub const DISTANCE_SLOWDOWN_DIVISOR: f64 = 20.0;

// Angle estimator: |angle| - dead zone
pub const ANGLE_DEAD_ZONE_DEG: f64 = 10.0;

// Heading divergence estimator: slope * |angle| - dead zone
pub const HEADING_SLOPE: f64 = 0.75;
pub const HEADING_DEAD_ZONE_DEG: f64 = 8.0;

// Hit prediction estimator
pub const PREDICTION_SAMPLES: usize = 7;
pub const HIT_RADIUS: f64 = 590.0;
pub const HIT_MAX_DISTANCE: f64 = 4000.0;
pub const HIT_MIN_ANGLE_DEG: f64 = 18.0;
pub const HIT_SLOPE: f64 = -0.0264706; // full slowdown at 0, ~0 at 4000
pub const HIT_INTERCEPT: f64 = 105.8824;

// Boost gate
pub const BOOST_MAX_PENALTY: f64 = 5.0;
pub const BOOST_MIN_DISTANCE: i32 = 4000;
