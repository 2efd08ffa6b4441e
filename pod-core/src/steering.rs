//! Aim point selection.
//!
//! Driving straight at a checkpoint center means a late, sharp turn on arrival.
//! [`BisectorSteering`] instead aims at a point on the checkpoint rim that lies
//! along the bisector of the turn, so the pod is already swinging toward the
//! following leg when it passes.

use crate::constants::STRAIGHT_LEG_DEG;
use crate::geometry::Point;
use crate::track::{Checkpoint, CheckpointTrack};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringMode {
    Bisector,
    CheckpointCenter,
}

/// Everything a selector may look at for one tick.
#[derive(Clone, Copy, Debug)]
pub struct SteeringInput<'a> {
    pub own: Point,
    /// Exact next-checkpoint position from telemetry.
    pub reported: Point,
    pub current: Checkpoint,
    pub next: Option<Checkpoint>,
    pub after_next: Option<Checkpoint>,
    pub track: &'a CheckpointTrack,
    pub speed: i32,
    pub distance_to_current: i32,
}

pub trait SteeringTargetSelector: Send + Sync {
    fn id(&self) -> &'static str;
    fn compute_target(&self, input: &SteeringInput<'_>) -> Point;
}

/// Aims at the reported checkpoint center, or at the following center when
/// a closed track shows the pod about to pass the current one at speed.
pub struct CheckpointCenter {
    pub preempt_distance: i32,
    pub preempt_speed: i32,
}

impl SteeringTargetSelector for CheckpointCenter {
    fn id(&self) -> &'static str {
        "checkpoint-center"
    }

    fn compute_target(&self, input: &SteeringInput<'_>) -> Point {
        match input.next {
            Some(next)
                if input.track.is_complete()
                    && input.distance_to_current < self.preempt_distance
                    && input.speed > self.preempt_speed =>
            {
                next.position
            }
            _ => input.reported,
        }
    }
}

pub struct BisectorSteering {
    pub radius: f64,
    pub preempt_distance: i32,
    pub preempt_speed: i32,
}

impl SteeringTargetSelector for BisectorSteering {
    fn id(&self) -> &'static str {
        "bisector"
    }

    fn compute_target(&self, input: &SteeringInput<'_>) -> Point {
        if !input.track.is_complete() {
            return input.reported;
        }
        let (Some(next), Some(after_next)) = (input.next, input.after_next) else {
            return input.reported;
        };

        if input.distance_to_current < self.preempt_distance && input.speed > self.preempt_speed {
            // About to pass the current checkpoint at speed: plan the turn after it.
            desired_point(
                input.current.position,
                next.position,
                after_next.position,
                self.radius,
                input.own.distance(next.position),
                input.current.distance_to_next,
            )
        } else {
            let previous_leg = input
                .track
                .predecessor_of(input.current.id)
                .map(|cp| cp.distance_to_next)
                .unwrap_or(0);
            desired_point(
                input.own,
                input.current.position,
                next.position,
                self.radius,
                input.distance_to_current as f64,
                previous_leg,
            )
        }
    }
}

/// Rim point of `p2` on the bisector of the turn `p1 -> p2 -> p3`.
///
/// The offset leans toward the exit leg. When the pod is still further than a
/// third of the incoming leg away, the offset is mirrored to the far rim so the
/// turn is under way by arrival. Straight and degenerate legs return `p2`.
pub fn desired_point(
    p1: Point,
    p2: Point,
    p3: Point,
    radius: f64,
    distance_to_pivot: f64,
    previous_leg: i32,
) -> Point {
    let vec_in = p1.vector_to(p2);
    let vec_out = p2.vector_to(p3);
    let Some(angle) = vec_in.angle_to(vec_out) else {
        return p2;
    };
    if angle < STRAIGHT_LEG_DEG {
        return p2;
    }

    let (sin, cos) = (angle / 2.0).to_radians().sin_cos();
    let factor = projection_factor(radius, cos, sin);

    let mut x = (cos * factor).abs().round() as i32;
    let mut y = (sin * factor).abs().round() as i32;
    if vec_out.x < 0.0 {
        x = -x;
    }
    if vec_out.y < 0.0 {
        y = -y;
    }

    if distance_to_pivot > previous_leg as f64 / 3.0 {
        x = -x;
        y = -y;
    }

    p2.offset(x, y)
}

/// `min(|r / cos|, |r / sin|)`, skipping whichever term divides by ~0.
fn projection_factor(radius: f64, cos: f64, sin: f64) -> f64 {
    const EPS: f64 = 1e-9;
    let by_cos = if cos.abs() > EPS {
        (radius / cos).abs()
    } else {
        f64::INFINITY
    };
    let by_sin = if sin.abs() > EPS {
        (radius / sin).abs()
    } else {
        f64::INFINITY
    };
    let factor = by_cos.min(by_sin);
    if factor.is_finite() {
        factor
    } else {
        radius
    }
}
