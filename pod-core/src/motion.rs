//! Constant-velocity extrapolation of the pod's next few positions.

use crate::geometry::{Point, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub tick_offset: u32,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Lazily yields `samples` positions starting at `origin` (offset 0), each one
/// displacement further along `velocity`.
pub fn predict(origin: Point, velocity: Vec2, samples: usize) -> impl Iterator<Item = MotionSample> {
    let start = origin.to_vec2();
    (0..samples as u32).map(move |tick_offset| MotionSample {
        tick_offset,
        position: start + velocity * tick_offset as f64,
        velocity,
    })
}

/// Whether the segment `from -> to` touches the circle, i.e. the quadratic
/// `|from + t*(to - from) - center|^2 = r^2` has a root interval overlapping
/// `t in [0, 1]`.
pub fn segment_hits_circle(from: Vec2, to: Vec2, center: Vec2, radius: f64) -> bool {
    let d = to - from;
    let f = from - center;
    let a = d.dot(d);
    let c = f.dot(f) - radius * radius;
    if a == 0.0 {
        return c <= 0.0;
    }
    let b = 2.0 * f.dot(d);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return false;
    }
    let root = discriminant.sqrt();
    let t_enter = (-b - root) / (2.0 * a);
    let t_exit = (-b + root) / (2.0 * a);
    t_enter <= 1.0 && t_exit >= 0.0
}

/// Whether any consecutive pair of samples crosses the circle.
pub fn trajectory_hits_circle<I>(samples: I, center: Point, radius: f64) -> bool
where
    I: IntoIterator<Item = MotionSample>,
{
    let center = center.to_vec2();
    let mut previous: Option<Vec2> = None;
    for sample in samples {
        if let Some(from) = previous {
            if segment_hits_circle(from, sample.position, center, radius) {
                return true;
            }
        }
        previous = Some(sample.position);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_is_constant_velocity() {
        let samples: Vec<MotionSample> =
            predict(Point::new(100, 200), Vec2::new(50.0, -10.0), 7).collect();
        assert_eq!(samples.len(), 7);
        assert_eq!(samples[0].position, Vec2::new(100.0, 200.0));
        assert_eq!(samples[6].tick_offset, 6);
        assert_eq!(samples[6].position, Vec2::new(400.0, 140.0));
        assert!(samples.iter().all(|s| s.velocity == Vec2::new(50.0, -10.0)));
    }

    #[test]
    fn segment_crossing_circle() {
        let center = Vec2::new(1000.0, 0.0);
        assert!(segment_hits_circle(
            Vec2::new(0.0, 0.0),
            Vec2::new(2000.0, 0.0),
            center,
            590.0
        ));
        // Stops short of the rim.
        assert!(!segment_hits_circle(
            Vec2::new(0.0, 0.0),
            Vec2::new(400.0, 0.0),
            center,
            590.0
        ));
        // Passes beside it.
        assert!(!segment_hits_circle(
            Vec2::new(0.0, 700.0),
            Vec2::new(2000.0, 700.0),
            center,
            590.0
        ));
        // Entirely inside.
        assert!(segment_hits_circle(
            Vec2::new(990.0, 0.0),
            Vec2::new(1010.0, 0.0),
            center,
            590.0
        ));
    }

    #[test]
    fn trajectory_hit_within_horizon() {
        let checkpoint = Point::new(3000, 0);
        let toward = predict(Point::new(0, 0), Vec2::new(500.0, 0.0), 7);
        assert!(trajectory_hits_circle(toward, checkpoint, 590.0));

        let sideways = predict(Point::new(0, 0), Vec2::new(0.0, 500.0), 7);
        assert!(!trajectory_hits_circle(sideways, checkpoint, 590.0));

        let parked = predict(Point::new(0, 0), Vec2::ZERO, 7);
        assert!(!trajectory_hits_circle(parked, checkpoint, 590.0));
    }
}
