//! Checkpoint memory: discovers the loop one sighting at a time.
//!
//! Checkpoints get ids in first-sighting order. Id 0 starts out as a guess
//! (the start line is never reported on the first lap) and is overwritten with
//! exact coordinates when it is targeted again, which also closes the loop.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: usize,
    pub position: Point,
    /// Manhattan length of the leg to the successor; 0 until the loop closes.
    pub distance_to_next: i32,
}

/// Outcome of feeding one tick's reported checkpoint into the track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackUpdate {
    pub current: Checkpoint,
    /// Only known once the loop is closed.
    pub next: Option<Checkpoint>,
    pub after_next: Option<Checkpoint>,
    pub loop_closed_now: bool,
    /// The reported checkpoint matched nothing on a closed track and the
    /// nearest known checkpoint was used instead.
    pub fallback_match: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CheckpointTrack {
    checkpoints: Vec<Checkpoint>,
    complete: bool,
}

/// The start line sits between the two pods on the first tick.
pub fn guess_start_checkpoint(own: Point, opponent: Point) -> Point {
    own.midpoint(opponent)
}

impl CheckpointTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn get(&self, id: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(id)
    }

    /// First checkpoint (in discovery order) inside the axis-aligned box of
    /// half-width `tolerance` around `position`.
    pub fn match_at(&self, position: Point, tolerance: i32) -> Option<&Checkpoint> {
        let tolerance = u32::try_from(tolerance).ok()?;
        self.checkpoints.iter().find(|cp| {
            cp.position.x.abs_diff(position.x) <= tolerance
                && cp.position.y.abs_diff(position.y) <= tolerance
        })
    }

    pub fn add_checkpoint(&mut self, position: Point) -> Checkpoint {
        let checkpoint = Checkpoint {
            id: self.checkpoints.len(),
            position,
            distance_to_next: 0,
        };
        self.checkpoints.push(checkpoint);
        checkpoint
    }

    /// Pins checkpoint 0 to `exact`, marks the track complete and computes every
    /// leg length. Returns `false` (and changes nothing) if the track is empty
    /// or already complete, so leg lengths are computed exactly once.
    pub fn confirm_loop_closed(&mut self, exact: Point) -> bool {
        if self.complete || self.checkpoints.is_empty() {
            return false;
        }
        self.checkpoints[0].position = exact;
        self.complete = true;

        let count = self.checkpoints.len();
        for idx in 0..count {
            let next = self.checkpoints[(idx + 1) % count].position;
            let leg = self.checkpoints[idx].position.manhattan(next);
            self.checkpoints[idx].distance_to_next = leg;
        }
        true
    }

    /// Wrap-around lookup; anything past the end falls back to checkpoint 0.
    pub fn successor_of(&self, id: usize) -> Option<Checkpoint> {
        self.lookup_wrapping(id.saturating_add(1))
    }

    pub fn id_2_away(&self, id: usize) -> Option<Checkpoint> {
        self.lookup_wrapping(id.saturating_add(2))
    }

    pub fn predecessor_of(&self, id: usize) -> Option<Checkpoint> {
        let count = self.checkpoints.len();
        if count == 0 {
            return None;
        }
        self.lookup_wrapping((id % count + count - 1) % count)
    }

    fn lookup_wrapping(&self, id: usize) -> Option<Checkpoint> {
        let count = self.checkpoints.len();
        if count == 0 {
            return None;
        }
        self.checkpoints
            .get(id % count)
            .or_else(|| self.checkpoints.first())
            .copied()
    }

    fn nearest_to(&self, position: Point) -> Option<Checkpoint> {
        self.checkpoints
            .iter()
            .min_by_key(|cp| cp.position.manhattan(position))
            .copied()
    }

    /// Per-tick discovery step.
    pub fn update(
        &mut self,
        own: Point,
        opponent: Point,
        reported: Point,
        tolerance: i32,
    ) -> TrackUpdate {
        if self.checkpoints.is_empty() {
            self.add_checkpoint(guess_start_checkpoint(own, opponent));
        }

        let mut fallback_match = false;
        let matched = self.match_at(reported, tolerance).copied();
        let mut current = match matched {
            Some(cp) => cp,
            None if !self.complete => self.add_checkpoint(reported),
            None => {
                // A closed track is read-only; snap to the closest known one.
                fallback_match = true;
                self.nearest_to(reported).unwrap_or(Checkpoint {
                    id: 0,
                    position: reported,
                    distance_to_next: 0,
                })
            }
        };

        let mut loop_closed_now = false;
        if current.id == 0 && !self.complete {
            loop_closed_now = self.confirm_loop_closed(reported);
            current = self.checkpoints[0];
        }

        let (next, after_next) = if self.complete {
            let next = self.successor_of(current.id);
            let after_next = next.and_then(|cp| self.successor_of(cp.id));
            (next, after_next)
        } else {
            (None, None)
        };

        TrackUpdate {
            current,
            next,
            after_next,
            loop_closed_now,
            fallback_match,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: i32 = 600;

    fn square_track() -> CheckpointTrack {
        let mut track = CheckpointTrack::new();
        for (x, y) in [(0, 0), (5000, 0), (5000, 5000), (0, 5000)] {
            track.add_checkpoint(Point::new(x, y));
        }
        track
    }

    #[test]
    fn match_uses_box_not_radius() {
        let track = square_track();
        // (590, 590) is ~834 away in euclidean terms but inside the box.
        let hit = track.match_at(Point::new(590, 590), TOL).map(|cp| cp.id);
        assert_eq!(hit, Some(0));
        assert!(track.match_at(Point::new(601, 0), TOL).is_none());
    }

    #[test]
    fn match_prefers_discovery_order() {
        let mut track = CheckpointTrack::new();
        track.add_checkpoint(Point::new(1000, 1000));
        track.add_checkpoint(Point::new(1500, 1000));
        let hit = track.match_at(Point::new(1250, 1000), TOL).map(|cp| cp.id);
        assert_eq!(hit, Some(0));
    }

    #[test]
    fn match_across_the_whole_coordinate_range() {
        let mut track = CheckpointTrack::new();
        track.add_checkpoint(Point::new(i32::MAX, 0));
        assert!(track.match_at(Point::new(i32::MIN, 0), TOL).is_none());
        assert!(track.match_at(Point::new(i32::MAX - TOL, 0), TOL).is_some());
        assert!(track.match_at(Point::new(i32::MAX, 0), -1).is_none());
    }

    #[test]
    fn close_loop_computes_manhattan_legs_once() {
        let mut track = square_track();
        assert!(track.confirm_loop_closed(Point::new(0, 0)));
        let legs: Vec<i32> = track.checkpoints().iter().map(|cp| cp.distance_to_next).collect();
        assert_eq!(legs, vec![5000, 5000, 5000, 5000]);

        // A second closure attempt is ignored.
        assert!(!track.confirm_loop_closed(Point::new(100, 100)));
        assert_eq!(track.get(0).map(|cp| cp.position), Some(Point::new(0, 0)));
    }

    #[test]
    fn wrap_around_lookups() {
        let track = square_track();
        assert_eq!(track.successor_of(3).map(|cp| cp.id), Some(0));
        assert_eq!(track.id_2_away(3).map(|cp| cp.id), Some(1));
        assert_eq!(track.predecessor_of(0).map(|cp| cp.id), Some(3));
        assert_eq!(track.successor_of(usize::MAX).map(|cp| cp.id), Some(0));
        assert!(CheckpointTrack::new().successor_of(0).is_none());
    }

    #[test]
    fn update_discovers_and_closes_loop() {
        let mut track = CheckpointTrack::new();
        let own = Point::new(-300, 0);
        let opponent = Point::new(300, 0);

        let first = track.update(own, opponent, Point::new(5000, 0), TOL);
        assert_eq!(track.len(), 2);
        assert_eq!(first.current.id, 1);
        assert_eq!(track.get(0).map(|cp| cp.position), Some(Point::new(0, 0)));
        assert!(first.next.is_none());

        // Same checkpoint reported again is not re-added.
        track.update(own, opponent, Point::new(5010, -20), TOL);
        assert_eq!(track.len(), 2);

        track.update(own, opponent, Point::new(5000, 5000), TOL);
        track.update(own, opponent, Point::new(0, 5000), TOL);
        let closing = track.update(own, opponent, Point::new(120, -80), TOL);

        assert!(closing.loop_closed_now);
        assert!(track.is_complete());
        assert_eq!(track.len(), 4);
        assert_eq!(closing.current.position, Point::new(120, -80));
        assert_eq!(closing.next.map(|cp| cp.id), Some(1));
        assert_eq!(closing.after_next.map(|cp| cp.id), Some(2));

        let later = track.update(own, opponent, Point::new(0, 5000), TOL);
        assert!(!later.loop_closed_now);
        assert!(track.is_complete());
        assert_eq!(later.next.map(|cp| cp.id), Some(0));
    }

    #[test]
    fn closed_track_is_read_only() {
        let mut track = CheckpointTrack::new();
        let own = Point::new(0, 0);
        track.update(own, own, Point::new(5000, 0), TOL);
        track.update(own, own, Point::new(0, 0), TOL);
        assert!(track.is_complete());

        let stray = track.update(own, own, Point::new(4000, 2000), TOL);
        assert!(stray.fallback_match);
        assert_eq!(stray.current.id, 1);
        assert_eq!(track.len(), 2);
    }
}
