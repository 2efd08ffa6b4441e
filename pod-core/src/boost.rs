use crate::track::{Checkpoint, CheckpointTrack};

/// One-shot latch; once fired it stays fired for the rest of the race.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoostState {
    used: bool,
}

impl BoostState {
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Returns `true` exactly once.
    pub fn fire(&mut self) -> bool {
        if self.used {
            return false;
        }
        self.used = true;
        true
    }
}

/// The checkpoint reached by the longest leg (ties go to the lowest starting
/// id). `None` until the track is complete.
pub fn select_boost_target(track: &CheckpointTrack) -> Option<Checkpoint> {
    if !track.is_complete() {
        return None;
    }
    let mut longest: Option<&Checkpoint> = None;
    for cp in track.checkpoints() {
        if longest.map_or(true, |best| cp.distance_to_next > best.distance_to_next) {
            longest = Some(cp);
        }
    }
    longest.and_then(|cp| track.successor_of(cp.id))
}
