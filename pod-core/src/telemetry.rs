//! Line codec for the per-tick protocol.
//!
//! Input, two lines per tick:
//! `x y nextCheckpointX nextCheckpointY nextCheckpointDist nextCheckpointAngle`
//! `opponentX opponentY`
//!
//! Output, one line per tick: `targetX targetY thrust|BOOST`.

use crate::error::{TelemetryError, TelemetryLine};
use crate::geometry::Point;
use crate::thrust::Thrust;
use core::fmt;
use serde::{Deserialize, Serialize};

const POD_FIELDS: usize = 6;
const OPPONENT_FIELDS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
    pub position: Point,
    pub next_checkpoint: Point,
    pub next_checkpoint_dist: i32,
    /// Signed degrees between the pod's facing and the checkpoint.
    pub next_checkpoint_angle: i32,
    pub opponent: Point,
}

impl Telemetry {
    pub fn parse(pod_line: &str, opponent_line: &str) -> Result<Self, TelemetryError> {
        let [x, y, cx, cy, dist, angle] = parse_fields::<POD_FIELDS>(pod_line, TelemetryLine::Pod)?;
        let [ox, oy] = parse_fields::<OPPONENT_FIELDS>(opponent_line, TelemetryLine::Opponent)?;
        Ok(Self {
            position: Point::new(x, y),
            next_checkpoint: Point::new(cx, cy),
            next_checkpoint_dist: dist,
            next_checkpoint_angle: angle,
            opponent: Point::new(ox, oy),
        })
    }

    /// The two input lines, newline-terminated, as a game server would send them.
    pub fn to_lines(&self) -> String {
        format!(
            "{} {} {} {} {} {}\n{} {}\n",
            self.position.x,
            self.position.y,
            self.next_checkpoint.x,
            self.next_checkpoint.y,
            self.next_checkpoint_dist,
            self.next_checkpoint_angle,
            self.opponent.x,
            self.opponent.y,
        )
    }
}

fn parse_fields<const N: usize>(
    line: &str,
    which: TelemetryLine,
) -> Result<[i32; N], TelemetryError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != N {
        return Err(TelemetryError::TokenCount {
            line: which,
            expected: N,
            found: tokens.len(),
        });
    }
    let mut out = [0i32; N];
    for (field, (slot, token)) in out.iter_mut().zip(&tokens).enumerate() {
        *slot = token
            .parse::<i32>()
            .map_err(|_| TelemetryError::InvalidNumber {
                line: which,
                field,
                token: (*token).to_string(),
            })?;
    }
    Ok(out)
}

/// One tick of output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub target: Point,
    pub thrust: Thrust,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.target.x, self.target.y, self.thrust)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tick() {
        let tick = Telemetry::parse("  1200 -340 8000 4500 7930 -12 ", "1500 -20").expect("valid tick");
        assert_eq!(tick.position, Point::new(1200, -340));
        assert_eq!(tick.next_checkpoint, Point::new(8000, 4500));
        assert_eq!(tick.next_checkpoint_dist, 7930);
        assert_eq!(tick.next_checkpoint_angle, -12);
        assert_eq!(tick.opponent, Point::new(1500, -20));
        assert_eq!(
            Telemetry::parse(tick.to_lines().lines().next().unwrap_or(""), "1500 -20"),
            Ok(tick)
        );
    }

    #[test]
    fn wrong_token_count() {
        assert_eq!(
            Telemetry::parse("1 2 3 4 5", "0 0"),
            Err(TelemetryError::TokenCount {
                line: TelemetryLine::Pod,
                expected: 6,
                found: 5
            })
        );
        assert_eq!(
            Telemetry::parse("1 2 3 4 5 6", "0 0 0"),
            Err(TelemetryError::TokenCount {
                line: TelemetryLine::Opponent,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn non_numeric_field() {
        let err = Telemetry::parse("1 2 3 x 5 6", "0 0").unwrap_err();
        assert_eq!(
            err,
            TelemetryError::InvalidNumber {
                line: TelemetryLine::Pod,
                field: 3,
                token: "x".to_string()
            }
        );
        assert_eq!(err.to_string(), "pod line: field 3 is not an integer: \"x\"");
    }

    #[test]
    fn command_line() {
        let command = Command {
            target: Point::new(-400, 3400),
            thrust: Thrust::Power(87),
        };
        assert_eq!(command.to_string(), "-400 3400 87");
        let boost = Command {
            thrust: Thrust::Boost,
            ..command
        };
        assert_eq!(boost.to_string(), "-400 3400 BOOST");
    }
}
