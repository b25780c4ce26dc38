// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::fmt;

/// Fractional positions at or below this are on the long half of the swung beat. Slightly above
/// one half so that straight eighths stored with rounding error still land on the long half.
const TO_SWING_BREAKPOINT: f64 = 0.505;

/// Fractional positions at or below this are un-swung from the long half of the beat.
const FROM_SWING_BREAKPOINT: f64 = 0.667;

/// Splits a beat count into its whole part (rounded toward negative infinity) and a fraction in
/// [0, 1].
fn split(beat: f64) -> (f64, f64) {
    (beat.floor(), beat.rem_euclid(1.0))
}

/// Warps a straight beat count into a 2:1 swing feel. The whole part is preserved; the first
/// half of the beat is stretched over two thirds and the second half compressed into the last
/// third.
///
/// The two pieces do not quite meet at the breakpoint: 0.505 maps to ~0.6733 from below and
/// ~0.6700 from above.
pub fn to_swing(beat: f64) -> f64 {
    let (whole, frac) = split(beat);
    let new_frac = if frac <= TO_SWING_BREAKPOINT {
        frac * (4.0 / 3.0)
    } else {
        (1.0 / 3.0) * (2.0 * frac + 1.0)
    };
    whole + new_frac
}

/// Un-warps a swung beat count back into a straight feel.
///
/// This is an approximate inverse of [`to_swing`]: its breakpoint is 0.667 rather than 2/3, so
/// fractions just above 0.5 do not survive a round trip unchanged.
pub fn from_swing(beat: f64) -> f64 {
    let (whole, frac) = split(beat);
    let new_frac = if frac <= FROM_SWING_BREAKPOINT {
        frac * (3.0 / 4.0)
    } else {
        (3.0 * frac - 1.0) / 2.0
    };
    whole + new_frac
}

/// The direction a chart is converted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Straight timing to swing timing.
    ToSwing,
    /// Swing timing back to straight timing.
    FromSwing,
}

impl Direction {
    /// Picks a direction from a file name. Charts whose name already contains the marker are
    /// assumed to be swung and are converted back.
    pub fn detect(file_name: &str, marker: &str) -> Direction {
        if !marker.is_empty() && file_name.contains(marker) {
            Direction::FromSwing
        } else {
            Direction::ToSwing
        }
    }

    /// Applies the warp for this direction to a beat count.
    pub fn warp(&self, beat: f64) -> f64 {
        match self {
            Direction::ToSwing => to_swing(beat),
            Direction::FromSwing => from_swing(beat),
        }
    }

    /// Whether sustain lengths are shortened by the forward push of their start.
    pub fn adjusts_sustains(&self) -> bool {
        matches!(self, Direction::ToSwing)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ToSwing => write!(f, "to swing"),
            Direction::FromSwing => write!(f, "from swing"),
        }
    }
}
