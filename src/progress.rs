use std::{fmt, ops};

use serde::{Deserialize, Serialize};

use crate::team::Team;


const HUNDREDTHS_PER_UNIT: i32 = 100;

// Signed capture progress with 0.01 resolution. Positive values favor team A, negative values
// favor team B, zero is fully neutral.
//
// Stored as an integer number of hundredths: every rate and bound the mode uses is a multiple of
// 0.01, so accumulation is exact and bounds are hit precisely instead of being overshot by a
// floating point error after a few hundred ticks.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(from = "f64", into = "f64")]
pub struct Progress {
    hundredths: i32,
}

impl Progress {
    pub const ZERO: Self = Progress { hundredths: 0 };

    pub const fn from_hundredths(hundredths: i32) -> Self { Progress { hundredths } }
    pub const fn from_units(units: i32) -> Self {
        Progress::from_hundredths(units * HUNDREDTHS_PER_UNIT)
    }
    pub fn from_f64(value: f64) -> Self {
        Progress::from_hundredths((value * HUNDREDTHS_PER_UNIT as f64).round() as i32)
    }

    pub fn hundredths(self) -> i32 { self.hundredths }
    pub fn as_f64(self) -> f64 { self.hundredths as f64 / HUNDREDTHS_PER_UNIT as f64 }
    pub fn abs(self) -> Self { Progress::from_hundredths(self.hundredths.abs()) }
    pub fn is_zero(self) -> bool { self.hundredths == 0 }

    // The team this progress leans towards, if any.
    pub fn favored_team(self) -> Option<Team> {
        match self.hundredths {
            h if h > 0 => Some(Team::A),
            h if h < 0 => Some(Team::B),
            _ => None,
        }
    }

    // Strictly inside `(-bound, bound)`.
    pub fn is_strictly_within(self, bound: Progress) -> bool { self.abs() < bound.abs() }

    // Moves `step` towards `team`'s end of the scale, stopping exactly at `bound`. Returns the
    // applied change (zero if already at the bound).
    pub fn advance_towards(&mut self, team: Team, step: Progress, bound: Progress) -> Progress {
        let target = Progress::bound_for(team, bound);
        let remaining = (target - *self).abs();
        let applied = Progress::from_hundredths(step.abs().hundredths.min(remaining.hundredths));
        let signed = match team {
            Team::A => applied,
            Team::B => -applied,
        };
        *self = *self + signed;
        signed
    }

    // Moves `step` towards zero without crossing it.
    pub fn decay(&mut self, step: Progress) {
        let step = step.abs().hundredths.min(self.hundredths.abs());
        self.hundredths -= self.hundredths.signum() * step;
    }

    pub fn bound_for(team: Team, bound: Progress) -> Progress {
        match team {
            Team::A => bound.abs(),
            Team::B => -bound.abs(),
        }
    }
}

impl ops::Add for Progress {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Progress::from_hundredths(self.hundredths + rhs.hundredths) }
}
impl ops::Sub for Progress {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Progress::from_hundredths(self.hundredths - rhs.hundredths) }
}
impl ops::Neg for Progress {
    type Output = Self;
    fn neg(self) -> Self { Progress::from_hundredths(-self.hundredths) }
}
impl ops::Mul<i32> for Progress {
    type Output = Self;
    fn mul(self, n: i32) -> Self { Progress::from_hundredths(self.hundredths * n) }
}

impl From<f64> for Progress {
    fn from(value: f64) -> Self { Progress::from_f64(value) }
}
impl From<Progress> for f64 {
    fn from(p: Progress) -> Self { p.as_f64() }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.hundredths < 0 { "-" } else { "" };
        let abs = self.hundredths.abs();
        write!(f, "{sign}{}.{:02}", abs / HUNDREDTHS_PER_UNIT, abs % HUNDREDTHS_PER_UNIT)
    }
}
