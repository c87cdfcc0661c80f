use std::time::Duration;
use std::{fmt, ops};

use serde::{Deserialize, Serialize};


const MILLIS_PER_SEC: u64 = 1000;

// Whole milliseconds. Every tick period is a whole number of milliseconds, so loop schedules never
// drift no matter how long the mode runs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct MillisDuration {
    ms: u64,
}

// Simulated time since the game mode was constructed. The host owns the authoritative tick and
// reports it with every event.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct GameInstant {
    since_start: MillisDuration,
}

impl MillisDuration {
    pub const fn from_millis(ms: u64) -> Self { MillisDuration { ms } }
    pub const fn from_secs(s: u64) -> Self { MillisDuration::from_millis(s * MILLIS_PER_SEC) }

    pub fn as_millis(self) -> u64 { self.ms }
}

impl ops::Add for MillisDuration {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { MillisDuration::from_millis(self.ms + rhs.ms) }
}

// Sub-millisecond remainders are dropped: host ticks are never that fine.
impl From<Duration> for MillisDuration {
    fn from(d: Duration) -> Self { MillisDuration::from_millis(d.as_millis() as u64) }
}
impl From<MillisDuration> for Duration {
    fn from(d: MillisDuration) -> Self { Duration::from_millis(d.ms) }
}

impl fmt::Display for MillisDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.ms / MILLIS_PER_SEC, self.ms % MILLIS_PER_SEC)
    }
}

impl GameInstant {
    pub const fn game_start() -> Self {
        GameInstant { since_start: MillisDuration::from_millis(0) }
    }
    pub fn from_millis(ms: u64) -> Self {
        GameInstant { since_start: MillisDuration::from_millis(ms) }
    }
    pub fn from_duration(since_start: Duration) -> Self {
        GameInstant { since_start: since_start.into() }
    }

    pub fn elapsed_since_start(self) -> MillisDuration { self.since_start }
}

impl ops::Add<MillisDuration> for GameInstant {
    type Output = Self;
    fn add(self, d: MillisDuration) -> Self { GameInstant { since_start: self.since_start + d } }
}

impl fmt::Display for GameInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "T+{}", self.since_start) }
}
