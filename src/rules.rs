use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::MillisDuration;
use crate::progress::Progress;
use crate::scores::ScoreWeights;


// Loop periods are whole milliseconds; a shorter period would reschedule a loop at the instant it
// has just run.
const MIN_TICK: MillisDuration = MillisDuration::from_millis(1);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureRules {
    // Period of the capturing accumulation loop.
    #[serde(with = "humantime_serde")]
    pub capture_tick: Duration,
    // Progress gained per tick per occupant of the majority team.
    pub capture_rate: Progress,
    // Occupants above this number do not speed up capturing.
    pub max_capture_multiplier: u32,
    // Progress never leaves `[-progress_bound, progress_bound]`. Reaching the bound is what the
    // host treats as saturation.
    pub progress_bound: Progress,

    // Period of the bleeding decay loop.
    #[serde(with = "humantime_serde")]
    pub bleed_tick: Duration,
    pub bleed_step: Progress,
    // Bleeding stops once progress is strictly within
    // `(-bleed_stop_threshold, bleed_stop_threshold)`.
    pub bleed_stop_threshold: Progress,
    // An emptied zone starts bleeding only if progress is strictly within
    // `(-bleed_eligibility_bound, bleed_eligibility_bound)`.
    pub bleed_eligibility_bound: Progress,

    // Passed to the host objective at setup.
    #[serde(with = "humantime_serde")]
    pub neutralization_time: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeRules {
    pub capture: CaptureRules,
    pub score_weights: ScoreWeights,
    pub target_score: u32,
    #[serde(with = "humantime_serde")]
    pub game_start_banner_duration: Duration,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RulesError {
    TickTooShort(&'static str),
    NotPositive(&'static str),
    ZeroCaptureMultiplier,
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesError::TickTooShort(field) => write!(f, "{field} must be at least {MIN_TICK}"),
            RulesError::NotPositive(field) => write!(f, "{field} must be positive"),
            RulesError::ZeroCaptureMultiplier => {
                write!(f, "max_capture_multiplier must be positive")
            }
        }
    }
}

impl std::error::Error for RulesError {}

impl CaptureRules {
    pub fn conquest() -> Self {
        CaptureRules {
            capture_tick: Duration::from_millis(50),
            capture_rate: Progress::from_hundredths(5),
            max_capture_multiplier: 5,
            progress_bound: Progress::from_units(20),
            bleed_tick: Duration::from_millis(200),
            bleed_step: Progress::from_hundredths(5),
            bleed_stop_threshold: Progress::from_hundredths(10),
            bleed_eligibility_bound: Progress::from_units(30),
            neutralization_time: Duration::from_secs(20),
        }
    }

    // Never below `MIN_TICK`, even for rules that skipped validation.
    pub fn capture_tick_millis(&self) -> MillisDuration {
        MillisDuration::from(self.capture_tick).max(MIN_TICK)
    }
    pub fn bleed_tick_millis(&self) -> MillisDuration {
        MillisDuration::from(self.bleed_tick).max(MIN_TICK)
    }

    // Progress gained in one tick by a team with `occupants` players in the zone.
    pub fn capture_step(&self, occupants: usize) -> Progress {
        let multiplier = occupants.min(self.max_capture_multiplier as usize);
        self.capture_rate * multiplier as i32
    }

    // The host measures capturing in seconds: one unit of progress is one second of a single
    // player capturing at full rate.
    pub fn host_capture_time(&self) -> Duration {
        Duration::from_secs_f64(self.progress_bound.abs().as_f64())
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        let ticks = [("capture_tick", self.capture_tick), ("bleed_tick", self.bleed_tick)];
        for (field, tick) in ticks {
            if MillisDuration::from(tick) < MIN_TICK {
                return Err(RulesError::TickTooShort(field));
            }
        }
        for (field, value) in [
            ("capture_rate", self.capture_rate),
            ("progress_bound", self.progress_bound),
            ("bleed_step", self.bleed_step),
            ("bleed_stop_threshold", self.bleed_stop_threshold),
        ] {
            if value <= Progress::ZERO {
                return Err(RulesError::NotPositive(field));
            }
        }
        if self.max_capture_multiplier == 0 {
            return Err(RulesError::ZeroCaptureMultiplier);
        }
        Ok(())
    }
}

impl ModeRules {
    pub fn conquest() -> Self {
        ModeRules {
            capture: CaptureRules::conquest(),
            score_weights: ScoreWeights::conquest(),
            target_score: 5,
            game_start_banner_duration: Duration::from_secs(5),
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> { self.capture.validate() }
}

impl Default for CaptureRules {
    fn default() -> Self { CaptureRules::conquest() }
}

impl Default for ModeRules {
    fn default() -> Self { ModeRules::conquest() }
}
