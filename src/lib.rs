#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod capture_point;
pub mod clock;
pub mod display;
pub mod event;
pub mod game_mode;
pub mod host;
pub mod map;
pub mod player;
pub mod progress;
pub mod roster;
pub mod rules;
pub mod scheduler;
pub mod scores;
pub mod team;
pub mod test_util;
