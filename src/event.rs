use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::HostPoint;
use crate::map::PointId;
use crate::player::{HostPlayer, PlayerId};


// Events raised by the host environment, delivered in order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum HostEvent {
    PlayerJoined { player: HostPlayer },
    // Player left the field, i.e. died.
    PlayerUndeployed { player: HostPlayer },
    PlayerEarnedKill { player: HostPlayer },
    PlayerEarnedAssist { player: HostPlayer },
    PlayerEnteredZone { player: HostPlayer, point: HostPoint },
    PlayerExitedZone { player: HostPlayer, point: HostPoint },
    // The host detected saturation and flipped the point to its new owner.
    ZoneCaptured { point: HostPoint },
    ZoneLost { point: HostPoint },
    // Nothing happened, but time has passed: run due loops.
    Tick,
}

// Why an event was dropped. None of these are fatal: host events can race with setup or
// reference stale handles, so the mode skips the event and carries on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventError {
    // Zone and combat events before `GameMode::setup`.
    NotSetUp,
    UnknownPlayer(HostPlayer),
    UnknownCapturePoint(PointId),
    // Host reports the player as neutral, e.g. spectating.
    PlayerWithoutTeam(PlayerId),
    AlreadyInZone { player: PlayerId, point: PointId },
    NotInZone { player: PlayerId, point: PointId },
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::NotSetUp => write!(f, "game mode is not set up yet"),
            EventError::UnknownPlayer(handle) => write!(f, "unknown player {handle:?}"),
            EventError::UnknownCapturePoint(id) => write!(f, "unknown capture point {id}"),
            EventError::PlayerWithoutTeam(player) => write!(f, "player {player} has no team"),
            EventError::AlreadyInZone { player, point } => {
                write!(f, "player {player} is already in capture point {point}")
            }
            EventError::NotInZone { player, point } => {
                write!(f, "player {player} is not in capture point {point}")
            }
        }
    }
}
