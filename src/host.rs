use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::map::PointId;
use crate::player::HostPlayer;
use crate::team::Allegiance;


// Opaque capture point handle as delivered with host events.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct HostPoint(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct SpawnerId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ObjectiveSettings {
    pub capture_time: Duration,
    pub neutralization_time: Duration,
    pub max_capture_multiplier: u32,
}

// The part of the host environment the game mode relies on. The host owns the simulation tick,
// player connections, zone geometry and saturation detection; the mode only asks questions and
// issues vehicle spawner commands.
pub trait Host {
    fn team_of(&self, player: HostPlayer) -> Allegiance;

    // Authoritative owner as seen by the host. Consulted when the host reports a capture or a loss.
    fn owner_team_of(&self, point: HostPoint) -> Allegiance;

    // Resolves a host capture point handle to the id used in the map configuration.
    fn object_id_of(&self, point: HostPoint) -> PointId;

    fn configure_objective(&mut self, point: HostPoint, settings: ObjectiveSettings);

    fn force_spawn(&mut self, spawner: SpawnerId);
    fn set_auto_spawn(&mut self, spawner: SpawnerId, enabled: bool);
}
