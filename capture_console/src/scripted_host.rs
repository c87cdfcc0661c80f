// In-process stand-in for the game server: keeps team assignment and point ownership, and logs
// spawner commands instead of spawning anything.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use capture_mode::host::{Host, HostPoint, ObjectiveSettings, SpawnerId};
use capture_mode::map::{MapConfig, PointId};
use capture_mode::player::HostPlayer;
use capture_mode::team::{Allegiance, Team};
use log::info;


#[derive(Clone, Debug, Default)]
pub struct HostState {
    pub teams: HashMap<HostPlayer, Allegiance>,
    pub owners: HashMap<HostPoint, Allegiance>,
    pub object_ids: HashMap<HostPoint, PointId>,
    pub spawns: Vec<SpawnerId>,
}

#[derive(Clone, Debug, Default)]
pub struct ScriptedHost {
    state: Rc<RefCell<HostState>>,
}

impl ScriptedHost {
    pub fn new(map: &MapConfig) -> Self {
        let state = HostState {
            object_ids: map.capture_points.iter().map(|p| (p.object, p.id)).collect(),
            ..HostState::default()
        };
        ScriptedHost { state: Rc::new(RefCell::new(state)) }
    }

    pub fn assign_team(&self, player: HostPlayer, team: Team) {
        self.state.borrow_mut().teams.insert(player, Allegiance::Team(team));
    }
    pub fn set_owner(&self, point: HostPoint, owner: Allegiance) {
        self.state.borrow_mut().owners.insert(point, owner);
    }
    pub fn num_spawns(&self) -> usize { self.state.borrow().spawns.len() }
}

impl Host for ScriptedHost {
    fn team_of(&self, player: HostPlayer) -> Allegiance {
        self.state.borrow().teams.get(&player).copied().unwrap_or_default()
    }

    fn owner_team_of(&self, point: HostPoint) -> Allegiance {
        self.state.borrow().owners.get(&point).copied().unwrap_or_default()
    }

    fn object_id_of(&self, point: HostPoint) -> PointId {
        self.state.borrow().object_ids.get(&point).copied().unwrap_or(PointId(point.0))
    }

    fn configure_objective(&mut self, point: HostPoint, settings: ObjectiveSettings) {
        info!(
            "Objective {:?}: capture {:?}, neutralization {:?}, multiplier x{}",
            point, settings.capture_time, settings.neutralization_time,
            settings.max_capture_multiplier
        );
    }

    fn force_spawn(&mut self, spawner: SpawnerId) {
        info!("Spawning vehicle at {:?}", spawner);
        self.state.borrow_mut().spawns.push(spawner);
    }

    fn set_auto_spawn(&mut self, spawner: SpawnerId, enabled: bool) {
        info!("Auto-spawn at {:?}: {}", spawner, if enabled { "on" } else { "off" });
    }
}
