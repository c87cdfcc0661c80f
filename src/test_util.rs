// Test utilities that cannot be moved to the "tests" folder, because unit tests and the console
// simulator use them too.

use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::host::{Host, HostPoint, ObjectiveSettings, SpawnerId};
use crate::map::PointId;
use crate::player::HostPlayer;
use crate::team::Allegiance;


// In theory random tests verify properties that should always hold, but let's fix the seed to
// avoid sporadic failures.
pub fn deterministic_rng() -> StdRng { StdRng::from_seed([0; 32]) }


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpawnerCommand {
    ForceSpawn(SpawnerId),
    SetAutoSpawn(SpawnerId, bool),
}

// Host state a test can tweak and inspect while the game mode holds the host.
#[derive(Clone, Debug, Default)]
pub struct TestWorld {
    teams: HashMap<HostPlayer, Allegiance>,
    owners: HashMap<HostPoint, Allegiance>,
    object_ids: HashMap<HostPoint, PointId>,
    pub objectives: Vec<(HostPoint, ObjectiveSettings)>,
    pub spawner_commands: Vec<SpawnerCommand>,
}

impl TestWorld {
    pub fn set_team(&mut self, player: HostPlayer, team: Allegiance) {
        self.teams.insert(player, team);
    }
    pub fn set_owner(&mut self, point: HostPoint, owner: Allegiance) {
        self.owners.insert(point, owner);
    }
    // Unmapped handles resolve to the point with the same number.
    pub fn set_object_id(&mut self, point: HostPoint, id: PointId) {
        self.object_ids.insert(point, id);
    }
    pub fn take_spawner_commands(&mut self) -> Vec<SpawnerCommand> {
        std::mem::take(&mut self.spawner_commands)
    }
}

// Cloning yields another view of the same world.
#[derive(Clone, Debug, Default)]
pub struct TestHost {
    world: Rc<RefCell<TestWorld>>,
}

impl TestHost {
    pub fn new() -> Self { TestHost::default() }

    pub fn world(&self) -> RefMut<'_, TestWorld> { self.world.borrow_mut() }
}

impl Host for TestHost {
    fn team_of(&self, player: HostPlayer) -> Allegiance {
        self.world.borrow().teams.get(&player).copied().unwrap_or_default()
    }

    fn owner_team_of(&self, point: HostPoint) -> Allegiance {
        self.world.borrow().owners.get(&point).copied().unwrap_or_default()
    }

    fn object_id_of(&self, point: HostPoint) -> PointId {
        self.world.borrow().object_ids.get(&point).copied().unwrap_or(PointId(point.0))
    }

    fn configure_objective(&mut self, point: HostPoint, settings: ObjectiveSettings) {
        self.world().objectives.push((point, settings));
    }

    fn force_spawn(&mut self, spawner: SpawnerId) {
        self.world().spawner_commands.push(SpawnerCommand::ForceSpawn(spawner));
    }

    fn set_auto_spawn(&mut self, spawner: SpawnerId, enabled: bool) {
        self.world().spawner_commands.push(SpawnerCommand::SetAutoSpawn(spawner, enabled));
    }
}
