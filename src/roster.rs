use enum_map::{EnumMap, enum_map};

use crate::host::Host;
use crate::player::{HostPlayer, Player, PlayerId};
use crate::team::Team;


// Connected players in join order.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    players: Vec<Player>,
    next_id: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JoinOutcome {
    New(PlayerId),
    AlreadyKnown(PlayerId),
}

impl Roster {
    pub fn new() -> Self { Roster::default() }

    pub fn len(&self) -> usize { self.players.len() }
    pub fn is_empty(&self) -> bool { self.players.is_empty() }
    pub fn players(&self) -> &[Player] { &self.players }
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ { self.players.iter().map(|p| p.id) }

    // Ids are never reused: a participant that comes back under a new handle is a new player.
    pub fn add_player(&mut self, handle: HostPlayer) -> JoinOutcome {
        if let Some(player) = self.by_handle(handle) {
            return JoinOutcome::AlreadyKnown(player.id);
        }
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        self.players.push(Player { id, handle });
        JoinOutcome::New(id)
    }

    pub fn by_handle(&self, handle: HostPlayer) -> Option<&Player> {
        self.players.iter().find(|p| p.handle == handle)
    }
    pub fn by_id(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn players_per_team(&self, host: &dyn Host) -> EnumMap<Team, usize> {
        let mut num_players_per_team = enum_map! { _ => 0 };
        for p in &self.players {
            if let Some(team) = host.team_of(p.handle).team() {
                num_players_per_team[team] += 1;
            }
        }
        num_players_per_team
    }
}
