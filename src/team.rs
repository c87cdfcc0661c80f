use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;


#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize,
    Deserialize,
)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}


// Who a player or a capture point belongs to. Compared by equality only: there is no meaningful
// order between the teams and neutrality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Allegiance {
    #[default]
    Neutral,
    Team(Team),
}

impl Allegiance {
    pub fn team(self) -> Option<Team> {
        match self {
            Allegiance::Neutral => None,
            Allegiance::Team(team) => Some(team),
        }
    }
    pub fn is_neutral(self) -> bool { self == Allegiance::Neutral }
}

impl From<Team> for Allegiance {
    fn from(team: Team) -> Self { Allegiance::Team(team) }
}
