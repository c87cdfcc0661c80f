use std::sync::mpsc;

use enum_map::EnumMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::map::PointId;
use crate::player::PlayerId;
use crate::progress::Progress;
use crate::team::{Allegiance, Team};


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CapturePointSnapshot {
    pub point: PointId,
    pub name: String,
    pub owner: Allegiance,
    pub occupants: EnumMap<Team, usize>,
    pub progress: Progress,
}

impl CapturePointSnapshot {
    // (friendly, enemy) occupant counts from the point of view of `viewer`.
    pub fn perspective(&self, viewer: Team) -> (usize, usize) {
        (self.occupants[viewer], self.occupants[viewer.opponent()])
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ScoreboardLayout {
    pub column_names: Vec<String>,
    pub sorting_column: usize,
    pub reverse_sorting: bool,
    pub target_score: u32,
}

// Everything the game mode tells the outside world. Per-player updates are addressed by internal
// player id; turning them into widgets is up to the receiver.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DisplayUpdate {
    ScoreboardLayout(ScoreboardLayout),
    ScoreboardRow {
        player: PlayerId,
        score: u32,
        eliminations: u32,
        deaths: u32,
    },
    // Initial state of every capture point UI for a newly joined player. All of them start hidden.
    PlayerSetup {
        player: PlayerId,
        capture_points: Vec<CapturePointSnapshot>,
    },
    CapturePoint {
        player: PlayerId,
        snapshot: CapturePointSnapshot,
    },
    CapturePointVisibility {
        player: PlayerId,
        point: PointId,
        visible: bool,
    },
    OwnershipChanged {
        point: PointId,
        owner: Allegiance,
    },
    GameModeOverview {
        player: PlayerId,
        point_owners: Vec<(PointId, Allegiance)>,
    },
    GameStartBanner {
        player: PlayerId,
        visible: bool,
    },
}


#[derive(Clone, Debug)]
pub struct DisplayChannel {
    tx: mpsc::Sender<DisplayUpdate>,
}

impl DisplayChannel {
    pub fn new(tx: mpsc::Sender<DisplayUpdate>) -> Self { DisplayChannel { tx } }

    pub fn send(&self, update: DisplayUpdate) {
        // Receiver may be gone.
        if let Err(mpsc::SendError(update)) = self.tx.send(update) {
            debug!("Display update dropped: {:?}", update);
        }
    }
}
