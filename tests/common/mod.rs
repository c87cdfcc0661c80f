// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::sync::mpsc;

use capture_mode::capture_point::CapturePoint;
use capture_mode::clock::{GameInstant, MillisDuration};
use capture_mode::display::DisplayUpdate;
use capture_mode::event::{EventError, HostEvent};
use capture_mode::game_mode::GameMode;
use capture_mode::host::{Host, HostPoint};
use capture_mode::map::MapConfig;
use capture_mode::player::{HostPlayer, PlayerId};
use capture_mode::rules::ModeRules;
use capture_mode::team::{Allegiance, Team};
use capture_mode::test_util::TestHost;


// Host objects of the Firestorm points.
#[allow(dead_code)]
pub const POINT_A: HostPoint = HostPoint(1);
#[allow(dead_code)]
pub const POINT_B: HostPoint = HostPoint(2);

// Game mode (on Firestorm unless told otherwise) with a fake host and a hand-driven clock.
pub struct TestMode {
    pub mode: GameMode,
    pub host: TestHost,
    pub display_rx: mpsc::Receiver<DisplayUpdate>,
    pub now: GameInstant,
}

impl TestMode {
    #[allow(dead_code)]
    pub fn new() -> Self { TestMode::with_rules(ModeRules::conquest()) }

    pub fn with_rules(rules: ModeRules) -> Self {
        TestMode::with_map(rules, MapConfig::firestorm())
    }

    pub fn with_map(rules: ModeRules, map: MapConfig) -> Self {
        let host = TestHost::new();
        for point in &map.capture_points {
            host.world().set_object_id(point.object, point.id);
        }
        let (display_tx, display_rx) = mpsc::channel();
        let mode = GameMode::new(rules, &map, Box::new(host.clone()), display_tx);
        TestMode {
            mode,
            host,
            display_rx,
            now: GameInstant::game_start(),
        }
    }

    // Set up with no players.
    #[allow(dead_code)]
    pub fn started() -> Self {
        let mut t = TestMode::new();
        t.mode.setup(t.now);
        t
    }

    #[allow(dead_code)]
    pub fn apply(&mut self, event: HostEvent) -> Result<(), EventError> {
        self.mode.try_apply_event(event, self.now)
    }

    #[allow(dead_code)]
    pub fn join(&mut self, handle: u64, team: Team) -> PlayerId {
        let player = HostPlayer(handle);
        self.host.world().set_team(player, Allegiance::Team(team));
        self.apply(HostEvent::PlayerJoined { player }).unwrap();
        self.mode.player_id(player).unwrap()
    }

    #[allow(dead_code)]
    pub fn enter(&mut self, handle: u64, point: HostPoint) -> Result<(), EventError> {
        self.apply(HostEvent::PlayerEnteredZone { player: HostPlayer(handle), point })
    }

    #[allow(dead_code)]
    pub fn exit(&mut self, handle: u64, point: HostPoint) -> Result<(), EventError> {
        self.apply(HostEvent::PlayerExitedZone { player: HostPlayer(handle), point })
    }

    // The host flips the point to `owner` and reports it.
    #[allow(dead_code)]
    pub fn capture(&mut self, point: HostPoint, owner: Allegiance) -> Result<(), EventError> {
        self.host.world().set_owner(point, owner);
        self.apply(HostEvent::ZoneCaptured { point })
    }

    #[allow(dead_code)]
    pub fn lose(&mut self, point: HostPoint) -> Result<(), EventError> {
        self.host.world().set_owner(point, Allegiance::Neutral);
        self.apply(HostEvent::ZoneLost { point })
    }

    #[allow(dead_code)]
    pub fn advance_millis(&mut self, ms: u64) {
        self.now = self.now + MillisDuration::from_millis(ms);
        self.mode.advance_to(self.now);
    }

    #[allow(dead_code)]
    pub fn point(&self, point: HostPoint) -> &CapturePoint {
        self.mode.capture_point(self.host.object_id_of(point)).unwrap()
    }

    #[allow(dead_code)]
    pub fn point_mut(&mut self, point: HostPoint) -> &mut CapturePoint {
        let id = self.host.object_id_of(point);
        self.mode.TEST_capture_point_mut(id).unwrap()
    }

    #[allow(dead_code)]
    pub fn score(&self, handle: u64) -> u32 {
        self.mode.player_stats(HostPlayer(handle)).unwrap().score
    }

    #[allow(dead_code)]
    pub fn take_display(&mut self) -> Vec<DisplayUpdate> { self.display_rx.try_iter().collect() }
}
