use std::sync::mpsc;

use itertools::Itertools;
use log::{debug, info, warn};
use strum::IntoEnumIterator;

use crate::capture_point::{CapturePoint, PointContext};
use crate::clock::{GameInstant, MillisDuration};
use crate::display::{DisplayChannel, DisplayUpdate, ScoreboardLayout};
use crate::event::{EventError, HostEvent};
use crate::host::{Host, HostPoint, ObjectiveSettings};
use crate::map::{Map, MapConfig, PointId};
use crate::player::{HostPlayer, PlayerId};
use crate::roster::{JoinOutcome, Roster};
use crate::rules::ModeRules;
use crate::scheduler::{Scheduler, Task};
use crate::scores::{PlayerStats, ScoreEvent, ScoringLedger};
use crate::team::Team;


const SCOREBOARD_COLUMNS: [&str; 3] = ["Score", "Eliminations", "Deaths"];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModePhase {
    // Constructed, players may join, but zones and combat are not tracked yet.
    Constructed,
    Running,
}

// Session-wide state of the game mode. The host constructs it when the mode starts, calls `setup`
// once, then feeds it events in delivery order. Everything runs on the caller's thread.
pub struct GameMode {
    rules: ModeRules,
    map: Map,
    roster: Roster,
    ledger: ScoringLedger,
    scheduler: Scheduler,
    host: Box<dyn Host>,
    display: DisplayChannel,
    phase: ModePhase,
    game_start_announced: bool,
    now: GameInstant,
}

impl GameMode {
    pub fn new(
        rules: ModeRules, map_config: &MapConfig, host: Box<dyn Host>,
        display_tx: mpsc::Sender<DisplayUpdate>,
    ) -> Self {
        GameMode {
            ledger: ScoringLedger::new(rules.score_weights),
            rules,
            map: Map::new(map_config),
            roster: Roster::new(),
            scheduler: Scheduler::new(),
            host,
            display: DisplayChannel::new(display_tx),
            phase: ModePhase::Constructed,
            game_start_announced: false,
            now: GameInstant::game_start(),
        }
    }

    pub fn rules(&self) -> &ModeRules { &self.rules }
    pub fn map(&self) -> &Map { &self.map }
    pub fn roster(&self) -> &Roster { &self.roster }
    pub fn ledger(&self) -> &ScoringLedger { &self.ledger }
    pub fn scheduler(&self) -> &Scheduler { &self.scheduler }
    pub fn phase(&self) -> ModePhase { self.phase }
    pub fn now(&self) -> GameInstant { self.now }
    pub fn game_start_announced(&self) -> bool { self.game_start_announced }

    pub fn capture_point(&self, id: PointId) -> Option<&CapturePoint> {
        self.map.capture_point(id)
    }
    pub fn player_id(&self, handle: HostPlayer) -> Option<PlayerId> {
        self.roster.by_handle(handle).map(|p| p.id)
    }
    pub fn player_stats(&self, handle: HostPlayer) -> Option<&PlayerStats> {
        self.ledger.stats(self.player_id(handle)?)
    }

    #[allow(non_snake_case)]
    pub fn TEST_capture_point_mut(&mut self, id: PointId) -> Option<&mut CapturePoint> {
        self.map.capture_point_mut(id)
    }

    pub fn setup(&mut self, now: GameInstant) {
        if self.phase != ModePhase::Constructed {
            warn!("Game mode is already set up");
            return;
        }
        self.advance_to(now);
        let settings = ObjectiveSettings {
            capture_time: self.rules.capture.host_capture_time(),
            neutralization_time: self.rules.capture.neutralization_time,
            max_capture_multiplier: self.rules.capture.max_capture_multiplier,
        };
        for point in self.map.capture_points() {
            self.host.configure_objective(point.object(), settings);
        }
        self.display.send(DisplayUpdate::ScoreboardLayout(ScoreboardLayout {
            column_names: SCOREBOARD_COLUMNS.iter().map(|&s| s.to_owned()).collect(),
            sorting_column: 0,
            reverse_sorting: false,
            target_score: self.rules.target_score,
        }));
        self.phase = ModePhase::Running;
        info!(
            "Game mode set up on {} with {} capture points",
            self.map.name(),
            self.map.capture_points().len()
        );
        self.maybe_announce_game_start();
    }

    // Host-facing entry point. Dropped events are logged, never propagated: nothing here is fatal
    // to the session.
    pub fn apply_event(&mut self, event: HostEvent, now: GameInstant) {
        if let Err(err) = self.try_apply_event(event, now) {
            warn!("Ignoring {:?}: {}", event, err);
        }
    }

    pub fn try_apply_event(
        &mut self, event: HostEvent, now: GameInstant,
    ) -> Result<(), EventError> {
        self.advance_to(now);
        match event {
            HostEvent::Tick => Ok(()),
            HostEvent::PlayerJoined { player } => {
                self.on_player_joined(player);
                Ok(())
            }
            HostEvent::PlayerUndeployed { player } => self.record_score(player, ScoreEvent::Death),
            HostEvent::PlayerEarnedKill { player } => self.record_score(player, ScoreEvent::Kill),
            HostEvent::PlayerEarnedAssist { player } => {
                self.record_score(player, ScoreEvent::Assist)
            }
            HostEvent::PlayerEnteredZone { player, point } => self.on_player_entered(player, point),
            HostEvent::PlayerExitedZone { player, point } => self.on_player_exited(player, point),
            HostEvent::ZoneCaptured { point } => self.on_zone_captured(point),
            HostEvent::ZoneLost { point } => self.on_zone_lost(point),
        }
    }

    // Runs every loop iteration due by `now`, each at its own scheduled instant.
    pub fn advance_to(&mut self, now: GameInstant) {
        if now < self.now {
            warn!("Time went backwards: {} -> {}; keeping {}", self.now, now, self.now);
            return;
        }
        while let Some((at, task)) = self.scheduler.pop_due(now) {
            self.now = at;
            self.run_task(task);
        }
        self.now = now;
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::PointLoop { point, kind, generation } => {
                let result =
                    self.with_point(point, |p, ctx| p.resume_loop(kind, generation, ctx));
                if let Err(err) = result {
                    warn!("Dropping scheduled {:?}: {}", task, err);
                }
            }
            Task::HideGameStartBanner { player } => {
                self.display.send(DisplayUpdate::GameStartBanner { player, visible: false });
            }
        }
    }

    fn with_point<R>(
        &mut self, id: PointId, f: impl FnOnce(&mut CapturePoint, &mut PointContext) -> R,
    ) -> Result<R, EventError> {
        let point = self.map.capture_point_mut(id).ok_or(EventError::UnknownCapturePoint(id))?;
        let mut ctx = PointContext {
            now: self.now,
            rules: &self.rules.capture,
            scheduler: &mut self.scheduler,
            display: &self.display,
            host: self.host.as_mut(),
        };
        Ok(f(point, &mut ctx))
    }

    fn check_running(&self) -> Result<(), EventError> {
        match self.phase {
            ModePhase::Running => Ok(()),
            ModePhase::Constructed => Err(EventError::NotSetUp),
        }
    }

    fn resolve_player(&self, handle: HostPlayer) -> Result<PlayerId, EventError> {
        self.player_id(handle).ok_or(EventError::UnknownPlayer(handle))
    }

    fn resolve_point(&self, point: HostPoint) -> PointId { self.host.object_id_of(point) }

    fn on_player_joined(&mut self, handle: HostPlayer) {
        let player = match self.roster.add_player(handle) {
            JoinOutcome::New(player) => player,
            JoinOutcome::AlreadyKnown(player) => {
                debug!("Player {player} ({handle:?}) joined again");
                return;
            }
        };
        info!("Player {player} joined as {:?}, team {:?}", handle, self.host.team_of(handle));
        self.ledger.add_player(player);
        let capture_points = self.map.capture_points().iter().map(|p| p.snapshot()).collect_vec();
        self.display.send(DisplayUpdate::PlayerSetup { player, capture_points });
        self.maybe_announce_game_start();
    }

    fn record_score(&mut self, handle: HostPlayer, event: ScoreEvent) -> Result<(), EventError> {
        self.check_running()?;
        let player = self.resolve_player(handle)?;
        let stats = self.ledger.record(player, event).ok_or(EventError::UnknownPlayer(handle))?;
        self.publish_score(player, &stats);
        Ok(())
    }

    fn publish_score(&self, player: PlayerId, stats: &PlayerStats) {
        self.display.send(DisplayUpdate::ScoreboardRow {
            player,
            score: stats.score,
            eliminations: stats.eliminations(),
            deaths: stats.deaths,
        });
    }

    fn on_player_entered(
        &mut self, handle: HostPlayer, point: HostPoint,
    ) -> Result<(), EventError> {
        self.check_running()?;
        let point_id = self.resolve_point(point);
        if self.map.capture_point(point_id).is_none() {
            return Err(EventError::UnknownCapturePoint(point_id));
        }
        let player = self.resolve_player(handle)?;
        let team = self.host.team_of(handle).team().ok_or(EventError::PlayerWithoutTeam(player))?;
        self.with_point(point_id, |p, ctx| p.player_enters(player, team, ctx))?
    }

    fn on_player_exited(&mut self, handle: HostPlayer, point: HostPoint) -> Result<(), EventError> {
        self.check_running()?;
        let point_id = self.resolve_point(point);
        if self.map.capture_point(point_id).is_none() {
            return Err(EventError::UnknownCapturePoint(point_id));
        }
        let player = self.resolve_player(handle)?;
        self.with_point(point_id, |p, ctx| p.player_leaves(player, ctx))?
    }

    // Ownership change and capture credit happen in one step: the players credited are exactly
    // the winning team's occupants when the host reports the capture.
    fn on_zone_captured(&mut self, point: HostPoint) -> Result<(), EventError> {
        self.check_running()?;
        let point_id = self.resolve_point(point);
        let new_owner = self.host.owner_team_of(point);
        let Some(credited) = self.with_point(point_id, |p, ctx| p.captured(new_owner, ctx))? else {
            return Ok(());
        };
        for player in credited {
            if let Some(stats) = self.ledger.record(player, ScoreEvent::FlagCapture) {
                self.publish_score(player, &stats);
            }
        }
        self.update_game_mode_overview();
        Ok(())
    }

    fn on_zone_lost(&mut self, point: HostPoint) -> Result<(), EventError> {
        self.check_running()?;
        let point_id = self.resolve_point(point);
        let host_owner = self.host.owner_team_of(point);
        self.with_point(point_id, |p, ctx| p.ownership_lost(host_owner, ctx))
    }

    fn update_game_mode_overview(&self) {
        let point_owners = self.map.point_owners();
        for player in self.roster.ids() {
            self.display.send(DisplayUpdate::GameModeOverview {
                player,
                point_owners: point_owners.clone(),
            });
        }
    }

    // The game starts for real once each team has somebody in it. Happens once per mode.
    fn maybe_announce_game_start(&mut self) {
        if self.phase != ModePhase::Running || self.game_start_announced {
            return;
        }
        let players_per_team = self.roster.players_per_team(self.host.as_ref());
        if Team::iter().any(|team| players_per_team[team] == 0) {
            return;
        }
        self.game_start_announced = true;
        info!("Both teams present, announcing game start at {}", self.now);
        let hide_at = self.now + MillisDuration::from(self.rules.game_start_banner_duration);
        for player in self.roster.ids().collect_vec() {
            self.display.send(DisplayUpdate::GameStartBanner { player, visible: true });
            self.scheduler.schedule(hide_at, Task::HideGameStartBanner { player });
        }
    }
}
