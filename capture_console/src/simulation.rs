use std::sync::mpsc;

use capture_mode::clock::GameInstant;
use capture_mode::display::DisplayUpdate;
use capture_mode::event::{EventError, HostEvent};
use capture_mode::game_mode::GameMode;
use capture_mode::host::HostPoint;
use capture_mode::map::MapConfig;
use capture_mode::rules::ModeRules;
use capture_mode::team::Allegiance;
use itertools::Itertools;
use log::{debug, info};

use crate::scripted_host::ScriptedHost;


// Drives a `GameMode` the way the game server would: delivers events in order, ticks time at the
// capture loop period and, when `detect_saturation` is on, plays the host objective by flipping
// ownership when progress saturates or swings to the other side.
pub struct Simulation {
    mode: GameMode,
    host: ScriptedHost,
    display_rx: mpsc::Receiver<DisplayUpdate>,
    detect_saturation: bool,
    now: GameInstant,
    num_display_updates: usize,
}

impl Simulation {
    pub fn new(
        rules: ModeRules, map: &MapConfig, host: ScriptedHost, detect_saturation: bool,
    ) -> Self {
        let (display_tx, display_rx) = mpsc::channel();
        let mode = GameMode::new(rules, map, Box::new(host.clone()), display_tx);
        Simulation {
            mode,
            host,
            display_rx,
            detect_saturation,
            now: GameInstant::game_start(),
            num_display_updates: 0,
        }
    }

    pub fn mode(&self) -> &GameMode { &self.mode }
    pub fn host(&self) -> &ScriptedHost { &self.host }
    pub fn now(&self) -> GameInstant { self.now }
    pub fn num_display_updates(&self) -> usize { self.num_display_updates }

    pub fn setup(&mut self, at: GameInstant) {
        self.run_until(at);
        self.mode.setup(at);
        self.drain_display();
    }

    pub fn apply(&mut self, event: HostEvent, at: GameInstant) {
        self.run_until(at);
        self.mode.apply_event(event, at);
        self.after_event();
    }

    pub fn try_apply(&mut self, event: HostEvent, at: GameInstant) -> Result<(), EventError> {
        self.run_until(at);
        let result = self.mode.try_apply_event(event, at);
        self.after_event();
        result
    }

    // Ticks at the capture loop period so saturation is noticed on the tick it happens.
    pub fn run_until(&mut self, at: GameInstant) {
        let period = self.mode.rules().capture.capture_tick_millis();
        while self.now + period <= at {
            let t = self.now + period;
            self.mode.apply_event(HostEvent::Tick, t);
            self.now = t;
            self.after_event();
        }
        if self.now < at {
            self.mode.apply_event(HostEvent::Tick, at);
            self.now = at;
            self.after_event();
        }
    }

    fn after_event(&mut self) {
        self.now = self.now.max(self.mode.now());
        if self.detect_saturation {
            self.detect_ownership_changes();
        }
        self.drain_display();
    }

    fn detect_ownership_changes(&mut self) {
        let bound = self.mode.rules().capture.progress_bound.abs();
        let points = self
            .mode
            .map()
            .capture_points()
            .iter()
            .map(|p| (p.object(), p.owner(), p.progress()))
            .collect_vec();
        for (object, owner, progress) in points {
            let Some(leader) = progress.favored_team() else {
                continue;
            };
            if progress.abs() == bound && owner != Allegiance::Team(leader) {
                self.host_flips(object, Allegiance::Team(leader), HostEvent::ZoneCaptured {
                    point: object,
                });
            } else if owner == Allegiance::Team(leader.opponent()) {
                self.host_flips(object, Allegiance::Neutral, HostEvent::ZoneLost { point: object });
            }
        }
    }

    fn host_flips(&mut self, object: HostPoint, owner: Allegiance, event: HostEvent) {
        debug!("Host objective {:?} flips to {:?}", object, owner);
        self.host.set_owner(object, owner);
        self.mode.apply_event(event, self.now);
    }

    fn drain_display(&mut self) {
        for update in self.display_rx.try_iter() {
            self.num_display_updates += 1;
            match &update {
                DisplayUpdate::ScoreboardLayout(_)
                | DisplayUpdate::ScoreboardRow { .. }
                | DisplayUpdate::OwnershipChanged { .. } => {
                    info!("[{}] {:?}", self.now, update)
                }
                DisplayUpdate::GameStartBanner { player, visible } => {
                    info!("[{}] Game start banner for {player}: {visible}", self.now)
                }
                _ => debug!("[{}] {:?}", self.now, update),
            }
        }
    }
}
