use enum_map::{EnumMap, enum_map};
use log::{debug, info};
use strum::IntoEnumIterator;

use crate::clock::GameInstant;
use crate::display::{CapturePointSnapshot, DisplayChannel, DisplayUpdate};
use crate::event::EventError;
use crate::host::{Host, HostPoint, SpawnerId};
use crate::map::{CapturePointConfig, PointId};
use crate::player::PlayerId;
use crate::progress::Progress;
use crate::rules::CaptureRules;
use crate::scheduler::{LoopGeneration, LoopKind, Scheduler, Task};
use crate::team::{Allegiance, Team};


// Everything a capture point may touch while reacting to an input.
pub struct PointContext<'a> {
    pub now: GameInstant,
    pub rules: &'a CaptureRules,
    pub scheduler: &'a mut Scheduler,
    pub display: &'a DisplayChannel,
    pub host: &'a mut dyn Host,
}

// One contested zone.
//
// States:
//   - Idle: not capturing, not bleeding. Owned or neutral depending on `owner`.
//   - Capturing: somebody is in the zone; the capturing loop moves progress towards the team
//     with more occupants.
//   - Bleeding: the zone was emptied; the bleeding loop decays progress towards zero.
// `is_capturing` and `is_bleeding` are never both true.
//
// Occupant lists are the only record of who is in the zone: a team's live count is the length of
// its list.
#[derive(Clone, Debug)]
pub struct CapturePoint {
    id: PointId,
    object: HostPoint,
    name: String,
    owner: Allegiance,
    occupants: EnumMap<Team, Vec<PlayerId>>,
    progress: Progress,
    is_capturing: bool,
    is_bleeding: bool,
    loop_generation: LoopGeneration,
    vehicle_spawners: EnumMap<Team, Vec<SpawnerId>>,
}

impl CapturePoint {
    pub fn new(config: &CapturePointConfig) -> Self {
        CapturePoint {
            id: config.id,
            object: config.object,
            name: config.name.clone(),
            owner: Allegiance::Neutral,
            occupants: enum_map! { _ => Vec::new() },
            progress: Progress::ZERO,
            is_capturing: false,
            is_bleeding: false,
            loop_generation: LoopGeneration::default(),
            vehicle_spawners: config.vehicle_spawners.clone(),
        }
    }

    pub fn id(&self) -> PointId { self.id }
    pub fn object(&self) -> HostPoint { self.object }
    pub fn name(&self) -> &str { &self.name }
    pub fn owner(&self) -> Allegiance { self.owner }
    pub fn progress(&self) -> Progress { self.progress }
    pub fn is_capturing(&self) -> bool { self.is_capturing }
    pub fn is_bleeding(&self) -> bool { self.is_bleeding }
    pub fn occupants(&self, team: Team) -> &[PlayerId] { &self.occupants[team] }
    pub fn occupant_count(&self, team: Team) -> usize { self.occupants[team].len() }

    pub fn team_of_occupant(&self, player: PlayerId) -> Option<Team> {
        Team::iter().find(|&team| self.occupants[team].contains(&player))
    }
    pub fn is_empty(&self) -> bool { Team::iter().all(|team| self.occupants[team].is_empty()) }

    pub fn snapshot(&self) -> CapturePointSnapshot {
        CapturePointSnapshot {
            point: self.id,
            name: self.name.clone(),
            owner: self.owner,
            occupants: enum_map! { team => self.occupants[team].len() },
            progress: self.progress,
        }
    }

    pub fn player_enters(
        &mut self, player: PlayerId, team: Team, ctx: &mut PointContext,
    ) -> Result<(), EventError> {
        if self.team_of_occupant(player).is_some() {
            return Err(EventError::AlreadyInZone { player, point: self.id });
        }
        if !self.is_capturing {
            self.is_bleeding = false;
            self.is_capturing = true;
            self.start_loop(LoopKind::Capturing, ctx);
        }
        self.occupants[team].push(player);
        debug!(
            "Player {player} entered {} ({:?}); occupants {:?}",
            self.name, team, self.snapshot().occupants
        );
        self.update_capturing_ui(ctx.display);
        self.set_capturing_ui_visible(player, true, ctx.display);
        Ok(())
    }

    pub fn player_leaves(
        &mut self, player: PlayerId, ctx: &mut PointContext,
    ) -> Result<(), EventError> {
        let Some(team) = self.team_of_occupant(player) else {
            return Err(EventError::NotInZone { player, point: self.id });
        };
        self.occupants[team].retain(|&p| p != player);
        debug!("Player {player} left {} ({:?})", self.name, team);
        if self.is_empty() {
            self.is_capturing = false;
            if self.progress.is_strictly_within(ctx.rules.bleed_eligibility_bound) {
                self.is_bleeding = true;
                self.start_loop(LoopKind::Bleeding, ctx);
            }
        }
        self.set_capturing_ui_visible(player, false, ctx.display);
        self.update_capturing_ui(ctx.display);
        Ok(())
    }

    // Ownership transition after the host detected saturation. Returns the players credited with
    // the capture: the winning team's occupants at this very moment. Reporting the current owner
    // again is a no-op and returns `None`.
    pub fn captured(
        &mut self, new_owner: Allegiance, ctx: &mut PointContext,
    ) -> Option<Vec<PlayerId>> {
        if !self.transition_ownership(new_owner, ctx) {
            return None;
        }
        let Some(team) = new_owner.team() else {
            return Some(Vec::new());
        };
        self.spawn_vehicles(team, ctx.host);
        Some(self.occupants[team].clone())
    }

    // The host reports that the owner lost the point. No spawner changes and no credit.
    pub fn ownership_lost(&mut self, host_owner: Allegiance, ctx: &mut PointContext) {
        if !self.transition_ownership(host_owner, ctx) {
            self.update_capturing_ui(ctx.display);
        }
    }

    // Runs one iteration of a loop woken up by the scheduler. Stale wake-ups (loop stopped, or
    // restarted since) do nothing.
    pub fn resume_loop(
        &mut self, kind: LoopKind, generation: LoopGeneration, ctx: &mut PointContext,
    ) {
        if generation != self.loop_generation || !self.is_loop_running(kind) {
            debug!("{} loop on {} finished", loop_name(kind), self.name);
            return;
        }
        match kind {
            LoopKind::Capturing => self.capture_tick(ctx),
            LoopKind::Bleeding => self.bleed_tick(ctx),
        }
        if self.is_loop_running(kind) {
            let period = match kind {
                LoopKind::Capturing => ctx.rules.capture_tick_millis(),
                LoopKind::Bleeding => ctx.rules.bleed_tick_millis(),
            };
            ctx.scheduler.schedule(ctx.now + period, Task::PointLoop {
                point: self.id,
                kind,
                generation,
            });
        }
    }

    #[allow(non_snake_case)]
    pub fn TEST_set_progress(&mut self, progress: Progress) { self.progress = progress; }

    fn is_loop_running(&self, kind: LoopKind) -> bool {
        match kind {
            LoopKind::Capturing => self.is_capturing,
            LoopKind::Bleeding => self.is_bleeding,
        }
    }

    // The first iteration runs right away; following ones are scheduled one period apart.
    fn start_loop(&mut self, kind: LoopKind, ctx: &mut PointContext) {
        self.loop_generation.0 += 1;
        debug!("{} loop on {} started at {}", loop_name(kind), self.name, ctx.now);
        self.resume_loop(kind, self.loop_generation, ctx);
    }

    fn capture_tick(&mut self, ctx: &mut PointContext) {
        let counts = enum_map! { team => self.occupants[team].len() };
        let leader = Team::iter().find(|&team| counts[team] > counts[team.opponent()]);
        if let Some(team) = leader {
            let step = ctx.rules.capture_step(counts[team]);
            self.progress.advance_towards(team, step, ctx.rules.progress_bound);
        }
        self.update_capturing_ui(ctx.display);
    }

    fn bleed_tick(&mut self, ctx: &mut PointContext) {
        if self.progress.is_strictly_within(ctx.rules.bleed_stop_threshold) {
            self.is_bleeding = false;
        } else {
            self.progress.decay(ctx.rules.bleed_step);
        }
    }

    fn transition_ownership(&mut self, new_owner: Allegiance, ctx: &mut PointContext) -> bool {
        if new_owner == self.owner {
            debug!("{} is already owned by {:?}", self.name, new_owner);
            return false;
        }
        info!("{} changed owner: {:?} -> {:?} at {}", self.name, self.owner, new_owner, ctx.now);
        self.owner = new_owner;
        ctx.display.send(DisplayUpdate::OwnershipChanged { point: self.id, owner: new_owner });
        self.update_capturing_ui(ctx.display);
        true
    }

    fn spawn_vehicles(&self, owner: Team, host: &mut dyn Host) {
        let own = &self.vehicle_spawners[owner];
        let other = &self.vehicle_spawners[owner.opponent()];
        // Spawners are paired by index; unpaired extras are skipped.
        for (&own_spawner, &other_spawner) in own.iter().zip(other) {
            host.force_spawn(own_spawner);
            host.set_auto_spawn(own_spawner, true);
            host.set_auto_spawn(other_spawner, false);
        }
    }

    fn update_capturing_ui(&self, display: &DisplayChannel) {
        let snapshot = self.snapshot();
        for &player in Team::iter().flat_map(|team| self.occupants[team].iter()) {
            display.send(DisplayUpdate::CapturePoint { player, snapshot: snapshot.clone() });
        }
    }

    fn set_capturing_ui_visible(&self, player: PlayerId, visible: bool, display: &DisplayChannel) {
        display.send(DisplayUpdate::CapturePointVisibility { player, point: self.id, visible });
    }
}

fn loop_name(kind: LoopKind) -> &'static str {
    match kind {
        LoopKind::Capturing => "Capturing",
        LoopKind::Bleeding => "Bleeding",
    }
}
