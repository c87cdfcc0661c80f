use capture_mode::clock::GameInstant;
use capture_mode::host::HostPoint;
use capture_mode::player::HostPlayer;
use capture_mode::scores::PlayerStats;
use capture_mode::team::{Allegiance, Team};
use log::info;
use serde::Serialize;

use crate::scenario::{Scenario, ScriptEvent};
use crate::scripted_host::ScriptedHost;
use crate::simulation::Simulation;


pub struct SimulateConfig {
    pub scenario_file: String,
    pub detect_saturation: bool,
}

#[derive(Serialize)]
struct ScoreboardEntry {
    player: u64,
    team: Option<Team>,
    #[serde(flatten)]
    stats: PlayerStats,
}

#[derive(Serialize)]
struct PointSummary {
    name: String,
    owner: Allegiance,
    progress: f64,
}

#[derive(Serialize)]
struct Summary {
    map: String,
    end_time_ms: u64,
    points: Vec<PointSummary>,
    scoreboard: Vec<ScoreboardEntry>,
}

pub fn run(config: SimulateConfig) -> anyhow::Result<()> {
    let scenario = Scenario::load(&config.scenario_file)?;
    let host = ScriptedHost::new(&scenario.map);
    for (&player, &team) in &scenario.teams {
        host.assign_team(HostPlayer(player), team);
    }
    let mut sim =
        Simulation::new(scenario.rules.clone(), &scenario.map, host, config.detect_saturation);
    let mut setup_done = false;
    for step in &scenario.script {
        if !setup_done && step.at >= scenario.setup_at {
            sim.setup(GameInstant::from_duration(scenario.setup_at));
            setup_done = true;
        }
        let at = GameInstant::from_duration(step.at);
        match step.event {
            ScriptEvent::Capture { point, owner } => {
                sim.host().set_owner(HostPoint(point), Allegiance::Team(owner))
            }
            ScriptEvent::Lose { point } => {
                sim.host().set_owner(HostPoint(point), Allegiance::Neutral)
            }
            _ => {}
        }
        sim.apply(step.event.to_host_event(), at);
    }
    if !setup_done {
        sim.setup(GameInstant::from_duration(scenario.setup_at));
    }
    info!(
        "Simulation finished at {}: {} display updates, {} vehicles spawned",
        sim.now(),
        sim.num_display_updates(),
        sim.host().num_spawns()
    );

    let summary = summarize(&sim, &scenario);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn summarize(sim: &Simulation, scenario: &Scenario) -> Summary {
    let mode = sim.mode();
    let points = mode
        .map()
        .capture_points()
        .iter()
        .map(|p| PointSummary {
            name: p.name().to_owned(),
            owner: p.owner(),
            progress: p.progress().as_f64(),
        })
        .collect();
    let mut scoreboard: Vec<_> = mode
        .roster()
        .players()
        .iter()
        .filter_map(|p| {
            Some(ScoreboardEntry {
                player: p.handle.0,
                team: scenario.teams.get(&p.handle.0).copied(),
                stats: *mode.ledger().stats(p.id)?,
            })
        })
        .collect();
    scoreboard.sort_by_key(|e| std::cmp::Reverse(e.stats.score));
    Summary {
        map: mode.map().name().to_owned(),
        end_time_ms: sim.now().elapsed_since_start().as_millis(),
        points,
        scoreboard,
    }
}
