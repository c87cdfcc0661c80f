use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use capture_mode::event::HostEvent;
use capture_mode::host::HostPoint;
use capture_mode::map::MapConfig;
use capture_mode::player::HostPlayer;
use capture_mode::rules::ModeRules;
use capture_mode::team::Team;
use serde::{Deserialize, Serialize};


// A scripted match: who plays for which team and what the host reports when.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub rules: ModeRules,
    #[serde(default = "MapConfig::firestorm")]
    pub map: MapConfig,
    // Host player handle -> team.
    #[serde(default)]
    pub teams: BTreeMap<u64, Team>,
    #[serde(default, with = "humantime_serde")]
    pub setup_at: Duration,
    pub script: Vec<ScriptStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(with = "humantime_serde")]
    pub at: Duration,
    pub event: ScriptEvent,
}

// Points are referred to by host object, the way host events carry them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Join { player: u64 },
    Enter { player: u64, point: u32 },
    Exit { player: u64, point: u32 },
    Kill { player: u64 },
    Assist { player: u64 },
    Death { player: u64 },
    // Host flips the point to `owner` and reports the capture.
    Capture { point: u32, owner: Team },
    // Host neutralizes the point and reports the loss.
    Lose { point: u32 },
    Tick,
}

impl ScriptEvent {
    pub fn to_host_event(self) -> HostEvent {
        match self {
            ScriptEvent::Join { player } => HostEvent::PlayerJoined { player: HostPlayer(player) },
            ScriptEvent::Enter { player, point } => HostEvent::PlayerEnteredZone {
                player: HostPlayer(player),
                point: HostPoint(point),
            },
            ScriptEvent::Exit { player, point } => HostEvent::PlayerExitedZone {
                player: HostPlayer(player),
                point: HostPoint(point),
            },
            ScriptEvent::Kill { player } => {
                HostEvent::PlayerEarnedKill { player: HostPlayer(player) }
            }
            ScriptEvent::Assist { player } => {
                HostEvent::PlayerEarnedAssist { player: HostPlayer(player) }
            }
            ScriptEvent::Death { player } => {
                HostEvent::PlayerUndeployed { player: HostPlayer(player) }
            }
            ScriptEvent::Capture { point, .. } => {
                HostEvent::ZoneCaptured { point: HostPoint(point) }
            }
            ScriptEvent::Lose { point } => HostEvent::ZoneLost { point: HostPoint(point) },
            ScriptEvent::Tick => HostEvent::Tick,
        }
    }
}

impl Scenario {
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(contents).context("Parsing scenario")?;
        scenario.rules.validate().context("Invalid rules")?;
        scenario.map.validate().context("Invalid map")?;
        anyhow::ensure!(
            scenario.script.windows(2).all(|w| w[0].at <= w[1].at),
            "Script steps must be ordered by time"
        );
        Ok(scenario)
    }

    pub fn load(filename: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(filename)
            .with_context(|| format!("Failed to read scenario file '{filename}'"))?;
        Scenario::parse(&contents)
    }
}
