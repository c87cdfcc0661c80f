mod common;

use std::time::Duration;

use capture_mode::clock::GameInstant;
use capture_mode::display::{DisplayUpdate, ScoreboardLayout};
use capture_mode::event::{EventError, HostEvent};
use capture_mode::game_mode::ModePhase;
use capture_mode::host::{HostPoint, ObjectiveSettings, SpawnerId};
use capture_mode::map::{CapturePointConfig, MapConfig, PointId};
use capture_mode::player::{HostPlayer, PlayerId};
use capture_mode::progress::Progress;
use capture_mode::rules::ModeRules;
use capture_mode::scores::PlayerStats;
use capture_mode::team::{Allegiance, Team};
use capture_mode::test_util::SpawnerCommand;
use common::*;
use enum_map::enum_map;
use itertools::Itertools;
use pretty_assertions::assert_eq;


fn banners(updates: &[DisplayUpdate]) -> Vec<(PlayerId, bool)> {
    updates
        .iter()
        .filter_map(|u| match u {
            DisplayUpdate::GameStartBanner { player, visible } => Some((*player, *visible)),
            _ => None,
        })
        .collect()
}

#[test]
fn setup_configures_objectives_and_scoreboard() {
    let mut t = TestMode::new();
    t.mode.setup(t.now);
    assert_eq!(t.mode.phase(), ModePhase::Running);

    let objectives = t.host.world().objectives.clone();
    assert_eq!(objectives.iter().map(|(point, _)| point.0).collect_vec(), vec![1, 2, 3, 4, 5]);
    for (_, settings) in objectives {
        assert_eq!(settings, ObjectiveSettings {
            capture_time: Duration::from_secs(20),
            neutralization_time: Duration::from_secs(20),
            max_capture_multiplier: 5,
        });
    }
    assert_eq!(t.take_display(), vec![DisplayUpdate::ScoreboardLayout(ScoreboardLayout {
        column_names: vec!["Score".to_owned(), "Eliminations".to_owned(), "Deaths".to_owned()],
        sorting_column: 0,
        reverse_sorting: false,
        target_score: 5,
    })]);
}

#[test]
fn events_before_setup_are_rejected() {
    let mut t = TestMode::new();
    t.join(1, Team::A);
    assert_eq!(t.enter(1, POINT_A), Err(EventError::NotSetUp));
    assert_eq!(
        t.apply(HostEvent::PlayerEarnedKill { player: HostPlayer(1) }),
        Err(EventError::NotSetUp)
    );
    assert_eq!(t.capture(POINT_A, Allegiance::Team(Team::A)), Err(EventError::NotSetUp));
    assert!(t.point(POINT_A).is_empty());
    assert_eq!(t.score(1), 0);
    assert_eq!(t.point(POINT_A).owner(), Allegiance::Neutral);
}

#[test]
fn player_setup_lists_every_point() {
    let mut t = TestMode::started();
    t.take_display();
    let p1 = t.join(1, Team::A);
    let updates = t.take_display();
    let DisplayUpdate::PlayerSetup { player, capture_points } = &updates[0] else {
        panic!("unexpected update: {:?}", updates[0]);
    };
    assert_eq!(*player, p1);
    assert_eq!(capture_points.iter().map(|s| s.name.as_str()).collect_vec(), vec![
        "A", "B", "C", "D", "E"
    ]);
    assert!(capture_points.iter().all(|s| s.owner == Allegiance::Neutral));
}

#[test]
fn rejoin_keeps_player_id() {
    let mut t = TestMode::started();
    let p1 = t.join(1, Team::A);
    t.apply(HostEvent::PlayerEarnedKill { player: HostPlayer(1) }).unwrap();
    assert_eq!(t.join(1, Team::A), p1);
    assert_eq!(t.mode.roster().len(), 1);
    assert_eq!(t.score(1), 100);
}

#[test]
fn combat_events_update_scoreboard() {
    let mut t = TestMode::started();
    let p1 = t.join(1, Team::A);
    t.take_display();
    for event in [
        HostEvent::PlayerEarnedKill { player: HostPlayer(1) },
        HostEvent::PlayerEarnedKill { player: HostPlayer(1) },
        HostEvent::PlayerEarnedAssist { player: HostPlayer(1) },
        HostEvent::PlayerUndeployed { player: HostPlayer(1) },
    ] {
        t.apply(event).unwrap();
    }
    assert_eq!(t.mode.player_stats(HostPlayer(1)), Some(&PlayerStats {
        kills: 2,
        assists: 1,
        deaths: 1,
        flag_captures: 0,
        score: 250,
    }));
    assert_eq!(t.take_display().last(), Some(&DisplayUpdate::ScoreboardRow {
        player: p1,
        score: 250,
        eliminations: 3,
        deaths: 1,
    }));
}

#[test]
fn squad_saturates_then_bleeds_out() {
    let mut t = TestMode::started();
    for h in 1..=3 {
        t.join(h, Team::A);
        t.enter(h, POINT_A).unwrap();
    }
    assert!(t.point(POINT_A).is_capturing());
    t.advance_millis(200 * 50);
    assert_eq!(t.point(POINT_A).progress(), Progress::from_f64(20.0));

    for h in 1..=3 {
        t.exit(h, POINT_A).unwrap();
    }
    assert!(!t.point(POINT_A).is_capturing());
    assert!(t.point(POINT_A).is_bleeding());
    assert_eq!(t.point(POINT_A).progress(), Progress::from_f64(19.95));
    t.advance_millis(2 * 200);
    assert_eq!(t.point(POINT_A).progress(), Progress::from_f64(19.85));

    t.advance_millis(397 * 200);
    assert!(!t.point(POINT_A).is_bleeding());
    assert_eq!(t.point(POINT_A).progress(), Progress::from_f64(0.05));
    // Ownership is the host's call: saturation alone does not flip the point.
    assert_eq!(t.point(POINT_A).owner(), Allegiance::Neutral);
}

#[test]
fn capture_credits_winning_occupants_once() {
    let mut t = TestMode::started();
    let p1 = t.join(1, Team::A);
    let p2 = t.join(2, Team::A);
    let p3 = t.join(3, Team::B);
    for h in 1..=3 {
        t.enter(h, POINT_A).unwrap();
    }
    t.take_display();

    t.capture(POINT_A, Allegiance::Team(Team::A)).unwrap();
    assert_eq!(t.point(POINT_A).owner(), Allegiance::Team(Team::A));
    assert_eq!((t.score(1), t.score(2), t.score(3)), (200, 200, 0));
    assert_eq!(t.host.world().take_spawner_commands(), vec![
        SpawnerCommand::ForceSpawn(SpawnerId(1010)),
        SpawnerCommand::SetAutoSpawn(SpawnerId(1010), true),
        SpawnerCommand::SetAutoSpawn(SpawnerId(1010), false),
    ]);
    let updates = t.take_display();
    assert!(updates.contains(&DisplayUpdate::OwnershipChanged {
        point: PointId(101),
        owner: Allegiance::Team(Team::A),
    }));
    let overview_recipients = updates
        .iter()
        .filter_map(|u| match u {
            DisplayUpdate::GameModeOverview { player, point_owners } => {
                assert_eq!(point_owners[0], (PointId(101), Allegiance::Team(Team::A)));
                Some(*player)
            }
            _ => None,
        })
        .collect_vec();
    assert_eq!(overview_recipients, vec![p1, p2, p3]);

    // Reporting the same owner again changes nothing.
    t.capture(POINT_A, Allegiance::Team(Team::A)).unwrap();
    assert_eq!((t.score(1), t.score(2), t.score(3)), (200, 200, 0));
    assert!(t.host.world().take_spawner_commands().is_empty());
    assert!(t.take_display().is_empty());
}

#[test]
fn capture_by_point_without_spawners_only_credits() {
    let mut t = TestMode::started();
    t.join(1, Team::B);
    t.enter(1, POINT_B).unwrap();
    t.capture(POINT_B, Allegiance::Team(Team::B)).unwrap();
    assert_eq!(t.score(1), 200);
    assert!(t.host.world().take_spawner_commands().is_empty());
}

#[test]
fn capture_hands_paired_spawners_to_new_owner() {
    let spawners = |ids: &[u32]| ids.iter().copied().map(SpawnerId).collect_vec();
    let map = MapConfig {
        name: "Depot".to_owned(),
        capture_points: vec![CapturePointConfig {
            id: PointId(101),
            object: POINT_A,
            name: "A".to_owned(),
            vehicle_spawners: enum_map! {
                Team::A => spawners(&[1, 2, 3]),
                Team::B => spawners(&[10, 20]),
            },
        }],
    };
    let mut t = TestMode::with_map(ModeRules::conquest(), map);
    t.mode.setup(t.now);

    // The third team A spawner has no counterpart and is left alone.
    t.capture(POINT_A, Allegiance::Team(Team::B)).unwrap();
    assert_eq!(t.host.world().take_spawner_commands(), vec![
        SpawnerCommand::ForceSpawn(SpawnerId(10)),
        SpawnerCommand::SetAutoSpawn(SpawnerId(10), true),
        SpawnerCommand::SetAutoSpawn(SpawnerId(1), false),
        SpawnerCommand::ForceSpawn(SpawnerId(20)),
        SpawnerCommand::SetAutoSpawn(SpawnerId(20), true),
        SpawnerCommand::SetAutoSpawn(SpawnerId(2), false),
    ]);

    t.capture(POINT_A, Allegiance::Team(Team::A)).unwrap();
    assert_eq!(t.host.world().take_spawner_commands(), vec![
        SpawnerCommand::ForceSpawn(SpawnerId(1)),
        SpawnerCommand::SetAutoSpawn(SpawnerId(1), true),
        SpawnerCommand::SetAutoSpawn(SpawnerId(10), false),
        SpawnerCommand::ForceSpawn(SpawnerId(2)),
        SpawnerCommand::SetAutoSpawn(SpawnerId(2), true),
        SpawnerCommand::SetAutoSpawn(SpawnerId(20), false),
    ]);
}

#[test]
fn lost_point_can_be_recaptured() {
    let mut t = TestMode::started();
    t.join(1, Team::A);
    t.enter(1, POINT_A).unwrap();
    t.capture(POINT_A, Allegiance::Team(Team::A)).unwrap();
    t.host.world().take_spawner_commands();

    t.lose(POINT_A).unwrap();
    assert_eq!(t.point(POINT_A).owner(), Allegiance::Neutral);
    assert!(t.host.world().take_spawner_commands().is_empty());
    assert_eq!(t.score(1), 200);

    t.capture(POINT_A, Allegiance::Team(Team::A)).unwrap();
    assert_eq!(t.score(1), 400);
    assert_eq!(t.host.world().take_spawner_commands().len(), 3);
}

#[test]
fn unknown_references_have_no_side_effects() {
    let mut t = TestMode::started();
    t.join(1, Team::A);
    t.take_display();
    assert_eq!(t.enter(1, HostPoint(99)), Err(EventError::UnknownCapturePoint(PointId(99))));
    assert_eq!(t.enter(7, POINT_A), Err(EventError::UnknownPlayer(HostPlayer(7))));
    assert_eq!(
        t.apply(HostEvent::PlayerEarnedAssist { player: HostPlayer(7) }),
        Err(EventError::UnknownPlayer(HostPlayer(7)))
    );
    assert_eq!(
        t.capture(HostPoint(99), Allegiance::Team(Team::A)),
        Err(EventError::UnknownCapturePoint(PointId(99)))
    );
    assert!(t.point(POINT_A).is_empty());
    assert_eq!(t.score(1), 0);
    assert!(t.take_display().is_empty());
}

#[test]
fn game_start_banner_shows_once_both_teams_are_present() {
    let mut t = TestMode::started();
    let p1 = t.join(1, Team::A);
    let p2 = t.join(2, Team::A);
    assert!(banners(&t.take_display()).is_empty());

    let p3 = t.join(3, Team::B);
    assert!(t.mode.game_start_announced());
    assert_eq!(banners(&t.take_display()), vec![(p1, true), (p2, true), (p3, true)]);

    t.advance_millis(4_999);
    assert!(banners(&t.take_display()).is_empty());
    t.advance_millis(1);
    assert_eq!(banners(&t.take_display()), vec![(p1, false), (p2, false), (p3, false)]);

    t.join(4, Team::B);
    assert!(banners(&t.take_display()).is_empty());
}

#[test]
fn game_start_waits_for_setup() {
    let mut t = TestMode::new();
    let p1 = t.join(1, Team::A);
    let p2 = t.join(2, Team::B);
    assert!(banners(&t.take_display()).is_empty());
    t.mode.setup(t.now);
    assert_eq!(banners(&t.take_display()), vec![(p1, true), (p2, true)]);
}

#[test]
fn time_never_goes_backwards() {
    let mut t = TestMode::started();
    t.join(1, Team::A);
    t.enter(1, POINT_A).unwrap();
    t.advance_millis(1_000);
    assert_eq!(t.point(POINT_A).progress(), Progress::from_f64(1.0));

    t.mode.apply_event(HostEvent::Tick, GameInstant::from_millis(500));
    assert_eq!(t.mode.now(), GameInstant::from_millis(1_000));
    t.advance_millis(50);
    assert_eq!(t.point(POINT_A).progress(), Progress::from_f64(1.05));
}
