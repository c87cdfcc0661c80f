// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod scenario;
mod scripted_host;
mod simulate;
mod simulation;

use capture_mode::map::MapConfig;
use capture_mode::rules::ModeRules;
use clap::{Command, arg};
use serde::Serialize;


#[derive(Serialize)]
struct DefaultConfig {
    rules: ModeRules,
    map: MapConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Capture console")
        .version(clap::crate_version!())
        .about("Drives the capture point game mode with a simulated host")
        .subcommand_required(true)
        .subcommand(
            Command::new("simulate")
                .about("Replays a scripted match and prints the final scoreboard as JSON")
                .arg(arg!(<scenario_file> "Path to the scenario: yaml-serialized Scenario."))
                .arg(arg!(
                    --"no-auto-capture" "Only flip ownership on explicit capture/lose steps."
                )),
        )
        .subcommand(
            Command::new("stress-test")
                .about("Applies random host events and checks capture point invariants")
                .arg(
                    arg!(-'n' --"events" <n> "Number of random events")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("100000"),
                )
                .arg(
                    arg!(--"seed" <seed> "Random seed")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("0"),
                ),
        )
        .subcommand(
            Command::new("default-config")
                .about("Prints default rules and the built-in map in scenario format"),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("simulate", sub_matches)) => simulate::run(simulate::SimulateConfig {
            scenario_file: sub_matches.get_one::<String>("scenario_file").unwrap().clone(),
            detect_saturation: !sub_matches.get_flag("no-auto-capture"),
        }),
        Some(("stress-test", sub_matches)) => stress_test::run(stress_test::StressTestConfig {
            num_events: *sub_matches.get_one::<usize>("events").unwrap(),
            seed: *sub_matches.get_one::<u64>("seed").unwrap(),
        }),
        Some(("default-config", _)) => {
            let config = DefaultConfig {
                rules: ModeRules::conquest(),
                map: MapConfig::firestorm(),
            };
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
