use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::player::PlayerId;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub kill: u32,
    pub assist: u32,
    pub flag_capture: u32,
}

impl ScoreWeights {
    pub fn conquest() -> Self {
        ScoreWeights { kill: 100, assist: 50, flag_capture: 200 }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self { ScoreWeights::conquest() }
}


// All counters only go up. `score` is derived and is recomputed on every change; deaths do not
// affect it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub kills: u32,
    pub assists: u32,
    pub deaths: u32,
    pub flag_captures: u32,
    pub score: u32,
}

impl PlayerStats {
    pub fn eliminations(&self) -> u32 { self.kills + self.assists }

    // Weights come from config, so the score saturates instead of overflowing.
    fn recompute_score(&mut self, weights: &ScoreWeights) {
        self.score = self.kills.saturating_mul(weights.kill)
            .saturating_add(self.assists.saturating_mul(weights.assist))
            .saturating_add(self.flag_captures.saturating_mul(weights.flag_capture));
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScoreEvent {
    Kill,
    Assist,
    Death,
    FlagCapture,
}


// Per-player stats for the session. Entries are created on join and never removed: the host
// owns what happens to a player who leaves.
#[derive(Clone, Debug)]
pub struct ScoringLedger {
    weights: ScoreWeights,
    stats: HashMap<PlayerId, PlayerStats>,
}

impl ScoringLedger {
    pub fn new(weights: ScoreWeights) -> Self {
        ScoringLedger { weights, stats: HashMap::new() }
    }

    pub fn add_player(&mut self, player: PlayerId) {
        self.stats.entry(player).or_default();
    }

    pub fn stats(&self, player: PlayerId) -> Option<&PlayerStats> { self.stats.get(&player) }

    // Increments exactly one counter and recomputes the score. Returns the updated stats to be
    // published, or `None` for a player that never joined.
    pub fn record(&mut self, player: PlayerId, event: ScoreEvent) -> Option<PlayerStats> {
        let stats = self.stats.get_mut(&player)?;
        match event {
            ScoreEvent::Kill => stats.kills += 1,
            ScoreEvent::Assist => stats.assists += 1,
            ScoreEvent::Death => stats.deaths += 1,
            ScoreEvent::FlagCapture => stats.flag_captures += 1,
        }
        stats.recompute_score(&self.weights);
        debug!("Player {player} {event:?}: score is now {}", stats.score);
        Some(*stats)
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn score_formula() {
        let p = PlayerId(0);
        let mut ledger = ScoringLedger::new(ScoreWeights::conquest());
        ledger.add_player(p);
        ledger.record(p, ScoreEvent::Kill);
        ledger.record(p, ScoreEvent::Kill);
        ledger.record(p, ScoreEvent::Assist);
        ledger.record(p, ScoreEvent::Death);
        let stats = ledger.record(p, ScoreEvent::FlagCapture).unwrap();
        assert_eq!(stats, PlayerStats {
            kills: 2,
            assists: 1,
            deaths: 1,
            flag_captures: 1,
            score: 450,
        });
        assert_eq!(stats.eliminations(), 3);
    }

    #[test]
    fn deaths_do_not_affect_score() {
        let p = PlayerId(7);
        let mut ledger = ScoringLedger::new(ScoreWeights::conquest());
        ledger.add_player(p);
        for _ in 0..10 {
            ledger.record(p, ScoreEvent::Death);
        }
        assert_eq!(ledger.stats(p).unwrap().score, 0);
        assert_eq!(ledger.stats(p).unwrap().deaths, 10);
    }

    #[test]
    fn huge_weights_saturate() {
        let p = PlayerId(2);
        let weights = ScoreWeights { kill: 4_000_000_000, ..ScoreWeights::conquest() };
        let mut ledger = ScoringLedger::new(weights);
        ledger.add_player(p);
        ledger.record(p, ScoreEvent::Kill);
        let stats = ledger.record(p, ScoreEvent::Kill).unwrap();
        assert_eq!(stats.kills, 2);
        assert_eq!(stats.score, u32::MAX);
    }

    #[test]
    fn unknown_player_is_ignored() {
        let mut ledger = ScoringLedger::new(ScoreWeights::conquest());
        assert_eq!(ledger.record(PlayerId(3), ScoreEvent::Kill), None);
        assert!(ledger.stats(PlayerId(3)).is_none());
    }

    #[test]
    fn rejoin_keeps_stats() {
        let p = PlayerId(1);
        let mut ledger = ScoringLedger::new(ScoreWeights::conquest());
        ledger.add_player(p);
        ledger.record(p, ScoreEvent::Assist);
        ledger.add_player(p);
        assert_eq!(ledger.stats(p).unwrap().score, 50);
    }
}
