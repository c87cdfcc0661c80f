use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::clock::GameInstant;
use crate::map::PointId;
use crate::player::PlayerId;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum LoopKind {
    Capturing,
    Bleeding,
}

// Distinguishes loop runs on the same point. A loop that is stopped and started again before its
// old wake-up fires gets a new generation, so the stale wake-up is dropped.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct LoopGeneration(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Task {
    // Next iteration of a capture point loop.
    PointLoop { point: PointId, kind: LoopKind, generation: LoopGeneration },
    HideGameStartBanner { player: PlayerId },
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
struct ScheduledTask {
    at: GameInstant,
    // Tasks due at the same instant run in the order they were scheduled.
    seq: u64,
    task: Task,
}


// A suspended loop is a task due at a given simulated instant. Nothing runs in parallel: the owner
// pops due tasks and runs them one by one.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<ScheduledTask>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self { Scheduler::default() }

    pub fn len(&self) -> usize { self.queue.len() }
    pub fn is_empty(&self) -> bool { self.queue.is_empty() }

    pub fn schedule(&mut self, at: GameInstant, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(ScheduledTask { at, seq, task }));
    }

    pub fn next_due(&self) -> Option<GameInstant> {
        self.queue.peek().map(|Reverse(scheduled)| scheduled.at)
    }

    // Removes and returns the earliest task due at or before `now`, with its due time.
    pub fn pop_due(&mut self, now: GameInstant) -> Option<(GameInstant, Task)> {
        if self.next_due()? > now {
            return None;
        }
        self.queue.pop().map(|Reverse(scheduled)| (scheduled.at, scheduled.task))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn banner(player: u64) -> Task { Task::HideGameStartBanner { player: PlayerId(player) } }

    #[test]
    fn pops_in_time_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(GameInstant::from_millis(200), banner(1));
        scheduler.schedule(GameInstant::from_millis(50), banner(2));
        scheduler.schedule(GameInstant::from_millis(200), banner(0));
        assert_eq!(scheduler.pop_due(GameInstant::from_millis(10)), None);
        assert_eq!(
            scheduler.pop_due(GameInstant::from_millis(1000)),
            Some((GameInstant::from_millis(50), banner(2)))
        );
        assert_eq!(
            scheduler.pop_due(GameInstant::from_millis(1000)),
            Some((GameInstant::from_millis(200), banner(1)))
        );
        assert_eq!(
            scheduler.pop_due(GameInstant::from_millis(1000)),
            Some((GameInstant::from_millis(200), banner(0)))
        );
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.pop_due(GameInstant::from_millis(1000)), None);
    }

    #[test]
    fn due_exactly_now() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(GameInstant::from_millis(50), banner(0));
        assert_eq!(scheduler.next_due(), Some(GameInstant::from_millis(50)));
        assert!(scheduler.pop_due(GameInstant::from_millis(49)).is_none());
        assert!(scheduler.pop_due(GameInstant::from_millis(50)).is_some());
    }
}
