use bevy::prelude::*;

use crate::events::Sound;

/// Deferred side effects. They only ever fire from [`Scheduler::advance`],
/// which the game loop calls once per frame at a fixed point.
#[derive(Clone, Debug, PartialEq)]
pub enum ScheduledAction {
    GameOver,
    PlaySound { sound: Sound, volume: f32 },
    StartGame,
    TerminalMessage,
}

#[derive(Clone, Debug)]
struct Pending {
    due: f32,
    seq: u64,
    action: ScheduledAction,
}

#[derive(Resource, Default, Debug)]
pub struct Scheduler {
    now: f32,
    next_seq: u64,
    queue: Vec<Pending>,
}

impl Scheduler {
    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn schedule(&mut self, delay: f32, action: ScheduledAction) {
        let due = self.now + delay.max(0.0);
        self.queue.push(Pending {
            due,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    pub fn is_pending(&self, action: &ScheduledAction) -> bool {
        self.queue.iter().any(|p| &p.action == action)
    }

    /// Moves the clock forward and returns everything that came due, earliest
    /// first. Actions due at the same instant keep their scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<ScheduledAction> {
        self.now += dt.max(0.0);
        let now = self.now;

        let mut due: Vec<Pending> = Vec::new();
        self.queue.retain(|p| {
            if p.due <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.action).collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_when_due() {
        let mut s = Scheduler::default();
        s.schedule(1.5, ScheduledAction::GameOver);
        assert!(s.advance(1.0).is_empty());
        assert_eq!(s.advance(0.5), vec![ScheduledAction::GameOver]);
        assert!(s.is_empty());
        assert!(s.advance(10.0).is_empty());
    }

    #[test]
    fn drains_in_due_order_then_fifo() {
        let mut s = Scheduler::default();
        s.schedule(2.0, ScheduledAction::TerminalMessage);
        s.schedule(1.0, ScheduledAction::StartGame);
        s.schedule(2.0, ScheduledAction::GameOver);
        let fired = s.advance(3.0);
        assert_eq!(
            fired,
            vec![
                ScheduledAction::StartGame,
                ScheduledAction::TerminalMessage,
                ScheduledAction::GameOver,
            ]
        );
    }

    #[test]
    fn delay_is_relative_to_current_time() {
        let mut s = Scheduler::default();
        s.advance(5.0);
        s.schedule(1.0, ScheduledAction::GameOver);
        assert!(s.advance(0.9).is_empty());
        assert_eq!(s.advance(0.1).len(), 1);
    }

    #[test]
    fn clear_drops_pending() {
        let mut s = Scheduler::default();
        s.schedule(1.0, ScheduledAction::GameOver);
        assert!(s.is_pending(&ScheduledAction::GameOver));
        s.clear();
        assert!(s.advance(2.0).is_empty());
    }
}
