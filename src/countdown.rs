use bevy::prelude::*;
use std::time::Duration;

use crate::events::{Sound, SoundCue, SpawnMonster};
use crate::scheduler::{ScheduledAction, Scheduler};
use crate::settings::GameSettings;

/// What to do once the countdown hits zero.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CountdownFinish {
    SpawnMonster,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CountdownStep {
    Tick(u32),
    Finished(CountdownFinish),
}

/// The end-game clock. Only one can run; once started it stays active until
/// [`Countdown::reset`], even after it reaches zero.
#[derive(Resource, Debug)]
pub struct Countdown {
    pub remaining: u32,
    active: bool,
    displayed: bool,
    pub monster_spawned: bool,
    timer: Timer,
    on_complete: Option<CountdownFinish>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            remaining: 0,
            active: false,
            displayed: false,
            monster_spawned: false,
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
            on_complete: None,
        }
    }
}

impl Countdown {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the clock should be on screen.
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Returns false, and changes nothing, if a countdown is already active.
    pub fn start(&mut self, seconds: u32, on_complete: CountdownFinish) -> bool {
        if self.active {
            debug!("countdown already active, ignoring start");
            return false;
        }
        info!("starting countdown: {seconds} seconds");
        self.active = true;
        self.displayed = true;
        self.remaining = seconds;
        self.timer.reset();
        self.on_complete = Some(on_complete);
        true
    }

    /// Advances the clock. Every whole second produces a `Tick` with the new
    /// value; reaching zero produces `Finished` exactly once and takes the
    /// clock off screen.
    pub fn advance(&mut self, delta: Duration) -> Vec<CountdownStep> {
        let mut steps = Vec::new();
        if !self.displayed {
            return steps;
        }
        if self.remaining == 0 {
            self.finish(&mut steps);
            return steps;
        }

        self.timer.tick(delta);
        for _ in 0..self.timer.times_finished_this_tick() {
            self.remaining -= 1;
            steps.push(CountdownStep::Tick(self.remaining));
            if self.remaining == 0 {
                self.finish(&mut steps);
                break;
            }
        }
        steps
    }

    fn finish(&mut self, steps: &mut Vec<CountdownStep>) {
        self.displayed = false;
        if let Some(action) = self.on_complete.take() {
            steps.push(CountdownStep::Finished(action));
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `mm:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Kicks off the countdown and the dread cue that plays partway through it.
/// Returns false if the sequence was already running.
pub fn start_final_countdown(
    countdown: &mut Countdown,
    scheduler: &mut Scheduler,
    settings: &GameSettings,
) -> bool {
    if !countdown.start(settings.countdown_seconds, CountdownFinish::SpawnMonster) {
        return false;
    }
    scheduler.schedule(
        settings.dread_cue_delay,
        ScheduledAction::PlaySound {
            sound: Sound::Dread,
            volume: 1.0,
        },
    );
    true
}

pub fn tick_countdown(
    time: Res<Time>,
    mut countdown: ResMut<Countdown>,
    mut ev_spawn: EventWriter<SpawnMonster>,
    mut ev_sound: EventWriter<SoundCue>,
) {
    let steps = countdown.advance(time.delta());
    for step in steps {
        match step {
            CountdownStep::Tick(remaining) if remaining <= 10 => {
                ev_sound.send(SoundCue::Play {
                    sound: Sound::Tick,
                    volume: 1.0,
                });
            }
            CountdownStep::Tick(_) => {}
            CountdownStep::Finished(CountdownFinish::SpawnMonster) => {
                info!("countdown finished, spawning monster");
                countdown.monster_spawned = true;
                ev_spawn.send(SpawnMonster);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn three_second_countdown_completes_once() {
        let mut c = Countdown::default();
        assert!(c.start(3, CountdownFinish::SpawnMonster));
        assert_eq!(c.remaining, 3);
        assert!(c.is_displayed());

        let mut all = Vec::new();
        for _ in 0..60 {
            all.extend(c.advance(secs(0.25)));
        }
        assert_eq!(
            all,
            vec![
                CountdownStep::Tick(2),
                CountdownStep::Tick(1),
                CountdownStep::Tick(0),
                CountdownStep::Finished(CountdownFinish::SpawnMonster),
            ]
        );
        assert!(!c.is_displayed());
        assert!(c.is_active());
    }

    #[test]
    fn second_start_is_ignored() {
        let mut c = Countdown::default();
        assert!(c.start(3, CountdownFinish::SpawnMonster));
        c.advance(secs(1.0));
        assert!(!c.start(100, CountdownFinish::SpawnMonster));
        assert_eq!(c.remaining, 2);

        // Still ignored after completion until reset.
        c.advance(secs(5.0));
        assert!(!c.start(3, CountdownFinish::SpawnMonster));
        c.reset();
        assert!(c.start(3, CountdownFinish::SpawnMonster));
    }

    #[test]
    fn large_frame_catches_up() {
        let mut c = Countdown::default();
        c.start(5, CountdownFinish::SpawnMonster);
        let steps = c.advance(secs(2.5));
        assert_eq!(steps, vec![CountdownStep::Tick(4), CountdownStep::Tick(3)]);
        let steps = c.advance(secs(10.0));
        assert_eq!(steps.last(), Some(&CountdownStep::Finished(CountdownFinish::SpawnMonster)));
        assert_eq!(c.remaining, 0);
    }

    #[test]
    fn zero_length_countdown_finishes_on_first_advance() {
        let mut c = Countdown::default();
        c.start(0, CountdownFinish::SpawnMonster);
        assert_eq!(
            c.advance(Duration::ZERO),
            vec![CountdownStep::Finished(CountdownFinish::SpawnMonster)]
        );
        assert!(c.advance(secs(1.0)).is_empty());
    }

    #[test]
    fn final_countdown_schedules_dread_cue() {
        let settings = GameSettings::default();
        let mut c = Countdown::default();
        let mut s = Scheduler::default();
        assert!(start_final_countdown(&mut c, &mut s, &settings));
        assert!(!start_final_countdown(&mut c, &mut s, &settings));
        assert_eq!(s.len(), 1);
        assert!(s.advance(29.0).is_empty());
        assert_eq!(
            s.advance(1.0),
            vec![ScheduledAction::PlaySound {
                sound: Sound::Dread,
                volume: 1.0
            }]
        );
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(120), "02:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
    }
}
