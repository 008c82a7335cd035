use bevy::diagnostic::{
    DiagnosticsStore, EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin,
};
use bevy_egui::egui::{self, Color32, RichText};

use crate::audio::SoundService;
use crate::collectibles::LostDisc;
use crate::countdown::{format_clock, Countdown};
use crate::events::Sound;
use crate::monster::{Monster, MonsterPhase};
use crate::scheduler::Scheduler;
use crate::trader::DiscTrader;

/// Snapshot of the run shown in the F3 window.
#[derive(Debug, Clone, PartialEq)]
pub struct GameReadout {
    pub monster: MonsterPhase,
    pub clock: f32,
    pub queued: usize,
    pub countdown: Option<u32>,
    pub trades: u32,
    pub threshold: u32,
    pub trading_open: bool,
    pub final_sequence: bool,
    pub lost_disc: &'static str,
    pub dread_playing: bool,
    pub silenced: bool,
}

impl GameReadout {
    pub fn capture(
        monster: &Monster,
        scheduler: &Scheduler,
        countdown: &Countdown,
        trader: &DiscTrader,
        lost: &LostDisc,
        sound: &SoundService,
    ) -> Self {
        let lost_disc = if lost.collected {
            "collected"
        } else if lost.spawned {
            "out"
        } else {
            "hidden"
        };
        Self {
            monster: monster.phase,
            clock: scheduler.now(),
            queued: scheduler.len(),
            countdown: countdown.is_active().then_some(countdown.remaining),
            trades: trader.trades,
            threshold: trader.threshold,
            trading_open: trader.trading_enabled(),
            final_sequence: trader.final_sequence_fired(),
            lost_disc,
            dread_playing: sound.is_playing(Sound::Dread),
            silenced: sound.is_silenced(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let countdown = match self.countdown {
            Some(remaining) => format_clock(remaining),
            None => "idle".to_string(),
        };
        vec![
            format!("Monster: {:?}", self.monster),
            format!("Scheduler: {} queued at {:.1}s", self.queued, self.clock),
            format!("Countdown: {countdown}"),
            format!(
                "Trades: {}/{}{}{}",
                self.trades,
                self.threshold,
                if self.trading_open { " (open)" } else { "" },
                if self.final_sequence { " final" } else { "" },
            ),
            format!("Lost disc: {}", self.lost_disc),
            format!(
                "Sound: {}",
                if self.silenced {
                    "silenced"
                } else if self.dread_playing {
                    "dread"
                } else {
                    "quiet"
                }
            ),
        ]
    }
}

pub fn show_diagnostics_panel(
    ctx: &mut egui::Context,
    diagnostics: &DiagnosticsStore,
    readout: &GameReadout,
    debug_mode: bool,
) {
    egui::Window::new("Readout")
        .default_pos(egui::pos2(16.0, 120.0))
        .show(ctx, |ui| {
            let fps = diagnostics
                .get(&FrameTimeDiagnosticsPlugin::FPS)
                .and_then(|d| d.smoothed());
            let entities = diagnostics
                .get(&EntityCountDiagnosticsPlugin::ENTITY_COUNT)
                .and_then(|d| d.value());
            ui.label(format!(
                "{:.0} fps, {} entities",
                fps.unwrap_or(0.0),
                entities.unwrap_or(0.0)
            ));
            ui.separator();
            for line in readout.lines() {
                ui.monospace(line);
            }
            if debug_mode {
                ui.separator();
                ui.label(RichText::new("G monster / H lost disc").color(Color32::YELLOW));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::CountdownFinish;
    use crate::events::SoundCue;
    use crate::scheduler::ScheduledAction;

    #[test]
    fn readout_reflects_a_late_run() {
        let mut monster = Monster::default();
        monster.phase = MonsterPhase::Active;
        let mut scheduler = Scheduler::default();
        scheduler.advance(12.5);
        scheduler.schedule(1.5, ScheduledAction::GameOver);
        let mut countdown = Countdown::default();
        countdown.start(75, CountdownFinish::SpawnMonster);
        let trader = DiscTrader::with_threshold(15);
        let lost = LostDisc {
            position: None,
            spawned: true,
            collected: true,
        };
        let mut sound = SoundService::default();
        sound.handle(SoundCue::Play {
            sound: Sound::Dread,
            volume: 1.0,
        });

        let r = GameReadout::capture(&monster, &scheduler, &countdown, &trader, &lost, &sound);
        assert_eq!(
            r.lines(),
            vec![
                "Monster: Active",
                "Scheduler: 1 queued at 12.5s",
                "Countdown: 01:15",
                "Trades: 0/15",
                "Lost disc: collected",
                "Sound: dread",
            ]
        );
    }

    #[test]
    fn fresh_run_is_idle() {
        let r = GameReadout::capture(
            &Monster::default(),
            &Scheduler::default(),
            &Countdown::default(),
            &DiscTrader::default(),
            &LostDisc::default(),
            &SoundService::default(),
        );
        assert_eq!(r.countdown, None);
        assert_eq!(r.lines()[2], "Countdown: idle");
        assert_eq!(r.lines()[4], "Lost disc: hidden");
        assert_eq!(r.lines()[5], "Sound: quiet");
    }
}
