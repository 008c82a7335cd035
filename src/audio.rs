//! Sound cue sink. No audio files ship with the game, so cues are tracked
//! and logged rather than played.

use bevy::prelude::*;

use crate::events::{GameOver, ResetEvent, Sound, SoundCue};

#[derive(Resource, Default, Debug)]
pub struct SoundService {
    /// Cues currently considered playing. Only the dread drone persists
    /// across frames; one-shots are dropped once logged.
    looping: Vec<Sound>,
    silenced: bool,
}

impl SoundService {
    pub fn is_playing(&self, sound: Sound) -> bool {
        self.looping.contains(&sound)
    }

    pub fn is_silenced(&self) -> bool {
        self.silenced
    }

    /// Returns false when the cue was dropped.
    pub fn handle(&mut self, cue: SoundCue) -> bool {
        if self.silenced {
            return false;
        }
        match cue {
            SoundCue::Play { sound, .. } => {
                if sound == Sound::Dread && !self.looping.contains(&sound) {
                    self.looping.push(sound);
                }
                true
            }
            SoundCue::Stop(sound) => {
                let before = self.looping.len();
                self.looping.retain(|s| *s != sound);
                before != self.looping.len()
            }
        }
    }

    /// Stops everything and ignores later cues until reset.
    pub fn silence(&mut self) {
        self.looping.clear();
        self.silenced = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct SoundPlugin;
impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundService>()
            .add_systems(PostUpdate, (play_sound_cues, silence_on_game_over, reset_sound).chain());
    }
}

fn play_sound_cues(mut ev: EventReader<SoundCue>, mut service: ResMut<SoundService>) {
    for cue in ev.read() {
        if service.handle(*cue) {
            match cue {
                SoundCue::Play { sound, volume } => info!("sound: play {sound:?} at {volume:.1}"),
                SoundCue::Stop(sound) => info!("sound: stop {sound:?}"),
            }
        } else {
            debug!("sound cue dropped: {cue:?}");
        }
    }
}

fn silence_on_game_over(mut ev: EventReader<GameOver>, mut service: ResMut<SoundService>) {
    if ev.read().next().is_some() {
        service.silence();
    }
}

fn reset_sound(mut ev: EventReader<ResetEvent>, mut service: ResMut<SoundService>) {
    if ev.read().next().is_some() {
        service.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(sound: Sound) -> SoundCue {
        SoundCue::Play { sound, volume: 1.0 }
    }

    #[test]
    fn dread_loops_until_stopped() {
        let mut s = SoundService::default();
        assert!(s.handle(play(Sound::Dread)));
        assert!(s.handle(play(Sound::Collect)));
        assert!(s.is_playing(Sound::Dread));
        assert!(!s.is_playing(Sound::Collect));
        assert!(s.handle(SoundCue::Stop(Sound::Dread)));
        assert!(!s.is_playing(Sound::Dread));
        assert!(!s.handle(SoundCue::Stop(Sound::Dread)));
    }

    #[test]
    fn silenced_after_game_over_until_reset() {
        let mut s = SoundService::default();
        s.handle(play(Sound::Dread));
        s.silence();
        assert!(!s.is_playing(Sound::Dread));
        assert!(!s.handle(play(Sound::Scare)));
        assert!(!s.handle(play(Sound::Dread)));
        assert!(!s.is_playing(Sound::Dread));
        s.reset();
        assert!(!s.is_silenced());
        assert!(s.handle(play(Sound::Tick)));
    }
}
