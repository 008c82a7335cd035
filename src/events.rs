//! Game-wide events. Every cross-module notification goes through one of
//! these, so subscribers are checked by the compiler instead of matched by name.

use bevy::prelude::*;

use crate::loot::LootEntry;

#[derive(Event, Default, Debug, Clone, Copy)]
pub struct GameStarted;

#[derive(Event, Debug, Clone, Copy)]
pub struct AllDiscsCollected {
    pub count: u32,
}

#[derive(Event, Default, Debug, Clone, Copy)]
pub struct FinalSequenceStart;

#[derive(Event, Default, Debug, Clone, Copy)]
pub struct SpawnMonster;

#[derive(Event, Default, Debug, Clone, Copy)]
pub struct SpawnLostDisc;

#[derive(Event, Default, Debug, Clone, Copy)]
pub struct LostDiscEnvironmentChange;

#[derive(Event, Default, Debug, Clone, Copy)]
pub struct GameOver;

#[derive(Event, Default, Debug, Clone, Copy)]
pub struct ResetEvent;

#[derive(Event, Default, Debug, Clone, Copy)]
pub struct TradeRequested;

#[derive(Event, Debug, Clone)]
pub struct TradeCompleted {
    pub entry: LootEntry,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Sound {
    Collect,
    Trade,
    Tick,
    Dread,
    Scare,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    Play { sound: Sound, volume: f32 },
    Stop(Sound),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TextAnchor {
    #[default]
    TopCenter,
    Center,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TextStyle {
    #[default]
    Plain,
    LostDisc,
}

/// Requests for the overlay layer. Durations are in seconds.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum OverlayRequest {
    Terminal {
        message: String,
        duration: f32,
    },
    Text {
        message: String,
        duration: f32,
        anchor: TextAnchor,
        style: TextStyle,
    },
    MerchantOpen,
    MerchantClose,
    /// Drops every slot. The countdown is drawn from its own resource and
    /// stays on screen.
    Clear,
}

pub struct EventsPlugin;
impl Plugin for EventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GameStarted>()
            .add_event::<AllDiscsCollected>()
            .add_event::<FinalSequenceStart>()
            .add_event::<SpawnMonster>()
            .add_event::<SpawnLostDisc>()
            .add_event::<LostDiscEnvironmentChange>()
            .add_event::<GameOver>()
            .add_event::<ResetEvent>()
            .add_event::<TradeRequested>()
            .add_event::<TradeCompleted>()
            .add_event::<SoundCue>()
            .add_event::<OverlayRequest>();
    }
}
