use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::collectibles::{
    collect_discs, collect_lost_disc, spawn_disc_field, spawn_lost_disc, LostDisc, LostDiscBody,
};
use crate::countdown::{tick_countdown, Countdown};
use crate::events::{
    AllDiscsCollected, GameOver, GameStarted, OverlayRequest, ResetEvent, SoundCue,
};
use crate::input::{cursor_locked, look_player, move_player};
use crate::monster::{handle_spawn_monster, monster_follow, monster_look_check, Monster};
use crate::player::PlayerState;
use crate::scheduler::{ScheduledAction, Scheduler};
use crate::settings::GameSettings;
use crate::trader::{handle_trade_requests, merchant_proximity, DiscTrader, Merchant};
use crate::PlayerCamera;

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Intro,
    Playing,
    GameOver,
}

#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn from_settings(settings: &GameSettings) -> Self {
        if settings.deterministic {
            Self(StdRng::from_seed([0; 32]))
        } else {
            Self(StdRng::from_entropy())
        }
    }
}

pub const TERMINAL_MESSAGES: [&str; 10] = [
    "SYSTEM SCAN INITIATED...",
    "Anomaly detected in Sector 7G.",
    "WARNING: Entity proximity increasing.",
    "Memory corruption detected.",
    "ERROR: UNKNOWN ORIGIN\nSIGNAL LOST...",
    "Searching for lost signal...",
    "Atmospheric pressure dropping.",
    "Is anybody out there?",
    "SECURITY ALERT: Perimeter breach.",
    "Running diagnostics...",
];

pub struct GamePlugin;
impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Scheduler>()
            .init_resource::<Countdown>()
            .add_systems(PreStartup, apply_settings)
            .add_systems(Startup, spawn_disc_field)
            .add_systems(OnEnter(AppState::Intro), schedule_intro)
            .add_systems(OnExit(AppState::Intro), |mut scheduler: ResMut<Scheduler>| {
                scheduler.clear();
            })
            .add_systems(OnEnter(AppState::Playing), announce_start)
            .add_systems(
                Update,
                (
                    handle_reset,
                    spawn_disc_field.run_if(on_event::<ResetEvent>()),
                    schedule_terminal_messages,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                drain_scheduler
                    .after(schedule_terminal_messages)
                    .run_if(in_state(AppState::Intro)),
            )
            .add_systems(
                Update,
                (
                    (
                        move_player,
                        look_player,
                        sync_player,
                        monster_follow,
                        collect_discs,
                        collect_lost_disc,
                        merchant_proximity,
                    )
                        .chain()
                        .run_if(cursor_locked),
                    monster_look_check,
                    tick_countdown,
                    drain_scheduler,
                    handle_spawn_monster,
                    handle_trade_requests,
                    spawn_lost_disc,
                    report_all_collected,
                    enter_game_over,
                )
                    .chain()
                    .after(schedule_terminal_messages)
                    .run_if(in_state(AppState::Playing)),
            );
    }
}

/// Rebuilds the settings-dependent resources once the settings file has
/// been read.
fn apply_settings(mut commands: Commands, settings: Res<GameSettings>) {
    let player = PlayerState::from_settings(&settings);
    let start = Vec3::new(0.0, settings.eye_height, 0.0);
    commands.insert_resource(Merchant::from_settings(&settings, start));
    commands.insert_resource(player);
    commands.insert_resource(Monster::from_settings(&settings));
    commands.insert_resource(DiscTrader::with_threshold(settings.final_sequence_threshold));
    commands.insert_resource(GameRng::from_settings(&settings));
    info!(
        "settings applied (debug={}, deterministic={})",
        settings.debug_mode, settings.deterministic
    );
}

fn schedule_intro(mut scheduler: ResMut<Scheduler>, settings: Res<GameSettings>) {
    scheduler.schedule(settings.intro_seconds, ScheduledAction::StartGame);
}

fn announce_start(mut ev_started: EventWriter<GameStarted>) {
    info!("game started");
    ev_started.send(GameStarted);
}

fn schedule_terminal_messages(
    mut ev_started: EventReader<GameStarted>,
    mut scheduler: ResMut<Scheduler>,
    settings: Res<GameSettings>,
    mut rng: ResMut<GameRng>,
) {
    if ev_started.read().count() == 0 {
        return;
    }
    if scheduler.is_pending(&ScheduledAction::TerminalMessage) {
        return;
    }
    let delay = terminal_delay(&mut rng.0, settings.terminal_interval);
    scheduler.schedule(delay, ScheduledAction::TerminalMessage);
}

pub fn terminal_delay<R: Rng + ?Sized>(rng: &mut R, (min, max): (f32, f32)) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Reads the camera back into the player state, clamping it to the boundary.
fn sync_player(
    mut player: ResMut<PlayerState>,
    mut camera_q: Query<&mut Transform, With<PlayerCamera>>,
) {
    let Ok(mut transform) = camera_q.get_single_mut() else {
        return;
    };
    let t = transform.translation;
    transform.translation = player.update_position(t.x, t.y, t.z);
    player.update_forward(*transform.forward());
}

pub fn drain_scheduler(
    time: Res<Time>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    settings: Res<GameSettings>,
    mut scheduler: ResMut<Scheduler>,
    mut rng: ResMut<GameRng>,
    mut ev_game_over: EventWriter<GameOver>,
    mut ev_sound: EventWriter<SoundCue>,
    mut ev_overlay: EventWriter<OverlayRequest>,
) {
    for action in scheduler.advance(time.delta_seconds()) {
        match action {
            ScheduledAction::GameOver => {
                ev_game_over.send(GameOver);
            }
            ScheduledAction::PlaySound { sound, volume } => {
                ev_sound.send(SoundCue::Play { sound, volume });
            }
            ScheduledAction::StartGame => {
                if *state.get() == AppState::Intro {
                    next_state.set(AppState::Playing);
                }
            }
            ScheduledAction::TerminalMessage => {
                if let Some(message) = TERMINAL_MESSAGES.choose(&mut rng.0) {
                    ev_overlay.send(OverlayRequest::Terminal {
                        message: (*message).to_string(),
                        duration: settings.terminal_duration,
                    });
                }
                let delay = terminal_delay(&mut rng.0, settings.terminal_interval);
                scheduler.schedule(delay, ScheduledAction::TerminalMessage);
            }
        }
    }
}

fn report_all_collected(mut ev: EventReader<AllDiscsCollected>) {
    for e in ev.read() {
        info!("all {} discs collected", e.count);
    }
}

pub fn enter_game_over(
    mut ev_game_over: EventReader<GameOver>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if ev_game_over.read().next().is_some() {
        info!("game over");
        next_state.set(AppState::GameOver);
    }
}

/// Puts every gameplay resource back to its starting value. Loaded models
/// are kept; discs are re-placed by `spawn_disc_field` right after.
fn handle_reset(
    mut commands: Commands,
    mut ev_reset: EventReader<ResetEvent>,
    settings: Res<GameSettings>,
    mut player: ResMut<PlayerState>,
    mut monster: ResMut<Monster>,
    mut trader: ResMut<DiscTrader>,
    mut merchant: ResMut<Merchant>,
    mut countdown: ResMut<Countdown>,
    mut scheduler: ResMut<Scheduler>,
    mut lost: ResMut<LostDisc>,
    lost_q: Query<Entity, With<LostDiscBody>>,
    mut camera_q: Query<&mut Transform, With<PlayerCamera>>,
) {
    if ev_reset.is_empty() {
        return;
    }
    ev_reset.clear();

    *player = PlayerState::from_settings(&settings);
    let model = monster.model;
    *monster = Monster::from_settings(&settings);
    monster.model = model;
    *trader = DiscTrader::with_threshold(settings.final_sequence_threshold);
    merchant.player_in_range = false;
    countdown.reset();
    scheduler.clear();
    *lost = LostDisc::default();
    for e in &lost_q {
        commands.entity(e).despawn_recursive();
    }
    for mut transform in &mut camera_q {
        *transform = Transform::from_xyz(0.0, settings.eye_height, 0.0)
            .looking_to(Vec3::NEG_Z, Vec3::Y);
    }
    info!("game reset");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventsPlugin;
    use bevy::state::app::StatesPlugin;

    fn routing_app(start: AppState) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, EventsPlugin))
            .insert_state(start)
            .insert_resource(GameSettings::default())
            .insert_resource(GameRng(StdRng::seed_from_u64(5)))
            .init_resource::<Scheduler>()
            .add_systems(Update, (drain_scheduler, enter_game_over).chain());
        app
    }

    fn current(app: &App) -> AppState {
        app.world().resource::<State<AppState>>().get().clone()
    }

    #[test]
    fn scheduled_game_over_reaches_game_over_state() {
        let mut app = routing_app(AppState::Playing);
        app.world_mut()
            .resource_mut::<Scheduler>()
            .schedule(0.0, ScheduledAction::GameOver);
        app.update();
        app.update();
        assert_eq!(current(&app), AppState::GameOver);
    }

    #[test]
    fn start_game_only_leaves_intro() {
        let mut app = routing_app(AppState::Intro);
        app.world_mut()
            .resource_mut::<Scheduler>()
            .schedule(0.0, ScheduledAction::StartGame);
        app.update();
        app.update();
        assert_eq!(current(&app), AppState::Playing);

        let mut app = routing_app(AppState::GameOver);
        app.world_mut()
            .resource_mut::<Scheduler>()
            .schedule(0.0, ScheduledAction::StartGame);
        app.update();
        app.update();
        assert_eq!(current(&app), AppState::GameOver);
    }

    #[test]
    fn terminal_message_shows_and_reschedules() {
        let mut app = routing_app(AppState::Playing);
        app.world_mut()
            .resource_mut::<Scheduler>()
            .schedule(0.0, ScheduledAction::TerminalMessage);
        app.update();

        assert_eq!(app.world().resource::<Events<OverlayRequest>>().len(), 1);
        let scheduler = app.world().resource::<Scheduler>();
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.is_pending(&ScheduledAction::TerminalMessage));
    }

    #[test]
    fn scheduled_sound_becomes_a_cue() {
        let mut app = routing_app(AppState::Playing);
        app.world_mut().resource_mut::<Scheduler>().schedule(
            0.0,
            ScheduledAction::PlaySound {
                sound: crate::events::Sound::Dread,
                volume: 1.0,
            },
        );
        app.update();
        assert_eq!(app.world().resource::<Events<SoundCue>>().len(), 1);
        assert_eq!(current(&app), AppState::Playing);
    }

    #[test]
    fn terminal_delay_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let d = terminal_delay(&mut rng, (10.0, 15.0));
            assert!((10.0..15.0).contains(&d));
        }
        assert_eq!(terminal_delay(&mut rng, (4.0, 4.0)), 4.0);
    }

    #[test]
    fn deterministic_rng_repeats() {
        let settings = GameSettings {
            deterministic: true,
            ..default()
        };
        let a: u64 = GameRng::from_settings(&settings).0.gen();
        let b: u64 = GameRng::from_settings(&settings).0.gen();
        assert_eq!(a, b);
    }
}
