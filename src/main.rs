mod audio;
mod collectibles;
mod countdown;
mod events;
mod game;
mod input;
mod loot;
mod monster;
mod player;
mod scene;
mod scenery;
mod scheduler;
mod settings;
mod trader;
mod ui;

use audio::SoundPlugin;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::diagnostic::{EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin};
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use collectibles::CollectiblesPlugin;
use events::EventsPlugin;
use game::{AppState, GamePlugin};
use input::InputPlugin;
use monster::MonsterPlugin;
use scene::{default_fog, WorldPlugin};
use scenery::SceneryPlugin;
use settings::GameSettings;
use trader::TraderPlugin;
use ui::UiPlugin;

fn main() {
    App::new()
        .insert_resource(Msaa::Sample4)
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Lost Disc".into(),
                        resolution: (1280., 720.).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: Level::INFO,
                    filter: "wgpu=error,naga=warn,lost_disc=debug".into(),
                    ..default()
                }),
        )
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(EntityCountDiagnosticsPlugin)
        .insert_resource(GameSettings::load())
        .init_state::<AppState>()
        .add_plugins((EventsPlugin, WorldPlugin, SceneryPlugin, GamePlugin))
        .add_plugins((MonsterPlugin, TraderPlugin, CollectiblesPlugin))
        .add_plugins((InputPlugin, UiPlugin, SoundPlugin))
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands, settings: Res<GameSettings>) {
    commands.spawn((
        Camera3dBundle {
            tonemapping: Tonemapping::TonyMcMapface,
            transform: Transform::from_xyz(0.0, settings.eye_height, 0.0)
                .looking_to(Vec3::NEG_Z, Vec3::Y),
            ..default()
        },
        default_fog(),
        PlayerCamera,
    ));
}

#[derive(Component)]
pub struct PlayerCamera;
