use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::pbr::{FogFalloff, FogSettings};
use bevy::prelude::*;

use crate::events::LostDiscEnvironmentChange;
use crate::game::AppState;
use crate::PlayerCamera;

const GROUND_SIZE: f32 = 150.0;
const CLEAR_NORMAL: Color = Color::srgb(0.05, 0.05, 0.07);
const CLEAR_LOST: Color = Color::srgb(0.12, 0.0, 0.0);

/// Whether an entity's visual is usable yet. Game logic asks this instead of
/// checking for a loaded handle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AssetState {
    #[default]
    Loading,
    Ready,
    Fallback,
}

impl AssetState {
    pub fn is_settled(self) -> bool {
        self != AssetState::Loading
    }
}

#[derive(Clone, Copy, Debug)]
pub enum FallbackShape {
    Cuboid { size: Vec3, color: Color },
    Disc { radius: f32, color: Color },
}

/// A glTF scene that is swapped in once loaded, or replaced by a primitive
/// if loading fails.
#[derive(Component)]
pub struct ModelSlot {
    pub scene: Handle<Scene>,
    pub state: AssetState,
    pub fallback: FallbackShape,
}

impl ModelSlot {
    pub fn new(scene: Handle<Scene>, fallback: FallbackShape) -> Self {
        Self {
            scene,
            state: AssetState::Loading,
            fallback,
        }
    }
}

#[derive(Resource)]
pub struct ModelLibrary {
    pub monster: Handle<Scene>,
    pub machine: Handle<Scene>,
    pub lost_disc: Handle<Scene>,
}

#[derive(Resource)]
pub struct DiscMaterials {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

pub struct WorldPlugin;
impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(CLEAR_NORMAL))
            .insert_resource(AmbientLight {
                color: Color::srgb(0.6, 0.6, 0.7),
                brightness: 120.0,
            })
            .add_systems(PreStartup, load_models)
            .add_systems(Startup, setup_world)
            .add_systems(Update, (resolve_models, apply_environment_change))
            .add_systems(OnEnter(AppState::Playing), restore_environment);
    }
}

fn load_models(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(ModelLibrary {
        monster: asset_server.load(GltfAssetLabel::Scene(0).from_asset("models/hollow.glb")),
        machine: asset_server.load(GltfAssetLabel::Scene(0).from_asset("models/Machine.glb")),
        lost_disc: asset_server.load(GltfAssetLabel::Scene(0).from_asset("models/CD.glb")),
    });
    commands.insert_resource(DiscMaterials {
        mesh: meshes.add(Cylinder::new(0.3, 0.05)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 1.0, 0.0),
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        }),
    });
}

fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.22, 0.2, 0.16),
            perceptual_roughness: 1.0,
            ..default()
        }),
        ..default()
    });

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 2_000.0,
            ..default()
        },
        transform: Transform::from_xyz(10.0, 20.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}

/// Polls every slot still loading and attaches either the scene or its
/// fallback primitive.
fn resolve_models(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut slots: Query<(Entity, &mut ModelSlot)>,
) {
    for (entity, mut slot) in &mut slots {
        if slot.state.is_settled() {
            continue;
        }
        match asset_server.get_load_state(slot.scene.id()) {
            Some(LoadState::Loaded) => {
                let scene = slot.scene.clone();
                commands.entity(entity).with_children(|parent| {
                    parent.spawn(SceneBundle { scene, ..default() });
                });
                slot.state = AssetState::Ready;
                debug!("model ready for {entity:?}");
            }
            Some(LoadState::Failed(err)) => {
                error!("model failed to load for {entity:?}, using fallback: {err}");
                let (mesh, material) = fallback_mesh(slot.fallback, &mut meshes, &mut materials);
                commands.entity(entity).with_children(|parent| {
                    parent.spawn(PbrBundle {
                        mesh,
                        material,
                        ..default()
                    });
                });
                slot.state = AssetState::Fallback;
            }
            _ => {}
        }
    }
}

fn fallback_mesh(
    shape: FallbackShape,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> (Handle<Mesh>, Handle<StandardMaterial>) {
    match shape {
        FallbackShape::Cuboid { size, color } => (
            meshes.add(Cuboid::from_size(size)),
            materials.add(StandardMaterial {
                base_color: color,
                ..default()
            }),
        ),
        FallbackShape::Disc { radius, color } => (
            meshes.add(Cylinder::new(radius, 0.05)),
            materials.add(StandardMaterial {
                base_color: color,
                emissive: LinearRgba::from(color) * 5.0,
                ..default()
            }),
        ),
    }
}

pub fn default_fog() -> FogSettings {
    FogSettings {
        color: Color::srgb(0.05, 0.05, 0.07),
        falloff: FogFalloff::Linear {
            start: 5.0,
            end: 40.0,
        },
        ..default()
    }
}

fn apply_environment_change(
    mut ev: EventReader<LostDiscEnvironmentChange>,
    mut clear: ResMut<ClearColor>,
    mut ambient: ResMut<AmbientLight>,
    mut fog_q: Query<&mut FogSettings, With<PlayerCamera>>,
) {
    if ev.read().next().is_none() {
        return;
    }
    info!("switching to lost disc environment");
    clear.0 = CLEAR_LOST;
    ambient.color = Color::srgb(0.9, 0.2, 0.2);
    ambient.brightness = 60.0;
    for mut fog in &mut fog_q {
        fog.color = CLEAR_LOST;
        fog.falloff = FogFalloff::Linear {
            start: 2.0,
            end: 25.0,
        };
    }
}

fn restore_environment(
    mut clear: ResMut<ClearColor>,
    mut ambient: ResMut<AmbientLight>,
    mut fog_q: Query<&mut FogSettings, With<PlayerCamera>>,
) {
    clear.0 = CLEAR_NORMAL;
    *ambient = AmbientLight {
        color: Color::srgb(0.6, 0.6, 0.7),
        brightness: 120.0,
    };
    for mut fog in &mut fog_q {
        *fog = default_fog();
    }
}
