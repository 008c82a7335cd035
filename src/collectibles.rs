use bevy::prelude::*;
use rand::Rng;

use crate::countdown::{start_final_countdown, Countdown};
use crate::events::{
    AllDiscsCollected, FinalSequenceStart, LostDiscEnvironmentChange, OverlayRequest, Sound,
    SoundCue, SpawnLostDisc, TextAnchor, TextStyle,
};
use crate::game::GameRng;
use crate::player::{distance_xz, PlayerState};
use crate::scene::{DiscMaterials, FallbackShape, ModelLibrary, ModelSlot};
use crate::scheduler::Scheduler;
use crate::settings::GameSettings;
use crate::trader::{Merchant, MACHINE_CLEARANCE};

const DISC_HEIGHT: f32 = 0.5;
const LOST_DISC_HOVER: f32 = 2.0;
const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Picks up to `count` spots in the square, each at least `min_spacing` from
/// the origin, from each other, and clear of the merchant.
pub fn place_discs<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    half_extent: f32,
    min_spacing: f32,
    merchant: &Merchant,
) -> Vec<Vec3> {
    let mut spots: Vec<Vec3> = Vec::with_capacity(count);
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        if spots.len() == count {
            break;
        }
        let candidate = Vec3::new(
            rng.gen_range(-half_extent..=half_extent),
            DISC_HEIGHT,
            rng.gen_range(-half_extent..=half_extent),
        );
        if distance_xz(candidate, Vec3::ZERO) < min_spacing
            || merchant.is_near(candidate, MACHINE_CLEARANCE)
            || spots.iter().any(|s| distance_xz(*s, candidate) < min_spacing)
        {
            continue;
        }
        spots.push(candidate);
    }
    if spots.len() < count {
        warn!("only placed {} of {count} discs", spots.len());
    }
    spots
}

#[derive(Component)]
pub struct Disc {
    pub id: usize,
}

#[derive(Resource, Default, Debug)]
pub struct DiscField {
    pub discs: Vec<(usize, Vec3)>,
    pub total: u32,
    pub collected: u32,
    all_collected_fired: bool,
}

impl DiscField {
    pub fn new(spots: Vec<Vec3>) -> Self {
        Self {
            total: spots.len() as u32,
            discs: spots.into_iter().enumerate().collect(),
            collected: 0,
            all_collected_fired: false,
        }
    }

    /// Removes and returns the ids of discs within `radius` of the player.
    pub fn collect_near(&mut self, player_position: Vec3, radius: f32) -> Vec<usize> {
        let mut taken = Vec::new();
        self.discs.retain(|(id, pos)| {
            if distance_xz(player_position, *pos) < radius {
                taken.push(*id);
                false
            } else {
                true
            }
        });
        self.collected += taken.len() as u32;
        taken
    }

    /// True exactly once, the first time every disc has been picked up.
    pub fn take_all_collected(&mut self) -> bool {
        if self.all_collected_fired || self.total == 0 || self.collected < self.total {
            return false;
        }
        self.all_collected_fired = true;
        true
    }
}

#[derive(Component)]
pub struct LostDiscBody;

#[derive(Resource, Default, Debug)]
pub struct LostDisc {
    pub position: Option<Vec3>,
    pub spawned: bool,
    pub collected: bool,
}

impl LostDisc {
    /// Only one Lost Disc ever appears per run.
    pub fn spawn_at(&mut self, position: Vec3) -> bool {
        if self.spawned {
            return false;
        }
        self.spawned = true;
        self.position = Some(position);
        true
    }

    pub fn try_collect(&mut self, player_position: Vec3, radius: f32) -> bool {
        let Some(pos) = self.position else {
            return false;
        };
        if distance_xz(player_position, pos) >= radius {
            return false;
        }
        self.position = None;
        self.collected = true;
        true
    }
}

pub struct CollectiblesPlugin;
impl Plugin for CollectiblesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DiscField>()
            .init_resource::<LostDisc>()
            .add_systems(Update, animate_discs);
    }
}

pub fn spawn_disc_field(
    mut commands: Commands,
    settings: Res<GameSettings>,
    merchant: Res<Merchant>,
    materials: Res<DiscMaterials>,
    mut rng: ResMut<GameRng>,
    mut field: ResMut<DiscField>,
    existing: Query<Entity, With<Disc>>,
) {
    for e in &existing {
        commands.entity(e).despawn_recursive();
    }

    let half = settings.boundary_half_extent - settings.boundary_padding;
    let spots = place_discs(
        &mut rng.0,
        settings.disc_count,
        half,
        settings.min_disc_spacing,
        &merchant,
    );
    *field = DiscField::new(spots);
    for &(id, pos) in &field.discs {
        commands.spawn((
            PbrBundle {
                mesh: materials.mesh.clone(),
                material: materials.material.clone(),
                transform: Transform::from_translation(pos)
                    .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
                ..default()
            },
            Disc { id },
        ));
    }
    info!("created {} collectible discs", field.total);
}

pub fn collect_discs(
    mut commands: Commands,
    settings: Res<GameSettings>,
    mut field: ResMut<DiscField>,
    mut player: ResMut<PlayerState>,
    disc_q: Query<(Entity, &Disc)>,
    mut ev_all: EventWriter<AllDiscsCollected>,
    mut ev_sound: EventWriter<SoundCue>,
) {
    let taken = field.collect_near(player.position, settings.collection_radius);
    if taken.is_empty() {
        return;
    }
    for (entity, disc) in &disc_q {
        if taken.contains(&disc.id) {
            commands.entity(entity).despawn_recursive();
        }
    }
    for _ in &taken {
        player.collect_disc();
        ev_sound.send(SoundCue::Play {
            sound: Sound::Collect,
            volume: 1.0,
        });
    }
    info!("collected disc, {}/{}", field.collected, field.total);
    if field.take_all_collected() {
        ev_all.send(AllDiscsCollected {
            count: field.collected,
        });
    }
}

/// `FinalSequenceStart` and the debug `SpawnLostDisc` both bring out the Lost Disc.
pub fn spawn_lost_disc(
    mut commands: Commands,
    mut ev_final: EventReader<FinalSequenceStart>,
    mut ev_debug: EventReader<SpawnLostDisc>,
    settings: Res<GameSettings>,
    models: Res<ModelLibrary>,
    mut lost: ResMut<LostDisc>,
    mut rng: ResMut<GameRng>,
    mut ev_env: EventWriter<LostDiscEnvironmentChange>,
    mut ev_overlay: EventWriter<OverlayRequest>,
) {
    let requested = ev_final.read().count() + ev_debug.read().count();
    if requested == 0 {
        return;
    }
    let half = settings.boundary_half_extent;
    let pos = Vec3::new(
        rng.0.gen_range(-half..=half),
        LOST_DISC_HOVER,
        rng.0.gen_range(-half..=half),
    );
    if !lost.spawn_at(pos) {
        debug!("lost disc already spawned");
        return;
    }

    commands.spawn((
        SpatialBundle::from_transform(
            Transform::from_translation(pos)
                .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
        ),
        ModelSlot::new(
            models.lost_disc.clone(),
            FallbackShape::Disc {
                radius: 0.4,
                color: Color::srgb(1.0, 0.0, 0.0),
            },
        ),
        LostDiscBody,
    ));
    info!("lost disc spawned at ({:.1}, {:.1}, {:.1})", pos.x, pos.y, pos.z);

    ev_overlay.send(OverlayRequest::Text {
        message: "THE LOST DISC HAS APPEARED".into(),
        duration: 3.0,
        anchor: TextAnchor::TopCenter,
        style: TextStyle::LostDisc,
    });
    ev_env.send(LostDiscEnvironmentChange);
}

pub fn collect_lost_disc(
    mut commands: Commands,
    settings: Res<GameSettings>,
    player: Res<PlayerState>,
    mut lost: ResMut<LostDisc>,
    mut countdown: ResMut<Countdown>,
    mut scheduler: ResMut<Scheduler>,
    body_q: Query<Entity, With<LostDiscBody>>,
    mut ev_overlay: EventWriter<OverlayRequest>,
) {
    if !lost.try_collect(player.position, settings.collection_radius) {
        return;
    }
    for e in &body_q {
        commands.entity(e).despawn_recursive();
    }
    info!("lost disc collected, starting final countdown");
    if start_final_countdown(&mut countdown, &mut scheduler, &settings) {
        // Only the clock stays up from here on.
        ev_overlay.send(OverlayRequest::Clear);
    }
}

fn animate_discs(
    time: Res<Time>,
    mut discs: Query<&mut Transform, (With<Disc>, Without<LostDiscBody>)>,
    mut lost: Query<&mut Transform, (With<LostDiscBody>, Without<Disc>)>,
) {
    let t = time.elapsed_seconds();
    for mut transform in &mut discs {
        transform.rotation = Quat::from_rotation_y(t * 3.0)
            * Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
    }
    for mut transform in &mut lost {
        transform.rotation = Quat::from_rotation_y(t * 4.0)
            * Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        transform.translation.y = LOST_DISC_HOVER + (t * 2.0).sin() * 0.1;
    }
}
