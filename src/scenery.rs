//! Static set dressing: stone statues scattered over the field, twig piles,
//! and two rows of spikes walling in the playable square.

use bevy::math::EulerRot;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::collectibles::spawn_disc_field;
use crate::game::GameRng;
use crate::player::distance_xz;
use crate::settings::GameSettings;
use crate::trader::{Merchant, MACHINE_CLEARANCE};

const STATUE_ATTEMPTS_PER_STATUE: usize = 10;

#[derive(Component)]
pub struct Scenery;

/// An axis-aligned box relative to its parent's origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Block {
    pub center: Vec3,
    pub size: Vec3,
}

/// Statue spots on the ground, at least `min_spacing` from the player start
/// and from each other, and clear of the machine. Gives up after
/// `count * 10` draws.
pub fn place_statues<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    half_extent: f32,
    min_spacing: f32,
    merchant: &Merchant,
) -> Vec<Vec3> {
    let mut spots: Vec<Vec3> = Vec::with_capacity(count);
    for _ in 0..count * STATUE_ATTEMPTS_PER_STATUE {
        if spots.len() == count {
            break;
        }
        let candidate = Vec3::new(
            rng.gen_range(-half_extent..=half_extent),
            0.0,
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
        warn!("only placed {} of {count} statues", spots.len());
    }
    spots
}

/// A rough standing figure built from boxes, feet at y = 0.
pub fn statue_blocks<R: Rng + ?Sized>(rng: &mut R) -> Vec<Block> {
    let torso_h = rng.gen_range(1.0..1.4);
    let torso_w = rng.gen_range(0.6..0.8);
    let leg_h = rng.gen_range(0.9..1.3);
    let head = rng.gen_range(0.4..0.5);
    let leg_w = torso_w * 0.2;
    let arm_len = torso_h * 0.8;
    let arm_w = torso_w * 0.15;
    let neck_h = 0.15;
    let neck_w = head * 0.6;

    let shoulders = leg_h + torso_h;
    let mut blocks = vec![
        Block {
            center: Vec3::new(0.0, leg_h + torso_h / 2.0, 0.0),
            size: Vec3::new(torso_w, torso_h, torso_w * 0.5),
        },
        Block {
            center: Vec3::new(0.0, shoulders + neck_h / 2.0, 0.0),
            size: Vec3::new(neck_w, neck_h, neck_w),
        },
        Block {
            center: Vec3::new(0.0, shoulders + neck_h + head / 2.0, 0.0),
            size: Vec3::splat(head),
        },
    ];
    for side in [-1.0, 1.0] {
        blocks.push(Block {
            center: Vec3::new(side * torso_w * 0.25, leg_h / 2.0, 0.0),
            size: Vec3::new(leg_w, leg_h, leg_w),
        });
        blocks.push(Block {
            center: Vec3::new(side * (torso_w + arm_w) / 2.0, shoulders - arm_len / 2.0, 0.0),
            size: Vec3::new(arm_w, arm_len, arm_w),
        });
    }
    blocks
}

/// Twig pile centres. Draws that land too close to the machine are dropped
/// rather than redrawn.
pub fn place_twig_piles<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    half_extent: f32,
    merchant: &Merchant,
) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-half_extent..=half_extent),
                0.0,
                rng.gen_range(-half_extent..=half_extent),
            )
        })
        .filter(|p| !merchant.is_near(*p, MACHINE_CLEARANCE))
        .collect()
}

/// Six to nine thin sticks fanning out of one spot. Each transform scales a
/// unit-height box, with its lower end on the ground.
pub fn twig_pile<R: Rng + ?Sized>(rng: &mut R) -> Vec<Transform> {
    let n = rng.gen_range(6..=9);
    (0..n)
        .map(|i| {
            let len = rng.gen_range(0.7..1.5);
            let yaw = i as f32 / n as f32 * TAU + rng.gen_range(-0.25..0.25);
            let tilt = rng.gen_range(0.3..0.3 + PI * 0.25);
            let spread = rng.gen_range(0.0..0.1);
            let rotation = Quat::from_euler(EulerRot::YXZ, yaw, tilt, 0.0);
            let root = Vec3::new(yaw.cos() * spread, 0.0, yaw.sin() * spread);
            Transform {
                translation: root + rotation * Vec3::Y * (len / 2.0),
                rotation,
                scale: Vec3::new(1.0, len, 1.0),
            }
        })
        .collect()
}

/// One row of spikes following the four edges of a square.
#[derive(Clone, Copy, Debug)]
pub struct SpikeRow {
    pub half_extent: f32,
    pub per_edge: usize,
    pub height: (f32, f32),
    pub width: (f32, f32),
    pub sink: f32,
    pub jitter: f32,
    /// Fixed push away from the square.
    pub outward: f32,
    /// Alternate spikes are smaller and sit slightly further out.
    pub staggered: bool,
}

/// The low inner row just past the boundary and the tall outer row behind it.
pub fn border_rows(boundary_half_extent: f32) -> [SpikeRow; 2] {
    [
        SpikeRow {
            half_extent: boundary_half_extent + 6.0,
            per_edge: 42,
            height: (12.5, 22.5),
            width: (1.5, 2.75),
            sink: 0.75,
            jitter: 1.05,
            outward: 3.0,
            staggered: false,
        },
        SpikeRow {
            half_extent: boundary_half_extent + 2.0,
            per_edge: 120,
            height: (5.0, 10.0),
            width: (0.875, 1.875),
            sink: 0.5,
            jitter: 1.5,
            outward: 0.0,
            staggered: true,
        },
    ]
}

#[derive(Clone, Copy, Debug)]
pub struct Spike {
    pub position: Vec3,
    pub height: f32,
    pub width: f32,
    pub rotation: Quat,
}

pub fn spike_row<R: Rng + ?Sized>(rng: &mut R, row: &SpikeRow) -> Vec<Spike> {
    let h = row.half_extent;
    // start, end, outward normal, base yaw
    let edges = [
        (Vec2::new(-h, h), Vec2::new(h, h), Vec2::Y, PI),
        (Vec2::new(-h, -h), Vec2::new(h, -h), Vec2::NEG_Y, 0.0),
        (Vec2::new(-h, -h), Vec2::new(-h, h), Vec2::NEG_X, PI * 1.5),
        (Vec2::new(h, -h), Vec2::new(h, h), Vec2::X, PI * 0.5),
    ];
    let per_edge = row.per_edge.max(1);
    let mut spikes = Vec::with_capacity(4 * (per_edge + 1));
    for (start, end, normal, base_yaw) in edges {
        for i in 0..=per_edge {
            let secondary = row.staggered && i % 2 == 1;
            let t = i as f32 / per_edge as f32;
            let push = if secondary {
                rng.gen_range(-0.5..0.5) * row.jitter * 0.8 + row.jitter * 0.3
            } else {
                rng.gen_range(-0.5..0.5) * row.jitter
            };
            let at = start.lerp(end, t) + normal * (row.outward + push);

            let (h_min, h_max) = row.height;
            let (w_min, w_max) = row.width;
            let (height, width) = if secondary {
                (
                    rng.gen_range(0.0..1.0) * (h_max - h_min) * 0.7 + h_min * 0.9,
                    rng.gen_range(0.0..1.0) * (w_max - w_min) * 0.7 + w_min * 0.9,
                )
            } else {
                (rng.gen_range(h_min..h_max), rng.gen_range(w_min..w_max))
            };
            let rotation = Quat::from_euler(
                EulerRot::YXZ,
                base_yaw + rng.gen_range(-0.25..0.25),
                rng.gen_range(-0.1..0.1),
                rng.gen_range(-0.1..0.1),
            );
            spikes.push(Spike {
                position: Vec3::new(at.x, -row.sink, at.y),
                height,
                width,
                rotation,
            });
        }
    }
    spikes
}

/// Unit triangular pyramid: base on y = 0, apex at y = 1.
fn spike_mesh() -> Mesh {
    let a = [-0.5, 0.0, -0.5];
    let b = [0.5, 0.0, -0.5];
    let c = [0.0, 0.0, 0.5];
    let p = [0.0, 1.0, 0.0];
    let positions: Vec<[f32; 3]> = vec![a, p, b, b, p, c, c, p, a, a, b, c];
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.compute_flat_normals();
    mesh
}

pub struct SceneryPlugin;
impl Plugin for SceneryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_scenery.before(spawn_disc_field));
    }
}

/// Scenery is placed once per launch and survives restarts.
fn spawn_scenery(
    mut commands: Commands,
    settings: Res<GameSettings>,
    merchant: Res<Merchant>,
    mut rng: ResMut<GameRng>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let block = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    let twig = meshes.add(Cuboid::new(0.08, 1.0, 0.08));
    let spike = meshes.add(spike_mesh());
    let stone = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xAA, 0xAA, 0xAA),
        perceptual_roughness: 1.0,
        ..default()
    });
    let bark = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x4A, 0x4A, 0x3C),
        perceptual_roughness: 1.0,
        ..default()
    });
    let row_materials = [0x35, 0x45].map(|shade| {
        materials.add(StandardMaterial {
            base_color: Color::srgb_u8(shade, shade, shade),
            perceptual_roughness: 1.0,
            double_sided: true,
            cull_mode: None,
            ..default()
        })
    });

    let statues = place_statues(
        &mut rng.0,
        settings.statue_count,
        settings.boundary_half_extent,
        settings.statue_spacing,
        &merchant,
    );
    for &spot in &statues {
        let yaw = rng.0.gen_range(0.0..TAU);
        let blocks = statue_blocks(&mut rng.0);
        commands
            .spawn((
                SpatialBundle::from_transform(
                    Transform::from_translation(spot).with_rotation(Quat::from_rotation_y(yaw)),
                ),
                Scenery,
            ))
            .with_children(|parent| {
                for b in blocks {
                    parent.spawn(PbrBundle {
                        mesh: block.clone(),
                        material: stone.clone(),
                        transform: Transform::from_translation(b.center).with_scale(b.size),
                        ..default()
                    });
                }
            });
    }

    let piles = place_twig_piles(
        &mut rng.0,
        settings.twig_pile_count,
        settings.twig_half_extent,
        &merchant,
    );
    for &spot in &piles {
        let sticks = twig_pile(&mut rng.0);
        commands
            .spawn((SpatialBundle::from_transform(Transform::from_translation(spot)), Scenery))
            .with_children(|parent| {
                for transform in sticks {
                    parent.spawn(PbrBundle {
                        mesh: twig.clone(),
                        material: bark.clone(),
                        transform,
                        ..default()
                    });
                }
            });
    }

    let mut spike_total = 0;
    for (row, material) in border_rows(settings.boundary_half_extent)
        .iter()
        .zip(row_materials)
    {
        for s in spike_row(&mut rng.0, row) {
            commands.spawn((
                PbrBundle {
                    mesh: spike.clone(),
                    material: material.clone(),
                    transform: Transform {
                        translation: s.position,
                        rotation: s.rotation,
                        scale: Vec3::new(s.width, s.height, s.width),
                    },
                    ..default()
                },
                Scenery,
            ));
            spike_total += 1;
        }
    }
    info!(
        "scenery: {} statues, {} twig piles, {spike_total} spikes",
        statues.len(),
        piles.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn statues_keep_their_distance() {
        let mut rng = StdRng::seed_from_u64(21);
        let merchant = Merchant::default();
        let spots = place_statues(&mut rng, 15, 50.0, 8.0, &merchant);
        assert_eq!(spots.len(), 15);
        for (i, a) in spots.iter().enumerate() {
            assert!(distance_xz(*a, Vec3::ZERO) >= 8.0);
            assert!(!merchant.is_near(*a, MACHINE_CLEARANCE));
            assert!(a.x.abs() <= 50.0 && a.z.abs() <= 50.0);
            assert_eq!(a.y, 0.0);
            for b in &spots[i + 1..] {
                assert!(distance_xz(*a, *b) >= 8.0);
            }
        }
    }

    #[test]
    fn crowded_statues_stop_after_bounded_attempts() {
        let mut rng = StdRng::seed_from_u64(22);
        let spots = place_statues(&mut rng, 40, 10.0, 8.0, &Merchant::default());
        assert!(spots.len() < 40);
    }

    #[test]
    fn statue_stands_on_the_ground() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..20 {
            let blocks = statue_blocks(&mut rng);
            assert_eq!(blocks.len(), 7);
            let lowest = blocks
                .iter()
                .map(|b| b.center.y - b.size.y / 2.0)
                .fold(f32::MAX, f32::min);
            assert!(lowest.abs() < 1e-5);
            assert!(blocks.iter().all(|b| b.size.min_element() > 0.0));
        }
    }

    #[test]
    fn twig_piles_avoid_the_machine() {
        let mut rng = StdRng::seed_from_u64(24);
        let merchant = Merchant::default();
        // Small square around the machine so some draws must be dropped.
        let piles = place_twig_piles(&mut rng, 200, 8.0, &merchant);
        assert!(!piles.is_empty() && piles.len() < 200);
        for p in &piles {
            assert!(!merchant.is_near(*p, MACHINE_CLEARANCE));
            assert!(p.x.abs() <= 8.0 && p.z.abs() <= 8.0);
        }
    }

    #[test]
    fn twigs_sprout_from_the_pile_centre() {
        let mut rng = StdRng::seed_from_u64(25);
        let sticks = twig_pile(&mut rng);
        assert!((6..=9).contains(&sticks.len()));
        for t in &sticks {
            let len = t.scale.y;
            assert!((0.7..1.5).contains(&len));
            let root = t.translation - t.rotation * Vec3::Y * (len / 2.0);
            assert!(root.y.abs() < 1e-4);
            assert!(Vec2::new(root.x, root.z).length() <= 0.1 + 1e-4);
            let tip = t.translation + t.rotation * Vec3::Y * (len / 2.0);
            assert!(tip.y > 0.0);
        }
    }

    #[test]
    fn border_stays_outside_the_walkable_square() {
        let mut rng = StdRng::seed_from_u64(26);
        let [outer, inner] = border_rows(50.0);

        let inner_spikes = spike_row(&mut rng, &inner);
        assert_eq!(inner_spikes.len(), 4 * 121);
        let outer_spikes = spike_row(&mut rng, &outer);
        assert_eq!(outer_spikes.len(), 4 * 43);

        for s in &inner_spikes {
            assert!(s.position.x.abs().max(s.position.z.abs()) > 50.0);
            assert!(s.height >= 5.0 * 0.9 && s.height <= 10.0);
            assert_eq!(s.position.y, -0.5);
        }
        for s in &outer_spikes {
            assert!(s.position.x.abs().max(s.position.z.abs()) > 58.0);
            assert!(s.height >= 12.5 && s.height < 22.5);
        }
    }
}
