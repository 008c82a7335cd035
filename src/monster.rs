use bevy::prelude::*;

use crate::countdown::Countdown;
use crate::events::{Sound, SoundCue, SpawnMonster};
use crate::player::PlayerState;
use crate::scene::{AssetState, FallbackShape, ModelLibrary, ModelSlot};
use crate::scheduler::{ScheduledAction, Scheduler};
use crate::settings::GameSettings;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MonsterPhase {
    #[default]
    Dormant,
    Active,
    /// Terminal. The jumpscare has fired and game over is pending.
    Seen,
}

/// The pursuer. It does not path-find: at spawn it is placed behind the
/// player and from then on keeps the same offset from them every frame.
#[derive(Resource, Clone, Debug)]
pub struct Monster {
    pub phase: MonsterPhase,
    pub position: Vec3,
    pub spawn_offset: Vec3,
    pub follow_distance: f32,
    pub look_threshold_degrees: f32,
    pub model: AssetState,
}

impl Default for Monster {
    fn default() -> Self {
        Self::from_settings(&GameSettings::default())
    }
}

impl Monster {
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self {
            phase: MonsterPhase::Dormant,
            position: Vec3::ZERO,
            spawn_offset: Vec3::ZERO,
            follow_distance: settings.follow_distance,
            look_threshold_degrees: settings.look_threshold_degrees,
            model: AssetState::Loading,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != MonsterPhase::Dormant
    }

    pub fn has_been_seen(&self) -> bool {
        self.phase == MonsterPhase::Seen
    }

    /// Places the monster `follow_distance` behind the player on the ground
    /// and freezes the offset. Returns false if it is already out or its
    /// model has not settled yet.
    pub fn spawn(&mut self, player_position: Vec3, player_forward: Vec3) -> bool {
        if self.is_active() {
            return false;
        }
        if !self.model.is_settled() {
            warn!("monster model still loading, spawn skipped");
            return false;
        }

        let backward = -player_forward.normalize_or_zero();
        let mut spawn_point = player_position + backward * self.follow_distance;
        spawn_point.y = 0.0;

        self.spawn_offset = spawn_point - player_position;
        self.spawn_offset.y = 0.0;
        self.position = spawn_point;
        self.phase = MonsterPhase::Active;
        info!(
            "monster spawned at ({:.2}, {:.2}, {:.2})",
            spawn_point.x, spawn_point.y, spawn_point.z
        );
        true
    }

    pub fn follow(&mut self, player_position: Vec3) {
        if !self.is_active() {
            return;
        }
        let mut target = player_position + self.spawn_offset;
        target.y = 0.0;
        self.position = target;
    }

    pub fn is_player_looking(&self, player_position: Vec3, player_forward: Vec3) -> bool {
        if !self.is_active() {
            return false;
        }
        look_angle_degrees(player_position, player_forward, self.position)
            .is_some_and(|angle| angle <= self.look_threshold_degrees)
    }

    /// Moves Active to Seen when the player is looking at the monster.
    /// Returns true only on that transition.
    pub fn check_sighting(&mut self, player_position: Vec3, player_forward: Vec3) -> bool {
        if self.phase != MonsterPhase::Active {
            return false;
        }
        if !self.is_player_looking(player_position, player_forward) {
            return false;
        }
        self.phase = MonsterPhase::Seen;
        true
    }

    /// Yaw that turns the model towards `target`.
    pub fn facing_yaw(&self, target: Vec3) -> f32 {
        let dir = (target - self.position).normalize_or_zero();
        dir.x.atan2(dir.z)
    }
}

/// Angle between the forward vector and the direction to `target`, both
/// flattened onto the ground plane. None when either is degenerate.
pub fn look_angle_degrees(from: Vec3, forward: Vec3, target: Vec3) -> Option<f32> {
    let forward = Vec2::new(forward.x, forward.z);
    let to_target = Vec2::new(target.x - from.x, target.z - from.z);
    if forward.length_squared() < f32::EPSILON || to_target.length_squared() < f32::EPSILON {
        return None;
    }
    Some(forward.angle_between(to_target).abs().to_degrees())
}

#[derive(Component)]
pub struct MonsterBody;

pub struct MonsterPlugin;
impl Plugin for MonsterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Monster>()
            .add_systems(Startup, spawn_monster_body)
            .add_systems(Update, (sync_monster_model, sync_monster_body));
    }
}

fn spawn_monster_body(mut commands: Commands, models: Res<ModelLibrary>) {
    commands.spawn((
        SpatialBundle {
            visibility: Visibility::Hidden,
            ..default()
        },
        ModelSlot::new(
            models.monster.clone(),
            FallbackShape::Cuboid {
                size: Vec3::new(1.0, 2.0, 1.0),
                color: Color::srgb(1.0, 0.0, 0.0),
            },
        ),
        MonsterBody,
    ));
}

fn sync_monster_model(mut monster: ResMut<Monster>, q: Query<&ModelSlot, With<MonsterBody>>) {
    if let Ok(slot) = q.get_single() {
        if monster.model != slot.state {
            monster.model = slot.state;
        }
    }
}

fn sync_monster_body(
    monster: Res<Monster>,
    player: Res<PlayerState>,
    mut q: Query<(&mut Transform, &mut Visibility), With<MonsterBody>>,
) {
    let Ok((mut transform, mut visibility)) = q.get_single_mut() else {
        return;
    };
    if !monster.is_active() {
        *visibility = Visibility::Hidden;
        return;
    }
    *visibility = Visibility::Visible;
    transform.translation = monster.position;
    transform.rotation = Quat::from_rotation_y(monster.facing_yaw(player.position));
}

/// Whether this frame should try to bring the monster out. Once the countdown
/// has run out the request stands until the monster is actually out, so a
/// spawn refused while the model was loading is retried when it settles.
pub fn should_attempt_spawn(requested: bool, countdown_finished: bool, monster: &Monster) -> bool {
    if monster.is_active() {
        return false;
    }
    requested || (countdown_finished && monster.model.is_settled())
}

/// Handles spawn requests from the countdown or the debug key.
pub fn handle_spawn_monster(
    mut ev: EventReader<SpawnMonster>,
    countdown: Res<Countdown>,
    mut monster: ResMut<Monster>,
    player: Res<PlayerState>,
) {
    let requested = ev.read().count() > 0;
    if !should_attempt_spawn(requested, countdown.monster_spawned, &monster) {
        return;
    }
    monster.spawn(player.position, player.forward);
}

pub fn monster_follow(mut monster: ResMut<Monster>, player: Res<PlayerState>) {
    monster.follow(player.position);
}

pub fn monster_look_check(
    mut monster: ResMut<Monster>,
    player: Res<PlayerState>,
    settings: Res<GameSettings>,
    mut scheduler: ResMut<Scheduler>,
    mut ev_sound: EventWriter<SoundCue>,
) {
    if !monster.check_sighting(player.position, player.forward) {
        return;
    }
    info!("player spotted the monster, triggering jumpscare");
    ev_sound.send(SoundCue::Stop(Sound::Dread));
    ev_sound.send(SoundCue::Play {
        sound: Sound::Scare,
        volume: 1.0,
    });
    scheduler.schedule(settings.jumpscare_delay, ScheduledAction::GameOver);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_monster() -> Monster {
        let mut m = Monster::default();
        m.model = AssetState::Ready;
        m
    }

    #[test]
    fn spawns_behind_player_on_the_ground() {
        let mut m = ready_monster();
        assert!(m.spawn(Vec3::new(3.0, 1.7, 4.0), Vec3::new(0.0, 0.0, -2.0)));
        assert_eq!(m.phase, MonsterPhase::Active);
        assert!((m.position - Vec3::new(3.0, 0.0, 10.0)).length() < 1e-5);
        assert!((m.spawn_offset - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-5);
    }

    #[test]
    fn spawn_waits_for_model_and_only_happens_once() {
        let mut m = Monster::default();
        assert!(!m.spawn(Vec3::ZERO, Vec3::NEG_Z));
        assert_eq!(m.phase, MonsterPhase::Dormant);

        m.model = AssetState::Fallback;
        assert!(m.spawn(Vec3::ZERO, Vec3::NEG_Z));
        let offset = m.spawn_offset;
        assert!(!m.spawn(Vec3::new(20.0, 0.0, 20.0), Vec3::X));
        assert_eq!(m.spawn_offset, offset);
    }

    #[test]
    fn offset_stays_frozen_while_following() {
        let mut m = ready_monster();
        m.spawn(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        let offset = m.spawn_offset;
        for p in [
            Vec3::new(10.0, 1.7, -3.0),
            Vec3::new(-40.0, 2.5, 12.0),
            Vec3::new(0.5, 0.0, 49.0),
        ] {
            m.follow(p);
            assert_eq!(m.spawn_offset, offset);
            let expected = Vec3::new(p.x + offset.x, 0.0, p.z + offset.z);
            assert!((m.position - expected).length() < 1e-5);
            assert_eq!(m.position.y, 0.0);
        }
    }

    #[test]
    fn dormant_monster_does_not_follow_or_get_seen() {
        let mut m = ready_monster();
        m.follow(Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(m.position, Vec3::ZERO);
        assert!(!m.check_sighting(Vec3::ZERO, Vec3::NEG_Z));
    }

    #[test]
    fn looking_away_is_safe_turning_around_is_not() {
        let mut m = ready_monster();
        m.spawn(Vec3::ZERO, Vec3::NEG_Z);
        // Monster sits at +Z.
        assert!(!m.check_sighting(Vec3::ZERO, Vec3::NEG_Z));
        assert!(!m.check_sighting(Vec3::ZERO, Vec3::X));
        assert!(m.check_sighting(Vec3::ZERO, Vec3::new(0.3, -0.2, 1.0)));
        assert!(m.has_been_seen());
    }

    #[test]
    fn sighting_fires_exactly_once() {
        let mut m = ready_monster();
        m.spawn(Vec3::ZERO, Vec3::NEG_Z);
        let fired = (0..100)
            .filter(|_| m.check_sighting(Vec3::ZERO, Vec3::Z))
            .count();
        assert_eq!(fired, 1);
        assert_eq!(m.phase, MonsterPhase::Seen);
        assert!(m.is_active());
    }

    #[test]
    fn threshold_is_inclusive_at_fifty_degrees() {
        let at = |deg: f32| {
            let r = deg.to_radians();
            Vec3::new(r.sin(), 0.0, r.cos())
        };
        let mut m = ready_monster();
        m.spawn(Vec3::ZERO, Vec3::NEG_Z);
        assert!(m.is_player_looking(Vec3::ZERO, at(49.5)));
        assert!(!m.is_player_looking(Vec3::ZERO, at(50.5)));
    }

    #[test]
    fn finished_countdown_retries_spawn_once_model_settles() {
        use crate::events::EventsPlugin;

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, EventsPlugin))
            .insert_resource(Monster::default())
            .insert_resource(PlayerState::default())
            .init_resource::<Countdown>()
            .add_systems(Update, handle_spawn_monster);

        app.world_mut().resource_mut::<Countdown>().monster_spawned = true;
        app.world_mut().send_event(SpawnMonster);
        app.update();
        assert_eq!(app.world().resource::<Monster>().phase, MonsterPhase::Dormant);

        // No new event: the finished countdown alone brings it out.
        app.update();
        assert_eq!(app.world().resource::<Monster>().phase, MonsterPhase::Dormant);
        app.world_mut().resource_mut::<Monster>().model = AssetState::Fallback;
        app.update();
        assert_eq!(app.world().resource::<Monster>().phase, MonsterPhase::Active);
    }

    #[test]
    fn spawn_attempts_stop_once_out() {
        let mut m = ready_monster();
        assert!(!should_attempt_spawn(false, false, &m));
        assert!(should_attempt_spawn(true, false, &m));
        assert!(should_attempt_spawn(false, true, &m));
        m.spawn(Vec3::ZERO, Vec3::NEG_Z);
        assert!(!should_attempt_spawn(true, true, &m));

        let loading = Monster::default();
        assert!(!should_attempt_spawn(false, true, &loading));
        assert!(should_attempt_spawn(true, true, &loading));
    }

    #[test]
    fn look_angle_handles_degenerate_vectors() {
        assert_eq!(look_angle_degrees(Vec3::ZERO, Vec3::Y, Vec3::X), None);
        assert_eq!(look_angle_degrees(Vec3::ZERO, Vec3::X, Vec3::Y), None);
        let a = look_angle_degrees(Vec3::ZERO, Vec3::X, Vec3::Z).unwrap();
        assert!((a - 90.0).abs() < 1e-3);
    }
}
