use crate::events::{ResetEvent, SpawnLostDisc, SpawnMonster, TradeRequested};
use crate::game::AppState;
use crate::settings::GameSettings;
use crate::PlayerCamera;
use bevy::input::mouse::MouseMotion;
use bevy::math::EulerRot;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_egui::EguiContexts;

const PITCH_LIMIT: f32 = 1.54;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LookAngles>()
            .add_systems(
                Update,
                (cursor_grab, toggle_diagnostics, reset_look),
            )
            .add_systems(Update, intro_skip.run_if(in_state(AppState::Intro)))
            .add_systems(
                Update,
                (debug_keys, trade_key).run_if(in_state(AppState::Playing)),
            )
            .add_systems(OnEnter(AppState::GameOver), release_cursor);
    }
}

/// Camera yaw and pitch in radians. Roll is always zero.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl LookAngles {
    pub fn apply(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// WASD intent: x is strafe (right positive), y is forward.
pub fn movement_intent(keys: &ButtonInput<KeyCode>) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    dir
}

/// Turns an intent into a ground-plane displacement for the given yaw.
/// Looking up or down never changes walking speed.
pub fn planar_step(yaw: f32, intent: Vec2, distance: f32) -> Vec3 {
    if intent == Vec2::ZERO {
        return Vec3::ZERO;
    }
    let intent = intent.normalize();
    let forward = Quat::from_rotation_y(yaw) * Vec3::NEG_Z;
    let right = Quat::from_rotation_y(yaw) * Vec3::X;
    (forward * intent.y + right * intent.x) * distance
}

fn cursor_grabbed(window: &Window) -> bool {
    window.cursor.grab_mode != CursorGrabMode::None
}

/// Run condition for everything the player drives. With the cursor free the
/// world waits; clocks and scheduled actions keep running.
pub fn cursor_locked(windows: Query<&Window, With<PrimaryWindow>>) -> bool {
    windows.get_single().is_ok_and(cursor_grabbed)
}

pub fn move_player(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<GameSettings>,
    look: Res<LookAngles>,
    mut camera_q: Query<&mut Transform, With<PlayerCamera>>,
) {
    let Ok(mut transform) = camera_q.get_single_mut() else {
        return;
    };
    let step = planar_step(
        look.yaw,
        movement_intent(&keys),
        settings.move_speed * time.delta_seconds(),
    );
    transform.translation += step;
    transform.translation.y = settings.eye_height;
}

pub fn look_player(
    mut motion: EventReader<MouseMotion>,
    settings: Res<GameSettings>,
    mut look: ResMut<LookAngles>,
    mut camera_q: Query<&mut Transform, With<PlayerCamera>>,
) {
    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    if delta != Vec2::ZERO {
        look.apply(delta, settings.mouse_sensitivity);
    }
    if let Ok(mut transform) = camera_q.get_single_mut() {
        transform.rotation = look.rotation();
    }
}

fn set_grab(window: &mut Window, grab: bool) {
    if grab {
        window.cursor.grab_mode = CursorGrabMode::Locked;
        window.cursor.visible = false;
    } else {
        window.cursor.grab_mode = CursorGrabMode::None;
        window.cursor.visible = true;
    }
}

/// A click grabs the cursor unless it is already grabbed, the run is over,
/// or the click belongs to an egui widget such as the Trade button.
fn should_grab(clicked: bool, state: &AppState, grabbed: bool, egui_has_pointer: bool) -> bool {
    clicked && *state != AppState::GameOver && !grabbed && !egui_has_pointer
}

fn cursor_grab(
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<AppState>>,
) {
    let Ok(mut window) = windows.get_single_mut() else {
        return;
    };
    if keys.just_pressed(KeyCode::Escape) {
        set_grab(&mut window, false);
        return;
    }
    let ctx = contexts.ctx_mut();
    let egui_has_pointer = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
    if should_grab(
        buttons.just_pressed(MouseButton::Left),
        state.get(),
        cursor_grabbed(&window),
        egui_has_pointer,
    ) {
        set_grab(&mut window, true);
    }
}

fn release_cursor(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = windows.get_single_mut() {
        set_grab(&mut window, false);
    }
}

fn intro_skip(
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if keys.just_pressed(KeyCode::Enter) || buttons.just_pressed(MouseButton::Left) {
        next_state.set(AppState::Playing);
    }
}

fn debug_keys(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<GameSettings>,
    mut ev_monster: EventWriter<SpawnMonster>,
    mut ev_lost: EventWriter<SpawnLostDisc>,
) {
    if !settings.debug_mode {
        return;
    }
    if keys.just_pressed(KeyCode::KeyG) {
        debug!("debug: spawn monster");
        ev_monster.send(SpawnMonster);
    }
    if keys.just_pressed(KeyCode::KeyH) {
        debug!("debug: spawn lost disc");
        ev_lost.send(SpawnLostDisc);
    }
}

fn trade_key(keys: Res<ButtonInput<KeyCode>>, mut ev_trade: EventWriter<TradeRequested>) {
    if keys.just_pressed(KeyCode::KeyE) {
        ev_trade.send(TradeRequested);
    }
}

/// F3 shows or hides the readout window, in any state.
fn toggle_diagnostics(keys: Res<ButtonInput<KeyCode>>, mut settings: ResMut<GameSettings>) {
    if !keys.just_pressed(KeyCode::F3) {
        return;
    }
    settings.show_diagnostics ^= true;
    debug!("readout {}", if settings.show_diagnostics { "shown" } else { "hidden" });
}

fn reset_look(mut ev_reset: EventReader<ResetEvent>, mut look: ResMut<LookAngles>) {
    if ev_reset.read().next().is_some() {
        *look = LookAngles::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn wasd_maps_to_intent() {
        let mut keys = ButtonInput::<KeyCode>::default();
        assert_eq!(movement_intent(&keys), Vec2::ZERO);
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::KeyD);
        assert_eq!(movement_intent(&keys), Vec2::new(1.0, 1.0));
        keys.press(KeyCode::KeyS);
        assert_eq!(movement_intent(&keys), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn forward_follows_yaw() {
        assert!(close(planar_step(0.0, Vec2::Y, 2.0), Vec3::new(0.0, 0.0, -2.0)));
        assert!(close(planar_step(0.0, Vec2::X, 1.0), Vec3::X));
        let quarter = std::f32::consts::FRAC_PI_2;
        assert!(close(planar_step(quarter, Vec2::Y, 1.0), Vec3::NEG_X));
    }

    #[test]
    fn diagonal_is_not_faster() {
        let step = planar_step(0.3, Vec2::new(1.0, 1.0), 1.0);
        assert!((step.length() - 1.0).abs() < 1e-5);
        assert!(step.y.abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut look = LookAngles::default();
        look.apply(Vec2::new(0.0, -100_000.0), 0.002);
        assert_eq!(look.pitch, PITCH_LIMIT);
        look.apply(Vec2::new(0.0, 100_000.0), 0.002);
        assert_eq!(look.pitch, -PITCH_LIMIT);
        look.apply(Vec2::new(100.0, 0.0), 0.01);
        assert!((look.yaw + 1.0).abs() < 1e-5);
    }

    #[test]
    fn clicks_on_egui_do_not_grab() {
        let playing = AppState::Playing;
        assert!(should_grab(true, &playing, false, false));
        assert!(!should_grab(true, &playing, false, true));
        assert!(!should_grab(true, &playing, true, false));
        assert!(!should_grab(false, &playing, false, false));
        assert!(!should_grab(true, &AppState::GameOver, false, false));
        assert!(should_grab(true, &AppState::Intro, false, false));
    }

    #[derive(Resource, Default)]
    struct Ran(u32);

    #[test]
    fn player_systems_wait_for_locked_cursor() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Ran>()
            .add_systems(Update, (|mut ran: ResMut<Ran>| ran.0 += 1).run_if(cursor_locked));

        // No window at all.
        app.update();
        assert_eq!(app.world().resource::<Ran>().0, 0);

        let window = app.world_mut().spawn((Window::default(), PrimaryWindow)).id();
        app.update();
        assert_eq!(app.world().resource::<Ran>().0, 0);

        if let Some(mut win) = app.world_mut().get_mut::<Window>(window) {
            set_grab(&mut win, true);
        }
        app.update();
        assert_eq!(app.world().resource::<Ran>().0, 1);
    }

    #[test]
    fn rotation_matches_planar_forward() {
        let look = LookAngles {
            yaw: 0.7,
            pitch: 0.0,
        };
        let fwd = look.rotation() * Vec3::NEG_Z;
        assert!(close(fwd, planar_step(0.7, Vec2::Y, 1.0)));
    }
}
