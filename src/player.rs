use bevy::prelude::*;
use std::num::ParseIntError;

use crate::settings::GameSettings;

/// Axis-aligned rectangle on the ground plane the player may not leave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for Boundary {
    fn default() -> Self {
        Self::square(50.0, 0.0)
    }
}

impl Boundary {
    pub fn square(half_extent: f32, padding: f32) -> Self {
        let h = (half_extent - padding).max(0.0);
        Self {
            min_x: -h,
            max_x: h,
            min_z: -h,
            max_z: h,
        }
    }

    pub fn clamp(&self, x: f32, z: f32) -> (f32, f32) {
        (
            x.max(self.min_x).min(self.max_x),
            z.max(self.min_z).min(self.max_z),
        )
    }

    #[cfg(test)]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_z..=self.max_z).contains(&z)
    }
}

#[derive(Resource, Clone, Debug)]
pub struct PlayerState {
    pub position: Vec3,
    pub forward: Vec3,
    pub disc_count: u32,
    pub money: u32,
    pub boundary: Boundary,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            disc_count: 0,
            money: 0,
            boundary: Boundary::default(),
        }
    }
}

impl PlayerState {
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self {
            boundary: Boundary::square(settings.boundary_half_extent, settings.boundary_padding),
            ..default()
        }
    }

    /// Clamps x/z into the boundary and stores the result. The returned value
    /// is what every later system in the frame must treat as authoritative.
    pub fn update_position(&mut self, x: f32, y: f32, z: f32) -> Vec3 {
        let (x, z) = self.boundary.clamp(x, z);
        self.position = Vec3::new(x, y, z);
        self.position
    }

    pub fn update_forward(&mut self, forward: Vec3) {
        self.forward = forward;
    }

    pub fn collect_disc(&mut self) {
        self.disc_count += 1;
        debug!("collected disc, count now {}", self.disc_count);
    }

    /// Returns false when there was nothing to take.
    pub fn take_disc(&mut self) -> bool {
        match self.disc_count.checked_sub(1) {
            Some(n) => {
                self.disc_count = n;
                true
            }
            None => false,
        }
    }

    pub fn add_money(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
        debug!("added ${amount}, assets now ${}", self.money);
    }

    /// Credits a display-formatted amount such as `"$120"`. Malformed input is
    /// logged and ignored.
    pub fn add_money_str(&mut self, value: &str) -> Result<u32, ParseIntError> {
        match parse_money(value) {
            Ok(amount) => {
                self.add_money(amount);
                Ok(amount)
            }
            Err(err) => {
                error!("invalid money value {value:?}: {err}");
                Err(err)
            }
        }
    }
}

pub fn parse_money(value: &str) -> Result<u32, ParseIntError> {
    let trimmed = value.trim();
    trimmed.strip_prefix('$').unwrap_or(trimmed).parse()
}

/// Horizontal distance, ignoring height.
pub fn distance_xz(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
