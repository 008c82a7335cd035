use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

pub const SETTINGS_ENV: &str = "LOST_DISC_SETTINGS";
const DEFAULT_SETTINGS_PATH: &str = "settings.ron";

#[derive(Resource, Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameSettings {
    pub debug_mode: bool,
    pub deterministic: bool,
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    pub eye_height: f32,
    // Playable area is a square of this half extent around the origin.
    pub boundary_half_extent: f32,
    pub boundary_padding: f32,
    pub follow_distance: f32,
    pub look_threshold_degrees: f32,
    pub jumpscare_delay: f32,
    pub countdown_seconds: u32,
    pub dread_cue_delay: f32,
    pub final_sequence_threshold: u32,
    pub disc_count: usize,
    pub min_disc_spacing: f32,
    pub collection_radius: f32,
    pub merchant_offset: (f32, f32),
    pub merchant_radius: f32,
    pub statue_count: usize,
    pub statue_spacing: f32,
    pub twig_pile_count: usize,
    pub twig_half_extent: f32,
    pub intro_seconds: f32,
    pub terminal_interval: (f32, f32), // min, max
    pub terminal_duration: f32,
    pub show_diagnostics: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            debug_mode: false,
            deterministic: false,
            move_speed: 9.0,
            mouse_sensitivity: 0.002,
            eye_height: 1.7,
            boundary_half_extent: 50.0,
            boundary_padding: 1.0,
            follow_distance: 6.0,
            look_threshold_degrees: 50.0,
            jumpscare_delay: 1.5,
            countdown_seconds: 120,
            dread_cue_delay: 30.0,
            final_sequence_threshold: 15,
            disc_count: 10,
            min_disc_spacing: 5.0,
            collection_radius: 1.0,
            merchant_offset: (5.0, 5.0),
            merchant_radius: 2.0,
            statue_count: 15,
            statue_spacing: 8.0,
            twig_pile_count: 50,
            twig_half_extent: 40.0,
            intro_seconds: 10.0,
            terminal_interval: (10.0, 15.0),
            terminal_duration: 6.0,
            show_diagnostics: false,
        }
    }
}

impl GameSettings {
    /// Reads `settings.ron` (or the file named by `LOST_DISC_SETTINGS`).
    /// Any problem is logged and the defaults are used instead.
    pub fn load() -> Self {
        let path = std::env::var(SETTINGS_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.into());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                debug!("no settings file at {}: {err}", path.display());
                return Self::default();
            }
        };
        match Self::from_ron(&text) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                warn!("ignoring {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}
