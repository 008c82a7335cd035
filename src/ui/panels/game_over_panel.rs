use bevy::prelude::*;
use bevy_egui::egui::{self, Align2, Color32, FontId, RichText};

use crate::events::ResetEvent;
use crate::game::AppState;

pub fn show_game_over_panel(
    ctx: &mut egui::Context,
    money: u32,
    ev_reset: &mut EventWriter<ResetEvent>,
    next_state: &mut NextState<AppState>,
) {
    egui::Area::new("game_over".into())
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("GAME OVER")
                        .font(FontId::proportional(64.0))
                        .color(Color32::RED),
                );
                ui.label(
                    RichText::new(format!("Final assets: ${money}"))
                        .font(FontId::proportional(24.0))
                        .color(Color32::WHITE),
                );
                ui.add_space(16.0);
                if ui.button("Restart").clicked() {
                    ev_reset.send(ResetEvent);
                    next_state.set(AppState::Playing);
                }
            });
        });
}
