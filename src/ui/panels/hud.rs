use bevy_egui::egui::{self, Align2, Color32, FontId, RichText};

use crate::countdown::{format_clock, Countdown};
use crate::events::{TextAnchor, TextStyle};
use crate::player::PlayerState;
use crate::ui::overlay::{Overlay, TimedText};

const TERMINAL_GREEN: Color32 = Color32::from_rgb(0, 255, 0);

pub fn show_hud(ctx: &mut egui::Context, player: &PlayerState, countdown: &Countdown) {
    egui::Area::new("hud".into())
        .anchor(Align2::LEFT_TOP, egui::vec2(16.0, 16.0))
        .show(ctx, |ui| {
            ui.label(
                RichText::new(format!("Discs: {}", player.disc_count))
                    .font(FontId::monospace(20.0))
                    .color(Color32::WHITE),
            );
            ui.label(
                RichText::new(format!("Assets: ${}", player.money))
                    .font(FontId::monospace(20.0))
                    .color(Color32::WHITE),
            );
        });

    if countdown.is_displayed() {
        egui::Area::new("countdown".into())
            .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format_clock(countdown.remaining))
                        .font(FontId::monospace(40.0))
                        .color(Color32::RED),
                );
            });
    }
}

pub fn show_overlay_text(ctx: &mut egui::Context, overlay: &Overlay) {
    if let Some(t) = &overlay.terminal {
        egui::Area::new("terminal".into())
            .anchor(Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(Color32::from_black_alpha(200))
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(&t.message)
                                .font(FontId::monospace(16.0))
                                .color(TERMINAL_GREEN),
                        );
                    });
            });
    }
    if let Some(t) = &overlay.text {
        show_timed_text(ctx, t);
    }
}

fn show_timed_text(ctx: &mut egui::Context, t: &TimedText) {
    let (align, offset) = match t.anchor {
        TextAnchor::TopCenter => (Align2::CENTER_TOP, egui::vec2(0.0, 48.0)),
        TextAnchor::Center => (Align2::CENTER_CENTER, egui::Vec2::ZERO),
    };
    let text = match t.style {
        TextStyle::Plain => RichText::new(&t.message)
            .font(FontId::proportional(24.0))
            .color(Color32::WHITE),
        TextStyle::LostDisc => RichText::new(&t.message)
            .font(FontId::proportional(40.0))
            .strong()
            .color(Color32::from_rgb(255, 30, 30)),
    };
    egui::Area::new("overlay_text".into())
        .anchor(align, offset)
        .show(ctx, |ui| {
            ui.label(text);
        });
}
