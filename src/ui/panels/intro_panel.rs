use bevy_egui::egui::{self, Align2, Color32, FontId, RichText};

pub fn show_intro_panel(ctx: &mut egui::Context) {
    egui::Area::new("intro".into())
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("LOST DISC")
                        .font(FontId::proportional(72.0))
                        .color(Color32::from_rgb(200, 0, 0)),
                );
                ui.label(RichText::new("Collect the discs. Trade them. Don't look back.").italics());
                ui.add_space(12.0);
                ui.label("WASD to move, mouse to look, E to trade, Esc to release the cursor");
                ui.label(RichText::new("Click or press Enter to begin").color(Color32::GRAY));
            });
        });
}
