use bevy::prelude::*;
use bevy_egui::egui::{self, Align2, Color32, RichText};

use crate::events::TradeRequested;
use crate::player::PlayerState;
use crate::trader::DiscTrader;

pub fn show_merchant_panel(
    ctx: &mut egui::Context,
    trader: &DiscTrader,
    player: &PlayerState,
    ev_trade: &mut EventWriter<TradeRequested>,
) {
    egui::Window::new("Disc Trader")
        .anchor(Align2::RIGHT_CENTER, egui::vec2(-16.0, 0.0))
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.label(format!("Discs in hand: {}", player.disc_count));
            ui.label(format!("Trades made: {}", trader.trades));

            if player.disc_count == 0 {
                ui.label(RichText::new("You have no discs to trade.").color(Color32::GRAY));
            }
            let trade = ui.add_enabled(trader.can_trade(player), egui::Button::new("Trade (E)"));
            if trade.clicked() {
                ev_trade.send(TradeRequested);
            }

            if let Some(entry) = &trader.last_entry {
                ui.separator();
                ui.label(RichText::new(&entry.title).strong().size(18.0));
                ui.label(format!("by {}", entry.artist));
                ui.label(format!("{} / {}", entry.genre, entry.vibe));
                ui.label(format!("Condition: {}", entry.condition));
                ui.label(format!("Rarity: {}", entry.rarity));
                ui.label(
                    RichText::new(entry.value_label())
                        .color(Color32::from_rgb(120, 220, 120))
                        .size(20.0),
                );
                ui.label(RichText::new(format!("\"{}\"", entry.quote)).italics());
            }
        });
}
