use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin};

use crate::audio::SoundService;
use crate::collectibles::LostDisc;
use crate::countdown::Countdown;
use crate::events::{
    OverlayRequest, ResetEvent, TextAnchor, TextStyle, TradeCompleted, TradeRequested,
};
use crate::game::AppState;
use crate::monster::Monster;
use crate::player::PlayerState;
use crate::scheduler::Scheduler;
use crate::settings::GameSettings;
use crate::trader::DiscTrader;

pub mod overlay;
pub mod panels;

use overlay::Overlay;
use panels::diagnostics_panel::{show_diagnostics_panel, GameReadout};
use panels::game_over_panel::show_game_over_panel;
use panels::hud::{show_hud, show_overlay_text};
use panels::intro_panel::show_intro_panel;
use panels::merchant_panel::show_merchant_panel;

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<Overlay>()
            .add_systems(OnEnter(AppState::Playing), |mut overlay: ResMut<Overlay>| {
                overlay.hud_visible = true;
            })
            .add_systems(OnExit(AppState::Playing), |mut overlay: ResMut<Overlay>| {
                overlay.hud_visible = false;
                overlay.merchant_open = false;
            })
            .add_systems(
                Update,
                (update_overlay, overlay_text_ui, diagnostics_ui).chain(),
            )
            .add_systems(Update, intro_ui.run_if(in_state(AppState::Intro)))
            .add_systems(Update, hud_ui.run_if(in_state(AppState::Playing)))
            .add_systems(Update, game_over_ui.run_if(in_state(AppState::GameOver)));
    }
}

fn update_overlay(
    time: Res<Time>,
    mut requests: EventReader<OverlayRequest>,
    mut ev_reset: EventReader<ResetEvent>,
    mut ev_trades: EventReader<TradeCompleted>,
    mut overlay: ResMut<Overlay>,
) {
    if ev_reset.read().next().is_some() {
        overlay.clear();
    }
    overlay.tick(time.delta_seconds());
    for request in requests.read() {
        overlay.apply(request.clone());
    }
    for trade in ev_trades.read() {
        overlay.apply(OverlayRequest::Text {
            message: format!("Sold for {}", trade.entry.value_label()),
            duration: 2.0,
            anchor: TextAnchor::Center,
            style: TextStyle::Plain,
        });
    }
}

fn overlay_text_ui(mut contexts: EguiContexts, overlay: Res<Overlay>) {
    show_overlay_text(contexts.ctx_mut(), &overlay);
}

#[allow(clippy::too_many_arguments)]
fn diagnostics_ui(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
    settings: Res<GameSettings>,
    monster: Res<Monster>,
    scheduler: Res<Scheduler>,
    countdown: Res<Countdown>,
    trader: Res<DiscTrader>,
    lost: Res<LostDisc>,
    sound: Res<SoundService>,
) {
    if !settings.show_diagnostics {
        return;
    }
    let readout = GameReadout::capture(&monster, &scheduler, &countdown, &trader, &lost, &sound);
    show_diagnostics_panel(contexts.ctx_mut(), &diagnostics, &readout, settings.debug_mode);
}

fn intro_ui(mut contexts: EguiContexts) {
    show_intro_panel(contexts.ctx_mut());
}

fn hud_ui(
    mut contexts: EguiContexts,
    player: Res<PlayerState>,
    countdown: Res<Countdown>,
    trader: Res<DiscTrader>,
    overlay: Res<Overlay>,
    mut ev_trade: EventWriter<TradeRequested>,
) {
    let ctx = contexts.ctx_mut();
    show_hud(ctx, &player, &countdown);
    if overlay.merchant_open {
        show_merchant_panel(ctx, &trader, &player, &mut ev_trade);
    }
}

fn game_over_ui(
    mut contexts: EguiContexts,
    player: Res<PlayerState>,
    mut ev_reset: EventWriter<ResetEvent>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    show_game_over_panel(contexts.ctx_mut(), player.money, &mut ev_reset, &mut next_state);
}
