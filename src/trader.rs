use bevy::prelude::*;
use rand::Rng;

use crate::events::{
    FinalSequenceStart, OverlayRequest, Sound, SoundCue, TradeCompleted, TradeRequested,
};
use crate::game::GameRng;
use crate::loot::{generate_entry, LootEntry};
use crate::player::{distance_xz, PlayerState};
use crate::scene::{AssetState, FallbackShape, ModelLibrary, ModelSlot};
use crate::settings::GameSettings;

#[derive(Clone, Debug, PartialEq)]
pub struct TradeReceipt {
    pub entry: LootEntry,
    /// True only for the trade that reached the final-sequence threshold.
    pub final_sequence: bool,
}

#[derive(Resource, Clone, Debug)]
pub struct DiscTrader {
    can_trade: bool,
    pub trades: u32,
    pub threshold: u32,
    final_sequence_fired: bool,
    pub last_entry: Option<LootEntry>,
}

impl Default for DiscTrader {
    fn default() -> Self {
        Self::with_threshold(GameSettings::default().final_sequence_threshold)
    }
}

impl DiscTrader {
    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            can_trade: false,
            trades: 0,
            threshold,
            final_sequence_fired: false,
            last_entry: None,
        }
    }

    pub fn enable_trading(&mut self) {
        self.can_trade = true;
    }

    pub fn disable_trading(&mut self) {
        self.can_trade = false;
    }

    pub fn trading_enabled(&self) -> bool {
        self.can_trade
    }

    pub fn can_trade(&self, player: &PlayerState) -> bool {
        self.can_trade && player.disc_count > 0
    }

    pub fn final_sequence_fired(&self) -> bool {
        self.final_sequence_fired
    }

    /// Swaps one of the player's discs for a freshly generated entry and
    /// credits its value. Does nothing when trading is closed or the player
    /// has no discs.
    pub fn trade_disc<R: Rng + ?Sized>(
        &mut self,
        player: &mut PlayerState,
        rng: &mut R,
    ) -> Option<TradeReceipt> {
        if !self.can_trade(player) || !player.take_disc() {
            debug!(
                "trade refused: enabled={} discs={}",
                self.can_trade, player.disc_count
            );
            return None;
        }

        let entry = generate_entry(rng);
        let credited = player.add_money_str(&entry.value_label()).unwrap_or(0);
        self.trades += 1;
        self.last_entry = Some(entry.clone());

        let final_sequence = !self.final_sequence_fired && self.trades >= self.threshold;
        if final_sequence {
            self.final_sequence_fired = true;
        }
        info!(
            "trade #{} -> {entry}, credited ${credited}, {} discs left",
            self.trades, player.disc_count
        );
        Some(TradeReceipt {
            entry,
            final_sequence,
        })
    }
}

/// Scenery and discs keep at least this far from the machine.
pub const MACHINE_CLEARANCE: f32 = 3.0;

/// The vending machine the player trades at. Proximity is edge triggered.
#[derive(Resource, Clone, Debug)]
pub struct Merchant {
    pub position: Vec3,
    pub radius: f32,
    pub player_in_range: bool,
    pub model: AssetState,
}

impl Default for Merchant {
    fn default() -> Self {
        Self::from_settings(&GameSettings::default(), Vec3::ZERO)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Proximity {
    Entered,
    Left,
}

impl Merchant {
    pub fn from_settings(settings: &GameSettings, player_start: Vec3) -> Self {
        let (dx, dz) = settings.merchant_offset;
        Self {
            position: Vec3::new(player_start.x + dx, 0.0, player_start.z + dz),
            radius: settings.merchant_radius,
            player_in_range: false,
            model: AssetState::Loading,
        }
    }

    /// Returns a transition when the player crosses the interaction radius.
    /// Skipped until the machine's model has settled.
    pub fn check_proximity(&mut self, player_position: Vec3) -> Option<Proximity> {
        if !self.model.is_settled() {
            return None;
        }
        let was_in_range = self.player_in_range;
        self.player_in_range = distance_xz(self.position, player_position) <= self.radius;
        match (was_in_range, self.player_in_range) {
            (false, true) => Some(Proximity::Entered),
            (true, false) => Some(Proximity::Left),
            _ => None,
        }
    }

    /// Placement check used for discs, statues and twig piles.
    pub fn is_near(&self, position: Vec3, min_distance: f32) -> bool {
        distance_xz(self.position, position) < min_distance
    }
}

#[derive(Component)]
pub struct MerchantBody;

pub struct TraderPlugin;
impl Plugin for TraderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DiscTrader>()
            .init_resource::<Merchant>()
            .add_systems(Startup, spawn_merchant_body)
            .add_systems(Update, sync_merchant_model);
    }
}

fn spawn_merchant_body(mut commands: Commands, models: Res<ModelLibrary>, merchant: Res<Merchant>) {
    commands.spawn((
        SpatialBundle::from_transform(Transform::from_translation(merchant.position)),
        ModelSlot::new(
            models.machine.clone(),
            FallbackShape::Cuboid {
                size: Vec3::new(1.2, 2.2, 0.8),
                color: Color::srgb(0.3, 0.3, 0.35),
            },
        ),
        MerchantBody,
    ));
}

fn sync_merchant_model(mut merchant: ResMut<Merchant>, q: Query<&ModelSlot, With<MerchantBody>>) {
    if let Ok(slot) = q.get_single() {
        if merchant.model != slot.state {
            merchant.model = slot.state;
        }
    }
}

pub fn merchant_proximity(
    mut merchant: ResMut<Merchant>,
    mut trader: ResMut<DiscTrader>,
    player: Res<PlayerState>,
    mut ev_overlay: EventWriter<OverlayRequest>,
) {
    match merchant.check_proximity(player.position) {
        Some(Proximity::Entered) => {
            info!("player entered merchant radius");
            trader.enable_trading();
            ev_overlay.send(OverlayRequest::MerchantOpen);
        }
        Some(Proximity::Left) => {
            info!("player left merchant radius");
            trader.disable_trading();
            ev_overlay.send(OverlayRequest::MerchantClose);
        }
        None => {}
    }
}

pub fn handle_trade_requests(
    mut ev_trade: EventReader<TradeRequested>,
    mut trader: ResMut<DiscTrader>,
    mut player: ResMut<PlayerState>,
    mut rng: ResMut<GameRng>,
    mut ev_completed: EventWriter<TradeCompleted>,
    mut ev_final: EventWriter<FinalSequenceStart>,
    mut ev_sound: EventWriter<SoundCue>,
) {
    for _ in ev_trade.read() {
        let Some(receipt) = trader.trade_disc(&mut player, &mut rng.0) else {
            continue;
        };
        ev_sound.send(SoundCue::Play {
            sound: Sound::Trade,
            volume: 1.0,
        });
        if receipt.final_sequence {
            info!("trade threshold reached, starting final sequence");
            ev_final.send(FinalSequenceStart);
        }
        ev_completed.send(TradeCompleted {
            entry: receipt.entry,
        });
    }
}
