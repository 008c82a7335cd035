pub mod diagnostics_panel;
pub mod game_over_panel;
pub mod hud;
pub mod intro_panel;
pub mod merchant_panel;
