use bevy::prelude::*;

use crate::events::{OverlayRequest, TextAnchor, TextStyle};

#[derive(Clone, Debug, PartialEq)]
pub struct TimedText {
    pub message: String,
    pub remaining: f32,
    pub anchor: TextAnchor,
    pub style: TextStyle,
}

/// What the overlay layer is currently showing. The HUD slots (terminal and
/// merchant panel) only exist while playing; requests aimed at them at other
/// times land in the generic text slot instead.
#[derive(Resource, Default, Debug)]
pub struct Overlay {
    pub hud_visible: bool,
    pub terminal: Option<TimedText>,
    pub text: Option<TimedText>,
    pub merchant_open: bool,
}

impl Overlay {
    pub fn apply(&mut self, request: OverlayRequest) {
        match request {
            OverlayRequest::Terminal { message, duration } => {
                let slot = TimedText {
                    message,
                    remaining: duration,
                    anchor: TextAnchor::Center,
                    style: TextStyle::Plain,
                };
                if self.hud_visible {
                    self.terminal = Some(slot);
                } else {
                    warn!("terminal slot unavailable, showing as plain text");
                    self.text = Some(slot);
                }
            }
            OverlayRequest::Text {
                message,
                duration,
                anchor,
                style,
            } => {
                self.text = Some(TimedText {
                    message,
                    remaining: duration,
                    anchor,
                    style,
                });
            }
            OverlayRequest::MerchantOpen => {
                if self.hud_visible {
                    self.merchant_open = true;
                } else {
                    warn!("merchant panel unavailable, showing as plain text");
                    self.text = Some(TimedText {
                        message: "Press E to trade".into(),
                        remaining: 2.0,
                        anchor: TextAnchor::Center,
                        style: TextStyle::Plain,
                    });
                }
            }
            OverlayRequest::MerchantClose => {
                self.merchant_open = false;
            }
            OverlayRequest::Clear => self.clear(),
        }
    }

    /// Counts down the timed slots and drops the expired ones.
    pub fn tick(&mut self, dt: f32) {
        for slot in [&mut self.terminal, &mut self.text] {
            let expired = match slot.as_mut() {
                Some(t) => {
                    t.remaining -= dt;
                    t.remaining <= 0.0
                }
                None => false,
            };
            if expired {
                *slot = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.terminal = None;
        self.text = None;
        self.merchant_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(msg: &str, duration: f32) -> OverlayRequest {
        OverlayRequest::Terminal {
            message: msg.into(),
            duration,
        }
    }

    #[test]
    fn terminal_expires_after_its_duration() {
        let mut o = Overlay {
            hud_visible: true,
            ..default()
        };
        o.apply(terminal("Is anybody out there?", 6.0));
        o.tick(5.9);
        assert!(o.terminal.is_some());
        o.tick(0.2);
        assert!(o.terminal.is_none());
    }

    #[test]
    fn newer_message_replaces_older() {
        let mut o = Overlay {
            hud_visible: true,
            ..default()
        };
        o.apply(terminal("first", 6.0));
        o.tick(5.0);
        o.apply(terminal("second", 6.0));
        let t = o.terminal.as_ref().unwrap();
        assert_eq!(t.message, "second");
        assert_eq!(t.remaining, 6.0);
    }

    #[test]
    fn hidden_hud_falls_back_to_text_slot() {
        let mut o = Overlay::default();
        o.apply(terminal("Running diagnostics...", 6.0));
        assert!(o.terminal.is_none());
        assert_eq!(o.text.as_ref().unwrap().message, "Running diagnostics...");

        o.apply(OverlayRequest::MerchantOpen);
        assert!(!o.merchant_open);
        assert_eq!(o.text.as_ref().unwrap().message, "Press E to trade");
    }

    #[test]
    fn merchant_panel_opens_and_closes() {
        let mut o = Overlay {
            hud_visible: true,
            ..default()
        };
        o.apply(OverlayRequest::MerchantOpen);
        assert!(o.merchant_open);
        o.apply(OverlayRequest::MerchantClose);
        assert!(!o.merchant_open);
    }

    #[test]
    fn clear_request_empties_every_slot() {
        let mut o = Overlay {
            hud_visible: true,
            ..default()
        };
        o.apply(terminal("Memory corruption detected.", 6.0));
        o.apply(OverlayRequest::MerchantOpen);
        o.apply(OverlayRequest::Text {
            message: "Sold for $40".into(),
            duration: 2.0,
            anchor: TextAnchor::Center,
            style: TextStyle::Plain,
        });
        o.apply(OverlayRequest::Clear);
        assert!(o.terminal.is_none());
        assert!(o.text.is_none());
        assert!(!o.merchant_open);
        assert!(o.hud_visible);
    }

    #[test]
    fn lost_disc_text_keeps_style() {
        let mut o = Overlay::default();
        o.apply(OverlayRequest::Text {
            message: "THE LOST DISC HAS APPEARED".into(),
            duration: 3.0,
            anchor: TextAnchor::TopCenter,
            style: TextStyle::LostDisc,
        });
        let t = o.text.as_ref().unwrap();
        assert_eq!(t.style, TextStyle::LostDisc);
        assert_eq!(t.anchor, TextAnchor::TopCenter);
        o.clear();
        assert!(o.text.is_none());
    }
}
