//! Board configuration
//!
//! Tunables that a board integration may override. Nothing here is
//! persisted; the values are fixed for the lifetime of the device.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum friendly name length
pub const MAX_NAME_LEN: usize = 16;

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Highest protocol id this board speaks
    pub protocol_id: u8,
    /// Name scrolled on the display while no controller is connected
    pub friendly_name: String<MAX_NAME_LEN>,
    /// Per-character scroll delay when DISPLAY_TEXT omits one
    pub default_text_delay_ms: u16,
    /// Upper bound for any requested scroll delay
    pub max_text_delay_ms: u16,
    /// Servo pulse range used when SET_SERVO sends 0
    pub servo_default_range_us: u16,
    /// Servo center pulse used when SET_SERVO sends 0
    pub servo_default_center_us: u16,
    /// Light sensor sampling duration applied at boot
    pub light_sensing_duration_ms: u16,
    /// Idle ticks between friendly name scrolls, 0 disables
    pub name_scroll_interval_ticks: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let mut friendly_name = String::new();
        let _ = friendly_name.push_str("BBC micro:bit");
        Self {
            protocol_id: mbitmore_protocol::PROTOCOL_ID,
            friendly_name,
            default_text_delay_ms: 120,
            max_text_delay_ms: 5000,
            servo_default_range_us: 2000,
            servo_default_center_us: 1500,
            light_sensing_duration_ms: 20,
            name_scroll_interval_ticks: 250,
        }
    }
}

impl BoardConfig {
    /// Clamp a requested scroll delay, falling back to the default
    pub fn text_delay(&self, requested: Option<u16>) -> u16 {
        requested
            .unwrap_or(self.default_text_delay_ms)
            .min(self.max_text_delay_ms)
    }

    /// Returns true if the controller may select `id`
    pub fn supports_protocol(&self, id: u8) -> bool {
        (1..=self.protocol_id).contains(&id)
    }
}
