//! Wireless attribute transport trait

use mbitmore_protocol::ChannelId;

/// Trait for the attribute server of the wireless stack
///
/// Connection setup, security and delivery are the implementation's job.
pub trait Transport {
    /// Check if a controller is connected
    fn is_connected(&self) -> bool;

    /// Replace the value served on reads of `channel`
    fn set_value(&mut self, channel: ChannelId, value: &[u8]);

    /// Replace the value of `channel` and notify the controller
    fn notify(&mut self, channel: ChannelId, value: &[u8]);
}
