//! Glue between the attribute transport and the device
//!
//! The board's wireless stack calls [`Service::on_write`] when the
//! controller writes a characteristic, [`Service::on_read`] when it reads
//! one, and [`Service::on_idle`] from its periodic idle callback.

use mbitmore_protocol::ChannelId;

use crate::device::Device;
use crate::messages::DEFAULT_REGISTRY_CAPACITY;
use crate::telemetry::{ChannelValue, Changes};
use crate::traits::{Display, PinDriver, Sensors, Transport};

/// Runs a [`Device`] on top of a [`Transport`]
pub struct Service<'a, T, P, S, D, const N: usize = DEFAULT_REGISTRY_CAPACITY> {
    transport: T,
    device: Device<'a, P, S, D, N>,
}

impl<'a, T, P, S, D, const N: usize> Service<'a, T, P, S, D, N>
where
    T: Transport,
    P: PinDriver,
    S: Sensors,
    D: Display,
{
    pub fn new(transport: T, device: Device<'a, P, S, D, N>) -> Self {
        Self { transport, device }
    }

    /// Handle a write from the controller
    ///
    /// Malformed frames are logged and dropped; the controller gets no reply.
    pub fn on_write(&mut self, channel: ChannelId, data: &[u8]) {
        if !channel.is_writable() {
            debug!("write to read-only channel {=u16:#x}", channel.short_id());
            return;
        }
        if let Err(err) = self.device.on_command(data) {
            debug!("frame dropped: {}", err);
        }
    }

    /// Handle a read from the controller
    pub fn on_read(&mut self, channel: ChannelId) -> Option<ChannelValue> {
        self.device.on_read(channel)
    }

    /// Run one notify cycle and push every changed channel
    pub fn on_idle(&mut self) -> Changes {
        self.sync_connection();
        let changes = self.device.on_tick();
        for channel in changes.iter() {
            let Some(value) = self.device.channel_value(channel) else {
                continue;
            };
            trace!("push {=u16:#x}", channel.short_id());
            if channel.is_notify() {
                self.transport.notify(channel, &value);
            } else {
                self.transport.set_value(channel, &value);
            }
        }
        changes
    }

    fn sync_connection(&mut self) {
        match (self.transport.is_connected(), self.device.is_connected()) {
            (true, false) => self.device.on_connect(),
            (false, true) => self.device.on_disconnect(),
            _ => {}
        }
    }

    pub fn device(&self) -> &Device<'a, P, S, D, N> {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut Device<'a, P, S, D, N> {
        &mut self.device
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
