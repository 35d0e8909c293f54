//! Command dispatch and the notify cycle
//!
//! [`Device`] owns all board-side state. It has two entry points, both run
//! to completion: [`Device::on_command`] for frames written by the
//! controller and [`Device::on_tick`] for the periodic idle callback.
//! Interrupt handlers only ever touch the borrowed [`EventLatches`].

use mbitmore_protocol::channels::ANALOG_IN_SIZE;
use mbitmore_protocol::telemetry::{encode_analog_in, SHARED_DATA_SLOTS};
use mbitmore_protocol::{
    ChannelId, Command, CommandError, MessageType, ProtocolCommand, SharedDataReport,
};

use crate::config::BoardConfig;
use crate::messages::{MessageId, MessageRegistry, RegistryError, DEFAULT_REGISTRY_CAPACITY};
use crate::pin_table::PinTable;
use crate::sensors::{EventLatches, SensorSnapshot};
use crate::telemetry::{ChannelValue, Changes, TelemetryEncoder};
use crate::traits::{Display, PinDriver, Sensors};

/// Board-side state of the bridge
pub struct Device<'a, P, S, D, const N: usize = DEFAULT_REGISTRY_CAPACITY> {
    config: BoardConfig,
    pins: PinTable<P>,
    sensors: S,
    display: D,
    registry: MessageRegistry<N>,
    latches: &'a EventLatches,
    encoder: TelemetryEncoder,
    snapshot: SensorSnapshot,
    shared: [i16; SHARED_DATA_SLOTS],
    /// Protocol id selected by the controller
    protocol: u8,
    connected: bool,
    idle_ticks: u32,
}

impl<'a, P, S, D, const N: usize> Device<'a, P, S, D, N>
where
    P: PinDriver,
    S: Sensors,
    D: Display,
{
    pub fn new(
        config: BoardConfig,
        pins: P,
        mut sensors: S,
        display: D,
        latches: &'a EventLatches,
    ) -> Self {
        sensors.set_light_sensing_duration(config.light_sensing_duration_ms);
        Self {
            pins: PinTable::new(pins, &config),
            protocol: config.protocol_id,
            config,
            sensors,
            display,
            registry: MessageRegistry::new(),
            latches,
            encoder: TelemetryEncoder::new(),
            snapshot: SensorSnapshot::default(),
            shared: [0; SHARED_DATA_SLOTS],
            connected: false,
            idle_ticks: 0,
        }
    }

    /// Decode and apply one COMMAND frame
    ///
    /// A frame that fails to decode changes nothing.
    pub fn on_command(&mut self, frame: &[u8]) -> Result<(), CommandError> {
        let command = Command::parse(frame)?;
        trace!("command {=u8:#x}", command.opcode());
        self.apply(command);
        Ok(())
    }

    fn apply(&mut self, command: Command<'_>) {
        match command {
            Command::PinConfig(configs) => self.pins.apply_snapshot(&configs),
            Command::DisplayText { text, delay_ms } => {
                let delay_ms = self.config.text_delay(delay_ms);
                self.display.scroll_text(text, delay_ms);
            }
            Command::DisplayLed {
                pattern,
                brightness,
            } => self.display.show_layer(&pattern, brightness),
            Command::Message { label, content } => {
                if let Err(err) = self.registry.receive(label, content) {
                    warn!("message dropped: {}", err);
                }
            }
            Command::Protocol(ProtocolCommand::Set(id)) => {
                if self.config.supports_protocol(id) {
                    self.protocol = id;
                    info!("protocol {} selected", id);
                } else {
                    warn!("protocol {} not supported", id);
                }
            }
            Command::Protocol(ProtocolCommand::Query) => {
                self.encoder.invalidate(ChannelId::State);
            }
            Command::Pin { pin, command } => self.pins.apply(pin, command),
            Command::SharedData { slot, value } => self.set_shared_data(slot, value),
            Command::LightSensing { duration_ms } => {
                self.sensors.set_light_sensing_duration(duration_ms);
            }
        }
    }

    /// Run one notify cycle
    ///
    /// While disconnected nothing is sampled; the friendly name scrolls on
    /// an idle display instead.
    pub fn on_tick(&mut self) -> Changes {
        if !self.connected {
            self.scroll_name();
            return Changes::empty();
        }
        self.snapshot = SensorSnapshot::sample(&mut self.sensors, &mut self.pins);
        self.encoder.encode(
            &self.snapshot,
            self.protocol,
            self.latches,
            &mut self.registry,
            SharedDataReport { slots: self.shared },
        )
    }

    fn scroll_name(&mut self) {
        let interval = self.config.name_scroll_interval_ticks;
        if interval == 0 {
            return;
        }
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        if self.idle_ticks >= interval && !self.display.is_busy() {
            self.idle_ticks = 0;
            let delay_ms = self.config.default_text_delay_ms;
            self.display
                .scroll_text(self.config.friendly_name.as_str(), delay_ms);
        }
    }

    /// Value served when the controller reads `channel`
    ///
    /// ANALOG_IN channels sample their pin now.
    pub fn on_read(&mut self, channel: ChannelId) -> Option<ChannelValue> {
        match channel.analog_pin() {
            Some(pin) => {
                let level = self.pins.sample_analog(pin);
                let value: [u8; ANALOG_IN_SIZE] = encode_analog_in(level);
                ChannelValue::from_slice(&value).ok()
            }
            None => self.encoder.value(channel),
        }
    }

    /// Last pushed value of a cached channel
    pub fn channel_value(&self, channel: ChannelId) -> Option<ChannelValue> {
        self.encoder.value(channel)
    }

    pub fn on_connect(&mut self) {
        info!("controller connected");
        self.connected = true;
        self.protocol = self.config.protocol_id;
        self.encoder.reset();
    }

    pub fn on_disconnect(&mut self) {
        info!("controller disconnected");
        self.connected = false;
        self.idle_ticks = 0;
        self.encoder.reset();
        self.registry.clear_pending();
        self.latches.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Protocol id carried in STATE
    pub fn protocol(&self) -> u8 {
        self.protocol
    }

    /// Slots outside 0-3 are ignored
    pub fn set_shared_data(&mut self, slot: u8, value: i16) {
        if let Some(entry) = self.shared.get_mut(usize::from(slot)) {
            *entry = value;
        }
    }

    pub fn shared_data(&self, slot: u8) -> Option<i16> {
        self.shared.get(usize::from(slot)).copied()
    }

    /// Register a label before the controller sends it
    pub fn register_waiting_message(
        &mut self,
        label: &str,
        message_type: MessageType,
    ) -> Result<MessageId, RegistryError> {
        self.registry.register(label, message_type)
    }

    /// Returns true once per delivery of `id` from the controller
    pub fn take_received(&mut self, id: MessageId) -> bool {
        self.registry.take_received(id)
    }

    pub fn send_number(&mut self, label: &str, value: f32) -> Result<MessageId, RegistryError> {
        self.registry.send_number(label, value)
    }

    pub fn send_text(&mut self, label: &str, text: &str) -> Result<MessageId, RegistryError> {
        self.registry.send_text(label, text)
    }

    pub fn registry(&self) -> &MessageRegistry<N> {
        &self.registry
    }

    pub fn pins(&self) -> &PinTable<P> {
        &self.pins
    }

    pub fn pins_mut(&mut self) -> &mut PinTable<P> {
        &mut self.pins
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Snapshot taken by the last connected cycle
    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }
}
