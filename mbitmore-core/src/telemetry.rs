//! Outbound buffer assembly with change detection
//!
//! Each cycle encodes every outbound channel from the current snapshot,
//! latches and registry, and reports which buffers differ byte-for-byte
//! from the last ones pushed. Latches and the pending message are drained
//! as they are read. A drained message is always reported, even when it
//! repeats the previous MESSAGE value.

use heapless::Vec;
use mbitmore_protocol::channels::{MOTION_SIZE, NOTIFY_SIZE, STATE_SIZE};
use mbitmore_protocol::{ChannelId, MessageReport, SharedDataReport};

use crate::messages::MessageRegistry;
use crate::sensors::{EventLatches, SensorSnapshot};

/// Owned copy of a channel value
pub type ChannelValue = Vec<u8, NOTIFY_SIZE>;

/// Set of channels whose value changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Changes(u16);

impl Changes {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, channel: ChannelId) {
        self.0 |= bit(channel);
    }

    pub fn contains(&self, channel: ChannelId) -> bool {
        self.0 & bit(channel) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Changed channels in attribute table order
    pub fn iter(self) -> impl Iterator<Item = ChannelId> {
        ChannelId::ALL
            .into_iter()
            .filter(move |channel| self.contains(*channel))
    }
}

fn bit(channel: ChannelId) -> u16 {
    1 << (channel as u16)
}

/// Last value pushed on one channel
#[derive(Debug, Clone)]
pub struct ChannelCache<const N: usize> {
    last: Option<[u8; N]>,
}

impl<const N: usize> ChannelCache<N> {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Store `value`, returning true if it differs from the previous one
    pub fn update(&mut self, value: [u8; N]) -> bool {
        if self.last == Some(value) {
            return false;
        }
        self.last = Some(value);
        true
    }

    /// Store `value` without comparing it to the previous one
    pub fn store(&mut self, value: [u8; N]) {
        self.last = Some(value);
    }

    pub fn value(&self) -> Option<&[u8; N]> {
        self.last.as_ref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

impl<const N: usize> Default for ChannelCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the outbound buffers once per notify cycle
#[derive(Debug, Clone, Default)]
pub struct TelemetryEncoder {
    state: ChannelCache<STATE_SIZE>,
    motion: ChannelCache<MOTION_SIZE>,
    pin_event: ChannelCache<NOTIFY_SIZE>,
    action_event: ChannelCache<NOTIFY_SIZE>,
    message: ChannelCache<NOTIFY_SIZE>,
    /// Shared data last announced on MESSAGE
    shared_data: Option<SharedDataReport>,
}

impl TelemetryEncoder {
    pub const fn new() -> Self {
        Self {
            state: ChannelCache::new(),
            motion: ChannelCache::new(),
            pin_event: ChannelCache::new(),
            action_event: ChannelCache::new(),
            message: ChannelCache::new(),
            shared_data: None,
        }
    }

    /// Encode every channel and return the ones that changed
    ///
    /// At most one action event and one MESSAGE value go out per cycle. A
    /// pending message takes the MESSAGE channel before a shared data
    /// update, which then waits for a later cycle.
    pub fn encode<const N: usize>(
        &mut self,
        snapshot: &SensorSnapshot,
        protocol: u8,
        latches: &EventLatches,
        registry: &mut MessageRegistry<N>,
        shared: SharedDataReport,
    ) -> Changes {
        let mut changes = Changes::empty();

        if self.state.update(snapshot.state_report(protocol).encode()) {
            changes.insert(ChannelId::State);
        }
        if self.motion.update(snapshot.motion_report().encode()) {
            changes.insert(ChannelId::Direction);
        }

        if let Some(report) = latches.take_pin_event() {
            if self.pin_event.update(report.encode()) {
                changes.insert(ChannelId::PinEvent);
            }
        }
        if let Some(report) = latches.take_action_event() {
            if self.action_event.update(report.encode()) {
                changes.insert(ChannelId::ActionEvent);
            }
        }

        if let Some(id) = registry.take_pending() {
            if let Some(content) = registry.content(id) {
                self.message.store(MessageReport { id: id.0, content }.encode());
                changes.insert(ChannelId::Message);
            }
        } else if self.shared_data != Some(shared) {
            self.shared_data = Some(shared);
            if self.message.update(shared.encode()) {
                changes.insert(ChannelId::Message);
            }
        }

        changes
    }

    /// Last encoded value of `channel`
    ///
    /// ANALOG_IN and COMMAND are never cached.
    pub fn value(&self, channel: ChannelId) -> Option<ChannelValue> {
        let bytes: &[u8] = match channel {
            ChannelId::State => self.state.value()?,
            ChannelId::Direction => self.motion.value()?,
            ChannelId::PinEvent => self.pin_event.value()?,
            ChannelId::ActionEvent => self.action_event.value()?,
            ChannelId::Message => self.message.value()?,
            _ => return None,
        };
        Vec::from_slice(bytes).ok()
    }

    /// Forget the last value of `channel` so the next cycle pushes it
    pub fn invalidate(&mut self, channel: ChannelId) {
        match channel {
            ChannelId::State => self.state.clear(),
            ChannelId::Direction => self.motion.clear(),
            ChannelId::PinEvent => self.pin_event.clear(),
            ChannelId::ActionEvent => self.action_event.clear(),
            ChannelId::Message => {
                self.message.clear();
                self.shared_data = None;
            }
            _ => {}
        }
    }

    /// Forget every pushed value
    pub fn reset(&mut self) {
        for channel in ChannelId::ALL {
            self.invalidate(channel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbitmore_protocol::telemetry::{FORMAT_MIX_03, FORMAT_SHARED_DATA};
    use mbitmore_protocol::{ButtonEvent, ButtonId, Gesture, PinEventKind};

    struct Fixture {
        encoder: TelemetryEncoder,
        latches: EventLatches,
        registry: MessageRegistry,
        snapshot: SensorSnapshot,
        shared: SharedDataReport,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                encoder: TelemetryEncoder::new(),
                latches: EventLatches::new(),
                registry: MessageRegistry::new(),
                snapshot: SensorSnapshot::default(),
                shared: SharedDataReport::default(),
            }
        }

        fn cycle(&mut self) -> Changes {
            self.encoder.encode(
                &self.snapshot,
                1,
                &self.latches,
                &mut self.registry,
                self.shared,
            )
        }
    }

    #[test]
    fn test_changes_set() {
        let mut changes = Changes::empty();
        assert!(changes.is_empty());
        changes.insert(ChannelId::Message);
        changes.insert(ChannelId::State);
        assert!(changes.contains(ChannelId::State));
        assert!(!changes.contains(ChannelId::PinEvent));
        let order: std::vec::Vec<_> = changes.iter().collect();
        assert_eq!(order, vec![ChannelId::State, ChannelId::Message]);
    }

    #[test]
    fn test_cache_detects_byte_changes() {
        let mut cache = ChannelCache::<2>::new();
        assert!(cache.update([1, 2]));
        assert!(!cache.update([1, 2]));
        assert!(cache.update([1, 3]));
        assert_eq!(cache.value(), Some(&[1, 3]));
    }

    #[test]
    fn test_identical_samples_do_not_renotify() {
        let mut fx = Fixture::new();
        let first = fx.cycle();
        assert!(first.contains(ChannelId::State));
        assert!(first.contains(ChannelId::Direction));
        assert!(first.contains(ChannelId::Message));

        assert!(fx.cycle().is_empty());

        fx.snapshot.light_level = 12;
        let changes = fx.cycle();
        assert!(changes.contains(ChannelId::State));
        assert!(!changes.contains(ChannelId::Direction));
    }

    #[test]
    fn test_gesture_reported_exactly_once() {
        let mut fx = Fixture::new();
        fx.cycle();
        fx.latches.gesture(Gesture::Shake, 500);
        assert!(fx.cycle().contains(ChannelId::ActionEvent));
        assert!(!fx.cycle().contains(ChannelId::ActionEvent));
        let value = fx.encoder.value(ChannelId::ActionEvent).unwrap();
        assert_eq!(value[1], Gesture::Shake.to_byte());
    }

    #[test]
    fn test_one_action_event_per_cycle() {
        let mut fx = Fixture::new();
        fx.latches.button_event(ButtonId::A, ButtonEvent::Down, 1);
        fx.latches.gesture(Gesture::TiltLeft, 2);
        assert!(fx.cycle().contains(ChannelId::ActionEvent));
        assert_eq!(fx.encoder.value(ChannelId::ActionEvent).unwrap()[1], 1);
        assert!(fx.cycle().contains(ChannelId::ActionEvent));
        assert_eq!(
            fx.encoder.value(ChannelId::ActionEvent).unwrap()[1],
            Gesture::TiltLeft.to_byte()
        );
        assert!(!fx.cycle().contains(ChannelId::ActionEvent));
    }

    #[test]
    fn test_pin_event_without_new_event_is_unchanged() {
        let mut fx = Fixture::new();
        fx.latches
            .pin_event(3, PinEventKind::Touch(ButtonEvent::Click), 77);
        assert!(fx.cycle().contains(ChannelId::PinEvent));
        let before = fx.encoder.value(ChannelId::PinEvent);
        assert!(!fx.cycle().contains(ChannelId::PinEvent));
        assert_eq!(fx.encoder.value(ChannelId::PinEvent), before);
    }

    #[test]
    fn test_pending_message_before_shared_data() {
        let mut fx = Fixture::new();
        fx.cycle();
        fx.shared.slots[0] = 9;
        fx.registry.send_number("temp", 21.5).unwrap();

        assert!(fx.cycle().contains(ChannelId::Message));
        assert_eq!(fx.encoder.value(ChannelId::Message).unwrap()[0], FORMAT_MIX_03);

        assert!(fx.cycle().contains(ChannelId::Message));
        let value = fx.encoder.value(ChannelId::Message).unwrap();
        assert_eq!(value[0], FORMAT_SHARED_DATA);
        assert_eq!(i16::from_le_bytes([value[1], value[2]]), 9);
    }

    #[test]
    fn test_repeated_message_is_pushed_each_time() {
        let mut fx = Fixture::new();
        fx.cycle();
        fx.registry.send_number("ping", 1.0).unwrap();
        assert!(fx.cycle().contains(ChannelId::Message));
        let first = fx.encoder.value(ChannelId::Message);
        assert!(!fx.cycle().contains(ChannelId::Message));

        fx.registry.send_number("ping", 1.0).unwrap();
        assert!(fx.cycle().contains(ChannelId::Message));
        assert_eq!(fx.encoder.value(ChannelId::Message), first);
        assert_eq!(fx.registry.pending(), None);
    }

    #[test]
    fn test_cache_store_skips_comparison() {
        let mut cache = ChannelCache::<1>::new();
        cache.store([4]);
        assert!(!cache.update([4]));
        assert_eq!(cache.value(), Some(&[4]));
    }

    #[test]
    fn test_invalidate_pushes_again() {
        let mut fx = Fixture::new();
        fx.cycle();
        fx.encoder.invalidate(ChannelId::State);
        let changes = fx.cycle();
        assert!(changes.contains(ChannelId::State));
        assert!(!changes.contains(ChannelId::Direction));
    }

    #[test]
    fn test_uncached_channels() {
        let mut fx = Fixture::new();
        fx.cycle();
        assert_eq!(fx.encoder.value(ChannelId::AnalogInP0), None);
        assert_eq!(fx.encoder.value(ChannelId::Command), None);
        assert_eq!(fx.encoder.value(ChannelId::PinEvent), None);
    }
}
