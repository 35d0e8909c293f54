//! Attribute channels exposed by the service
//!
//! Every channel is identified by a 16-bit short id that is spliced into
//! bytes 2-3 of [`BASE_UUID`] to form its 128-bit UUID.

/// Base UUID of the service: `0b50f3e4-607f-4151-9091-7d008d6ffc5c`
pub const BASE_UUID: [u8; 16] = [
    0x0b, 0x50, 0xf3, 0xe4, 0x60, 0x7f, 0x41, 0x51, 0x90, 0x91, 0x7d, 0x00, 0x8d, 0x6f, 0xfc, 0x5c,
];

/// Short id of the service itself
pub const SERVICE_SHORT_ID: u16 = 0xf3e4;

/// STATE buffer size
pub const STATE_SIZE: usize = 20;

/// DIRECTION (motion) buffer size
pub const MOTION_SIZE: usize = 19;

/// Size of every notify buffer (PIN_EVENT, ACTION_EVENT, MESSAGE)
pub const NOTIFY_SIZE: usize = 20;

/// ANALOG_IN buffer size
pub const ANALOG_IN_SIZE: usize = 2;

/// Channels of the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelId {
    Command,
    State,
    Direction,
    PinEvent,
    ActionEvent,
    AnalogInP0,
    AnalogInP1,
    AnalogInP2,
    Message,
}

impl ChannelId {
    /// All channels in attribute table order
    pub const ALL: [ChannelId; 9] = [
        ChannelId::Command,
        ChannelId::State,
        ChannelId::Direction,
        ChannelId::PinEvent,
        ChannelId::ActionEvent,
        ChannelId::AnalogInP0,
        ChannelId::AnalogInP1,
        ChannelId::AnalogInP2,
        ChannelId::Message,
    ];

    /// 16-bit characteristic id
    pub fn short_id(self) -> u16 {
        match self {
            ChannelId::Command => 0x0100,
            ChannelId::State => 0x0101,
            ChannelId::Direction => 0x0102,
            ChannelId::PinEvent => 0x0110,
            ChannelId::ActionEvent => 0x0111,
            ChannelId::AnalogInP0 => 0x0120,
            ChannelId::AnalogInP1 => 0x0121,
            ChannelId::AnalogInP2 => 0x0122,
            ChannelId::Message => 0x0130,
        }
    }

    /// Full 128-bit UUID in big-endian byte order
    pub fn uuid(self) -> [u8; 16] {
        let mut uuid = BASE_UUID;
        let [hi, lo] = self.short_id().to_be_bytes();
        uuid[2] = hi;
        uuid[3] = lo;
        uuid
    }

    /// Maximum value size in bytes
    pub fn max_len(self) -> usize {
        match self {
            ChannelId::Command => crate::commands::MAX_COMMAND_SIZE,
            ChannelId::State => STATE_SIZE,
            ChannelId::Direction => MOTION_SIZE,
            ChannelId::PinEvent | ChannelId::ActionEvent | ChannelId::Message => NOTIFY_SIZE,
            ChannelId::AnalogInP0 | ChannelId::AnalogInP1 | ChannelId::AnalogInP2 => {
                ANALOG_IN_SIZE
            }
        }
    }

    /// Returns true if the controller writes to this channel
    pub fn is_writable(self) -> bool {
        matches!(self, ChannelId::Command)
    }

    /// Returns true if value changes are pushed as notifications
    pub fn is_notify(self) -> bool {
        matches!(
            self,
            ChannelId::PinEvent | ChannelId::ActionEvent | ChannelId::Message
        )
    }

    /// Pin sampled when an ANALOG_IN channel is read
    pub fn analog_pin(self) -> Option<u8> {
        match self {
            ChannelId::AnalogInP0 => Some(0),
            ChannelId::AnalogInP1 => Some(1),
            ChannelId::AnalogInP2 => Some(2),
            _ => None,
        }
    }

    /// Look up a channel by its short id
    pub fn from_short_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.short_id() == id)
    }
}
