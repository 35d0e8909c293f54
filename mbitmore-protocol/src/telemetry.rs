//! Outbound buffer layouts
//!
//! Each report encodes to a fixed-size array matching its channel size.
//! Multi-byte fields are little-endian and unused trailing bytes are zero.
//!
//! ```text
//! STATE      [MIX_01][mask u32][light][flags][protocol][analog u16 × 6]
//! DIRECTION  [MIX_02][pitch i16][roll i16][accel i16 × 3][heading u16][mag i16 × 3]
//! PIN_EVENT  [BUTTON_EVENT][pin][event][timestamp u32]
//!            [EVENT][pin][event][value u32][timestamp u32]
//! ACTION     [BUTTON_EVENT][button][event][timestamp u32]
//!            [EVENT][gesture][timestamp u32]
//! MESSAGE    [MIX_03][id][type][f32] | [MIX_03][id][type][len][text...]
//!            [SHARED_DATA][slot i16 × 4]
//! ```

use crate::channels::{ANALOG_IN_SIZE, MOTION_SIZE, NOTIFY_SIZE, STATE_SIZE};
use crate::commands::{MessageContent, MAX_TEXT_LEN};
use crate::events::{ButtonEvent, ButtonId, Gesture, PinEventKind};

// Format tags
pub const FORMAT_MIX_01: u8 = 0x01;
pub const FORMAT_MIX_02: u8 = 0x02;
pub const FORMAT_MIX_03: u8 = 0x03;
pub const FORMAT_BUTTON_EVENT: u8 = 0x11;
pub const FORMAT_EVENT: u8 = 0x12;
pub const FORMAT_SHARED_DATA: u8 = 0x13;

/// Number of shared data slots
pub const SHARED_DATA_SLOTS: usize = 4;

// STATE flag bits
pub const STATE_FLAG_BUTTON_A: u8 = 0x01;
pub const STATE_FLAG_BUTTON_B: u8 = 0x02;
pub const STATE_FLAG_LOGO: u8 = 0x04;

/// Pin levels, light level and analog samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateReport {
    /// Bit *n* is the level of input pin *n*
    pub digital_mask: u32,
    pub light_level: u8,
    /// `STATE_FLAG_*` bits for buttons currently held
    pub flags: u8,
    pub protocol: u8,
    /// Readings for [`crate::pins::ANALOG_PINS`]
    pub analog: [u16; 6],
}

impl StateReport {
    pub fn encode(&self) -> [u8; STATE_SIZE] {
        let mut buf = [0u8; STATE_SIZE];
        buf[0] = FORMAT_MIX_01;
        buf[1..5].copy_from_slice(&self.digital_mask.to_le_bytes());
        buf[5] = self.light_level;
        buf[6] = self.flags;
        buf[7] = self.protocol;
        for (i, value) in self.analog.iter().enumerate() {
            let at = 8 + i * 2;
            buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
        }
        buf
    }
}

/// Orientation and field strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionReport {
    /// Pitch in milliradians
    pub pitch: i16,
    /// Roll in milliradians
    pub roll: i16,
    /// Acceleration in milli-g
    pub acceleration: [i16; 3],
    /// Compass heading, 0-359 degrees
    pub heading: u16,
    /// Magnetic field in microtesla
    pub magnetic: [i16; 3],
}

impl MotionReport {
    pub fn encode(&self) -> [u8; MOTION_SIZE] {
        let mut buf = [0u8; MOTION_SIZE];
        buf[0] = FORMAT_MIX_02;
        buf[1..3].copy_from_slice(&self.pitch.to_le_bytes());
        buf[3..5].copy_from_slice(&self.roll.to_le_bytes());
        for (i, value) in self.acceleration.iter().enumerate() {
            let at = 5 + i * 2;
            buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
        }
        buf[11..13].copy_from_slice(&self.heading.to_le_bytes());
        for (i, value) in self.magnetic.iter().enumerate() {
            let at = 13 + i * 2;
            buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
        }
        buf
    }
}

/// An event fired on a listening pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinEventReport {
    pub pin: u8,
    pub kind: PinEventKind,
    pub timestamp_ms: u32,
}

impl PinEventReport {
    pub fn encode(&self) -> [u8; NOTIFY_SIZE] {
        let mut buf = [0u8; NOTIFY_SIZE];
        buf[1] = self.pin;
        buf[2] = self.kind.code();
        match self.kind {
            PinEventKind::Touch(_) => {
                buf[0] = FORMAT_BUTTON_EVENT;
                buf[3..7].copy_from_slice(&self.timestamp_ms.to_le_bytes());
            }
            _ => {
                buf[0] = FORMAT_EVENT;
                buf[3..7].copy_from_slice(&self.kind.value().to_le_bytes());
                buf[7..11].copy_from_slice(&self.timestamp_ms.to_le_bytes());
            }
        }
        buf
    }
}

/// A button event or gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionEventReport {
    Button {
        button: ButtonId,
        event: ButtonEvent,
        timestamp_ms: u32,
    },
    Gesture {
        gesture: Gesture,
        timestamp_ms: u32,
    },
}

impl ActionEventReport {
    pub fn encode(&self) -> [u8; NOTIFY_SIZE] {
        let mut buf = [0u8; NOTIFY_SIZE];
        match *self {
            ActionEventReport::Button {
                button,
                event,
                timestamp_ms,
            } => {
                buf[0] = FORMAT_BUTTON_EVENT;
                buf[1] = button.to_byte();
                buf[2] = event.to_byte();
                buf[3..7].copy_from_slice(&timestamp_ms.to_le_bytes());
            }
            ActionEventReport::Gesture {
                gesture,
                timestamp_ms,
            } => {
                buf[0] = FORMAT_EVENT;
                buf[1] = gesture.to_byte();
                buf[2..6].copy_from_slice(&timestamp_ms.to_le_bytes());
            }
        }
        buf
    }
}

/// A labelled message going to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageReport<'a> {
    pub id: u8,
    pub content: MessageContent<'a>,
}

impl MessageReport<'_> {
    /// Text longer than [`MAX_TEXT_LEN`] bytes is cut
    pub fn encode(&self) -> [u8; NOTIFY_SIZE] {
        let mut buf = [0u8; NOTIFY_SIZE];
        buf[0] = FORMAT_MIX_03;
        buf[1] = self.id;
        buf[2] = self.content.message_type().to_byte();
        match self.content {
            MessageContent::Number(value) => {
                buf[3..7].copy_from_slice(&value.to_le_bytes());
            }
            MessageContent::Text(text) => {
                let bytes = text.as_bytes();
                let len = bytes.len().min(MAX_TEXT_LEN);
                buf[3] = len as u8;
                buf[4..4 + len].copy_from_slice(&bytes[..len]);
            }
        }
        buf
    }
}

/// The four shared data slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SharedDataReport {
    pub slots: [i16; SHARED_DATA_SLOTS],
}

impl SharedDataReport {
    pub fn encode(&self) -> [u8; NOTIFY_SIZE] {
        let mut buf = [0u8; NOTIFY_SIZE];
        buf[0] = FORMAT_SHARED_DATA;
        for (i, value) in self.slots.iter().enumerate() {
            let at = 1 + i * 2;
            buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
        }
        buf
    }
}

/// ANALOG_IN value for a single reading
pub fn encode_analog_in(value: u16) -> [u8; ANALOG_IN_SIZE] {
    value.to_le_bytes()
}
