//! Button, gesture and pin event codes carried in notification buffers

/// Button event values as reported to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Contact closed
    Down,
    /// Contact released
    Up,
    /// Short press and release
    Click,
    /// Press held past the long-click threshold, then released
    LongClick,
    /// Press still held past the hold threshold
    Hold,
    /// Two clicks in quick succession
    DoubleClick,
}

// Wire format values
const BUTTON_DOWN: u8 = 1;
const BUTTON_UP: u8 = 2;
const BUTTON_CLICK: u8 = 3;
const BUTTON_LONG_CLICK: u8 = 4;
const BUTTON_HOLD: u8 = 5;
const BUTTON_DOUBLE_CLICK: u8 = 6;

impl ButtonEvent {
    /// Parse an event from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            BUTTON_DOWN => Some(ButtonEvent::Down),
            BUTTON_UP => Some(ButtonEvent::Up),
            BUTTON_CLICK => Some(ButtonEvent::Click),
            BUTTON_LONG_CLICK => Some(ButtonEvent::LongClick),
            BUTTON_HOLD => Some(ButtonEvent::Hold),
            BUTTON_DOUBLE_CLICK => Some(ButtonEvent::DoubleClick),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ButtonEvent::Down => BUTTON_DOWN,
            ButtonEvent::Up => BUTTON_UP,
            ButtonEvent::Click => BUTTON_CLICK,
            ButtonEvent::LongClick => BUTTON_LONG_CLICK,
            ButtonEvent::Hold => BUTTON_HOLD,
            ButtonEvent::DoubleClick => BUTTON_DOUBLE_CLICK,
        }
    }

    /// Returns true if the contact is closed after this event
    pub fn is_pressed(&self) -> bool {
        matches!(self, ButtonEvent::Down | ButtonEvent::Hold)
    }
}

/// Onboard buttons that raise action events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    A,
    B,
    /// Capacitive logo on the front face
    Logo,
}

impl ButtonId {
    /// All buttons, in the order their latches are drained
    pub const ALL: [ButtonId; 3] = [ButtonId::A, ButtonId::B, ButtonId::Logo];

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ButtonId::A => 1,
            ButtonId::B => 2,
            ButtonId::Logo => 3,
        }
    }

    /// Slot index used by per-button tables
    pub fn index(self) -> usize {
        match self {
            ButtonId::A => 0,
            ButtonId::B => 1,
            ButtonId::Logo => 2,
        }
    }
}

/// Accelerometer gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    TiltUp,
    TiltDown,
    TiltLeft,
    TiltRight,
    FaceUp,
    FaceDown,
    Freefall,
    ThreeG,
    SixG,
    EightG,
    Shake,
    TwoG,
}

impl Gesture {
    /// Parse a gesture from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        let gesture = match byte {
            1 => Gesture::TiltUp,
            2 => Gesture::TiltDown,
            3 => Gesture::TiltLeft,
            4 => Gesture::TiltRight,
            5 => Gesture::FaceUp,
            6 => Gesture::FaceDown,
            7 => Gesture::Freefall,
            8 => Gesture::ThreeG,
            9 => Gesture::SixG,
            10 => Gesture::EightG,
            11 => Gesture::Shake,
            12 => Gesture::TwoG,
            _ => return None,
        };
        Some(gesture)
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Gesture::TiltUp => 1,
            Gesture::TiltDown => 2,
            Gesture::TiltLeft => 3,
            Gesture::TiltRight => 4,
            Gesture::FaceUp => 5,
            Gesture::FaceDown => 6,
            Gesture::Freefall => 7,
            Gesture::ThreeG => 8,
            Gesture::SixG => 9,
            Gesture::EightG => 10,
            Gesture::Shake => 11,
            Gesture::TwoG => 12,
        }
    }
}

/// What happened on a pin with an active event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinEventKind {
    /// Level went high
    Rise,
    /// Level went low
    Fall,
    /// High pulse ended; carries its width in microseconds
    PulseHigh(u32),
    /// Low pulse ended; carries its width in microseconds
    PulseLow(u32),
    /// Touch input produced a button-style event
    Touch(ButtonEvent),
}

// Edge and pulse codes
const PIN_EVT_RISE: u8 = 2;
const PIN_EVT_FALL: u8 = 3;
const PIN_EVT_PULSE_HI: u8 = 4;
const PIN_EVT_PULSE_LO: u8 = 5;

impl PinEventKind {
    /// Event field byte for the PIN_EVENT buffer
    pub fn code(&self) -> u8 {
        match self {
            PinEventKind::Rise => PIN_EVT_RISE,
            PinEventKind::Fall => PIN_EVT_FALL,
            PinEventKind::PulseHigh(_) => PIN_EVT_PULSE_HI,
            PinEventKind::PulseLow(_) => PIN_EVT_PULSE_LO,
            PinEventKind::Touch(event) => event.to_byte(),
        }
    }

    /// Pulse width, or 0 for events without a value
    pub fn value(&self) -> u32 {
        match self {
            PinEventKind::PulseHigh(us) | PinEventKind::PulseLow(us) => *us,
            _ => 0,
        }
    }
}
