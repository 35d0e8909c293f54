//! Pin configuration values shared by command frames and the pin table

/// Number of addressable edge-connector pins
pub const PIN_COUNT: usize = 21;

/// Pins with an ADC channel, in STATE buffer order
pub const ANALOG_PINS: [u8; 6] = [0, 1, 2, 3, 4, 10];

/// Pins with a dedicated ANALOG_IN channel
pub const ANALOG_IN_PINS: [u8; 3] = [0, 1, 2];

/// Full-scale reading of the 10-bit ADC and PWM duty
pub const ANALOG_MAX: u16 = 1023;

/// Largest servo angle in degrees
pub const SERVO_MAX_ANGLE: u16 = 180;

/// Electrical mode of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Digital or analog input, sampled every cycle
    #[default]
    Input,
    /// Digital output
    Output,
    /// PWM output
    AnalogOut,
    /// Servo pulse output
    Servo,
    /// Capacitive touch input
    Touch,
}

impl PinMode {
    /// Parse from the low nibble of a PIN_CONFIG byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(PinMode::Input),
            1 => Some(PinMode::Output),
            2 => Some(PinMode::AnalogOut),
            3 => Some(PinMode::Servo),
            4 => Some(PinMode::Touch),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            PinMode::Input => 0,
            PinMode::Output => 1,
            PinMode::AnalogOut => 2,
            PinMode::Servo => 3,
            PinMode::Touch => 4,
        }
    }

    /// Returns true if the pin drives its output
    pub fn is_output(&self) -> bool {
        matches!(self, PinMode::Output | PinMode::AnalogOut | PinMode::Servo)
    }
}

/// Input pull resistor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PullMode {
    #[default]
    None,
    Up,
    Down,
}

impl PullMode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(PullMode::None),
            1 => Some(PullMode::Up),
            2 => Some(PullMode::Down),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            PullMode::None => 0,
            PullMode::Up => 1,
            PullMode::Down => 2,
        }
    }
}

/// Kind of event a pin listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinEventType {
    #[default]
    None,
    OnEdge,
    OnPulse,
    OnTouch,
}

impl PinEventType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(PinEventType::None),
            1 => Some(PinEventType::OnEdge),
            2 => Some(PinEventType::OnPulse),
            3 => Some(PinEventType::OnTouch),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            PinEventType::None => 0,
            PinEventType::OnEdge => 1,
            PinEventType::OnPulse => 2,
            PinEventType::OnTouch => 3,
        }
    }
}

/// One entry of a PIN_CONFIG snapshot
///
/// Byte layout: bits 0-3 mode, bits 4-5 pull, bits 6-7 must be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub mode: PinMode,
    pub pull: PullMode,
}

impl PinConfig {
    pub const fn new(mode: PinMode, pull: PullMode) -> Self {
        Self { mode, pull }
    }

    /// Parse a configuration byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        if byte & 0xC0 != 0 {
            return None;
        }
        let mode = PinMode::from_byte(byte & 0x0F)?;
        let pull = PullMode::from_byte((byte >> 4) & 0x03)?;
        Some(Self { mode, pull })
    }

    pub fn to_byte(self) -> u8 {
        self.mode.to_byte() | (self.pull.to_byte() << 4)
    }
}

/// Check a wire pin index against the pin table
pub fn pin_index(byte: u8) -> Option<usize> {
    let index = byte as usize;
    (index < PIN_COUNT).then_some(index)
}
