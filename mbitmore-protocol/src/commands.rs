//! Command frames written by the controller
//!
//! A frame is `[opcode][payload...]`. Decoding is all-or-nothing: a frame
//! either yields a complete [`Command`] or an error, never a partial result.
//! Index fields (pin, slot) are passed through unchecked so the owning table
//! can ignore out-of-range values on its own.

use crate::pins::{PinConfig, PinEventType, PullMode, PIN_COUNT};

// Opcodes
pub const CMD_PIN_CONFIG: u8 = 0x80;
pub const CMD_DISPLAY_TEXT: u8 = 0x81;
pub const CMD_DISPLAY_LED: u8 = 0x82;
pub const CMD_MESSAGE: u8 = 0x83;
pub const CMD_PROTOCOL: u8 = 0x90;
pub const CMD_PIN: u8 = 0x91;
pub const CMD_SHARED_DATA: u8 = 0x92;
pub const CMD_LIGHT_SENSING: u8 = 0x93;

// PIN subcommands
pub const PIN_SET_OUTPUT: u8 = 0x01;
pub const PIN_SET_PWM: u8 = 0x02;
pub const PIN_SET_SERVO: u8 = 0x03;
pub const PIN_SET_PULL: u8 = 0x04;
pub const PIN_SET_EVENT: u8 = 0x05;
pub const PIN_SET_TOUCH: u8 = 0x06;

// PROTOCOL subcommands
pub const PROTOCOL_SET: u8 = 0x01;
pub const PROTOCOL_QUERY: u8 = 0x02;

/// Largest frame accepted on the COMMAND channel
pub const MAX_COMMAND_SIZE: usize = 32;

/// Longest message label in bytes
pub const MAX_LABEL_LEN: usize = 8;

/// Longest text message content in bytes
pub const MAX_TEXT_LEN: usize = 16;

/// Rows in the LED matrix
pub const LED_ROWS: usize = 5;

/// Columns in the LED matrix
pub const LED_COLS: usize = 5;

/// Reasons a frame is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Zero-length write
    Empty,
    /// Frame exceeds [`MAX_COMMAND_SIZE`]
    TooLong,
    /// Leading byte is not a known opcode
    UnknownOpcode(u8),
    /// PIN or PROTOCOL subcommand is not known
    UnknownSubcommand(u8),
    /// Payload shorter than the opcode requires
    Truncated { opcode: u8, needed: usize, got: usize },
    /// A field holds a value outside its encoding
    InvalidValue,
    /// Text is not NUL-terminated or not valid UTF-8
    InvalidText,
}

/// Content type of a labelled message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageType {
    Number,
    Text,
}

impl MessageType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(MessageType::Number),
            2 => Some(MessageType::Text),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            MessageType::Number => 1,
            MessageType::Text => 2,
        }
    }
}

/// Content of a labelled message
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageContent<'a> {
    Number(f32),
    Text(&'a str),
}

impl MessageContent<'_> {
    pub fn message_type(&self) -> MessageType {
        match self {
            MessageContent::Number(_) => MessageType::Number,
            MessageContent::Text(_) => MessageType::Text,
        }
    }
}

/// One 5×5 layer for the LED matrix
///
/// Each row byte holds five columns, bit 4 being the leftmost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedPattern {
    pub rows: [u8; LED_ROWS],
}

impl LedPattern {
    pub fn new(rows: [u8; LED_ROWS]) -> Self {
        let mut masked = rows;
        for row in masked.iter_mut() {
            *row &= 0x1F;
        }
        Self { rows: masked }
    }

    /// Check whether the LED at (`row`, `col`) is in this layer
    pub fn is_lit(&self, row: usize, col: usize) -> bool {
        if row >= LED_ROWS || col >= LED_COLS {
            return false;
        }
        self.rows[row] & (0x10 >> col) != 0
    }
}

/// Actions addressed to a single pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinCommand {
    SetOutput(bool),
    SetPwm(u16),
    SetServo { angle: u16, range: u16, center: u16 },
    SetPull(PullMode),
    SetEvent(PinEventType),
    SetTouch,
}

/// Protocol negotiation actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolCommand {
    /// Controller asks to speak the given protocol id
    Set(u8),
    /// Controller asks for the active protocol id
    Query,
}

/// A decoded command frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Full configuration snapshot, one entry per pin
    PinConfig([PinConfig; PIN_COUNT]),
    /// Scroll text across the LED matrix
    DisplayText { text: &'a str, delay_ms: Option<u16> },
    /// Show one layer on the LED matrix
    DisplayLed { pattern: LedPattern, brightness: u8 },
    /// Labelled value sent by the controller
    Message { label: &'a str, content: MessageContent<'a> },
    Protocol(ProtocolCommand),
    Pin { pin: u8, command: PinCommand },
    SharedData { slot: u8, value: i16 },
    LightSensing { duration_ms: u16 },
}

impl<'a> Command<'a> {
    /// Decode a raw frame written to the COMMAND channel
    pub fn parse(frame: &'a [u8]) -> Result<Self, CommandError> {
        let (&opcode, payload) = frame.split_first().ok_or(CommandError::Empty)?;
        if frame.len() > MAX_COMMAND_SIZE {
            return Err(CommandError::TooLong);
        }

        match opcode {
            CMD_PIN_CONFIG => {
                require(opcode, payload, PIN_COUNT)?;
                let mut configs = [PinConfig::default(); PIN_COUNT];
                for (config, &byte) in configs.iter_mut().zip(payload) {
                    *config = PinConfig::from_byte(byte).ok_or(CommandError::InvalidValue)?;
                }
                Ok(Command::PinConfig(configs))
            }
            CMD_DISPLAY_TEXT => {
                require(opcode, payload, 1)?;
                let nul = payload
                    .iter()
                    .position(|&b| b == 0)
                    .ok_or(CommandError::InvalidText)?;
                let text = core::str::from_utf8(&payload[..nul])
                    .map_err(|_| CommandError::InvalidText)?;
                let rest = &payload[nul + 1..];
                let delay_ms = (rest.len() >= 2).then(|| read_u16(rest, 0));
                Ok(Command::DisplayText { text, delay_ms })
            }
            CMD_DISPLAY_LED => {
                require(opcode, payload, LED_ROWS + 1)?;
                let mut rows = [0u8; LED_ROWS];
                rows.copy_from_slice(&payload[..LED_ROWS]);
                Ok(Command::DisplayLed {
                    pattern: LedPattern::new(rows),
                    brightness: payload[LED_ROWS],
                })
            }
            CMD_MESSAGE => parse_message(payload),
            CMD_PROTOCOL => {
                require(opcode, payload, 1)?;
                match payload[0] {
                    PROTOCOL_SET => {
                        require(opcode, payload, 2)?;
                        Ok(Command::Protocol(ProtocolCommand::Set(payload[1])))
                    }
                    PROTOCOL_QUERY => Ok(Command::Protocol(ProtocolCommand::Query)),
                    other => Err(CommandError::UnknownSubcommand(other)),
                }
            }
            CMD_PIN => {
                require(opcode, payload, 2)?;
                let pin = payload[0];
                let args = &payload[2..];
                let command = match payload[1] {
                    PIN_SET_OUTPUT => {
                        require(opcode, payload, 3)?;
                        PinCommand::SetOutput(args[0] != 0)
                    }
                    PIN_SET_PWM => {
                        require(opcode, payload, 4)?;
                        PinCommand::SetPwm(read_u16(args, 0))
                    }
                    PIN_SET_SERVO => {
                        require(opcode, payload, 8)?;
                        PinCommand::SetServo {
                            angle: read_u16(args, 0),
                            range: read_u16(args, 2),
                            center: read_u16(args, 4),
                        }
                    }
                    PIN_SET_PULL => {
                        require(opcode, payload, 3)?;
                        PinCommand::SetPull(
                            PullMode::from_byte(args[0]).ok_or(CommandError::InvalidValue)?,
                        )
                    }
                    PIN_SET_EVENT => {
                        require(opcode, payload, 3)?;
                        PinCommand::SetEvent(
                            PinEventType::from_byte(args[0]).ok_or(CommandError::InvalidValue)?,
                        )
                    }
                    PIN_SET_TOUCH => PinCommand::SetTouch,
                    other => return Err(CommandError::UnknownSubcommand(other)),
                };
                Ok(Command::Pin { pin, command })
            }
            CMD_SHARED_DATA => {
                require(opcode, payload, 3)?;
                Ok(Command::SharedData {
                    slot: payload[0],
                    value: read_u16(payload, 1) as i16,
                })
            }
            CMD_LIGHT_SENSING => {
                require(opcode, payload, 2)?;
                Ok(Command::LightSensing {
                    duration_ms: read_u16(payload, 0),
                })
            }
            other => Err(CommandError::UnknownOpcode(other)),
        }
    }

    /// Opcode byte this command was decoded from
    pub fn opcode(&self) -> u8 {
        match self {
            Command::PinConfig(_) => CMD_PIN_CONFIG,
            Command::DisplayText { .. } => CMD_DISPLAY_TEXT,
            Command::DisplayLed { .. } => CMD_DISPLAY_LED,
            Command::Message { .. } => CMD_MESSAGE,
            Command::Protocol(_) => CMD_PROTOCOL,
            Command::Pin { .. } => CMD_PIN,
            Command::SharedData { .. } => CMD_SHARED_DATA,
            Command::LightSensing { .. } => CMD_LIGHT_SENSING,
        }
    }
}

/// `[type][label: 8 bytes NUL-padded][content]`
fn parse_message(payload: &[u8]) -> Result<Command<'_>, CommandError> {
    require(CMD_MESSAGE, payload, 1 + MAX_LABEL_LEN)?;
    let message_type = MessageType::from_byte(payload[0]).ok_or(CommandError::InvalidValue)?;

    let label_field = &payload[1..1 + MAX_LABEL_LEN];
    let label = until_nul(label_field)?;
    if label.is_empty() {
        return Err(CommandError::InvalidText);
    }

    let body = &payload[1 + MAX_LABEL_LEN..];
    let content = match message_type {
        MessageType::Number => {
            require(CMD_MESSAGE, payload, 1 + MAX_LABEL_LEN + 4)?;
            MessageContent::Number(f32::from_le_bytes([body[0], body[1], body[2], body[3]]))
        }
        MessageType::Text => MessageContent::Text(until_nul(body)?),
    };
    Ok(Command::Message { label, content })
}

fn require(opcode: u8, payload: &[u8], needed: usize) -> Result<(), CommandError> {
    if payload.len() < needed {
        return Err(CommandError::Truncated {
            opcode,
            needed,
            got: payload.len(),
        });
    }
    Ok(())
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

/// UTF-8 text up to the first NUL, or the whole field if none
fn until_nul(field: &[u8]) -> Result<&str, CommandError> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    core::str::from_utf8(&field[..end]).map_err(|_| CommandError::InvalidText)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::PinMode;
    use proptest::prelude::*;

    #[test]
    fn test_empty_frame() {
        assert_eq!(Command::parse(&[]), Err(CommandError::Empty));
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            Command::parse(&[0x84, 1, 2]),
            Err(CommandError::UnknownOpcode(0x84))
        );
        assert_eq!(Command::parse(&[0x00]), Err(CommandError::UnknownOpcode(0)));
    }

    #[test]
    fn test_pin_set_output() {
        let cmd = Command::parse(&[CMD_PIN, 3, PIN_SET_OUTPUT, 1]).unwrap();
        assert_eq!(
            cmd,
            Command::Pin {
                pin: 3,
                command: PinCommand::SetOutput(true)
            }
        );
    }

    #[test]
    fn test_pin_index_is_passed_through() {
        let cmd = Command::parse(&[CMD_PIN, 40, PIN_SET_TOUCH]).unwrap();
        assert_eq!(
            cmd,
            Command::Pin {
                pin: 40,
                command: PinCommand::SetTouch
            }
        );
    }

    #[test]
    fn test_pin_set_servo() {
        let frame = [CMD_PIN, 1, PIN_SET_SERVO, 90, 0, 0xD0, 0x07, 0xDC, 0x05];
        let cmd = Command::parse(&frame).unwrap();
        assert_eq!(
            cmd,
            Command::Pin {
                pin: 1,
                command: PinCommand::SetServo {
                    angle: 90,
                    range: 2000,
                    center: 1500
                }
            }
        );
    }

    #[test]
    fn test_pin_truncated_servo() {
        let frame = [CMD_PIN, 1, PIN_SET_SERVO, 90, 0, 0xD0];
        assert_eq!(
            Command::parse(&frame),
            Err(CommandError::Truncated {
                opcode: CMD_PIN,
                needed: 8,
                got: 5
            })
        );
    }

    #[test]
    fn test_pin_set_event_rejects_unknown_type() {
        let frame = [CMD_PIN, 3, PIN_SET_EVENT, 9];
        assert_eq!(Command::parse(&frame), Err(CommandError::InvalidValue));
    }

    #[test]
    fn test_unknown_pin_subcommand() {
        let frame = [CMD_PIN, 3, 0x07, 0];
        assert_eq!(
            Command::parse(&frame),
            Err(CommandError::UnknownSubcommand(0x07))
        );
    }

    #[test]
    fn test_pin_config_snapshot() {
        let mut frame = [0u8; 1 + PIN_COUNT];
        frame[0] = CMD_PIN_CONFIG;
        frame[1] = 0x01; // pin 0 output
        frame[3] = 0x10; // pin 2 input, pull up
        match Command::parse(&frame).unwrap() {
            Command::PinConfig(configs) => {
                assert_eq!(configs[0].mode, PinMode::Output);
                assert_eq!(configs[2].pull, PullMode::Up);
                assert_eq!(configs[20], PinConfig::default());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_pin_config_is_all_or_nothing() {
        let mut frame = [0u8; 1 + PIN_COUNT];
        frame[0] = CMD_PIN_CONFIG;
        frame[21] = 0x0F;
        assert_eq!(Command::parse(&frame), Err(CommandError::InvalidValue));
    }

    #[test]
    fn test_display_text_with_delay() {
        let frame = [CMD_DISPLAY_TEXT, b'H', b'i', 0, 0x2C, 0x01];
        let cmd = Command::parse(&frame).unwrap();
        assert_eq!(
            cmd,
            Command::DisplayText {
                text: "Hi",
                delay_ms: Some(300)
            }
        );
    }

    #[test]
    fn test_display_text_requires_nul() {
        let frame = [CMD_DISPLAY_TEXT, b'H', b'i'];
        assert_eq!(Command::parse(&frame), Err(CommandError::InvalidText));
    }

    #[test]
    fn test_display_led() {
        let frame = [CMD_DISPLAY_LED, 0x1F, 0x11, 0x11, 0x11, 0xFF, 128];
        match Command::parse(&frame).unwrap() {
            Command::DisplayLed {
                pattern,
                brightness,
            } => {
                assert_eq!(brightness, 128);
                assert!(pattern.is_lit(0, 0));
                assert!(pattern.is_lit(1, 4));
                assert!(!pattern.is_lit(1, 2));
                assert_eq!(pattern.rows[4], 0x1F);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_shared_data_negative_value() {
        let value = (-1000i16).to_le_bytes();
        let frame = [CMD_SHARED_DATA, 2, value[0], value[1]];
        assert_eq!(
            Command::parse(&frame).unwrap(),
            Command::SharedData {
                slot: 2,
                value: -1000
            }
        );
    }

    #[test]
    fn test_protocol_commands() {
        assert_eq!(
            Command::parse(&[CMD_PROTOCOL, PROTOCOL_SET, 1]).unwrap(),
            Command::Protocol(ProtocolCommand::Set(1))
        );
        assert_eq!(
            Command::parse(&[CMD_PROTOCOL, PROTOCOL_QUERY]).unwrap(),
            Command::Protocol(ProtocolCommand::Query)
        );
        assert!(Command::parse(&[CMD_PROTOCOL, PROTOCOL_SET]).is_err());
    }

    #[test]
    fn test_message_number() {
        let mut frame = [0u8; 14];
        frame[0] = CMD_MESSAGE;
        frame[1] = 1;
        frame[2..6].copy_from_slice(b"temp");
        frame[10..14].copy_from_slice(&21.5f32.to_le_bytes());
        assert_eq!(
            Command::parse(&frame).unwrap(),
            Command::Message {
                label: "temp",
                content: MessageContent::Number(21.5)
            }
        );
    }

    #[test]
    fn test_message_text() {
        let mut frame = [0u8; 13];
        frame[0] = CMD_MESSAGE;
        frame[1] = 2;
        frame[2..9].copy_from_slice(b"greeter");
        frame[10..13].copy_from_slice(b"hey");
        assert_eq!(
            Command::parse(&frame).unwrap(),
            Command::Message {
                label: "greeter",
                content: MessageContent::Text("hey")
            }
        );
    }

    #[test]
    fn test_message_rejects_empty_label() {
        let mut frame = [0u8; 14];
        frame[0] = CMD_MESSAGE;
        frame[1] = 1;
        assert_eq!(Command::parse(&frame), Err(CommandError::InvalidText));
    }

    #[test]
    fn test_frame_too_long() {
        let frame = [CMD_LIGHT_SENSING; MAX_COMMAND_SIZE + 1];
        assert_eq!(Command::parse(&frame), Err(CommandError::TooLong));
    }

    #[test]
    fn test_opcode_matches_frame() {
        let cmd = Command::parse(&[CMD_LIGHT_SENSING, 20, 0]).unwrap();
        assert_eq!(cmd.opcode(), CMD_LIGHT_SENSING);
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(frame in proptest::collection::vec(any::<u8>(), 0..40)) {
            let _ = Command::parse(&frame);
        }

        #[test]
        fn prop_truncated_frames_are_rejected(
            opcode in prop::sample::select(vec![
                CMD_PIN_CONFIG, CMD_DISPLAY_LED, CMD_SHARED_DATA, CMD_LIGHT_SENSING,
            ]),
            fill in prop::collection::vec(any::<u8>(), PIN_COUNT),
        ) {
            let needed = match opcode {
                CMD_PIN_CONFIG => PIN_COUNT,
                CMD_DISPLAY_LED => LED_ROWS + 1,
                CMD_SHARED_DATA => 3,
                _ => 2,
            };
            let mut frame = vec![opcode];
            frame.extend_from_slice(&fill);
            for len in 1..=needed {
                let truncated = matches!(
                    Command::parse(&frame[..len]),
                    Err(CommandError::Truncated { .. })
                );
                prop_assert!(truncated);
            }
        }
    }
}
