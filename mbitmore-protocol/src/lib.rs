//! Mbit More wire protocol
//!
//! This crate defines the binary contract between the sensor board and a
//! remote controller, carried over an attribute-based wireless transport.
//! Numeric values (opcodes, subcommands, format tags, event codes) are fixed
//! by existing controllers and must not change.
//!
//! # Protocol Overview
//!
//! The controller writes command frames to a single COMMAND channel:
//! ```text
//! ┌────────┬──────────────────────┐
//! │ OPCODE │ PAYLOAD              │
//! │ 1B     │ 0–31B                │
//! └────────┴──────────────────────┘
//! ```
//!
//! The board answers through fixed-size buffers on read and notify channels
//! (STATE, DIRECTION, PIN_EVENT, ACTION_EVENT, ANALOG_IN_Px, MESSAGE). The
//! first byte of each notify buffer is a format tag naming its shape.
//!
//! Malformed frames are dropped without a reply; the link is fire-and-forget.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod channels;
pub mod commands;
pub mod events;
pub mod pins;
pub mod telemetry;

pub use channels::ChannelId;
pub use commands::{
    Command, CommandError, LedPattern, MessageContent, MessageType, PinCommand, ProtocolCommand,
};
pub use events::{ButtonEvent, ButtonId, Gesture, PinEventKind};
pub use pins::{PinConfig, PinEventType, PinMode, PullMode, PIN_COUNT};
pub use telemetry::{
    ActionEventReport, MessageReport, MotionReport, PinEventReport, SharedDataReport, StateReport,
};

/// Protocol id advertised by this implementation
pub const PROTOCOL_ID: u8 = 1;
