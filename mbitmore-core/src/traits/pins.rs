//! Edge connector pin driver trait

use mbitmore_protocol::{PinEventType, PullMode};

/// Trait for the GPIO, PWM and servo peripherals behind the edge connector
///
/// Pin indices passed in are always below [`mbitmore_protocol::PIN_COUNT`].
pub trait PinDriver {
    /// Drive the pin as a digital output
    fn set_digital(&mut self, pin: u8, high: bool);

    /// Drive the pin with a PWM duty (0-1023)
    fn set_analog(&mut self, pin: u8, duty: u16);

    /// Drive a servo on the pin
    ///
    /// - `angle`: degrees, 0-180
    /// - `range_us`: pulse width range
    /// - `center_us`: pulse width at 90 degrees
    fn set_servo(&mut self, pin: u8, angle: u16, range_us: u16, center_us: u16);

    /// Switch the pin to a digital input with the given pull
    fn set_pull(&mut self, pin: u8, pull: PullMode);

    /// Switch the pin to capacitive touch sensing
    fn set_touch_mode(&mut self, pin: u8);

    /// Attach an event listener to the pin
    ///
    /// `PinEventType::None` detaches the listener and releases its
    /// interrupt. Fired events go to [`crate::EventLatches::pin_event`].
    fn listen(&mut self, pin: u8, event: PinEventType);

    /// Read the digital level
    fn read_digital(&mut self, pin: u8) -> bool;

    /// Read the analog level (0-1023)
    fn read_analog(&mut self, pin: u8) -> u16;
}
