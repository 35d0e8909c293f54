//! Onboard sensor trait

use mbitmore_protocol::ButtonId;

/// Trait for the accelerometer, compass, light sensor and buttons
///
/// Reads take `&mut self` because most drivers talk to a shared bus.
pub trait Sensors {
    /// Acceleration in milli-g, `[x, y, z]`
    fn acceleration(&mut self) -> [i32; 3];

    /// Magnetic field in nanotesla, `[x, y, z]`
    fn magnetic_force(&mut self) -> [i32; 3];

    /// Compass heading in degrees
    ///
    /// May be outside 0-359; the snapshot normalizes it.
    fn heading(&mut self) -> i32;

    /// Ambient light level (0-255)
    fn light_level(&mut self) -> u8;

    /// Set how long the LED matrix samples ambient light
    fn set_light_sensing_duration(&mut self, duration_ms: u16);

    /// Check if a button (or the logo) is currently held
    fn is_pressed(&mut self, button: ButtonId) -> bool;
}
