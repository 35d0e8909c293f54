//! LED matrix display trait

use mbitmore_protocol::LedPattern;

/// Trait for the 5×5 LED matrix
///
/// Rendering and layer composition are the implementation's job; the bridge
/// only forwards requests.
pub trait Display {
    /// Scroll `text` across the matrix
    ///
    /// - `delay_ms`: time each column step is shown
    fn scroll_text(&mut self, text: &str, delay_ms: u16);

    /// Show one layer at the given brightness (0-255)
    fn show_layer(&mut self, pattern: &LedPattern, brightness: u8);

    /// Check if an animation is still running
    fn is_busy(&self) -> bool;
}
