//! Recording collaborators for host tests

use mbitmore_protocol::{ButtonId, ChannelId, LedPattern, PinEventType, PullMode, PIN_COUNT};

use crate::traits::{Display, PinDriver, Sensors, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCall {
    Digital(u8, bool),
    Analog(u8, u16),
    Servo(u8, u16, u16, u16),
    Pull(u8, PullMode),
    Touch(u8),
    Listen(u8, PinEventType),
}

/// Records every drive call; reads come from `digital` and `analog`
#[derive(Debug, Default)]
pub struct RecordingPins {
    pub calls: Vec<PinCall>,
    pub digital: [bool; PIN_COUNT],
    pub analog: [u16; PIN_COUNT],
}

impl PinDriver for RecordingPins {
    fn set_digital(&mut self, pin: u8, high: bool) {
        self.calls.push(PinCall::Digital(pin, high));
    }

    fn set_analog(&mut self, pin: u8, duty: u16) {
        self.calls.push(PinCall::Analog(pin, duty));
    }

    fn set_servo(&mut self, pin: u8, angle: u16, range_us: u16, center_us: u16) {
        self.calls
            .push(PinCall::Servo(pin, angle, range_us, center_us));
    }

    fn set_pull(&mut self, pin: u8, pull: PullMode) {
        self.calls.push(PinCall::Pull(pin, pull));
    }

    fn set_touch_mode(&mut self, pin: u8) {
        self.calls.push(PinCall::Touch(pin));
    }

    fn listen(&mut self, pin: u8, event: PinEventType) {
        self.calls.push(PinCall::Listen(pin, event));
    }

    fn read_digital(&mut self, pin: u8) -> bool {
        self.digital[usize::from(pin)]
    }

    fn read_analog(&mut self, pin: u8) -> u16 {
        self.analog[usize::from(pin)]
    }
}

#[derive(Debug, Default)]
pub struct FakeSensors {
    pub acceleration: [i32; 3],
    pub magnetic: [i32; 3],
    pub heading: i32,
    pub light: u8,
    pub pressed: [bool; 3],
    pub light_duration: Option<u16>,
}

impl Sensors for FakeSensors {
    fn acceleration(&mut self) -> [i32; 3] {
        self.acceleration
    }

    fn magnetic_force(&mut self) -> [i32; 3] {
        self.magnetic
    }

    fn heading(&mut self) -> i32 {
        self.heading
    }

    fn light_level(&mut self) -> u8 {
        self.light
    }

    fn set_light_sensing_duration(&mut self, duration_ms: u16) {
        self.light_duration = Some(duration_ms);
    }

    fn is_pressed(&mut self, button: ButtonId) -> bool {
        self.pressed[button.index()]
    }
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub scrolled: Vec<(String, u16)>,
    pub layers: Vec<(LedPattern, u8)>,
    pub busy: bool,
}

impl Display for RecordingDisplay {
    fn scroll_text(&mut self, text: &str, delay_ms: u16) {
        self.scrolled.push((text.to_string(), delay_ms));
    }

    fn show_layer(&mut self, pattern: &LedPattern, brightness: u8) {
        self.layers.push((*pattern, brightness));
    }

    fn is_busy(&self) -> bool {
        self.busy
    }
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub connected: bool,
    pub values: Vec<(ChannelId, Vec<u8>)>,
    pub notified: Vec<(ChannelId, Vec<u8>)>,
}

impl RecordingTransport {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Default::default()
        }
    }

    /// Latest value set on a read channel
    pub fn value(&self, channel: ChannelId) -> Option<&[u8]> {
        self.values
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, v)| v.as_slice())
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.notified.clear();
    }
}

impl Transport for RecordingTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn set_value(&mut self, channel: ChannelId, value: &[u8]) {
        self.values.push((channel, value.to_vec()));
    }

    fn notify(&mut self, channel: ChannelId, value: &[u8]) {
        self.notified.push((channel, value.to_vec()));
    }
}
