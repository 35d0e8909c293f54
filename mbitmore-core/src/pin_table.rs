//! Edge connector pin table
//!
//! One [`PinEntry`] per pin, mutated only by command dispatch. Every mutator
//! ignores pin indices outside `0..PIN_COUNT`.
//!
//! The table keeps two independent axes per pin: the drive mode (with its
//! pull) and the event listener. Changing one leaves the other alone, except
//! that touch sensing forces `PinMode::Touch` with `PullMode::None`.

use mbitmore_protocol::pins::{pin_index, ANALOG_MAX, SERVO_MAX_ANGLE};
use mbitmore_protocol::{PinCommand, PinConfig, PinEventType, PinMode, PullMode, PIN_COUNT};

use crate::config::BoardConfig;
use crate::traits::PinDriver;

/// State of one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinEntry {
    pub mode: PinMode,
    pub pull: PullMode,
    pub event: PinEventType,
    /// Last level driven or sampled
    pub last_digital: bool,
    /// Last duty driven or level sampled, 0-1023
    pub last_analog: u16,
}

impl PinEntry {
    pub fn config(&self) -> PinConfig {
        PinConfig::new(self.mode, self.pull)
    }

    /// Returns true if the pin is sampled into the STATE digital mask
    pub fn is_input(&self) -> bool {
        matches!(self.mode, PinMode::Input | PinMode::Touch)
    }
}

/// Fixed table of all edge connector pins
pub struct PinTable<P> {
    entries: [PinEntry; PIN_COUNT],
    driver: P,
    servo_range_us: u16,
    servo_center_us: u16,
}

impl<P: PinDriver> PinTable<P> {
    pub fn new(driver: P, config: &BoardConfig) -> Self {
        Self {
            entries: [PinEntry::default(); PIN_COUNT],
            driver,
            servo_range_us: config.servo_default_range_us,
            servo_center_us: config.servo_default_center_us,
        }
    }

    pub fn entry(&self, pin: u8) -> Option<&PinEntry> {
        pin_index(pin).map(|i| &self.entries[i])
    }

    pub fn entries(&self) -> &[PinEntry; PIN_COUNT] {
        &self.entries
    }

    pub fn driver(&self) -> &P {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut P {
        &mut self.driver
    }

    /// Apply a mode and pull to one pin
    ///
    /// Output and PWM pins are re-driven with their last value. Servo pins
    /// wait for the next SET_SERVO.
    pub fn configure(&mut self, pin: u8, config: PinConfig) {
        let Some(i) = pin_index(pin) else {
            return;
        };
        let entry = &mut self.entries[i];
        entry.mode = config.mode;
        entry.pull = match config.mode {
            PinMode::Touch => PullMode::None,
            _ => config.pull,
        };

        match entry.mode {
            PinMode::Input => self.driver.set_pull(pin, entry.pull),
            PinMode::Output => self.driver.set_digital(pin, entry.last_digital),
            PinMode::AnalogOut => self.driver.set_analog(pin, entry.last_analog),
            PinMode::Servo => {}
            PinMode::Touch => self.driver.set_touch_mode(pin),
        }
        debug!("pin {} configured as {}", pin, entry.mode);
    }

    /// Apply a full configuration snapshot, pin *i* from `configs[i]`
    pub fn apply_snapshot(&mut self, configs: &[PinConfig; PIN_COUNT]) {
        for (pin, config) in configs.iter().enumerate() {
            self.configure(pin as u8, *config);
        }
    }

    pub fn set_digital_out(&mut self, pin: u8, high: bool) {
        let Some(i) = pin_index(pin) else {
            return;
        };
        let entry = &mut self.entries[i];
        entry.mode = PinMode::Output;
        entry.last_digital = high;
        self.driver.set_digital(pin, high);
    }

    /// Duty is clamped to 0-1023
    pub fn set_pwm(&mut self, pin: u8, duty: u16) {
        let Some(i) = pin_index(pin) else {
            return;
        };
        let duty = duty.min(ANALOG_MAX);
        let entry = &mut self.entries[i];
        entry.mode = PinMode::AnalogOut;
        entry.last_analog = duty;
        self.driver.set_analog(pin, duty);
    }

    /// Angle is clamped to 0-180; a zero range or center uses the default
    pub fn set_servo(&mut self, pin: u8, angle: u16, range_us: u16, center_us: u16) {
        let Some(i) = pin_index(pin) else {
            return;
        };
        let angle = angle.min(SERVO_MAX_ANGLE);
        let range_us = if range_us == 0 {
            self.servo_range_us
        } else {
            range_us
        };
        let center_us = if center_us == 0 {
            self.servo_center_us
        } else {
            center_us
        };
        self.entries[i].mode = PinMode::Servo;
        self.driver.set_servo(pin, angle, range_us, center_us);
    }

    /// Switch to a digital input with the given pull
    pub fn set_pull(&mut self, pin: u8, pull: PullMode) {
        self.configure(pin, PinConfig::new(PinMode::Input, pull));
    }

    pub fn set_touch(&mut self, pin: u8) {
        self.configure(pin, PinConfig::new(PinMode::Touch, PullMode::None));
    }

    /// Attach or detach the pin's event listener
    ///
    /// Registering the current type again does not re-arm the driver.
    /// `OnTouch` always leaves the pin in touch sensing.
    pub fn listen_event(&mut self, pin: u8, event: PinEventType) {
        let Some(i) = pin_index(pin) else {
            return;
        };
        if event == PinEventType::OnTouch && self.entries[i].mode != PinMode::Touch {
            self.set_touch(pin);
        }
        if self.entries[i].event == event {
            return;
        }
        self.entries[i].event = event;
        self.driver.listen(pin, event);
        match event {
            PinEventType::None => debug!("pin {} listener released", pin),
            _ => debug!("pin {} listening for {}", pin, event),
        }
    }

    /// Dispatch a decoded PIN subcommand
    pub fn apply(&mut self, pin: u8, command: PinCommand) {
        match command {
            PinCommand::SetOutput(high) => self.set_digital_out(pin, high),
            PinCommand::SetPwm(duty) => self.set_pwm(pin, duty),
            PinCommand::SetServo {
                angle,
                range,
                center,
            } => self.set_servo(pin, angle, range, center),
            PinCommand::SetPull(pull) => self.set_pull(pin, pull),
            PinCommand::SetEvent(event) => self.listen_event(pin, event),
            PinCommand::SetTouch => self.set_touch(pin),
        }
    }

    /// Sample every input pin, returning bit *n* for pin *n*
    ///
    /// Output pins report the level they are driven at.
    pub fn sample_digital(&mut self) -> u32 {
        let mut mask = 0u32;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if entry.is_input() {
                entry.last_digital = self.driver.read_digital(i as u8);
            }
            if entry.last_digital {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Sample one pin's analog level
    ///
    /// PWM pins report their duty, other outputs their last value.
    pub fn sample_analog(&mut self, pin: u8) -> u16 {
        let Some(i) = pin_index(pin) else {
            return 0;
        };
        if self.entries[i].mode == PinMode::Input {
            let level = self.driver.read_analog(pin).min(ANALOG_MAX);
            self.entries[i].last_analog = level;
        }
        self.entries[i].last_analog
    }
}
