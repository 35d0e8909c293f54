//! Last sampled sensor values

use mbitmore_protocol::pins::ANALOG_PINS;
use mbitmore_protocol::telemetry::{STATE_FLAG_BUTTON_A, STATE_FLAG_BUTTON_B, STATE_FLAG_LOGO};
use mbitmore_protocol::{ButtonId, MotionReport, StateReport};

use super::rotation::{normalize_heading, rotation_from_acceleration};
use crate::pin_table::PinTable;
use crate::traits::{PinDriver, Sensors};

/// Values read once per notify cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    /// Bit *n* is the level of pin *n*
    pub digital_mask: u32,
    /// Levels of [`ANALOG_PINS`], 0-1023
    pub analog: [u16; 6],
    /// Milli-g
    pub acceleration: [i16; 3],
    /// Pitch and roll in milliradians
    pub rotation: [i16; 2],
    /// Microtesla
    pub magnetic: [i16; 3],
    /// Degrees, 0-359
    pub heading: u16,
    pub light_level: u8,
    /// `STATE_FLAG_*` bits for buttons currently held
    pub buttons: u8,
}

impl SensorSnapshot {
    /// Read every sensor and input pin
    pub fn sample<S: Sensors, P: PinDriver>(sensors: &mut S, pins: &mut PinTable<P>) -> Self {
        let raw_accel = sensors.acceleration();
        let raw_mag = sensors.magnetic_force();

        let mut analog = [0u16; 6];
        for (value, &pin) in analog.iter_mut().zip(ANALOG_PINS.iter()) {
            *value = pins.sample_analog(pin);
        }

        let mut buttons = 0;
        for (button, flag) in ButtonId::ALL
            .into_iter()
            .zip([STATE_FLAG_BUTTON_A, STATE_FLAG_BUTTON_B, STATE_FLAG_LOGO])
        {
            if sensors.is_pressed(button) {
                buttons |= flag;
            }
        }

        Self {
            digital_mask: pins.sample_digital(),
            analog,
            acceleration: raw_accel.map(saturate_i16),
            rotation: rotation_from_acceleration(raw_accel),
            magnetic: raw_mag.map(|nt| saturate_i16(nt / 1000)),
            heading: normalize_heading(sensors.heading()),
            light_level: sensors.light_level(),
            buttons,
        }
    }

    pub fn state_report(&self, protocol: u8) -> StateReport {
        StateReport {
            digital_mask: self.digital_mask,
            light_level: self.light_level,
            flags: self.buttons,
            protocol,
            analog: self.analog,
        }
    }

    pub fn motion_report(&self) -> MotionReport {
        MotionReport {
            pitch: self.rotation[0],
            roll: self.rotation[1],
            acceleration: self.acceleration,
            heading: self.heading,
            magnetic: self.magnetic,
        }
    }
}

fn saturate_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::mock::{FakeSensors, RecordingPins};

    #[test]
    fn test_sample_converts_units() {
        let mut sensors = FakeSensors {
            acceleration: [0, 0, -1024],
            magnetic: [-40_500, 12_000, 3_999],
            heading: -90,
            light: 77,
            ..Default::default()
        };
        sensors.pressed[ButtonId::B.index()] = true;
        sensors.pressed[ButtonId::Logo.index()] = true;
        let mut pins = PinTable::new(RecordingPins::default(), &BoardConfig::default());

        let snapshot = SensorSnapshot::sample(&mut sensors, &mut pins);
        assert_eq!(snapshot.acceleration, [0, 0, -1024]);
        assert_eq!(snapshot.rotation, [0, 0]);
        assert_eq!(snapshot.magnetic, [-40, 12, 3]);
        assert_eq!(snapshot.heading, 270);
        assert_eq!(snapshot.light_level, 77);
        assert_eq!(snapshot.buttons, STATE_FLAG_BUTTON_B | STATE_FLAG_LOGO);
    }

    #[test]
    fn test_sample_reads_analog_pins() {
        let mut sensors = FakeSensors::default();
        let mut pins = PinTable::new(RecordingPins::default(), &BoardConfig::default());
        pins.driver_mut().analog[10] = 900;
        pins.driver_mut().analog[0] = 5;
        pins.driver_mut().digital[1] = true;

        let snapshot = SensorSnapshot::sample(&mut sensors, &mut pins);
        assert_eq!(snapshot.analog[0], 5);
        assert_eq!(snapshot.analog[5], 900);
        assert_eq!(snapshot.digital_mask, 1 << 1);
    }

    #[test]
    fn test_acceleration_saturates() {
        let mut sensors = FakeSensors {
            acceleration: [100_000, -100_000, 0],
            ..Default::default()
        };
        let mut pins = PinTable::new(RecordingPins::default(), &BoardConfig::default());
        let snapshot = SensorSnapshot::sample(&mut sensors, &mut pins);
        assert_eq!(snapshot.acceleration, [i16::MAX, i16::MIN, 0]);
    }

    #[test]
    fn test_reports_carry_snapshot() {
        let snapshot = SensorSnapshot {
            digital_mask: 3,
            analog: [1, 2, 3, 4, 5, 6],
            rotation: [10, -10],
            heading: 45,
            light_level: 9,
            buttons: STATE_FLAG_BUTTON_A,
            ..Default::default()
        };
        let state = snapshot.state_report(1);
        assert_eq!(state.flags, STATE_FLAG_BUTTON_A);
        assert_eq!(state.analog, [1, 2, 3, 4, 5, 6]);
        let motion = snapshot.motion_report();
        assert_eq!((motion.pitch, motion.roll, motion.heading), (10, -10, 45));
    }
}
