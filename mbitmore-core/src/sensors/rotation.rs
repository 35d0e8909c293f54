//! Integer angle math for the DIRECTION channel
//!
//! Angles are milliradians so the whole -π..=π range fits an `i16`.

/// π in milliradians
pub const PI_MRAD: i32 = 3142;

/// π/2 in milliradians
pub const HALF_PI_MRAD: i32 = 1571;

/// atan2 in milliradians, within `-PI_MRAD..=PI_MRAD`
///
/// Max error is about 4 mrad. `atan2_mrad(0, 0)` is 0.
pub fn atan2_mrad(y: i32, x: i32) -> i16 {
    if x == 0 && y == 0 {
        return 0;
    }
    let ax = i64::from(x).abs();
    let ay = i64::from(y).abs();

    // Fold into the first octant: ratio in 0..=1000
    let angle = if ay <= ax {
        atan_unit((ay * 1000 / ax) as i32)
    } else {
        HALF_PI_MRAD - atan_unit((ax * 1000 / ay) as i32)
    };

    let angle = if x < 0 { PI_MRAD - angle } else { angle };
    let angle = if y < 0 { -angle } else { angle };
    angle as i16
}

/// atan(t / 1000) in milliradians for t in 0..=1000
fn atan_unit(t: i32) -> i32 {
    (785_000 * t + 273 * t * (1000 - t)) / 1_000_000
}

/// Pitch and roll from an acceleration vector in milli-g
///
/// Face up and level reads `[0, 0]`. Positive pitch tilts the logo end
/// down, positive roll tilts the right edge down.
pub fn rotation_from_acceleration(acceleration: [i32; 3]) -> [i16; 2] {
    let [x, y, z] = acceleration;
    let pitch = atan2_mrad(y, z.saturating_neg());
    let roll = atan2_mrad(x, z.saturating_neg());
    [pitch, roll]
}

/// Wrap a compass heading into 0-359 degrees
pub fn normalize_heading(heading: i32) -> u16 {
    heading.rem_euclid(360) as u16
}
