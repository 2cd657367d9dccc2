//! Resolution-scaled scalar types and the conversions between MIDI's 7, 14,
//! 16, and 32 bit value encodings.
//!
//! MIDI 1 carries velocities and controllers as 7 bit values and pitch bend
//! as 14 bits; MIDI 2 widens these to 16 and 32 bits. Widening is not a
//! plain shift: it must map 0 to 0, the legacy maximum to the new maximum,
//! and the legacy center exactly to the new center. The scheme used here
//! shifts the value up and then replicates the low source bits into the gap,
//! so a saturated source saturates the target.
use core::ops::{Add, AddAssign, Deref, Mul};

/// Widen `v` from `x` significant bits to `y` significant bits, preserving
/// zero, center, and maximum. Requires `1 < x < y <= 32`.
pub fn upsample_x_to_y(v: u32, x: u8, y: u8) -> u32 {
    debug_assert!(x > 1 && y <= 32 && x < y);

    let scale_bits = y - x;
    let center = 1u32 << (x - 1);

    let mut result = v << scale_bits;
    if v <= center {
        return result;
    }

    // repeat all but the highest source bit below the shifted value
    let repeat_bits = x - 1;
    let mut repeat = v & ((1 << repeat_bits) - 1);
    if scale_bits > repeat_bits {
        repeat <<= scale_bits - repeat_bits;
    } else {
        repeat >>= repeat_bits - scale_bits;
    }
    while repeat != 0 {
        result |= repeat;
        repeat >>= repeat_bits;
    }
    result
}

/// Widen a 7 bit value to 16 bits (center 64 maps to 0x8000).
pub fn upsample_7_to_16(v: u8) -> u16 {
    upsample_x_to_y(u32::from(v), 7, 16) as u16
}

/// Widen a 7 bit value to 32 bits (center 64 maps to 0x8000_0000).
pub fn upsample_7_to_32(v: u8) -> u32 {
    upsample_x_to_y(u32::from(v), 7, 32)
}

/// Widen a 14 bit value to 32 bits (center 0x2000 maps to 0x8000_0000).
pub fn upsample_14_to_32(v: u16) -> u32 {
    upsample_x_to_y(u32::from(v), 14, 32)
}

/// Narrow a 16 bit value to 7 bits.
pub fn downsample_16_to_7(v: u16) -> u8 {
    (v >> 9) as u8
}

/// Narrow a 32 bit value to 7 bits.
pub fn downsample_32_to_7(v: u32) -> u8 {
    (v >> 25) as u8
}

/// Narrow a 32 bit value to 14 bits.
pub fn downsample_32_to_14(v: u32) -> u16 {
    (v >> 18) as u16
}

// Float conversion uses separate linear scalings for the two halves so that
// 0.5 lands exactly on the integer midpoint.
fn u16_from_unit_float(f: f32) -> u16 {
    if f <= 0.0 {
        return 0;
    }
    if f >= 1.0 {
        return u16::MAX;
    }
    if f <= 0.5 {
        (f64::from(f) * (f64::from(u16::MAX) + 1.0)) as u16
    } else {
        0x8000u16 + ((f64::from(f) - 0.5) * f64::from(u16::MAX)) as u16
    }
}

fn u32_from_unit_float(f: f32) -> u32 {
    if f <= 0.0 {
        return 0;
    }
    if f >= 1.0 {
        return u32::MAX;
    }
    if f <= 0.5 {
        (f64::from(f) * (f64::from(u32::MAX) + 1.0)) as u32
    } else {
        0x8000_0000u32 + ((f64::from(f) - 0.5) * f64::from(u32::MAX)) as u32
    }
}

/// Note velocity at 16 bit resolution.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct Velocity(pub u16);

impl Velocity {
    /// Widen a legacy 7 bit velocity.
    pub fn from_u7(v: u8) -> Self {
        Self(upsample_7_to_16(v & 0x7F))
    }

    /// Scale a float in `[0, 1]`; 0.5 maps exactly to the center.
    pub fn from_f32(f: f32) -> Self {
        Self(u16_from_unit_float(f))
    }

    /// Narrow to the legacy 7 bit encoding.
    pub fn as_u7(self) -> u8 {
        downsample_16_to_7(self.0)
    }

    /// The value as a float in `[0, 1]`.
    pub fn as_f32(self) -> f32 {
        if self.0 <= 0x8000 {
            (f64::from(self.0) / f64::from(0x8000u16 as u32) / 2.0) as f32
        } else {
            (f64::from(self.0) / f64::from(u16::MAX)) as f32
        }
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self(0x8000)
    }
}

/// Channel or per-note pitch bend at 32 bit resolution, centered at
/// `0x8000_0000`.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct PitchBend(pub u32);

impl PitchBend {
    /// Widen a legacy 14 bit pitch bend (center 0x2000).
    pub fn from_u14(v: u16) -> Self {
        Self(upsample_14_to_32(v & 0x3FFF))
    }

    /// Scale a float in `[-1, 1]`.
    pub fn from_f32(f: f32) -> Self {
        Self(u32_from_unit_float((f + 1.0) / 2.0))
    }

    /// Narrow to the legacy 14 bit encoding.
    pub fn as_u14(self) -> u16 {
        downsample_32_to_14(self.0)
    }

    /// The value as a float in `[-1, 1]`.
    pub fn as_f32(self) -> f32 {
        if self.0 >= 0x8000_0000 {
            ((f64::from(self.0) - f64::from(0x8000_0000u32)) / f64::from(0x7FFF_FFFFu32)) as f32
        } else {
            ((f64::from(self.0) - f64::from(0x8000_0000u32)) / f64::from(0x8000_0000u32)) as f32
        }
    }

    /// Return to the center position.
    pub fn reset(&mut self) {
        self.0 = 0x8000_0000;
    }
}

impl Default for PitchBend {
    fn default() -> Self {
        Self(0x8000_0000)
    }
}

/// A signed pitch offset in S6.25 fixed point, as produced by applying a
/// [`PitchBendSensitivity`] to a [`PitchBend`].
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct PitchIncrement(pub i32);

impl PitchIncrement {
    /// Convert from semitones; saturates outside `(-64, 64)`.
    pub fn from_f32(f: f32) -> Self {
        if f >= 64.0 {
            Self(i32::MAX)
        } else if f <= -64.0 {
            Self(i32::MIN)
        } else if f >= 0.0 {
            Self(Pitch725::from_f32(f).0 as i32)
        } else {
            Self(-(Pitch725::from_f32(-f).0 as i32))
        }
    }
}

impl Add for PitchIncrement {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for PitchIncrement {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// A note pitch in 7.9 fixed point: 7 bits of note number, 9 fractional
/// bits. Carried in the attribute data of MIDI 2 note messages.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct Pitch79(pub u16);

impl Pitch79 {
    /// The pitch of a plain note number.
    pub fn from_note(note_nr: u8) -> Self {
        Self(u16::from(note_nr) << 9)
    }

    /// Convert from semitones in `[0, 128)`, rounding to the nearest step.
    pub fn from_f32(f: f32) -> Self {
        if f <= 0.0 {
            Self(0)
        } else if f >= 128.0 {
            Self(0xFFFF)
        } else {
            let r = (f * 512.0).round();
            Self(if r < 65536.0 { r as u16 } else { 0xFFFF })
        }
    }

    /// The pitch in semitones.
    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / 512.0
    }

    /// The integral note number.
    pub fn note_nr(self) -> u8 {
        (self.0 >> 9) as u8
    }
}

/// A note pitch in 7.25 fixed point, the resolution of registered per-note
/// controller 3.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct Pitch725(pub u32);

impl Pitch725 {
    /// The pitch of a plain note number.
    pub fn from_note(note_nr: u8) -> Self {
        Self(u32::from(note_nr) << 25)
    }

    /// Convert from semitones in `[0, 128)`, rounding to the nearest step.
    pub fn from_f32(f: f32) -> Self {
        if f <= 0.0 {
            Self(0)
        } else if f >= 128.0 {
            Self(0xFFFF_FFFF)
        } else {
            let r = (f64::from(f) * f64::from(1u32 << 25)).round();
            Self(if r < 4294967296.0 { r as u32 } else { 0xFFFF_FFFF })
        }
    }

    /// The pitch in semitones.
    pub fn as_f32(self) -> f32 {
        (f64::from(self.0) / f64::from(1u32 << 25)) as f32
    }

    /// The integral note number.
    pub fn note_nr(self) -> u8 {
        (self.0 >> 25) as u8
    }
}

impl From<Pitch79> for Pitch725 {
    fn from(p: Pitch79) -> Self {
        Self(u32::from(p.0) << 16)
    }
}

impl Add<PitchIncrement> for Pitch725 {
    type Output = Self;
    fn add(self, inc: PitchIncrement) -> Self {
        let r = i64::from(self.0) + i64::from(inc.0);
        Self(r.clamp(0, i64::from(u32::MAX)) as u32)
    }
}

impl AddAssign<PitchIncrement> for Pitch725 {
    fn add_assign(&mut self, inc: PitchIncrement) {
        *self = *self + inc;
    }
}

impl Add<f32> for Pitch725 {
    type Output = Self;
    fn add(self, detune: f32) -> Self {
        let mut r = i64::from(self.0);
        if detune >= 0.0 {
            r += i64::from(Pitch725::from_f32(detune).0);
        } else {
            r -= i64::from(Pitch725::from_f32(-detune).0);
        }
        Self(r.clamp(0, i64::from(u32::MAX)) as u32)
    }
}

/// Pitch bend range in semitones, a [`Pitch725`] defaulting to two
/// semitones (the value of registered parameter 0).
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct PitchBendSensitivity(pub Pitch725);

impl PitchBendSensitivity {
    /// A sensitivity of a whole number of semitones.
    pub fn from_note(semitones: u8) -> Self {
        Self(Pitch725::from_note(semitones))
    }
}

impl Default for PitchBendSensitivity {
    fn default() -> Self {
        Self(Pitch725::from_note(2))
    }
}

impl Deref for PitchBendSensitivity {
    type Target = Pitch725;
    fn deref(&self) -> &Pitch725 {
        &self.0
    }
}

impl Mul<PitchBendSensitivity> for PitchBend {
    type Output = PitchIncrement;
    fn mul(self, sens: PitchBendSensitivity) -> PitchIncrement {
        let offset = i64::from(self.0) - 0x8000_0000i64;
        if offset == 0 {
            return PitchIncrement(0);
        }
        let scaled = (offset * i64::from(sens.0 .0)) >> 31;
        PitchIncrement(scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }
}

impl Mul<PitchBend> for PitchBendSensitivity {
    type Output = PitchIncrement;
    fn mul(self, pb: PitchBend) -> PitchIncrement {
        pb * self
    }
}

/// A relative controller offset.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct ControllerIncrement(pub i32);

/// A controller (or pressure) value at 32 bit resolution.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct ControllerValue(pub u32);

impl ControllerValue {
    /// Widen a legacy 7 bit controller value.
    pub fn from_u7(v: u8) -> Self {
        Self(upsample_7_to_32(v & 0x7F))
    }

    /// Scale a float in `[0, 1]`; 0.5 maps exactly to the center.
    pub fn from_f32(f: f32) -> Self {
        Self(u32_from_unit_float(f))
    }

    /// Narrow to the legacy 7 bit encoding.
    pub fn as_u7(self) -> u8 {
        downsample_32_to_7(self.0)
    }

    /// The value as a float in `[0, 1]`.
    pub fn as_f32(self) -> f32 {
        if self.0 <= 0x8000_0000 {
            (f64::from(self.0) / f64::from(0x8000_0000u32) / 2.0) as f32
        } else {
            (f64::from(self.0) / f64::from(u32::MAX)) as f32
        }
    }
}

impl Add<ControllerIncrement> for ControllerValue {
    type Output = Self;
    fn add(self, inc: ControllerIncrement) -> Self {
        let r = i64::from(self.0) + i64::from(inc.0);
        Self(r.clamp(0, i64::from(u32::MAX)) as u32)
    }
}

impl AddAssign<ControllerIncrement> for ControllerValue {
    fn add_assign(&mut self, inc: ControllerIncrement) {
        *self = *self + inc;
    }
}

/// The identity a device reports in SysEx identity replies, CI discovery,
/// and stream device-identity notifications.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct DeviceIdentity {
    /// System Exclusive manufacturer ID (see [`crate::sysex::manufacturer`]).
    pub manufacturer: u32,
    /// Device family, 14 bits.
    pub family: u16,
    /// Device family model number, 14 bits.
    pub model: u16,
    /// Device revision level, 28 bits.
    pub revision: u32,
}
