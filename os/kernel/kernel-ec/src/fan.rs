//! Fan protocol: tachometer decoding, duty encoding, register selection.

use crate::EcError;
use crate::regs::{EcAddress, EcRegisterOffsets};
use bitfield_struct::bitfield;
use core::fmt;

/// Reported for a stopped fan or an out-of-range tachometer count.
pub const RPM_STOPPED: u16 = 0;

/// Reported when the count is too small to resolve (fan faster than the
/// sensor can measure).
pub const RPM_SATURATED: u16 = 9999;

/// Counts at or above this are not valid readings.
pub const TACH_INVALID: u16 = 0x4000;

/// Smallest count that is converted to an RPM value.
pub const TACH_MIN_RESOLVABLE: u16 = 0x80;

/// Count-to-RPM calibration: `rpm = TACH_CALIBRATION / count`.
pub const TACH_CALIBRATION: u32 = 2_156_250;

/// Raw tachometer count as assembled from the two EC registers.
///
/// The count is an inverse period; see [`decode_rpm`].
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct RawTachCount {
    /// `FANx_RPM_LSB`.
    pub lsb: u8,
    /// `FANx_RPM_MSB`.
    pub msb: u8,
}

/// Converts a raw tachometer count to RPM.
///
/// | count | result |
/// |---|---|
/// | `0`, `>= 0x4000` | [`RPM_STOPPED`] |
/// | `1..0x80` | [`RPM_SATURATED`] |
/// | otherwise | `2_156_250 / count` |
///
/// ```
/// # use kernel_ec::{decode_rpm, RawTachCount};
/// assert_eq!(decode_rpm(RawTachCount::from_bits(1000)), 2156);
/// assert_eq!(decode_rpm(RawTachCount::from_bits(0x40)), 9999);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn decode_rpm(raw: RawTachCount) -> u16 {
    let count = raw.into_bits();
    if count == 0 || count >= TACH_INVALID {
        return RPM_STOPPED;
    }
    if count < TACH_MIN_RESOLVABLE {
        return RPM_SATURATED;
    }

    // count >= 0x80 bounds the quotient by 16845
    (TACH_CALIBRATION / count as u32) as u16
}

/// Target value for a fan's `EXT_FANx_TARGET_RPM` register, `0..=127`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duty(u8);

impl Duty {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(127);

    /// Clamps any integer into the accepted range; never fails.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_lossless)]
    pub const fn clamped(value: i64) -> Self {
        if value <= 0 {
            Self::MIN
        } else if value >= Self::MAX.0 as i64 {
            Self::MAX
        } else {
            Self(value as u8)
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Duty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Value stored in `EXT_FAN_CTRL_EN` for a requested flag: `1` for any
/// nonzero input, `0` otherwise.
#[must_use]
pub fn encode_enable(flag: i64) -> u8 {
    u8::from(flag != 0)
}

/// One of the two fans.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FanId {
    Fan1 = 1,
    Fan2 = 2,
}

impl FanId {
    /// The 1-based number the fan is known by.
    #[must_use]
    pub const fn number(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn tach_lsb(self, regs: &EcRegisterOffsets) -> EcAddress {
        match self {
            Self::Fan1 => regs.fan1_rpm_lsb,
            Self::Fan2 => regs.fan2_rpm_lsb,
        }
    }

    #[must_use]
    pub const fn tach_msb(self, regs: &EcRegisterOffsets) -> EcAddress {
        match self {
            Self::Fan1 => regs.fan1_rpm_msb,
            Self::Fan2 => regs.fan2_rpm_msb,
        }
    }

    #[must_use]
    pub const fn target(self, regs: &EcRegisterOffsets) -> EcAddress {
        match self {
            Self::Fan1 => regs.ext_fan1_target_rpm,
            Self::Fan2 => regs.ext_fan2_target_rpm,
        }
    }
}

impl TryFrom<usize> for FanId {
    type Error = EcError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Fan1),
            2 => Ok(Self::Fan2),
            n => Err(EcError::InvalidFan(n)),
        }
    }
}

impl fmt::Display for FanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fan{}", self.number())
    }
}

/// Temperature sensors the EC mirrors into its external register block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TempSensor {
    Cpu,
    /// Chassis / ambient.
    Env,
}

impl TempSensor {
    #[must_use]
    pub const fn register(self, regs: &EcRegisterOffsets) -> EcAddress {
        match self {
            Self::Cpu => regs.ext_cpu_temp,
            Self::Env => regs.ext_env_temp,
        }
    }
}
