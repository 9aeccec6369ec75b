//! Named text attributes over a [`FanController`].
//!
//! The attribute group mirrors what the driver exposes to user space:
//!
//! | name | mode | shows | accepts |
//! |---|---|---|---|
//! | `fan1`, `fan2` | rw | RPM | duty, clamped to `0..=127` |
//! | `fanctl_en` | rw | `0` / `1` | any integer, nonzero enables |
//! | `cpu_temp`, `env_temp` | ro | °C | |
//!
//! Input is parsed the way `sscanf("%d")` would: leading whitespace is
//! skipped, an optional sign and at least one digit are required and anything
//! after the digits is ignored. Text that does not parse is rejected before
//! the controller is called.

use crate::fan::{Duty, FanId, TempSensor};
use crate::{EcError, FanController};
use core::fmt;
use kernel_ports::{PortArbiter, PortIo};
use log::warn;

/// Directory name of the attribute group.
pub const GROUP_NAME: &str = "wujie_fan";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    Fan1,
    Fan2,
    FanCtlEn,
    CpuTemp,
    EnvTemp,
}

impl Attribute {
    pub const ALL: [Self; 5] = [
        Self::Fan1,
        Self::Fan2,
        Self::FanCtlEn,
        Self::CpuTemp,
        Self::EnvTemp,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fan1 => "fan1",
            Self::Fan2 => "fan2",
            Self::FanCtlEn => "fanctl_en",
            Self::CpuTemp => "cpu_temp",
            Self::EnvTemp => "env_temp",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::Fan1 | Self::Fan2 | Self::FanCtlEn)
    }

    #[must_use]
    pub const fn fan(self) -> Option<FanId> {
        match self {
            Self::Fan1 => Some(FanId::Fan1),
            Self::Fan2 => Some(FanId::Fan2),
            _ => None,
        }
    }

    /// Formats the current value, without a trailing newline.
    ///
    /// # Errors
    /// [`EcError::Format`] if `out` refuses the text.
    pub fn show<P, A, W>(self, ctl: &FanController<'_, P, A>, out: &mut W) -> Result<(), EcError>
    where
        P: PortIo,
        A: PortArbiter + ?Sized,
        W: fmt::Write + ?Sized,
    {
        match self {
            Self::Fan1 => write!(out, "{}", ctl.fan_speed(FanId::Fan1))?,
            Self::Fan2 => write!(out, "{}", ctl.fan_speed(FanId::Fan2))?,
            Self::FanCtlEn => write!(out, "{}", u8::from(ctl.is_control_enabled()))?,
            Self::CpuTemp => write!(out, "{}", ctl.read_temperature(TempSensor::Cpu))?,
            Self::EnvTemp => write!(out, "{}", ctl.read_temperature(TempSensor::Env))?,
        }
        Ok(())
    }

    /// Parses `input` and applies it. Returns the number of bytes consumed,
    /// which is always all of `input`.
    ///
    /// # Errors
    /// [`EcError::ReadOnly`] for the temperature attributes and
    /// [`EcError::InvalidInput`] for text without a leading integer.
    pub fn store<P, A>(self, ctl: &FanController<'_, P, A>, input: &str) -> Result<usize, EcError>
    where
        P: PortIo,
        A: PortArbiter + ?Sized,
    {
        if !self.is_writable() {
            return Err(EcError::ReadOnly(self.name()));
        }

        let value = parse_int(input)
            .inspect_err(|_| warn!("{}: rejected input {input:?}", self.name()))?;
        match self.fan() {
            Some(fan) => ctl.set_fan_duty(fan, Duty::clamped(value)),
            None => ctl.set_control_enabled(value),
        }
        Ok(input.len())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Leading decimal integer of `input`, `%d` style.
///
/// # Errors
/// [`EcError::InvalidInput`] if there is no digit after the optional sign or
/// the number does not fit an `i64`.
pub fn parse_int(input: &str) -> Result<i64, EcError> {
    let s = input.trim_start();
    let sign = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(EcError::InvalidInput);
    }
    s[..sign + digits].parse().map_err(|_| EcError::InvalidInput)
}
