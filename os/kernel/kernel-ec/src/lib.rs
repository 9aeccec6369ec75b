//! # Mechrevo Wujie 16 Fan Control
//!
//! Reads the fan tachometers and programs the fan targets of the Wujie 16
//! embedded controller (EC). The EC is not on the usual ACPI EC ports; its
//! 16-bit register space is reached through the SuperIO "I2EC" window:
//!
//! ```text
//! I/O ports 0x4e/0x4f            PNP index/data pair (the only real ports)
//!   └─ 0x2e/0x2f                 SuperIO index/data, written through PNP
//!        └─ 0x10/0x11 + 0x12     I2EC address low/high + data, through SuperIO
//!             └─ EC register     e.g. 0x181f (fan 1 tach, high byte)
//! ```
//!
//! Every EC register access is one multi-step transaction on that chain and
//! the latched address is global hardware state. [`FanController`] owns the
//! chain behind a single ticket lock, so every transaction (and every
//! two-register tachometer read) runs without interleaving.
//!
//! ## Usage
//!
//! ```no_run
//! use kernel_ec::{FanController, FanId};
//! use kernel_ports::{PortRegistry, X86PortIo};
//!
//! static IO_PORTS: PortRegistry<16> = PortRegistry::new();
//!
//! // SAFETY: running at CPL0 on the Wujie 16.
//! let io = unsafe { X86PortIo::new() };
//! let fans = FanController::init(io, &IO_PORTS)?;
//! let rpm = fans.fan_speed(FanId::Fan1);
//! fans.write_fan_duty(2, 64)?;
//! fans.shutdown();
//! # Ok::<(), kernel_ec::EcError>(())
//! ```
//!
//! ## Modules
//!
//! * [`regs`]: EC register addresses, fixed for the one supported revision.
//! * [`bridge`]: the PNP → SuperIO → I2EC chain.
//! * [`fan`]: tachometer decoding and duty encoding.
//! * [`controller`]: the locked context with `init`/`shutdown`.
//! * [`attr`]: named text attributes (`fan1`, `fan2`, `fanctl_en`, ...).

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod attr;
pub mod bridge;
pub mod controller;
mod error;
pub mod fan;
pub mod regs;

pub use attr::Attribute;
pub use bridge::Ec;
pub use controller::{DRIVER_NAME, FanController};
pub use error::EcError;
pub use fan::{Duty, FanId, RawTachCount, TempSensor, decode_rpm};
pub use regs::{EcAddress, EcRegisterOffsets};
