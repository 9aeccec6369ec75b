//! The PNP → SuperIO → I2EC indirection chain.
//!
//! Three instances of the same [`Latch`] transport, each one addressed
//! through the one below it. Only the PNP pair are real I/O ports.

use crate::regs::EcAddress;
use kernel_ports::{Latch, PortBus, PortIo, RegisterBus};
use log::trace;

/// PNP configuration index port.
pub const PNP_ADDR: u16 = 0x4e;
/// PNP configuration data port.
pub const PNP_DATA: u16 = 0x4f;

/// SuperIO index register, behind the PNP pair.
pub const SUPERIO_ADDR: u8 = 0x2e;
/// SuperIO data register, behind the PNP pair.
pub const SUPERIO_DATA: u8 = 0x2f;

/// I2EC address latch, bits 0–7.
pub const I2EC_ADDR_L: u8 = 0x10;
/// I2EC address latch, bits 8–15.
pub const I2EC_ADDR_H: u8 = 0x11;
/// I2EC data window onto the latched EC register.
pub const I2EC_DATA: u8 = 0x12;

/// First I/O port the driver touches.
pub const IO_PORT_BASE: u16 = PNP_ADDR;
/// Number of I/O ports the driver touches.
pub const IO_PORT_NUM: u16 = 2;

pub type Pnp<P> = Latch<PortBus<P>, u8, 1>;
pub type SuperIo<P> = Latch<Pnp<P>, u8, 1>;
pub type I2ec<P> = Latch<SuperIo<P>, EcAddress, 2>;

/// Byte access to the EC register space.
///
/// Every access is twelve port operations (three SuperIO accesses of four PNP
/// operations each) and is only correct if nothing else latches an address in
/// the middle. [`FanController`](crate::FanController) keeps this type behind
/// its lock.
#[derive(Debug)]
pub struct Ec<P: PortIo> {
    i2ec: I2ec<P>,
}

impl<P: PortIo> Ec<P> {
    #[must_use]
    pub fn new(io: P) -> Self {
        let pnp: Pnp<P> = Latch::new(PortBus::new(io), [PNP_ADDR], PNP_DATA);
        let superio: SuperIo<P> = Latch::new(pnp, [SUPERIO_ADDR], SUPERIO_DATA);
        Self {
            i2ec: Latch::new(superio, [I2EC_ADDR_L, I2EC_ADDR_H], I2EC_DATA),
        }
    }

    /// Reads the EC register at `addr`.
    #[inline]
    pub fn ec_read(&mut self, addr: EcAddress) -> u8 {
        let value = self.i2ec.read(addr);
        trace!("ec[{:#06x}] -> {value:#04x}", addr.into_bits());
        value
    }

    /// Writes `value` to the EC register at `addr`.
    #[inline]
    pub fn ec_write(&mut self, addr: EcAddress, value: u8) {
        trace!("ec[{:#06x}] <- {value:#04x}", addr.into_bits());
        self.i2ec.write(addr, value);
    }
}
