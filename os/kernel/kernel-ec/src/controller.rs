//! The fan controller context.
//!
//! [`FanController`] is the only way to reach the EC. It exists between
//! [`init`](FanController::init), which reserves the PNP ports, and
//! [`shutdown`](FanController::shutdown), which consumes it; no operation can
//! run outside that window.

use crate::EcError;
use crate::bridge::{Ec, IO_PORT_BASE, IO_PORT_NUM};
use crate::fan::{Duty, FanId, RawTachCount, TempSensor, decode_rpm, encode_enable};
use crate::regs::{EcAddress, EcRegisterOffsets};
use kernel_ports::{PortArbiter, PortIo, PortRegion};
use kernel_sync::TicketMutex;
use log::{debug, error, info};

/// Name the I/O port reservation is recorded under.
pub const DRIVER_NAME: &str = "wujie-fan";

/// Owns the reserved ports and the EC access lock.
///
/// Every method takes the lock once and holds it for its whole register
/// sequence. The controller is `Sync` whenever the port backend is `Send`, so
/// it can be shared by reference between any number of callers.
pub struct FanController<'a, P: PortIo, A: PortArbiter + ?Sized> {
    // Declared before `region`: the ports are dropped before the reservation
    // is returned.
    ec: TicketMutex<Ec<P>>,
    regs: &'static EcRegisterOffsets,
    region: PortRegion<'a, A>,
}

impl<'a, P: PortIo, A: PortArbiter + ?Sized> FanController<'a, P, A> {
    /// Reserves the PNP port pair and brings up the controller.
    ///
    /// # Errors
    /// [`EcError::Port`] if the ports are already claimed; nothing is touched
    /// in that case.
    pub fn init(io: P, arbiter: &'a A) -> Result<Self, EcError> {
        info!("initializing");
        let region = PortRegion::request(arbiter, IO_PORT_BASE, IO_PORT_NUM, DRIVER_NAME)
            .inspect_err(|e| error!("failed to init I/O ports: {e}"))?;

        Ok(Self {
            ec: TicketMutex::new(Ec::new(io)),
            regs: &EcRegisterOffsets::V0,
            region,
        })
    }

    /// Drops the port backend, then releases the port reservation.
    pub fn shutdown(self) {
        info!("exiting");
        let Self { ec, region, .. } = self;
        drop(ec);
        drop(region);
    }

    /// The reserved port range.
    #[must_use]
    pub const fn region(&self) -> &PortRegion<'a, A> {
        &self.region
    }

    /// Reads one EC register.
    #[must_use]
    pub fn ec_read(&self, addr: u16) -> u8 {
        self.ec.with_lock(|ec| ec.ec_read(EcAddress::from_bits(addr)))
    }

    /// Writes one EC register.
    pub fn ec_write(&self, addr: u16, value: u8) {
        self.ec.with_lock(|ec| ec.ec_write(EcAddress::from_bits(addr), value));
    }

    /// Whether the external fan targets are in effect.
    #[must_use]
    pub fn is_control_enabled(&self) -> bool {
        let reg = self.regs.ext_fan_ctrl_en;
        self.ec.with_lock(|ec| ec.ec_read(reg)) != 0
    }

    /// Switches the external fan targets on (any nonzero `flag`) or off.
    pub fn set_control_enabled(&self, flag: i64) {
        let reg = self.regs.ext_fan_ctrl_en;
        let value = encode_enable(flag);
        debug!("fan control enable <- {value}");
        self.ec.with_lock(|ec| ec.ec_write(reg, value));
    }

    /// Current speed of `fan` in RPM.
    ///
    /// Both tachometer bytes are read under one lock hold, high byte first.
    #[must_use]
    pub fn fan_speed(&self, fan: FanId) -> u16 {
        let msb_reg = fan.tach_msb(self.regs);
        let lsb_reg = fan.tach_lsb(self.regs);

        let raw = self.ec.with_lock(|ec| {
            let msb = ec.ec_read(msb_reg);
            let lsb = ec.ec_read(lsb_reg);
            RawTachCount::new().with_msb(msb).with_lsb(lsb)
        });

        decode_rpm(raw)
    }

    /// [`fan_speed`](Self::fan_speed) for a numeric fan id.
    ///
    /// # Errors
    /// [`EcError::InvalidFan`] unless `fan_id` is 1 or 2; no port is touched.
    pub fn read_fan_speed(&self, fan_id: usize) -> Result<u16, EcError> {
        let fan = FanId::try_from(fan_id)?;
        Ok(self.fan_speed(fan))
    }

    /// Programs the target register of `fan`.
    pub fn set_fan_duty(&self, fan: FanId, duty: Duty) {
        let reg = fan.target(self.regs);
        debug!("{fan} target <- {duty}");
        self.ec.with_lock(|ec| ec.ec_write(reg, duty.get()));
    }

    /// [`set_fan_duty`](Self::set_fan_duty) for a numeric fan id and an
    /// unclamped value.
    ///
    /// # Errors
    /// [`EcError::InvalidFan`] unless `fan_id` is 1 or 2; no port is touched.
    pub fn write_fan_duty(&self, fan_id: usize, value: i64) -> Result<(), EcError> {
        let fan = FanId::try_from(fan_id)?;
        self.set_fan_duty(fan, Duty::clamped(value));
        Ok(())
    }

    /// Raw temperature byte as mirrored by the EC, in degrees Celsius.
    #[must_use]
    pub fn read_temperature(&self, sensor: TempSensor) -> u8 {
        let reg = sensor.register(self.regs);
        self.ec.with_lock(|ec| ec.ec_read(reg))
    }
}

#[cfg(feature = "asm")]
impl<'a, A: PortArbiter + ?Sized> FanController<'a, kernel_ports::X86PortIo, A> {
    /// [`init`](Self::init) with the `in`/`out` instruction backend.
    ///
    /// # Safety
    /// Must run with I/O privilege for ports `0x4e`/`0x4f` on a machine that
    /// has the Wujie SuperIO there.
    ///
    /// # Errors
    /// As [`init`](Self::init).
    pub unsafe fn init_x86(arbiter: &'a A) -> Result<Self, EcError> {
        Self::init(unsafe { kernel_ports::X86PortIo::new() }, arbiter)
    }
}
