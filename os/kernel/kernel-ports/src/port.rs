//! Byte-wide access to the x86 I/O port address space.
//!
//! The x86 architecture keeps a separate 16-bit address space for legacy
//! devices, reached only through the `in` and `out` instructions. Access is
//! privilege controlled (CPL, IOPL and the TSS I/O permission bitmap), so
//! [`X86PortIo`] can only be created through an `unsafe` constructor; once
//! created, the individual accesses are safe calls.
//!
//! ```text
//! 0x002E-0x002F   SuperIO configuration (primary)
//! 0x004E-0x004F   SuperIO configuration (secondary / PNP)
//! 0x0060-0x0064   Keyboard Controller
//! 0x0070-0x0071   CMOS/RTC
//! 0x03F8-0x03FF   Serial Port #1
//! ```

use crate::RegisterBus;

/// Byte-wide port I/O.
///
/// Implementations never fail: once the port range is reserved, elementary
/// port accesses are assumed to always complete.
pub trait PortIo {
    /// Write one byte to `port`.
    fn outb(&mut self, port: u16, value: u8);

    /// Read one byte from `port`.
    fn inb(&mut self, port: u16) -> u8;
}

impl<P: PortIo + ?Sized> PortIo for &mut P {
    #[inline]
    fn outb(&mut self, port: u16, value: u8) {
        (**self).outb(port, value);
    }

    #[inline]
    fn inb(&mut self, port: u16) -> u8 {
        (**self).inb(port)
    }
}

/// Port I/O through the `in`/`out` instructions.
#[cfg(feature = "asm")]
#[derive(Debug)]
pub struct X86PortIo {
    _private: (),
}

#[cfg(feature = "asm")]
impl X86PortIo {
    /// # Safety
    /// You must uphold **all** of the following for every port later accessed
    /// through this handle:
    /// - **Privilege:** Execute at CPL0 **or** have I/O permission (IOPL/IO
    ///   bitmap) for the port. Otherwise the CPU raises `#GP`.
    /// - **Ownership:** The port range is reserved for the caller; no other
    ///   driver reprograms the same device concurrently.
    /// - **Device presence:** The target device exists and decodes the port.
    ///   Some platforms hang on accesses to nonexistent ports.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(feature = "asm")]
impl PortIo for X86PortIo {
    #[inline]
    fn outb(&mut self, port: u16, value: u8) {
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") port,
                in("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
    }

    #[inline]
    fn inb(&mut self, port: u16) -> u8 {
        let mut v: u8;
        unsafe {
            core::arch::asm!(
                "in al, dx",
                in("dx") port,
                out("al") v,
                options(nomem, nostack, preserves_flags)
            );
        }
        v
    }
}

/// Presents raw ports as a [`RegisterBus`] addressed by port number.
#[derive(Debug)]
pub struct PortBus<P> {
    io: P,
}

impl<P: PortIo> PortBus<P> {
    #[must_use]
    pub const fn new(io: P) -> Self {
        Self { io }
    }
}

impl<P: PortIo> RegisterBus for PortBus<P> {
    type Addr = u16;

    #[inline]
    fn write(&mut self, addr: u16, value: u8) {
        self.io.outb(addr, value);
    }

    #[inline]
    fn read(&mut self, addr: u16) -> u8 {
        self.io.inb(addr)
    }
}
