//! # x86 I/O Port Transports
//!
//! Building blocks for drivers that talk to chips living in the legacy x86
//! I/O port space, in particular chips that hide a larger register file
//! behind an *index/data* port pair.
//!
//! ## Layers
//!
//! ```text
//! PortIo            raw `in`/`out` on 16-bit port numbers
//!   ↓ PortBus       adapts PortIo to the RegisterBus interface
//!   ↓ Latch         write index register(s), then touch the data register
//!   ↓ Latch         ... stacked as deep as the chip needs
//! ```
//!
//! * [`PortIo`]: the byte-wide port primitives. [`X86PortIo`] issues the real
//!   instructions (feature `asm`); tests plug in a fake.
//! * [`RegisterBus`]: anything that can read and write a byte at an address.
//! * [`Latch`]: one generic index/data transport. It is itself a
//!   [`RegisterBus`], so a PNP configuration pair, a SuperIO pair behind it and
//!   a 16-bit indirection window behind *that* are all the same type with
//!   different parameters.
//!
//! ## Reservation
//!
//! Before touching a port range a driver claims it from a [`PortArbiter`].
//! [`PortRegion`] is the RAII handle for such a claim; [`PortRegistry`] is a
//! fixed-size, `no_std` arbiter usable inside a kernel.
//!
//! ## Concurrency
//!
//! Nothing in this crate serializes access. An index write followed by a data
//! access is only meaningful if no one else latches a different index in
//! between; callers put the transport behind a lock (see `kernel-sync`).

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod latch;
mod port;
mod region;

pub use latch::{Latch, RegisterBus, SubAddress};
pub use port::{PortBus, PortIo};
#[cfg(feature = "asm")]
pub use port::X86PortIo;
pub use region::{PortArbiter, PortError, PortRegion, PortRegistry, Reservation};
