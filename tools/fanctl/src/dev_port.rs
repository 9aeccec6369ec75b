//! Linux `/dev/port` backend.
//!
//! The character device maps file offset `n` to I/O port `n`; a one-byte
//! positional read or write is one `inb`/`outb`. Needs `CAP_SYS_RAWIO`.

use kernel_ports::{PortArbiter, PortError, PortIo};
use log::{error, warn};
use std::fs::{File, OpenOptions, TryLockError};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::Path;

/// Default port device.
pub const DEFAULT_PORT_DEVICE: &str = "/dev/port";

/// Environment variable overriding [`DEFAULT_PORT_DEVICE`].
pub const PORT_DEVICE_ENV: &str = "FANCTL_PORT_DEVICE";

pub struct DevPort {
    file: File,
}

impl DevPort {
    /// # Errors
    /// Fails if the device cannot be opened read-write.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self { file })
    }
}

impl PortIo for DevPort {
    fn outb(&mut self, port: u16, value: u8) {
        if let Err(e) = self.file.write_all_at(&[value], u64::from(port)) {
            error!("outb {port:#06x} <- {value:#04x} failed: {e}");
        }
    }

    fn inb(&mut self, port: u16) -> u8 {
        // floating bus value if the read fails
        let mut b = [0xff];
        if let Err(e) = self.file.read_exact_at(&mut b, u64::from(port)) {
            error!("inb {port:#06x} failed: {e}");
        }
        b[0]
    }
}

/// Port reservation across processes: an exclusive advisory lock on the
/// port device.
///
/// The lock covers the whole device, so only one range can be held at a time.
pub struct DevPortLock {
    file: File,
}

impl DevPortLock {
    /// # Errors
    /// Fails if the device cannot be opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self { file })
    }
}

impl PortArbiter for DevPortLock {
    fn request_region(&self, base: u16, len: u16, name: &'static str) -> Result<(), PortError> {
        self.file.try_lock().map_err(|e| lock_failure(e, base, len, name))
    }

    fn release_region(&self, base: u16, len: u16) {
        if let Err(e) = self.file.unlock() {
            error!("failed to unlock port device for {base:#06x}+{len}: {e}");
        }
    }
}

fn lock_failure(err: TryLockError, base: u16, len: u16, name: &str) -> PortError {
    match err {
        TryLockError::WouldBlock => {
            warn!("{name}: port device is locked by another process");
            PortError::Busy {
                base,
                len,
                owner: "another process",
            }
        }
        TryLockError::Error(e) => {
            error!("{name}: failed to lock port device: {e}");
            PortError::ArbiterFailed { base, len }
        }
    }
}
