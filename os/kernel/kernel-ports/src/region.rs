use kernel_sync::SpinMutex;
use log::{info, warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("I/O ports {base:#06x}+{len} are busy (held by {owner})")]
    Busy {
        base: u16,
        len: u16,
        owner: &'static str,
    },
    #[error("no free slot to record the I/O port reservation")]
    Exhausted,
    #[error("empty or wrapping I/O port range {base:#06x}+{len}")]
    InvalidRange { base: u16, len: u16 },
    /// The arbiter itself failed; the ports may well be free.
    #[error("could not claim I/O ports {base:#06x}+{len}: arbiter failure")]
    ArbiterFailed { base: u16, len: u16 },
}

/// Hands out exclusive claims on I/O port ranges.
pub trait PortArbiter {
    /// Claims `len` ports starting at `base` for `name`.
    ///
    /// # Errors
    /// Fails if any port of the range is already claimed or the claim cannot
    /// be recorded.
    fn request_region(&self, base: u16, len: u16, name: &'static str) -> Result<(), PortError>;

    /// Returns a range previously claimed with [`request_region`](Self::request_region).
    fn release_region(&self, base: u16, len: u16);
}

/// An exclusively claimed port range, released on drop.
#[derive(Debug)]
pub struct PortRegion<'a, A: PortArbiter + ?Sized> {
    arbiter: &'a A,
    base: u16,
    len: u16,
}

impl<'a, A: PortArbiter + ?Sized> PortRegion<'a, A> {
    /// # Errors
    /// Propagates the arbiter's refusal.
    pub fn request(
        arbiter: &'a A,
        base: u16,
        len: u16,
        name: &'static str,
    ) -> Result<Self, PortError> {
        arbiter.request_region(base, len, name)?;
        info!("reserved I/O ports {base:#06x}+{len} for {name}");
        Ok(Self { arbiter, base, len })
    }

    #[must_use]
    pub const fn base(&self) -> u16 {
        self.base
    }

    #[must_use]
    pub const fn len(&self) -> u16 {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn contains(&self, port: u16) -> bool {
        port >= self.base && (port - self.base) < self.len
    }
}

impl<A: PortArbiter + ?Sized> Drop for PortRegion<'_, A> {
    fn drop(&mut self) {
        self.arbiter.release_region(self.base, self.len);
        info!("released I/O ports {:#06x}+{}", self.base, self.len);
    }
}

/// One recorded claim.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub base: u16,
    pub len: u16,
    pub name: &'static str,
}

impl Reservation {
    fn end(&self) -> u32 {
        u32::from(self.base) + u32::from(self.len)
    }

    fn overlaps(&self, base: u16, len: u16) -> bool {
        let end = u32::from(base) + u32::from(len);
        u32::from(base) < self.end() && u32::from(self.base) < end
    }
}

/// Fixed-capacity port arbiter for kernels without an allocator.
///
/// ```
/// use kernel_ports::{PortRegion, PortRegistry};
///
/// static IO_PORTS: PortRegistry<8> = PortRegistry::new();
///
/// let region = PortRegion::request(&IO_PORTS, 0x4e, 2, "superio").unwrap();
/// assert!(IO_PORTS.is_reserved(0x4f));
/// assert!(PortRegion::request(&IO_PORTS, 0x4f, 1, "other").is_err());
/// drop(region);
/// assert!(!IO_PORTS.is_reserved(0x4f));
/// ```
pub struct PortRegistry<const N: usize> {
    slots: SpinMutex<[Option<Reservation>; N]>,
}

impl<const N: usize> Default for PortRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PortRegistry<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: SpinMutex::new([None; N]),
        }
    }

    /// The claim covering `port`, if any.
    #[must_use]
    pub fn owner_of(&self, port: u16) -> Option<Reservation> {
        self.slots
            .with_lock(|slots| slots.iter().flatten().copied().find(|r| r.overlaps(port, 1)))
    }

    #[must_use]
    pub fn is_reserved(&self, port: u16) -> bool {
        self.owner_of(port).is_some()
    }
}

impl<const N: usize> PortArbiter for PortRegistry<N> {
    fn request_region(&self, base: u16, len: u16, name: &'static str) -> Result<(), PortError> {
        if len == 0 || u32::from(base) + u32::from(len) > 0x1_0000 {
            return Err(PortError::InvalidRange { base, len });
        }

        self.slots.with_lock(|slots| {
            if let Some(held) = slots.iter().flatten().find(|r| r.overlaps(base, len)) {
                warn!(
                    "{name}: I/O ports {base:#06x}+{len} collide with {} at {:#06x}+{}",
                    held.name, held.base, held.len
                );
                return Err(PortError::Busy {
                    base,
                    len,
                    owner: held.name,
                });
            }

            let free = slots.iter_mut().find(|s| s.is_none()).ok_or(PortError::Exhausted)?;
            *free = Some(Reservation { base, len, name });
            Ok(())
        })
    }

    fn release_region(&self, base: u16, len: u16) {
        self.slots.with_lock(|slots| {
            match slots
                .iter_mut()
                .find(|s| matches!(s, Some(r) if r.base == base && r.len == len))
            {
                Some(slot) => *slot = None,
                None => warn!("release of unreserved I/O ports {base:#06x}+{len}"),
            }
        });
    }
}
